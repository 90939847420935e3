pub mod alert;
pub mod portfolio;
pub mod query;
pub mod response;
pub mod snapshot;
pub mod vault;

pub use alert::*;
pub use portfolio::*;
pub use query::*;
pub use response::*;
pub use snapshot::*;
pub use vault::*;
