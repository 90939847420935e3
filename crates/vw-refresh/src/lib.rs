pub mod service;
pub mod task;

pub use service::{RefreshReport, RefreshService};
pub use task::RefreshTask;
