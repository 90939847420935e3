pub mod platform;
pub mod snapshot;

pub use platform::{NewPlatform, Platform};
pub use snapshot::{NewSnapshot, Snapshot, SnapshotWithPlatform};
