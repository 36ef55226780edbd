//! Stand-alone host: file-backed storage and an in-process runtime channel.

mod local;
mod store;

pub use local::LocalHost;
pub use store::FileStore;
