//! The in-memory project session and its validated settings.

pub mod property;
pub mod session;

pub use property::Property;
pub use session::{LoadOpts, Loaded, Project, SOFTWARE_VERSION, deep_merge};
