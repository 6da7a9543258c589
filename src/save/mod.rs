//! Persisted project format: typed model, migration from older versions, validation, storage.

pub mod background;
pub mod log;
pub mod migrate;
pub mod model;
pub mod store;
pub mod validate;
