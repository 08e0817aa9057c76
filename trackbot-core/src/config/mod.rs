//! Configuration types
//!
//! Board configuration and the fixed shield wiring. With the `serde`
//! feature the configuration can be stored as postcard binary data.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
