//! Configuration management.
//!
//! - `LoaderConfig`: cache and preload settings for a cursor loader
//!
//! Configs are plain values owned by whoever builds the loader; there is
//! no process-wide instance.

pub mod loader;

pub use loader::LoaderConfig;
