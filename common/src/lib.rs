//! Common utilities for the sandbox demos
//!
//! This crate provides the window and GPU bootstrap, the screen-space camera and
//! the colored vertex type shared by every sandbox variant.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;

/// Initialize `env_logger` with an `info` default that `RUST_LOG` can override.
///
/// Call this first thing in `main` so startup failures are logged.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
