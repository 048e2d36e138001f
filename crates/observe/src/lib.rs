//! Initialization logic for logging shared by the binaries in this workspace.
pub mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::Config;
