//! Logging setup.
//!
//! Everything in the crate reports through `tracing` spans and events; this
//! module only decides where they go.
//!
//! # Configuration
//!
//! The level is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! Output goes to stderr, or to `trace_file` with size-based rotation.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - [`file_writer`]: rotating log file writer

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
