//! Command Line Interface (CLI) layer for hwpdf.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for command-line conversions. It
//! wires user-provided options to `hwpdf::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
