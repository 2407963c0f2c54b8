//! Command Line Interface (CLI) layer for the converter.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for running a conversion. It
//! wires user-provided options to the underlying library functionality
//! exposed via `lanedict::api`.
//!
//! If you are embedding the converter into another application, prefer
//! using the high-level `lanedict::api` module instead of calling the
//! CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
