//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All terminal output of the commands goes through this module so quiet
//! and debug modes behave the same everywhere. Diagnostics from the engine
//! use `tracing` instead.

pub mod output;
