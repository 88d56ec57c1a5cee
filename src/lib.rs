//! polyres - compile multiplatform resource definitions into native resources
//!
//! polyres takes the resources of one source set (strings, plurals, images
//! and colors), merges them with those of its ancestor source sets and with
//! metadata persisted by earlier passes, then writes the native resources of
//! one target platform and a metadata artifact that later passes link against.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Collect → Build → Merge → Generate → Persist
//! - [`core`] - Domain types, configuration, metadata schema and merging
//! - [`builder`] - Per-kind parsers turning resource files into metadata
//! - [`platform`] - Per-platform native resource generators
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! polyres maintains the following invariants:
//!
//! 1. Ancestors never override descendants; the own source set always wins
//! 2. A metadata artifact is written only by a fully successful pass
//! 3. Identical inputs produce byte-identical outputs
//! 4. Every entry has a default value once merging completes

pub mod builder;
pub mod cli;
pub mod core;
pub mod engine;
pub mod platform;
pub mod ui;
