//! engine
//!
//! Orchestrates a generation pass: Collect -> Build -> Merge -> Generate -> Persist.
//!
//! # Architecture
//!
//! The engine is the only place that sequences the other layers:
//!
//! 1. **Collect**: Find resource files of the own and ancestor source sets
//! 2. **Build**: Parse each kind's files into per-source-set fragments
//! 3. **Merge**: Fold linked metadata and fragments, least specific first
//! 4. **Generate**: Hand the merged resources to the platform generators
//! 5. **Persist**: Write the metadata artifact for downstream passes
//!
//! # Invariants
//!
//! - A pass is a pure function of its configuration and input files
//! - The metadata artifact exists only after a fully successful pass
//!
//! # Example
//!
//! ```no_run
//! use polyres::core::config::{GenerationConfig, GenerationFile};
//! use polyres::engine::run;
//!
//! let config = GenerationConfig::load(None, GenerationFile::default())?;
//! let outcome = run(&config)?;
//! println!("wrote {} files", outcome.written.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod collect;
pub mod runner;

pub use collect::{collect, CollectError, CollectedSourceSet, ResourceFiles, SourceSetResources};
pub use runner::{run, ErrorCategory, RunError, RunOutcome, Stage, StageFailure};

/// Execution context derived from global CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> crate::ui::output::Verbosity {
        crate::ui::output::Verbosity::from_flags(self.quiet, self.debug)
    }
}
