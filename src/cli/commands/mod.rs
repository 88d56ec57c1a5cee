//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves command-specific arguments
//! 2. Calls the engine or the metadata store
//! 3. Formats and displays output
//!
//! Handlers do NOT write resources directly.

mod completion;
mod generate;
mod inspect;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use generate::generate;
pub use inspect::inspect;

use crate::cli::args::Command;
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Generate(args) => generate::generate(ctx, &args),
        Command::Inspect { artifacts, json } => inspect::inspect(ctx, &artifacts, json),
        Command::Completion { shell } => completion::completion(shell),
    }
}
