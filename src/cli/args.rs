//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{GenerationFile, OutputConfig, UpperSourceSetConfig};

/// polyres - compile multiplatform resources into native resources and linkable metadata
#[derive(Parser, Debug)]
#[command(name = "polyres")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one generation pass
    #[command(
        name = "generate",
        long_about = "Run one generation pass.\n\n\
            Collects the resources of a source set and its ancestors, merges them \
            with linked metadata from earlier passes, writes native resources for \
            the target platform and persists a metadata artifact describing the \
            result.\n\n\
            Settings come from the generation file (polyres.toml); flags override it.",
        after_help = "\
EXAMPLES:
    # Common pass, settings from ./polyres.toml
    polyres generate

    # JVM pass linking against the common artifact
    polyres generate --config jvm.toml --input-metadata build/common/metadata.json

    # Everything on the command line
    polyres generate --source-set commonMain --resources src/commonMain/resources \\
        --platform common --package com.example --output build/common"
    )]
    Generate(GenerateArgs),

    /// Show the contents of metadata artifacts
    #[command(
        name = "inspect",
        long_about = "Show the contents of metadata artifacts.\n\n\
            Validates each artifact and lists its objects with their kind, \
            visibility and resource keys."
    )]
    Inspect {
        /// Artifacts to inspect
        #[arg(required = true, value_name = "ARTIFACT")]
        artifacts: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags of `generate`; each overrides the matching generation file field.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Generation file (default: $POLYRES_CONFIG or ./polyres.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the source set being processed
    #[arg(long)]
    pub source_set: Option<String>,

    /// Resources directory of the source set
    #[arg(long, value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Ancestor source set as NAME=DIR, nearest first (repeatable)
    #[arg(long = "upper", value_name = "NAME=DIR", value_parser = parse_upper)]
    pub upper: Vec<UpperSourceSetConfig>,

    /// Target platform: common, android, apple, jvm, js, wasm
    #[arg(long)]
    pub platform: Option<String>,

    /// Native target for the apple platform
    #[arg(long)]
    pub apple_target: Option<String>,

    /// Package of the generated resource holder
    #[arg(long = "package")]
    pub package_name: Option<String>,

    /// Class name of the generated resource holder
    #[arg(long)]
    pub class_name: Option<String>,

    /// public or internal
    #[arg(long)]
    pub visibility: Option<String>,

    /// Only explicit \n escapes produce line breaks
    #[arg(long)]
    pub strict_line_breaks: bool,

    /// Package of the Android R class
    #[arg(long = "android-r-class")]
    pub android_r_class_package: Option<String>,

    /// Development region of the Apple bundle
    #[arg(long = "base-region")]
    pub base_localization_region: Option<String>,

    /// Metadata artifact of an upstream pass (repeatable, in link order)
    #[arg(long = "input-metadata", value_name = "PATH")]
    pub input_metadata: Vec<PathBuf>,

    /// Build directory holding every output
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Flags as a generation file layer; unset flags stay `None`.
    pub fn overrides(&self) -> GenerationFile {
        let non_empty = |values: &Vec<PathBuf>| (!values.is_empty()).then(|| values.clone());
        GenerationFile {
            source_set: self.source_set.clone(),
            own_resources: self.resources.clone(),
            upper_source_sets: (!self.upper.is_empty()).then(|| self.upper.clone()),
            platform: self.platform.clone(),
            apple_target: self.apple_target.clone(),
            package_name: self.package_name.clone(),
            class_name: self.class_name.clone(),
            visibility: self.visibility.clone(),
            strict_line_breaks: self.strict_line_breaks.then_some(true),
            android_r_class_package: self.android_r_class_package.clone(),
            ios_base_localization_region: self.base_localization_region.clone(),
            input_metadata: non_empty(&self.input_metadata),
            output: self.output.clone().map(|root| OutputConfig {
                root: Some(root),
                ..Default::default()
            }),
        }
    }
}

fn parse_upper(value: &str) -> Result<UpperSourceSetConfig, String> {
    let (name, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DIR, got '{value}'"))?;
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=DIR, got '{value}'"));
    }
    Ok(UpperSourceSetConfig {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

/// Supported shells for completion.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
