//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use csbuild::ops::MessageFormat;

/// csbuild - build C# libraries with an external compiler
#[derive(Parser)]
#[command(name = "csbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to csbuild.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,

    /// C# compiler to use
    #[arg(long, global = true, env = "CSBUILD_COMPILER")]
    pub compiler: Option<PathBuf>,

    /// Output format for build results
    #[arg(long, global = true, default_value = "human")]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the project into an output directory
    Build(BuildArgs),

    /// Check that the project compiles without keeping any output
    Check,

    /// Build a reference-only assembly
    Stub(StubArgs),

    /// Build and write the assembly and debug symbols to the given files
    Emit(EmitArgs),

    /// List the project's source files
    Sources,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Output directory (defaults to `<project>/bin`)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct StubArgs {
    /// File to write the reference assembly to
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct EmitArgs {
    /// File to write the assembly to
    #[arg(long)]
    pub assembly: PathBuf,

    /// File to write the debug symbols to
    #[arg(long)]
    pub pdb: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
