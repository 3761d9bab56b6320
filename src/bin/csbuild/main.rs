//! csbuild CLI - build C# libraries with an external compiler

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use csbuild::util::diagnostic;
use csbuild::BuildError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            match e.downcast_ref::<BuildError>() {
                Some(build_err) => {
                    diagnostic::emit(&build_err.to_diagnostic(), std::io::stderr().is_terminal())
                }
                None => eprintln!("error: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}

/// Returns whether the requested build succeeded.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("csbuild=debug")
    } else {
        EnvFilter::new("csbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build(ref args) => commands::build::execute(&cli, args),
        Commands::Check => commands::check::execute(&cli),
        Commands::Stub(ref args) => commands::stub::execute(&cli, args),
        Commands::Emit(ref args) => commands::emit::execute(&cli, args),
        Commands::Sources => commands::sources::execute(&cli).map(|()| true),
        Commands::Completions(ref args) => commands::completions::execute(args).map(|()| true),
    }
}
