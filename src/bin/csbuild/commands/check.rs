//! `csbuild check` command

use anyhow::Result;

use crate::cli::Cli;

pub fn execute(cli: &Cli) -> Result<bool> {
    let builder = super::load(cli)?;
    let result = builder.diagnostics()?;
    super::report(cli, &builder, "check", &result)
}
