//! `csbuild sources` command

use anyhow::Result;

use crate::cli::Cli;
use csbuild::ops::load_sources;

pub fn execute(cli: &Cli) -> Result<()> {
    let project = load_sources(&super::manifest_path(cli)?)?;

    for source in project.sources() {
        println!("{}", project.source_path(source).display());
    }

    Ok(())
}
