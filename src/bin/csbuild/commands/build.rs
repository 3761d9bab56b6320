//! `csbuild build` command

use anyhow::Result;

use crate::cli::{BuildArgs, Cli};

pub fn execute(cli: &Cli, args: &BuildArgs) -> Result<bool> {
    let builder = super::load(cli)?;

    let out = match args.out {
        Some(ref out) => out.clone(),
        None => builder.project().root().join("bin"),
    };

    let result = builder.emit_to_path(&out)?;
    super::report(cli, &builder, "build", &result)
}
