//! `csbuild emit` command

use anyhow::Result;

use crate::cli::{Cli, EmitArgs};

pub fn execute(cli: &Cli, args: &EmitArgs) -> Result<bool> {
    let builder = super::load(cli)?;

    let mut assembly = super::staged_file(&args.assembly)?;
    let mut pdb = super::staged_file(&args.pdb)?;
    let result = builder.emit_to_streams(assembly.as_file_mut(), pdb.as_file_mut())?;
    if result.success() {
        super::persist(assembly, &args.assembly)?;
        super::persist(pdb, &args.pdb)?;
    }

    super::report(cli, &builder, "emit", &result)
}
