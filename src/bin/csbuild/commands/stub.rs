//! `csbuild stub` command

use anyhow::Result;

use crate::cli::{Cli, StubArgs};

pub fn execute(cli: &Cli, args: &StubArgs) -> Result<bool> {
    let builder = super::load(cli)?;

    let mut file = super::staged_file(&args.out)?;
    let result = builder.emit_reference_stub(file.as_file_mut())?;
    if result.success() {
        super::persist(file, &args.out)?;
    }

    super::report(cli, &builder, "stub", &result)
}
