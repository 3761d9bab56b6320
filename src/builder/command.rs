//! Compiler command-line assembly.
//!
//! The command line is fixed: a library target with no response-file
//! configuration and no implicit standard library, followed by the optional
//! debug and documentation outputs, every source file and finally one
//! reference flag per resolved reference.

use std::path::{Path, PathBuf};

use crate::builder::context::BuildContext;
use crate::core::Project;

/// Which side artifacts an emit produces next to the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    pub emit_pdb: bool,
    pub emit_doc_file: bool,
}

impl EmitOptions {
    /// Assembly, debug symbols and XML documentation.
    pub const FULL: EmitOptions = EmitOptions {
        emit_pdb: true,
        emit_doc_file: true,
    };

    /// Assembly and debug symbols.
    pub const WITH_PDB: EmitOptions = EmitOptions {
        emit_pdb: true,
        emit_doc_file: false,
    };

    /// Assembly only.
    pub const MINIMAL: EmitOptions = EmitOptions {
        emit_pdb: false,
        emit_doc_file: false,
    };
}

/// Where an emit writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub assembly: PathBuf,
    pub pdb: Option<PathBuf>,
    pub doc: Option<PathBuf>,
}

impl ArtifactPaths {
    /// `<dir>/<name>.dll`, plus `.pdb` and `.xml` as requested.
    pub fn new(output_dir: &Path, name: &str, options: EmitOptions) -> Self {
        ArtifactPaths {
            assembly: output_dir.join(format!("{}.dll", name)),
            pdb: options
                .emit_pdb
                .then(|| output_dir.join(format!("{}.pdb", name))),
            doc: options
                .emit_doc_file
                .then(|| output_dir.join(format!("{}.xml", name))),
        }
    }
}

/// One compiler argument: a flag prefix and an optional path value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Arg {
    prefix: &'static str,
    value: String,
    quoted: bool,
}

impl Arg {
    fn render(&self) -> String {
        format!("{}{}", self.prefix, self.value)
    }

    fn display(&self) -> String {
        if self.quoted {
            format!("{}\"{}\"", self.prefix, self.value)
        } else {
            self.render()
        }
    }
}

/// A command to execute, with program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "csc")
    pub program: PathBuf,
    /// Working directory for the compiler
    pub cwd: Option<PathBuf>,
    args: Vec<Arg>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            cwd: None,
            args: Vec::new(),
        }
    }

    /// Add a plain argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg {
            prefix: "",
            value: arg.into(),
            quoted: false,
        });
        self
    }

    /// Add multiple plain arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Add a `<flag><path>` argument, e.g. `/out:` + path.
    pub fn flag_path(mut self, flag: &'static str, path: &Path) -> Self {
        self.args.push(Arg {
            prefix: flag,
            value: path.display().to_string(),
            quoted: false,
        });
        self
    }

    /// Add a path argument that is quoted in the displayed command line.
    pub fn quoted_path(mut self, flag: &'static str, path: &Path) -> Self {
        self.args.push(Arg {
            prefix: flag,
            value: path.display().to_string(),
            quoted: true,
        });
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Arguments as passed to the process.
    pub fn argv(&self) -> Vec<String> {
        self.args.iter().map(Arg::render).collect()
    }

    /// The command line as a single string, with source and reference paths
    /// quoted.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(Arg::display));
        parts.join(" ")
    }

    /// Paths passed with `/r:`, in order.
    pub fn references(&self) -> Vec<PathBuf> {
        self.args
            .iter()
            .filter(|a| a.prefix == REFERENCE_FLAG)
            .map(|a| PathBuf::from(&a.value))
            .collect()
    }
}

const REFERENCE_FLAG: &str = "/r:";

/// Build the compiler invocation for one emit.
pub fn compile_command(
    ctx: &BuildContext,
    project: &Project,
    artifacts: &ArtifactPaths,
    references: &[PathBuf],
) -> CommandSpec {
    let mut cmd = CommandSpec::new(ctx.compiler())
        .cwd(project.root())
        .flag_path("/out:", &artifacts.assembly)
        .arg("/target:library")
        .arg("/noconfig")
        .arg("/nostdlib");

    if let Some(ref pdb) = artifacts.pdb {
        cmd = cmd.arg("/debug").flag_path("/pdb:", pdb);
    }

    if let Some(ref doc) = artifacts.doc {
        cmd = cmd.flag_path("/doc:", doc);
    }

    cmd = cmd.args(ctx.extra_args().iter().cloned());

    for source in project.sources() {
        cmd = cmd.quoted_path("", &project.source_path(source));
    }

    for reference in references {
        cmd = cmd.quoted_path(REFERENCE_FLAG, reference);
    }

    cmd
}
