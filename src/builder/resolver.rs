//! Reference resolution.
//!
//! Turns a project's reference set into the flat list of assembly paths the
//! compiler is given. File references are used in place; embedded bytes and
//! nested project stubs are materialized under the workspace `obj` directory
//! as `<Name>.dll`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{
    validate_reference_name, BuildChain, BuildError, BuildResult, EmbeddedReference,
    NestedBuildReference, Reference, ReferenceSet,
};
use crate::util::fs::remove_file_if_exists;

/// Reference paths for the compiler plus the temp files created for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedReferences {
    paths: Vec<PathBuf>,
    temp_files: Vec<PathBuf>,
}

impl ResolvedReferences {
    /// One entry per `/r:` flag, in resolution order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Files materialized in the scratch workspace.
    pub fn temp_files(&self) -> &[PathBuf] {
        &self.temp_files
    }

    /// Delete every materialized file.
    ///
    /// Only call this after the compiler has exited.
    pub fn remove_temp_files(&self) -> Result<(), BuildError> {
        for path in &self.temp_files {
            remove_file_if_exists(path)?;
        }
        Ok(())
    }
}

/// Outcome of resolving a reference set.
#[derive(Debug)]
pub enum Resolution {
    /// Every reference is ready for the compiler.
    Resolved(ResolvedReferences),
    /// A nested project failed to build; the outer compile must not run.
    Failed(BuildResult),
}

/// Resolves the references of one project.
pub struct ReferenceResolver<'a> {
    /// Name of the project being built
    project: &'a str,
    /// Where materialized references are written
    obj_dir: &'a Path,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(project: &'a str, obj_dir: &'a Path) -> Self {
        ReferenceResolver { project, obj_dir }
    }

    /// Resolve `references` in order.
    ///
    /// Nested projects are built inline, one after another, with `chain`
    /// naming every unit already in progress.
    pub fn resolve(
        &self,
        references: &ReferenceSet,
        chain: &mut BuildChain,
    ) -> Result<Resolution, BuildError> {
        let mut resolved = ResolvedReferences::default();
        let mut seen: Vec<&str> = Vec::new();

        for reference in references {
            let name = reference.name();

            if name == self.project {
                tracing::debug!("Skipping self-reference `{}`", name);
                continue;
            }
            if seen.contains(&name) {
                tracing::warn!(
                    "Ignoring duplicate reference `{}` in `{}`",
                    name,
                    self.project
                );
                continue;
            }
            seen.push(name);

            tracing::debug!("Resolving {} reference `{}`", reference.kind(), name);

            match reference {
                Reference::File(file) => resolved.paths.push(file.path().to_path_buf()),
                Reference::Embedded(embedded) => {
                    let path = self.materialize_embedded(embedded)?;
                    resolved.temp_files.push(path.clone());
                    resolved.paths.push(path);
                }
                Reference::Nested(nested) => {
                    let path = self.materialized_path(nested.name())?;
                    resolved.temp_files.push(path.clone());

                    let result = self.materialize_nested(nested, &path, chain)?;
                    if !result.success() {
                        tracing::info!(
                            "Referenced project `{}` failed; not compiling `{}`",
                            name,
                            self.project
                        );
                        let mut errors =
                            vec![format!("referenced project `{}` failed to build", name)];
                        errors.extend(result.errors().iter().cloned());
                        return Ok(Resolution::Failed(
                            BuildResult::failed(errors).with_output(result.output()),
                        ));
                    }
                    resolved.paths.push(path);
                }
            }
        }

        Ok(Resolution::Resolved(resolved))
    }

    /// `<obj>/<name>.dll`, refusing names that would land elsewhere.
    fn materialized_path(&self, name: &str) -> Result<PathBuf, BuildError> {
        validate_reference_name(name)?;
        Ok(self.obj_dir.join(format!("{}.dll", name)))
    }

    fn materialize_embedded(&self, reference: &EmbeddedReference) -> Result<PathBuf, BuildError> {
        let path = self.materialized_path(reference.name())?;
        fs::write(&path, reference.content()).map_err(|source| BuildError::Materialize {
            name: reference.name().to_string(),
            source,
        })?;
        Ok(path)
    }

    fn materialize_nested(
        &self,
        reference: &NestedBuildReference,
        path: &Path,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        if chain.contains(reference.name()) {
            return Err(chain.cycle_error(reference.name()));
        }

        let file = File::create(path).map_err(|source| BuildError::Materialize {
            name: reference.name().to_string(),
            source,
        })?;
        let mut out = BufWriter::new(file);

        let result = reference.unit().write_reference_stub(&mut out, chain)?;
        out.flush().map_err(|source| BuildError::Materialize {
            name: reference.name().to_string(),
            source,
        })?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::BuildUnit;
    use tempfile::TempDir;

    /// A unit that writes fixed bytes or fails.
    struct FixedUnit {
        name: String,
        bytes: Option<Vec<u8>>,
    }

    impl BuildUnit for FixedUnit {
        fn name(&self) -> &str {
            &self.name
        }

        fn write_reference_stub(
            &self,
            out: &mut dyn Write,
            chain: &mut BuildChain,
        ) -> Result<BuildResult, BuildError> {
            chain.enter(&self.name)?;
            let result = match self.bytes {
                Some(ref bytes) => {
                    out.write_all(bytes).unwrap();
                    out.flush().unwrap();
                    BuildResult::succeeded()
                }
                None => BuildResult::compilation_failed(),
            };
            chain.leave();
            Ok(result)
        }
    }

    fn nested(name: &str, bytes: Option<&[u8]>) -> Reference {
        Reference::nested(
            name,
            Arc::new(FixedUnit {
                name: name.to_string(),
                bytes: bytes.map(<[u8]>::to_vec),
            }),
        )
    }

    fn resolve(refs: &ReferenceSet, obj: &Path) -> Resolution {
        ReferenceResolver::new("App", obj)
            .resolve(refs, &mut BuildChain::new())
            .unwrap()
    }

    #[test]
    fn test_self_reference_skipped() {
        let tmp = TempDir::new().unwrap();
        let refs: ReferenceSet = [
            Reference::file("App", "/out/App.dll"),
            Reference::embedded("App", vec![1u8]),
            Reference::file("Lib", "/out/Lib.dll"),
        ]
        .into_iter()
        .collect();

        let Resolution::Resolved(resolved) = resolve(&refs, tmp.path()) else {
            panic!("expected resolution");
        };
        assert_eq!(resolved.paths(), [PathBuf::from("/out/Lib.dll")]);
        assert!(resolved.temp_files().is_empty());
        assert!(!tmp.path().join("App.dll").exists());
    }

    #[test]
    fn test_embedded_written_to_obj() {
        let tmp = TempDir::new().unwrap();
        let refs: ReferenceSet = [Reference::embedded("Core", b"0123456789".to_vec())]
            .into_iter()
            .collect();

        let Resolution::Resolved(resolved) = resolve(&refs, tmp.path()) else {
            panic!("expected resolution");
        };
        let expected = tmp.path().join("Core.dll");
        assert_eq!(resolved.paths(), [expected.clone()]);
        assert_eq!(resolved.temp_files(), [expected.clone()]);
        assert_eq!(fs::read(&expected).unwrap(), b"0123456789");

        resolved.remove_temp_files().unwrap();
        assert!(!expected.exists());
    }

    #[test]
    fn test_order_and_duplicates() {
        let tmp = TempDir::new().unwrap();
        let refs: ReferenceSet = [
            Reference::file("Zed", "/libs/Zed.dll"),
            nested("Mid", Some(&b"stub"[..])),
            Reference::file("Zed", "/other/Zed.dll"),
            Reference::embedded("Alpha", vec![0u8; 3]),
        ]
        .into_iter()
        .collect();

        let Resolution::Resolved(resolved) = resolve(&refs, tmp.path()) else {
            panic!("expected resolution");
        };
        assert_eq!(
            resolved.paths(),
            [
                PathBuf::from("/libs/Zed.dll"),
                tmp.path().join("Mid.dll"),
                tmp.path().join("Alpha.dll"),
            ]
        );
        assert_eq!(fs::read(tmp.path().join("Mid.dll")).unwrap(), b"stub");
    }

    #[test]
    fn test_failed_nested_stops_resolution() {
        let tmp = TempDir::new().unwrap();
        let refs: ReferenceSet = [nested("Broken", None), Reference::embedded("Later", vec![1u8])]
            .into_iter()
            .collect();

        let Resolution::Failed(result) = resolve(&refs, tmp.path()) else {
            panic!("expected failure");
        };
        assert!(!result.success());
        assert_eq!(
            result.errors(),
            ["referenced project `Broken` failed to build", "Compilation failed"]
        );
        assert!(!tmp.path().join("Later.dll").exists());
    }

    #[test]
    fn test_nested_already_in_chain_is_cycle() {
        let tmp = TempDir::new().unwrap();
        let refs: ReferenceSet = [nested("Outer", Some(&b"x"[..]))].into_iter().collect();

        let mut chain = BuildChain::new();
        chain.enter("Outer").unwrap();
        chain.enter("App").unwrap();

        let err = ReferenceResolver::new("App", tmp.path())
            .resolve(&refs, &mut chain)
            .unwrap_err();
        match err {
            BuildError::CyclicReference { chain } => assert_eq!(chain, ["Outer", "App", "Outer"]),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_escaping_name_is_rejected_before_writing() {
        let tmp = TempDir::new().unwrap();
        let obj = tmp.path().join("App").join("obj");
        fs::create_dir_all(&obj).unwrap();
        let victim = tmp.path().join("Victim.dll");
        fs::write(&victim, b"user data").unwrap();

        let refs: ReferenceSet = [Reference::embedded("../../Victim", b"MZ".to_vec())]
            .into_iter()
            .collect();
        let err = ReferenceResolver::new("App", &obj)
            .resolve(&refs, &mut BuildChain::new())
            .unwrap_err();

        assert!(matches!(err, BuildError::InvalidReferenceName { ref name } if name == "../../Victim"));
        assert_eq!(fs::read(&victim).unwrap(), b"user data");
    }

    #[test]
    fn test_nested_with_separator_in_name_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let refs: ReferenceSet = [nested("sub/Lib", Some(&b"stub"[..]))].into_iter().collect();

        let err = ReferenceResolver::new("App", tmp.path())
            .resolve(&refs, &mut BuildChain::new())
            .unwrap_err();

        assert!(matches!(err, BuildError::InvalidReferenceName { .. }));
        assert!(!tmp.path().join("sub").exists());
    }

    #[test]
    fn test_unwritable_obj_is_materialize_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let refs: ReferenceSet = [Reference::embedded("Core", vec![1u8])].into_iter().collect();

        let err = ReferenceResolver::new("App", &missing)
            .resolve(&refs, &mut BuildChain::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::Materialize { ref name, .. } if name == "Core"));
    }
}
