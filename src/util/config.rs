//! Configuration file support for csbuild.
//!
//! csbuild reads two configuration file locations:
//! - Global: `~/.csbuild/config.toml` - User-wide defaults
//! - Project: `.csbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// csbuild configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler settings
    pub compiler: CompilerSettings,

    /// Build settings
    pub build: BuildSettings,
}

/// Compiler location and extra arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Path to the C# compiler (e.g., /usr/bin/csc)
    pub path: Option<PathBuf>,

    /// Extra arguments passed after the fixed compiler flags
    pub args: Vec<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSettings {
    /// Parent directory for unique scratch workspaces (defaults to the
    /// system temp directory)
    pub scratch_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or fails to parse.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.compiler.path.is_some() {
            self.compiler.path = other.compiler.path;
        }
        if !other.compiler.args.is_empty() {
            self.compiler.args = other.compiler.args;
        }
        if other.build.scratch_dir.is_some() {
            self.build.scratch_dir = other.build.scratch_dir;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.csbuild/config.toml)
/// 2. Global config (~/.csbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global csbuild config directory (~/.csbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".csbuild"))
}

/// Get the global config path (~/.csbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.csbuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".csbuild").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(
            &global,
            "[compiler]\npath = \"/usr/bin/mcs\"\nargs = [\"/langversion:7\"]\n",
        )
        .unwrap();
        std::fs::write(&project, "[compiler]\npath = \"/opt/csc\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.compiler.path, Some(PathBuf::from("/opt/csc")));
        assert_eq!(config.compiler.args, ["/langversion:7"]);
    }

    #[test]
    fn test_scratch_dir_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[build]\nscratch-dir = \"/var/tmp/cs\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.build.scratch_dir, Some(PathBuf::from("/var/tmp/cs")));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[compiler\n").unwrap();

        assert_eq!(Config::load_or_default(&path), Config::default());
        assert_eq!(
            load_config(None, &tmp.path().join("missing.toml")),
            Config::default()
        );
    }

    #[test]
    fn test_project_config_path() {
        assert_eq!(
            project_config_path(Path::new("/work/app")),
            PathBuf::from("/work/app/.csbuild/config.toml")
        );
    }
}
