//! Configuration for gmpack.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (GMPACK_STAGING_DIR, GMPACK_ASSETS_PATTERN)
//! 2. Config file (.gmpack/config.yaml, or <user config dir>/gmpack/config.yaml)
//! 3. Defaults (system temp dir, select everything)
//!
//! Config file discovery:
//! - Searches current directory and parents for .gmpack/config.yaml
//! - Falls back to the per-user config directory
//! - Paths in a project config file are relative to the directory holding .gmpack/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::SELECT_ALL;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".gmpack";
const CONFIG_FILE: &str = "config.yaml";

const ENV_STAGING_DIR: &str = "GMPACK_STAGING_DIR";
const ENV_ASSETS_PATTERN: &str = "GMPACK_ASSETS_PATTERN";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    /// Directory staging directories are created in
    pub staging_dir: Option<String>,
    /// Selection pattern used when the CLI flag is absent
    pub assets_pattern: Option<String>,
    /// Abort the export when any payload copy fails
    pub fail_on_copy_error: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path staging directories are created under
    pub staging_dir: PathBuf,
    /// Default selection pattern
    pub assets_pattern: String,
    /// Abort on payload copy failure
    pub fail_on_copy_error: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir(),
            assets_pattern: SELECT_ALL.to_string(),
            fail_on_copy_error: false,
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents, then the user config dir
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let user_config = dirs::config_dir()?.join("gmpack").join(CONFIG_FILE);
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge config file values and environment lookups over the defaults
fn resolve(
    config: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    if let Some((config_path, file)) = config {
        // Base directory is the parent of .gmpack/ for project configs
        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        let base_dir = if config_dir.file_name().is_some_and(|n| n == CONFIG_DIR) {
            config_dir.parent().unwrap_or(config_dir)
        } else {
            config_dir
        };

        if let Some(ref staging) = file.export.staging_dir {
            resolved.staging_dir = resolve_path(base_dir, staging);
        }
        if let Some(pattern) = file.export.assets_pattern {
            resolved.assets_pattern = pattern;
        }
        if let Some(fail) = file.export.fail_on_copy_error {
            resolved.fail_on_copy_error = fail;
        }
        resolved.config_file = Some(config_path);
    }

    if let Some(staging) = env(ENV_STAGING_DIR) {
        resolved.staging_dir = PathBuf::from(staging);
    }
    if let Some(pattern) = env(ENV_ASSETS_PATTERN) {
        resolved.assets_pattern = pattern;
    }

    resolved
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config = match find_config_file() {
        Some(path) => {
            let file = load_config_file(&path)?;
            Some((path, file))
        }
        None => None,
    };

    Ok(resolve(config, |key| std::env::var(key).ok()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{e:#}")));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = resolve(None, no_env);

        assert_eq!(config.staging_dir, std::env::temp_dir());
        assert_eq!(config.assets_pattern, "*");
        assert!(!config.fail_on_copy_error);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".gmpack");
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
export:
  staging_dir: build/staging
  assets_pattern: "Scripts/**"
  fail_on_copy_error: true
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.export.staging_dir.as_deref(), Some("build/staging"));
        assert_eq!(parsed.export.fail_on_copy_error, Some(true));

        let config = resolve(Some((config_path.clone(), parsed)), no_env);
        assert_eq!(config.staging_dir, temp.path().join("build/staging"));
        assert_eq!(config.assets_pattern, "Scripts/**");
        assert!(config.fail_on_copy_error);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            version: "1.0".to_string(),
            export: ExportConfig {
                staging_dir: Some("/from/file".to_string()),
                assets_pattern: Some("Rooms".to_string()),
                fail_on_copy_error: None,
            },
        };

        let config = resolve(
            Some((PathBuf::from("/project/.gmpack/config.yaml"), file)),
            |key| match key {
                "GMPACK_STAGING_DIR" => Some("/from/env".to_string()),
                _ => None,
            },
        );

        assert_eq!(config.staging_dir, PathBuf::from("/from/env"));
        assert_eq!(config.assets_pattern, "Rooms");
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
