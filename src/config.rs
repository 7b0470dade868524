//! # Configuration Module
//!
//! This module provides configuration support for `crm`: a default template
//! path, a default for recursive traversal, and extra filetype and suffix
//! names that map onto the builtin comment dialects.
//!
//! Configuration can be specified in a `.crm.toml` file or via the
//! `CRM_CONFIG` environment variable.
//!
//! ```toml
//! copyright = "COPYRIGHT"
//! recursive = true
//!
//! [filetypes]
//! kotlin = "groovy_style_comment"
//!
//! [suffixes]
//! kt = "groovy_style_comment"
//! pyi = "hash_comment"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::registry::{DialectId, Registry};
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".crm.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "CRM_CONFIG";

/// Main configuration struct for `crm`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Path to the copyright template, relative to the working directory.
  #[serde(default)]
  pub copyright: Option<PathBuf>,

  /// Whether directories are walked without passing `-r`.
  #[serde(default)]
  pub recursive: Option<bool>,

  /// Extra filetype names, e.g. `kotlin = "groovy_style_comment"`.
  #[serde(default)]
  pub filetypes: HashMap<String, DialectId>,

  /// Extra suffixes without the leading dot, e.g. `kt = "groovy_style_comment"`.
  #[serde(default)]
  pub suffixes: HashMap<String, DialectId>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  Parse { path: PathBuf, source: toml::de::Error },

  /// An alias entry is invalid.
  #[error("Invalid alias '{alias}': {message}")]
  InvalidAlias { alias: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// Alias keys are lowercased so lookups stay case-insensitive.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config = Self::parse(&content).map_err(|e| match e {
      ConfigError::Parse { source, .. } => ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      },
      other => other,
    })?;

    verbose_log!(
      "Loaded {} filetype and {} suffix aliases",
      config.filetypes.len(),
      config.suffixes.len()
    );

    Ok(config)
  }

  /// Parses and validates configuration text.
  pub fn parse(content: &str) -> Result<Self, ConfigError> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
      path: PathBuf::new(),
      source: e,
    })?;

    config.validate()?;
    Ok(config.normalize())
  }

  /// Checks that alias keys are non-empty and suffixes carry no leading dot.
  fn validate(&self) -> Result<(), ConfigError> {
    for alias in self.filetypes.keys().chain(self.suffixes.keys()) {
      if alias.trim().is_empty() {
        return Err(ConfigError::InvalidAlias {
          alias: alias.clone(),
          message: "alias cannot be empty".to_string(),
        });
      }
    }

    for suffix in self.suffixes.keys() {
      if suffix.starts_with('.') {
        return Err(ConfigError::InvalidAlias {
          alias: suffix.clone(),
          message: "suffix should not include leading dot".to_string(),
        });
      }
    }

    Ok(())
  }

  fn normalize(self) -> Self {
    let lower = |map: HashMap<String, DialectId>| -> HashMap<String, DialectId> {
      map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
    };

    Self {
      filetypes: lower(self.filetypes),
      suffixes: lower(self.suffixes),
      ..self
    }
  }

  /// Builds the registry: builtin dialects plus this file's aliases.
  pub fn registry(&self) -> Registry {
    Registry::builtin().with_aliases(
      self.filetypes.iter().map(|(k, v)| (k.clone(), *v)),
      self.suffixes.iter().map(|(k, v)| (k.clone(), *v)),
    )
  }
}

/// Discover the configuration file path.
///
/// Search order:
/// 1. The explicit path from `--config`
/// 2. The `CRM_CONFIG` environment variable
/// 3. `.crm.toml` in `base_dir`
pub fn discover_config_path(explicit_path: Option<&Path>, base_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = base_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `None` when discovery is disabled or no file is found.
pub fn load_config(explicit_path: Option<&Path>, base_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, base_dir) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_valid_config() {
    let config = Config::parse(concat!(
      "copyright = \"LICENSE_HEADER\"\n",
      "recursive = true\n",
      "\n",
      "[filetypes]\n",
      "Kotlin = \"groovy_style_comment\"\n",
      "\n",
      "[suffixes]\n",
      "pyi = \"hash_comment\"\n",
    ))
    .expect("parse config");

    assert_eq!(config.copyright, Some(PathBuf::from("LICENSE_HEADER")));
    assert_eq!(config.recursive, Some(true));
    assert_eq!(config.filetypes.get("kotlin"), Some(&DialectId::GroovyStyleComment));
    assert_eq!(config.suffixes.get("pyi"), Some(&DialectId::HashComment));
  }

  #[test]
  fn test_parse_empty_config() {
    let config = Config::parse("").expect("parse empty config");
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_unknown_dialect_is_parse_error() {
    let err = Config::parse("[suffixes]\nrs = \"slash_comment\"\n").expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn test_unknown_key_is_parse_error() {
    let err = Config::parse("recursve = true\n").expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn test_validate_leading_dot() {
    let err = Config::parse("[suffixes]\n\".kt\" = \"groovy_style_comment\"\n").expect_err("should fail");
    match err {
      ConfigError::InvalidAlias { alias, message } => {
        assert_eq!(alias, ".kt");
        assert!(message.contains("leading dot"));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn test_registry_uses_aliases() {
    let config = Config::parse("[filetypes]\nkotlin = \"groovy_style_comment\"\n[suffixes]\nKT = \"groovy_style_comment\"\n")
      .expect("parse config");
    let registry = config.registry();

    assert_eq!(registry.by_filetype("kotlin"), Some(DialectId::GroovyStyleComment));
    assert_eq!(registry.by_suffix(".kt"), Some(DialectId::GroovyStyleComment));
    assert_eq!(registry.by_suffix(".py"), Some(DialectId::HashComment));
  }

  #[test]
  fn test_load_config_from_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "recursive = false\n").expect("write config");

    let config = Config::load(&config_path).expect("load config");
    assert_eq!(config.recursive, Some(false));
  }

  #[test]
  fn test_load_reports_path_on_parse_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "recursive = \n").expect("write config");

    let err = Config::load(&config_path).expect_err("should fail");
    assert!(err.to_string().contains(DEFAULT_CONFIG_FILENAME));
  }

  #[test]
  fn test_load_config_file_not_found() {
    let err = Config::load(Path::new("/nonexistent/.crm.toml")).expect_err("should fail");
    assert!(matches!(err, ConfigError::Read { .. }));
  }

  #[test]
  fn test_discover_config_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join("custom.toml");
    std::fs::write(&config_path, "").expect("write config");

    assert_eq!(
      discover_config_path(Some(&config_path), temp_dir.path()),
      Some(config_path)
    );
    assert_eq!(
      discover_config_path(Some(&temp_dir.path().join("missing.toml")), temp_dir.path()),
      None
    );
  }

  #[test]
  fn test_discover_config_in_base_dir() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "").expect("write config");

    assert_eq!(discover_config_path(None, temp_dir.path()), Some(config_path));
  }

  #[test]
  fn test_load_config_disabled() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "recursive = true\n").expect("write config");

    let config = load_config(None, temp_dir.path(), true).expect("load config");
    assert!(config.is_none());
  }
}
