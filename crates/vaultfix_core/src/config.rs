//! Run configuration loading and validation.
//!
//! # Responsibility
//! - Load the YAML run configuration once at startup and validate it
//!   before any file is touched.
//!
//! # Invariants
//! - Configuration is immutable for the whole run and threaded as a
//!   parameter, never held as module-level state.
//! - A configuration error is fatal; the batch never starts on a bad
//!   config.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Immutable run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaultConfig {
    /// Root directory of Markdown notes to process.
    pub vault_path: PathBuf,
    /// Frontmatter keys every note must contain after the run.
    #[serde(default)]
    pub required_fields: BTreeSet<String>,
    /// Tag used to populate a required `tags` field when absent.
    pub default_tag: String,
}

impl VaultConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    /// - [`ConfigError::Unreadable`] when the file cannot be read.
    /// - [`ConfigError::Parse`] when the YAML does not match the schema.
    /// - Validation errors for empty `vault_path` or `default_tag`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vault_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyVaultPath);
        }
        if self.default_tag.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultTag);
        }
        Ok(())
    }

    /// Whether `field` must exist in every processed note.
    pub fn requires(&self, field: &str) -> bool {
        self.required_fields.contains(field)
    }
}

/// Fatal configuration failure.
#[derive(Debug)]
pub enum ConfigError {
    Unreadable { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
    EmptyVaultPath,
    EmptyDefaultTag,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
            Self::EmptyVaultPath => write!(f, "config field `vault_path` must not be empty"),
            Self::EmptyDefaultTag => write!(f, "config field `default_tag` must not be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, VaultConfig};
    use std::io::Write;

    #[test]
    fn load_parses_a_full_config() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        write!(
            file,
            "vault_path: /vault\nrequired_fields:\n  - title\n  - created\n  - tags\ndefault_tag: inbox\n"
        )
        .expect("write config");

        let config = VaultConfig::load(file.path()).expect("config should load");
        assert_eq!(config.vault_path.to_str(), Some("/vault"));
        assert!(config.requires("title"));
        assert!(!config.requires("topics"));
        assert_eq!(config.default_tag, "inbox");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let error = VaultConfig::load(std::path::Path::new("/nonexistent/_config.yaml"))
            .expect_err("missing file must fail");
        assert!(matches!(error, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn missing_default_tag_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        write!(file, "vault_path: /vault\n").expect("write config");

        let error = VaultConfig::load(file.path()).expect_err("schema mismatch must fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn blank_default_tag_fails_validation() {
        let config = VaultConfig {
            vault_path: "/vault".into(),
            required_fields: Default::default(),
            default_tag: "  ".into(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyDefaultTag)
        ));
    }
}
