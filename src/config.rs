//! Configuration handling for metadoc

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MetadocError, MetadocResult};

/// Metadoc configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Declaration graph settings
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Which entities the declaration graph builder keeps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphConfig {
    /// Keep types and members whose name marks them compiler-generated (`<...>`)
    #[serde(default)]
    pub include_compiler_generated: bool,

    /// Keep private and internal types and members
    #[serde(default = "default_include_non_public")]
    pub include_non_public: bool,
}

fn default_include_non_public() -> bool {
    true
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            include_compiler_generated: false,
            include_non_public: default_include_non_public(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> MetadocResult<Self> {
        toml::from_str(content)
            .map_err(|e| MetadocError::configuration(format!("failed to parse config: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> MetadocResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MetadocError::configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `metadoc.toml` from `dir`, or the defaults when it is absent
    pub fn load_from_dir(dir: &Path) -> MetadocResult<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }
}

/// File name looked up by [`Config::load_from_dir`]
pub const CONFIG_FILE_NAME: &str = "metadoc.toml";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_text_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.graph.include_non_public);
        assert!(!config.graph.include_compiler_generated);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = Config::from_toml_str("[graph]\ninclude_non_public = false\n").unwrap();
        assert!(!config.graph.include_non_public);
        assert!(!config.graph.include_compiler_generated);
    }

    #[test]
    fn invalid_toml_is_configuration_error() {
        let err = Config::from_toml_str("[graph\n").unwrap_err();
        assert!(matches!(err, MetadocError::Configuration { .. }));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[graph]\ninclude_compiler_generated = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.graph.include_compiler_generated);
    }

    #[test]
    fn load_from_dir_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from_dir(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.error_code().code(), 4);
    }
}
