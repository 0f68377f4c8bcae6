//! Configuration management for edpfmt.
//!
//! This module provides the [`Config`] struct which controls all formatting behavior.
//! Configuration can be loaded from:
//! - TOML files (`edpfmt.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`// edpfmt: --indent 2`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being formatted up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["edpfmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_indent() -> usize {
    4
}
fn default_true() -> bool {
    true
}

/// Main configuration struct for edpfmt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of spaces per indent level (default: 4)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Impose spacing and line breaks (default: true)
    #[serde(default = "default_true")]
    pub impose_spacing: bool,

    /// Impose indentation (default: true)
    #[serde(default = "default_true")]
    pub impose_indent: bool,

    /// Normalize inline and multiline comments (default: true)
    #[serde(default = "default_true")]
    pub normalize_comments: bool,

    /// Collapse runs of blank lines down to one (default: true)
    #[serde(default = "default_true")]
    pub collapse_blank_lines: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub indent: Option<usize>,
    pub impose_spacing: Option<bool>,
    pub impose_indent: Option<bool>,
    pub normalize_comments: Option<bool>,
    pub collapse_blank_lines: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent: 4,
            impose_spacing: true,
            impose_indent: true,
            normalize_comments: true,
            collapse_blank_lines: true,
        }
    }
}

impl Config {
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 20;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent == 0 {
            return Some("indent must be at least 1".to_string());
        }
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = partial.impose_spacing {
            self.impose_spacing = v;
        }
        if let Some(v) = partial.impose_indent {
            self.impose_indent = v;
        }
        if let Some(v) = partial.normalize_comments {
            self.normalize_comments = v;
        }
        if let Some(v) = partial.collapse_blank_lines {
            self.collapse_blank_lines = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Add home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        // Start from the file's parent directory (or the path itself if it's a directory)
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            // Path doesn't exist, use current directory
            std::env::current_dir().ok()
        };

        // Collect config files from parent directories (from root to current)
        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Reverse so we go from root to current (less specific to more specific)
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        if config_files.is_empty() {
            return Self::default();
        }

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => log::warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => log::warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.indent, 4);
        assert!(config.impose_spacing);
        assert!(config.impose_indent);
        assert!(config.normalize_comments);
        assert!(config.collapse_blank_lines);
    }

    #[test]
    fn test_config_apply_partial() {
        let mut base = Config::default();

        // Only set indent, leave others as None
        let partial = PartialConfig {
            indent: Some(2),
            ..Default::default()
        };

        base.apply_partial(&partial);
        assert_eq!(base.indent, 2);
        // Other fields should remain at defaults
        assert!(base.impose_spacing);
        assert!(base.impose_indent);
    }

    #[test]
    fn test_config_apply_partial_preserves_unset() {
        let mut base = Config {
            indent: 2,
            ..Config::default()
        };

        let partial = PartialConfig {
            impose_spacing: Some(false),
            ..Default::default()
        };

        base.apply_partial(&partial);
        // indent should be preserved (not reset to default)
        assert_eq!(base.indent, 2);
        assert!(!base.impose_spacing);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edpfmt.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "indent = 2").unwrap();
        writeln!(file, "normalize_comments = false").unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.indent, 2);
        assert!(!config.normalize_comments);
        // Unset fields keep their defaults
        assert!(config.impose_indent);
    }

    #[test]
    fn test_discover_config_files_in_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("edpfmt.toml"), "indent = 2\n").unwrap();

        let files = Config::discover_config_files(&nested);
        assert!(files.iter().any(|f| f.starts_with(dir.path())));
    }

    #[test]
    fn test_from_discovered_files_returns_default_when_empty() {
        // When no config files exist, should return default config
        let path = PathBuf::from("/nonexistent/unique/path/file.edp");
        let config = Config::from_discovered_files(&path);
        assert_eq!(config.indent, 4);
        assert!(config.impose_spacing);
    }

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(config.validate().is_none(), "Default config should be valid");
    }

    #[test]
    fn test_validate_indent_zero() {
        let config = Config {
            indent: 0,
            ..Default::default()
        };
        assert!(config.validate().is_some());
        assert!(config.validate().unwrap().contains("indent"));
    }

    #[test]
    fn test_validate_indent_too_large() {
        let config = Config {
            indent: 100,
            ..Default::default()
        };
        assert!(config.validate().is_some());
    }
}
