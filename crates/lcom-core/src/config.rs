use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the scan root.
pub const CONFIG_FILE: &str = ".lcom.toml";

/// Scan configuration from `.lcom.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File extension selected for scoring.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Glob patterns excluded from the scan.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_extension() -> String {
    "py".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/__pycache__/**".to_string(),
        "**/.venv/**".to_string(),
        "**/.tox/**".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Load the config from the scan root, falling back to defaults when
    /// the file is absent or malformed.
    pub fn load_or_default(root: &Path) -> Self {
        let candidate = root.join(CONFIG_FILE);
        if !candidate.exists() {
            return Self::default();
        }
        Self::load(&candidate).unwrap_or_else(|e| {
            eprintln!("Warning: {e:#}, using default configuration");
            Self::default()
        })
    }

    /// Compile the exclude patterns into a matcher.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_patterns {
            builder.add(
                Glob::new(pattern).with_context(|| format!("invalid exclude pattern {pattern}"))?,
            );
        }
        builder.build().context("failed to build exclude set")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extension, "py");
        assert!(!config.exclude_patterns.is_empty());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(r#"extension = "pyi""#).unwrap();
        assert_eq!(config.extension, "pyi");
        assert_eq!(config.exclude_patterns, default_exclude_patterns());
    }

    #[test]
    fn test_load_missing_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path());
        assert_eq!(config.extension, "py");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "extension = \"py\"\nexclude_patterns = [\"**/skip/**\"]\n",
        )
        .unwrap();

        let config = Config::load_or_default(dir.path());
        assert_eq!(config.exclude_patterns, vec!["**/skip/**".to_string()]);

        let excludes = config.exclude_set().unwrap();
        assert!(excludes.is_match("src/skip/mod.py"));
        assert!(!excludes.is_match("src/keep/mod.py"));
    }

    #[test]
    fn test_invalid_exclude_pattern_is_an_error() {
        let config = Config {
            extension: "py".to_string(),
            exclude_patterns: vec!["[".to_string()],
        };
        assert!(config.exclude_set().is_err());
    }
}
