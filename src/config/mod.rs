//! Configuration management.
//!
//! flowdex configuration can come from, later sources winning:
//! - Built-in defaults
//! - User config file (~/.config/flowdex/config.toml)
//! - Project config file (./flowdex.toml)
//! - An explicit `--config` path
//! - Environment variables (FLOWDEX_*)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::{default_category_rules, AnalysisRules, CategoryRule, Classifier, Extractor};
use crate::error::{Error, Result};
use crate::workflow::Annotator;

/// Project-local config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "flowdex.toml";

/// flowdex configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Extraction rules
    #[serde(default)]
    pub analysis: AnalysisRules,

    /// Ordered category rules; first match wins
    #[serde(default = "default_category_rules")]
    pub categories: Vec<CategoryRule>,

    /// Translation scaffolding
    #[serde(default)]
    pub annotate: AnnotateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            analysis: AnalysisRules::default(),
            categories: default_category_rules(),
            annotate: AnnotateConfig::default(),
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for workflow JSON files
    #[serde(default = "default_workflows_dir")]
    pub workflows_dir: PathBuf,

    /// Directory the static artifacts are written to and read from
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            workflows_dir: default_workflows_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_workflows_dir() -> PathBuf {
    PathBuf::from("workflows")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("static").join("data")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateConfig {
    /// Language key written under `translations`
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "fa".to_string()
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Missing files are skipped. A file that exists but does not parse is
    /// an error, as is a config that fails validation.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Load default locations, then `explicit` on top if given.
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        // User config: ~/.config/flowdex/config.toml
        let user_path = Self::config_dir().join("config.toml");
        if let Some(partial) = Self::load_partial_if_exists(&user_path)? {
            config.apply_partial(partial);
        }

        // Project config: ./flowdex.toml
        if let Some(partial) = Self::load_partial_if_exists(Path::new(PROJECT_CONFIG_FILE))? {
            config.apply_partial(partial);
        }

        if let Some(path) = explicit {
            config.apply_partial(Self::load_partial_from_path(path)?);
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load a single file over the defaults, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.apply_partial(Self::load_partial_from_path(path)?);
        config.validate()?;
        Ok(config)
    }

    /// Get the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("flowdex"))
            .unwrap_or_else(|| PathBuf::from(".flowdex"))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.analysis.thresholds.validate()?;
        for rule in &self.categories {
            if rule.name.trim().is_empty() {
                return Err(Error::Config("Category name must not be empty".to_string()));
            }
            if rule.keywords.is_empty() {
                return Err(Error::Config(format!(
                    "Category '{}' has no keywords",
                    rule.name
                )));
            }
        }
        Ok(())
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.analysis.clone())
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.categories.clone())
    }

    pub fn annotator(&self) -> Annotator {
        Annotator::new(self.annotate.language.clone())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("FLOWDEX_WORKFLOWS_DIR") {
            self.paths.workflows_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("FLOWDEX_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(dir);
        }
        if let Some(low) = var("FLOWDEX_LOW_MAX_NODES") {
            if let Ok(parsed) = low.parse::<usize>() {
                self.analysis.thresholds.low_max_nodes = parsed;
            }
        }
        if let Some(medium) = var("FLOWDEX_MEDIUM_MAX_NODES") {
            if let Ok(parsed) = medium.parse::<usize>() {
                self.analysis.thresholds.medium_max_nodes = parsed;
            }
        }
    }

    fn load_partial_if_exists(path: &Path) -> Result<Option<PartialConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_partial_from_path(path).map(Some)
    }

    fn load_partial_from_path(path: &Path) -> Result<PartialConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(paths) = partial.paths {
            self.paths = paths;
        }
        if let Some(analysis) = partial.analysis {
            self.analysis = analysis;
        }
        if let Some(categories) = partial.categories {
            self.categories = categories;
        }
        if let Some(annotate) = partial.annotate {
            self.annotate = annotate;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    paths: Option<PathsConfig>,
    analysis: Option<AnalysisRules>,
    categories: Option<Vec<CategoryRule>>,
    annotate: Option<AnnotateConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("flowdex.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.paths.workflows_dir, PathBuf::from("workflows"));
        assert_eq!(config.paths.output_dir, PathBuf::from("static/data"));
        assert_eq!(config.analysis.thresholds.low_max_nodes, 5);
        assert_eq!(config.analysis.thresholds.medium_max_nodes, 15);
        assert_eq!(config.categories[0].name, "Communication");
        assert_eq!(config.annotate.language, "fa");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[paths]
workflows_dir = "flows"

[analysis]
low_max_nodes = 3
medium_max_nodes = 9

[[categories]]
name = "Chat"
keywords = ["slack", "discord"]

[[categories]]
name = "Mail"
keywords = ["gmail"]
"#,
        );

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.paths.workflows_dir, PathBuf::from("flows"));
        // unspecified field in a given section falls back to its default
        assert_eq!(config.paths.output_dir, PathBuf::from("static/data"));
        assert_eq!(config.analysis.thresholds.low_max_nodes, 3);
        assert_eq!(config.analysis.placeholder_prefixes, vec!["My workflow"]);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[1].name, "Mail");
        assert_eq!(config.annotate.language, "fa");
    }

    #[test]
    fn test_partial_keeps_untouched_sections() {
        let mut config = Config::default();
        config.apply_partial(toml::from_str("[annotate]\nlanguage = \"de\"\n").unwrap());
        assert_eq!(config.annotate.language, "de");
        assert_eq!(config.categories, default_category_rules());
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FLOWDEX_WORKFLOWS_DIR", "/srv/flows"),
            ("FLOWDEX_OUTPUT_DIR", "/srv/site/data"),
            ("FLOWDEX_LOW_MAX_NODES", "2"),
            ("FLOWDEX_MEDIUM_MAX_NODES", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.paths.workflows_dir, PathBuf::from("/srv/flows"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/srv/site/data"));
        assert_eq!(config.analysis.thresholds.low_max_nodes, 2);
        // unparsable values are ignored
        assert_eq!(config.analysis.thresholds.medium_max_nodes, 15);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[analysis]\nlow_max_nodes = 20\nmedium_max_nodes = 10\n",
        );
        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let mut config = Config::default();
        config.categories.push(CategoryRule::new("Empty", &[]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[paths\nworkflows_dir = 1");
        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.code(), "TOML_ERROR");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load_from(Path::new("/nonexistent/flowdex.toml")).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_configured_components() {
        let mut config = Config::default();
        config.categories = vec![CategoryRule::new("Chat", &["SLACK"])];
        let classifier = config.classifier();
        let record = crate::catalog::record::test_record("a.json", &["slack"]);
        assert_eq!(classifier.classify(&record), "Chat");
        assert_eq!(config.extractor().rules(), &config.analysis);
    }
}
