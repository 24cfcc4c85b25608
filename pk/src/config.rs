//! PromptKit configuration types and loading

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::prompts::{
    DirSource, EmbeddedSource, HandlebarsEngine, LayeredSource, PROMPT_EXTENSION, Prompts, TemplateStore,
};

/// Main PromptKit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Prompt template configuration
    pub prompts: PromptsConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are ignored; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => Some(path.clone()),
            None => Self::default_paths().into_iter().find(|p| p.exists()),
        }?;
        Self::load_from_file(&path).ok()?.log_level
    }

    /// Project-local `promptkit.yml`, then `~/.config/promptkit/promptkit.yml`
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("promptkit.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("promptkit").join("promptkit.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Template feed in priority order: override dir, prompt dir, embedded
    ///
    /// Layer priority applies to whole files. Declared template names are
    /// resolved across the merged files in file-name order, see [`LayeredSource`].
    pub fn feed(&self) -> Result<LayeredSource> {
        let p = &self.prompts;
        let mut feed = LayeredSource::new();
        if let Some(dir) = &p.override_dir {
            debug!(?dir, "Config::feed: adding override layer");
            feed = feed.layer(DirSource::with_extension(dir, &p.extension));
        }
        if let Some(dir) = &p.dir {
            debug!(?dir, "Config::feed: adding prompt dir layer");
            feed = feed.layer(DirSource::with_extension(dir, &p.extension));
        }
        if p.embedded {
            debug!("Config::feed: adding embedded layer");
            feed = feed.layer(EmbeddedSource);
        }

        if feed.is_empty() {
            return Err(eyre!("No prompt sources configured: set prompts.dir or enable prompts.embedded"));
        }
        Ok(feed)
    }

    /// Build the template store described by this configuration
    pub fn build_store(&self) -> Result<TemplateStore> {
        let feed = self.feed()?;
        let engine = HandlebarsEngine::with_strict_mode(self.prompts.strict);
        TemplateStore::with_engine(&feed, engine, &self.prompts.extension).context("Failed to load prompt templates")
    }

    pub fn build_prompts(&self) -> Result<Prompts> {
        Ok(Prompts::new(self.build_store()?))
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory of `*.<extension>` templates
    pub dir: Option<PathBuf>,

    /// User override directory, searched before `dir`
    #[serde(rename = "override-dir")]
    pub override_dir: Option<PathBuf>,

    /// Template file extension; the embedded templates use `tmpl`
    pub extension: String,

    /// Fail rendering on references to missing context fields
    pub strict: bool,

    /// Fall back to the templates compiled into the binary
    pub embedded: bool,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            override_dir: None,
            extension: PROMPT_EXTENSION.to_string(),
            strict: true,
            embedded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::TemplateFeed;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.log_level.is_none());
        assert_eq!(config.prompts.extension, "tmpl");
        assert!(config.prompts.strict);
        assert!(config.prompts.embedded);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = "log-level: debug\nprompts:\n  override-dir: /tmp/prompts\n  strict: false\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.prompts.override_dir, Some(PathBuf::from("/tmp/prompts")));
        assert!(!config.prompts.strict);
        assert!(config.prompts.embedded);
        assert_eq!(config.prompts.extension, "tmpl");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("promptkit.yml");
        fs::write(&path, "log-level: trace\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("trace"));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("trace"));
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert!(Config::load_log_level(Some(&path)).is_none());
    }

    #[test]
    fn test_feed_requires_a_source() {
        let mut config = Config::default();
        config.prompts.embedded = false;
        assert!(config.feed().is_err());
    }

    #[test]
    fn test_feed_override_shadows_embedded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("spellcheck.tmpl"),
            r#"{{#*inline "spellcheck.user"}}custom{{/inline}}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.prompts.override_dir = Some(dir.path().to_path_buf());

        let entries = config.feed().unwrap().entries().unwrap();
        let spellcheck = entries.iter().find(|e| e.name == "spellcheck.tmpl").unwrap();
        assert!(spellcheck.content.contains("custom"));

        let store = config.build_store().unwrap();
        let unit = store.lookup("spellcheck").unwrap();
        assert!(unit.system().is_none());
        assert_eq!(unit.user(), Some("spellcheck.user"));
    }
}
