//! Template source feeds
//!
//! A feed supplies the raw `(file name, content)` entries a
//! [`TemplateStore`](super::TemplateStore) is built from. Feeds are read once at
//! construction; nothing here is consulted afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::embedded;
use super::error::PromptError;

/// Extension of prompt template files
pub const PROMPT_EXTENSION: &str = "tmpl";

/// One named template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// File name, e.g. `summarize_thread.tmpl`
    pub name: String,
    pub content: String,
}

impl SourceEntry {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// File name without `.<extension>`, or `None` if the extension differs
    pub fn stem(&self, extension: &str) -> Option<&str> {
        self.name
            .strip_suffix(extension)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|stem| !stem.is_empty())
    }
}

/// A read-only source of template files
pub trait TemplateFeed {
    /// All entries of the feed, in a stable order
    fn entries(&self) -> Result<Vec<SourceEntry>, PromptError>;
}

/// Templates read from `<dir>/*.<extension>`
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
    extension: String,
}

impl DirSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_extension(dir, PROMPT_EXTENSION)
    }

    pub fn with_extension(dir: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn io_error(&self, source: std::io::Error) -> PromptError {
        PromptError::Source {
            location: self.dir.display().to_string(),
            source,
        }
    }
}

impl TemplateFeed for DirSource {
    fn entries(&self) -> Result<Vec<SourceEntry>, PromptError> {
        debug!(dir = ?self.dir, extension = %self.extension, "DirSource::entries: called");
        if !self.dir.is_dir() {
            return Err(self.io_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "template directory does not exist",
            )));
        }

        let escaped = glob::Pattern::escape(&self.dir.to_string_lossy());
        let pattern = Path::new(&escaped).join(format!("*.{}", self.extension));
        let pattern = pattern.to_string_lossy();
        let paths = glob::glob(&pattern)
            .map_err(|e| self.io_error(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())))?;

        let mut entries = Vec::new();
        for path in paths {
            let path = path.map_err(|e| self.io_error(e.into_error()))?;
            if !path.is_file() {
                debug!(?path, "DirSource::entries: skipping non-file");
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(?path, "DirSource::entries: skipping non-utf8 file name");
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(|e| PromptError::Source {
                location: path.display().to_string(),
                source: e,
            })?;
            entries.push(SourceEntry::new(name, content));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = entries.len(), "DirSource::entries: loaded");
        Ok(entries)
    }
}

/// The templates compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl TemplateFeed for EmbeddedSource {
    fn entries(&self) -> Result<Vec<SourceEntry>, PromptError> {
        debug!("EmbeddedSource::entries: called");
        Ok(embedded::ALL
            .iter()
            .map(|(name, content)| SourceEntry::new(*name, *content))
            .collect())
    }
}

/// Several feeds merged by file name
///
/// Layers are given highest priority first: an entry shadows any entry with the
/// same file name in a later layer. Shadowing is by file name only. The merged
/// entries come out sorted by file name, and the store resolves duplicate
/// declared template names in that order, so a declaration in `aaa.tmpl` of an
/// override layer loses to the same name declared in a lower layer's
/// `summarize_thread.tmpl`. To replace a declared template, override the file
/// that declares it.
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn TemplateFeed + Send + Sync>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer below the existing ones
    pub fn layer(mut self, feed: impl TemplateFeed + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(feed));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl TemplateFeed for LayeredSource {
    fn entries(&self) -> Result<Vec<SourceEntry>, PromptError> {
        debug!(layers = self.layers.len(), "LayeredSource::entries: called");
        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for layer in &self.layers {
            for entry in layer.entries()? {
                if seen.insert(entry.name.clone()) {
                    merged.push(entry);
                } else {
                    debug!(name = %entry.name, "LayeredSource::entries: shadowed by higher layer");
                }
            }
        }
        merged.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(merged)
    }
}

impl TemplateFeed for Vec<SourceEntry> {
    fn entries(&self) -> Result<Vec<SourceEntry>, PromptError> {
        Ok(self.clone())
    }
}
