//! Model list sources with a built-in fallback.

use std::fs;
use std::path::{Path, PathBuf};

/// Model used when no list is available
pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";

/// Default location of the plain-text model list
pub const DEFAULT_MODELS_FILE: &str = "models.txt";

/// Something that can name the models a user may pick from.
///
/// `None` means the source is unavailable; callers go through
/// [`available_models`] which applies the fallback.
pub trait ModelSource {
    fn models(&self) -> Option<Vec<String>>;
}

/// Model names read from a plain-text file, one per line
#[derive(Debug, Clone)]
pub struct FileModelSource {
    path: PathBuf,
}

impl FileModelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileModelSource {
    fn default() -> Self {
        Self::new(DEFAULT_MODELS_FILE)
    }
}

impl ModelSource for FileModelSource {
    fn models(&self) -> Option<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Some(parse_model_list(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No model list at {}", self.path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read model list {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// A fixed list of model names
#[derive(Debug, Clone, Default)]
pub struct StaticModelSource(pub Vec<String>);

impl ModelSource for StaticModelSource {
    fn models(&self) -> Option<Vec<String>> {
        Some(self.0.clone())
    }
}

/// Parse a model list: one name per line, surrounding whitespace trimmed,
/// blank lines skipped, order preserved.
pub fn parse_model_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the models to offer. Never empty: an unavailable source or an
/// empty list yields [`DEFAULT_MODEL`] alone.
pub fn available_models(source: &dyn ModelSource) -> Vec<String> {
    match source.models() {
        Some(models) if !models.is_empty() => models,
        _ => vec![DEFAULT_MODEL.to_string()],
    }
}

/// Find a model by exact name, then by case-insensitive substring.
pub fn find_model<'a>(query: &str, models: &'a [String]) -> Option<&'a str> {
    if let Some(model) = models.iter().find(|m| m.as_str() == query) {
        return Some(model.as_str());
    }

    let query_lower = query.to_lowercase();
    models
        .iter()
        .find(|m| m.to_lowercase().contains(&query_lower))
        .map(String::as_str)
}
