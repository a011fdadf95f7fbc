//! Frontmatter extraction and parsing.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A single frontmatter value. Documents carry freeform metadata; the build
/// only interprets `summary` and `tags`, so values are kept loosely typed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
    Other(serde_yaml::Value),
}

impl MetaValue {
    /// Render the value for interpolation into an HTML meta tag.
    ///
    /// Lists are joined with `", "`; non-string scalars fall back to their
    /// YAML scalar form.
    pub fn as_content(&self) -> String {
        match self {
            MetaValue::Text(s) => s.clone(),
            MetaValue::List(items) => items.join(", "),
            MetaValue::Other(value) => serde_yaml::to_string(value)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Parsed frontmatter from a Markdown file: a freeform key/value mapping.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, MetaValue>);

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    /// The meta-tag content for a key: empty string when the key is absent.
    pub fn content_for(&self, key: &str) -> String {
        self.get(key).map(MetaValue::as_content).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extract frontmatter from Markdown content.
///
/// Returns the parsed frontmatter (empty mapping when no block is present)
/// and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((Frontmatter::default(), source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((frontmatter, remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
