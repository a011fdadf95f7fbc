//! Build manifests: `config.yml` and `toc.yml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Build settings from `config.yml`. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Root of the Markdown source tree.
    pub input_folder: PathBuf,

    /// Root of the generated site. Created if absent, never cleared.
    pub output_folder: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("src"),
            output_folder: PathBuf::from("build"),
        }
    }
}

/// One node of the TOC manifest. A node without `href` contributes no link.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TocNode {
    /// Forward-slash-separated relative path to a Markdown source file.
    #[serde(default)]
    pub href: Option<String>,

    /// Child topics, in manifest order.
    #[serde(default)]
    pub topics: Vec<TocNode>,
}

/// `config.yml` file structure.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    build: BuildSection,
}

#[derive(Debug, Deserialize, Default)]
struct BuildSection {
    #[serde(rename = "input-folder")]
    input_folder: Option<String>,
    #[serde(rename = "output-folder")]
    output_folder: Option<String>,
}

/// Errors reading or parsing a manifest. Always fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Load build settings. Missing keys fall back to `src` / `build`; a missing
/// or malformed file is an error.
pub fn load_config(path: &Path) -> Result<BuildConfig, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let defaults = BuildConfig::default();
    Ok(BuildConfig {
        input_folder: file
            .build
            .input_folder
            .map_or(defaults.input_folder, PathBuf::from),
        output_folder: file
            .build
            .output_folder
            .map_or(defaults.output_folder, PathBuf::from),
    })
}

/// Load the TOC manifest: a YAML sequence of [`TocNode`]s.
pub fn load_toc(path: &Path) -> Result<Vec<TocNode>, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_yaml::from_str(&content).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
