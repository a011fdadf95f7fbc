//! Static site generation for sheaf documentation.
//!
//! Loads the two build manifests (`config.yml`, `toc.yml`), walks the input
//! tree, renders each Markdown document into the fixed page layout, and
//! synthesizes an `index.html` landing page from the TOC manifest.

pub mod builder;
pub mod config;
pub mod index;
pub mod templates;

pub use builder::{BuildError, BuildResult, SiteBuilder};
pub use config::{load_config, load_toc, BuildConfig, ManifestError, TocNode};
