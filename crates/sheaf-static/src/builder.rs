//! Build orchestration.
//!
//! One pass over the source tree: discover Markdown files, convert and render
//! each into the output tree, then write the index page. Files are processed
//! strictly sequentially; any failure aborts the whole build.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use sheaf_markdown::{extract_frontmatter, Highlighter, MarkdownConverter};

use crate::config::{BuildConfig, TocNode};
use crate::index;
use crate::templates::{page_title, PageContext, TemplateEngine};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated (excluding the index).
    pub pages: usize,

    /// Total build time in milliseconds.
    pub duration_ms: u64,

    /// Output directory.
    pub output_dir: PathBuf,
}

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static documentation site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    toc: Vec<TocNode>,
    templates: TemplateEngine,
    highlighter: Highlighter,
}

impl SiteBuilder {
    /// Create a builder from loaded manifests.
    pub fn new(config: BuildConfig, toc: Vec<TocNode>) -> Self {
        Self {
            config,
            toc,
            templates: TemplateEngine::new(),
            highlighter: Highlighter::new(),
        }
    }

    /// Run the full build: every source page, then the index.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Existing output is left in place; stale files are not pruned.
        fs::create_dir_all(&self.config.output_folder)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let sources = self.discover_sources()?;

        let mut pages = 0;
        for source in &sources {
            self.build_page(source)?;
            pages += 1;
        }

        tracing::info!("Creating index page");
        let index_html = index::render_index(&self.toc, &self.templates)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        let index_path = self.config.output_folder.join("index.html");
        fs::write(&index_path, index_html)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(BuildResult {
            pages,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_folder.clone(),
        })
    }

    /// Discover all Markdown files under the input root, sorted by path so
    /// builds are deterministic across platforms.
    fn discover_sources(&self) -> Result<Vec<PathBuf>, BuildError> {
        if !self.config.input_folder.exists() {
            return Err(BuildError::ReadError(format!(
                "Input directory not found: {}",
                self.config.input_folder.display()
            )));
        }

        let mut sources = Vec::new();

        for entry in WalkDir::new(&self.config.input_folder).follow_links(true) {
            let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            sources.push(path.to_path_buf());
        }

        sources.sort();
        Ok(sources)
    }

    /// Convert, render and write a single page.
    fn build_page(&self, source: &Path) -> Result<(), BuildError> {
        tracing::info!("Processing {}", source.display());

        let raw = fs::read_to_string(source)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", source.display(), e)))?;

        let (frontmatter, body) =
            extract_frontmatter(&raw).map_err(|e| BuildError::ParseError {
                path: source.display().to_string(),
                message: e.to_string(),
            })?;

        let converted = MarkdownConverter::new(&self.highlighter)
            .convert(body)
            .map_err(|e| BuildError::ParseError {
                path: source.display().to_string(),
                message: e.to_string(),
            })?;

        let ctx = PageContext {
            title: page_title(body),
            summary: frontmatter.content_for("summary"),
            tags: frontmatter.content_for("tags"),
            outline: converted.outline,
            content: converted.html,
        };

        let html = self
            .templates
            .render_page(&ctx)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        // Mirror the input's relative path under the output root, .md -> .html.
        let relative = source
            .strip_prefix(&self.config.input_folder)
            .unwrap_or(source);
        let output_path = self
            .config
            .output_folder
            .join(relative)
            .with_extension("html");

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn builder_for(input: PathBuf, output: PathBuf, toc: Vec<TocNode>) -> SiteBuilder {
        SiteBuilder::new(
            BuildConfig {
                input_folder: input,
                output_folder: output,
            },
            toc,
        )
    }

    #[test]
    fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("intro.md"),
            "---\nsummary: An intro\n---\n\n# Welcome\n\nHello.\n",
        )
        .unwrap();

        let result = builder_for(src, out.clone(), vec![]).build().unwrap();

        assert_eq!(result.pages, 1);
        assert_eq!(result.output_dir, out);

        let page = fs::read_to_string(out.join("intro.html")).unwrap();
        assert!(page.contains("<title>Welcome - Simple Documentation</title>"));
        assert!(page.contains("<meta name=\"description\" content=\"An intro\">"));
        assert!(out.join("index.html").exists());
    }

    #[test]
    fn mirrors_nested_paths_under_the_output_root() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(src.join("a")).unwrap();
        fs::write(src.join("a/b.md"), "# Nested\n").unwrap();

        builder_for(src, out.clone(), vec![]).build().unwrap();

        assert!(out.join("a/b.html").exists());
    }

    #[test]
    fn pages_without_headings_use_the_default_title() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("plain.md"), "Just prose, no headings.\n").unwrap();

        builder_for(src, out.clone(), vec![]).build().unwrap();

        let page = fs::read_to_string(out.join("plain.html")).unwrap();
        assert!(page.contains("<title>Documentation - Simple Documentation</title>"));
    }

    #[test]
    fn rebuild_keeps_unrelated_output_files() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(src.join("page.md"), "# Page\n").unwrap();
        fs::write(out.join("stale.html"), "left over from a previous run").unwrap();

        let builder = builder_for(src, out.clone(), vec![]);
        builder.build().unwrap();
        builder.build().unwrap();

        assert_eq!(
            fs::read_to_string(out.join("stale.html")).unwrap(),
            "left over from a previous run"
        );
        assert!(out.join("page.html").exists());
    }

    #[test]
    fn index_reflects_the_toc_manifest() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(&src).unwrap();

        let toc = vec![TocNode {
            href: Some("guide/intro.md".to_string()),
            topics: vec![TocNode {
                href: Some("guide/intro-deep.md".to_string()),
                topics: vec![],
            }],
        }];

        builder_for(src, out.clone(), toc).build().unwrap();

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains(
            "<ul><li><a href=\"guide/intro.html\">Intro</a>\
             <ul><li><a href=\"guide/intro-deep.html\">Intro Deep</a></li></ul></li></ul>"
        ));
    }

    #[test]
    fn sources_are_processed_in_path_order() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(src.join("z")).unwrap();
        fs::create_dir_all(src.join("a")).unwrap();
        fs::write(src.join("z/last.md"), "# Last\n").unwrap();
        fs::write(src.join("a/first.md"), "# First\n").unwrap();
        fs::write(src.join("middle.md"), "# Middle\n").unwrap();

        let builder = builder_for(src.clone(), out, vec![]);
        let sources = builder.discover_sources().unwrap();

        assert_eq!(
            sources,
            vec![
                src.join("a/first.md"),
                src.join("middle.md"),
                src.join("z/last.md"),
            ]
        );
    }

    #[test]
    fn missing_input_directory_is_fatal() {
        let temp = tempdir().unwrap();

        let result = builder_for(
            temp.path().join("no-such-src"),
            temp.path().join("build"),
            vec![],
        )
        .build();

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let out = temp.path().join("build");

        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("notes.txt"), "not markdown").unwrap();
        fs::write(src.join("page.md"), "# Page\n").unwrap();

        let result = builder_for(src, out.clone(), vec![]).build().unwrap();

        assert_eq!(result.pages, 1);
        assert!(!out.join("notes.html").exists());
    }
}
