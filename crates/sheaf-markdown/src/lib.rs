//! Markdown document parsing for sheaf.
//!
//! This crate splits a Markdown source file into its YAML frontmatter and
//! body, strips in-body meta lines, and converts the body to HTML with a
//! heading outline and statically highlighted code blocks.

pub mod convert;
pub mod frontmatter;
pub mod meta;

pub use convert::{ConvertError, Converted, Highlighter, MarkdownConverter, OutlineEntry};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError, MetaValue};
pub use meta::extract_meta_lines;
