//! Markdown to HTML conversion.
//!
//! The converter walks the pulldown-cmark event stream once, rewriting
//! headings to carry stable anchor IDs with inline permalinks and replacing
//! code blocks with statically highlighted `codehilite` blocks. Headings up
//! to depth 3 are collected into a sidebar outline fragment.

use std::collections::{BTreeMap, HashMap};

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::meta::extract_meta_lines;

/// Outline entries cover headings down to this depth.
const OUTLINE_DEPTH: u8 = 3;

/// A converted document body.
#[derive(Debug, Clone)]
pub struct Converted {
    /// Body HTML.
    pub html: String,

    /// Sidebar outline fragment (`<div class="toc">…</div>`).
    pub outline: String,

    /// Meta lines stripped from the top of the body.
    pub meta: BTreeMap<String, Vec<String>>,
}

/// One entry of the heading outline.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-3)
    pub level: u8,
}

/// Errors that can occur during conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to highlight code block: {0}")]
    Highlight(String),
}

/// Syntax definitions for static code highlighting.
///
/// Loading the definition dump is the expensive part of conversion, so one
/// `Highlighter` is shared across a build while each document still gets its
/// own [`MarkdownConverter`].
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Emit a `codehilite` block with class-annotated token spans.
    fn classed_block(&self, lang: &str, source: &str) -> Result<String, ConvertError> {
        let syntax = if lang.is_empty() {
            self.syntaxes.find_syntax_plain_text()
        } else {
            self.syntaxes
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);

        for line in LinesWithEndings::from(source) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| ConvertError::Highlight(e.to_string()))?;
        }

        Ok(format!(
            "<div class=\"codehilite\"><pre><code>{}</code></pre></div>\n",
            generator.finalize()
        ))
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

struct HeadingCapture<'a> {
    level: u8,
    inner: Vec<Event<'a>>,
    text: String,
}

/// Converts one document body to HTML.
///
/// A converter is consumed by [`convert`](MarkdownConverter::convert), so
/// heading-ID state cannot leak between documents.
pub struct MarkdownConverter<'a> {
    highlighter: &'a Highlighter,
    used_ids: HashMap<String, usize>,
}

impl<'a> MarkdownConverter<'a> {
    pub fn new(highlighter: &'a Highlighter) -> Self {
        Self {
            highlighter,
            used_ids: HashMap::new(),
        }
    }

    /// Convert a body (frontmatter already removed) to HTML plus outline.
    pub fn convert(mut self, body: &str) -> Result<Converted, ConvertError> {
        let (meta, body) = extract_meta_lines(body);

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_DEFINITION_LIST;

        let mut events: Vec<Event> = Vec::new();
        let mut outline: Vec<OutlineEntry> = Vec::new();
        let mut heading: Option<HeadingCapture> = None;
        let mut code: Option<(String, String)> = None;

        for event in Parser::new_ext(body, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match &kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((lang, String::new()));
                }

                Event::End(TagEnd::CodeBlock) => {
                    let (lang, source) = code.take().expect("code block start seen");
                    let block = self.highlighter.classed_block(&lang, &source)?;
                    events.push(Event::Html(block.into()));
                }

                Event::Text(text) if code.is_some() => {
                    code.as_mut().expect("checked above").1.push_str(&text);
                }

                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some(HeadingCapture {
                        level: level as u8,
                        inner: Vec::new(),
                        text: String::new(),
                    });
                }

                Event::End(TagEnd::Heading(_)) => {
                    let capture = heading.take().expect("heading start seen");
                    let id = self.unique_id(&slugify(&capture.text));

                    events.push(Event::Html(
                        format!("<h{} id=\"{}\">", capture.level, id).into(),
                    ));
                    events.extend(capture.inner);
                    events.push(Event::Html(
                        format!(
                            "<a class=\"headerlink\" href=\"#{id}\" title=\"Permanent link\">&para;</a></h{}>\n",
                            capture.level
                        )
                        .into(),
                    ));

                    if capture.level <= OUTLINE_DEPTH {
                        outline.push(OutlineEntry {
                            title: capture.text,
                            id,
                            level: capture.level,
                        });
                    }
                }

                event => {
                    if let Some(capture) = heading.as_mut() {
                        match &event {
                            Event::Text(t) => capture.text.push_str(t),
                            Event::Code(t) => capture.text.push_str(t),
                            Event::SoftBreak | Event::HardBreak => capture.text.push(' '),
                            _ => {}
                        }
                        capture.inner.push(event);
                    } else {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(Converted {
            html: html_output,
            outline: outline_html(&outline),
            meta,
        })
    }

    /// Deduplicate a slug within this document: `setup`, `setup_1`, `setup_2`.
    fn unique_id(&mut self, slug: &str) -> String {
        let base = if slug.is_empty() { "section" } else { slug };
        let count = self.used_ids.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{}_{}", base, *count - 1)
        }
    }
}

/// Render the outline as a nested list wrapped in `<div class="toc">`.
///
/// A heading shallower than anything seen before it becomes a sibling at the
/// top level, so every entry appears in the outline.
fn outline_html(entries: &[OutlineEntry]) -> String {
    let mut out = String::from("<div class=\"toc\"><ul>");
    let mut pos = 0;
    while pos < entries.len() {
        let level = entries[pos].level;
        push_outline_items(entries, &mut pos, level, &mut out);
    }
    out.push_str("</ul></div>");
    out
}

fn push_outline_items(entries: &[OutlineEntry], pos: &mut usize, level: u8, out: &mut String) {
    while *pos < entries.len() {
        let entry = &entries[*pos];
        if entry.level < level {
            break;
        }
        out.push_str(&format!("<li><a href=\"#{}\">{}</a>", entry.id, entry.title));
        *pos += 1;
        if *pos < entries.len() && entries[*pos].level > entry.level {
            out.push_str("<ul>");
            push_outline_items(entries, pos, entries[*pos].level, out);
            out.push_str("</ul>");
        }
        out.push_str("</li>");
    }
}

/// Convert a heading to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(body: &str) -> Converted {
        let highlighter = Highlighter::new();
        MarkdownConverter::new(&highlighter).convert(body).unwrap()
    }

    #[test]
    fn headings_get_anchored_permalinks() {
        let doc = convert("# Hello World\n\nSome text.\n");

        assert!(doc.html.contains("<h1 id=\"hello-world\">"));
        assert!(doc.html.contains(
            "<a class=\"headerlink\" href=\"#hello-world\" title=\"Permanent link\">&para;</a>"
        ));
    }

    #[test]
    fn outline_covers_depth_three() {
        let doc = convert("# One\n\n## Two\n\n### Three\n\n#### Four\n");

        assert!(doc.outline.contains("#one"));
        assert!(doc.outline.contains("#three"));
        assert!(!doc.outline.contains("#four"));
        // The h4 still renders with an anchor, it just stays out of the outline.
        assert!(doc.html.contains("<h4 id=\"four\">"));
    }

    #[test]
    fn outline_nests_by_level() {
        let doc = convert("# Guide\n\n## Setup\n\n## Usage\n");

        assert_eq!(
            doc.outline,
            "<div class=\"toc\"><ul><li><a href=\"#guide\">Guide</a>\
             <ul><li><a href=\"#setup\">Setup</a></li>\
             <li><a href=\"#usage\">Usage</a></li></ul></li></ul></div>"
        );
    }

    #[test]
    fn heading_shallower_than_the_first_stays_in_the_outline() {
        let doc = convert("## Setup\n\n# Title\n\n## Usage\n");

        assert_eq!(
            doc.outline,
            "<div class=\"toc\"><ul><li><a href=\"#setup\">Setup</a></li>\
             <li><a href=\"#title\">Title</a>\
             <ul><li><a href=\"#usage\">Usage</a></li></ul></li></ul></div>"
        );
    }

    #[test]
    fn duplicate_headings_get_suffixed_ids() {
        let doc = convert("## Setup\n\n## Setup\n\n## Setup\n");

        assert!(doc.html.contains("<h2 id=\"setup\">"));
        assert!(doc.html.contains("<h2 id=\"setup_1\">"));
        assert!(doc.html.contains("<h2 id=\"setup_2\">"));
    }

    #[test]
    fn heading_ids_do_not_leak_across_documents() {
        let highlighter = Highlighter::new();

        let first = MarkdownConverter::new(&highlighter)
            .convert("# Setup\n")
            .unwrap();
        let second = MarkdownConverter::new(&highlighter)
            .convert("# Setup\n")
            .unwrap();

        assert!(first.html.contains("<h1 id=\"setup\">"));
        assert!(second.html.contains("<h1 id=\"setup\">"));
    }

    #[test]
    fn fenced_code_is_statically_highlighted() {
        let doc = convert("```rust\nfn main() {}\n```\n");

        assert!(doc.html.contains("<div class=\"codehilite\"><pre><code>"));
        assert!(doc.html.contains("<span class="));
        assert!(!doc.html.contains("style="));
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let doc = convert("```nosuchlang\nplain body\n```\n");

        assert!(doc.html.contains("codehilite"));
        assert!(doc.html.contains("plain body"));
    }

    #[test]
    fn tables_render() {
        let doc = convert("| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(doc.html.contains("<table>"));
        assert!(doc.html.contains("<td>1</td>"));
    }

    #[test]
    fn definition_lists_render() {
        let doc = convert("Term\n: its definition\n");

        assert!(doc.html.contains("<dl>"));
        assert!(doc.html.contains("<dt>Term</dt>"));
        assert!(doc.html.contains("<dd>its definition</dd>"));
    }

    #[test]
    fn meta_lines_are_stripped_and_returned() {
        let doc = convert("Author: Ada\n\n# Title\n\nBody.\n");

        assert_eq!(doc.meta["author"], vec!["Ada"]);
        assert!(!doc.html.contains("Author"));
        assert!(doc.html.contains("<h1 id=\"title\">"));
    }

    #[test]
    fn inline_markup_in_headings_is_preserved() {
        let doc = convert("## Using `build()` here\n");

        assert!(doc.html.contains("<code>build()</code>"));
        assert!(doc.html.contains("id=\"using-build-here\""));
    }

    #[test]
    fn empty_document_yields_empty_outline() {
        let doc = convert("Just a paragraph.\n");

        assert_eq!(doc.outline, "<div class=\"toc\"><ul></ul></div>");
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Build (Release)"), "build-release");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
