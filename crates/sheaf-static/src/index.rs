//! Index page construction from the TOC manifest.

use crate::config::TocNode;
use crate::templates::TemplateEngine;

/// Render the nested topic list for a TOC forest.
///
/// Only nodes carrying a non-empty `href` produce a list item; a node without
/// one contributes nothing, and its subtree is skipped with it. That skip is
/// long-standing observable behavior of the index page and is kept as-is.
pub fn topic_list(toc: &[TocNode]) -> String {
    let mut out = String::from("<ul>");
    for node in toc {
        push_topic(node, &mut out);
    }
    out.push_str("</ul>");
    out
}

fn push_topic(node: &TocNode, out: &mut String) {
    let Some(href) = node.href.as_deref().filter(|h| !h.is_empty()) else {
        return;
    };

    let target = href.replace(".md", ".html");
    out.push_str(&format!(
        "<li><a href=\"{}\">{}</a>",
        target,
        topic_title(href)
    ));

    if !node.topics.is_empty() {
        out.push_str("<ul>");
        for child in &node.topics {
            push_topic(child, out);
        }
        out.push_str("</ul>");
    }

    out.push_str("</li>");
}

/// Derive link text from an href: filename stem, hyphens to spaces,
/// title-cased.
fn topic_title(href: &str) -> String {
    let stem = href
        .rsplit('/')
        .next()
        .unwrap_or(href)
        .replace(".md", "")
        .replace('-', " ");
    title_case(&stem)
}

/// Title-case a phrase: each letter run starts uppercase, the rest lowered.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Render the complete index page for a TOC forest.
pub fn render_index(
    toc: &[TocNode],
    templates: &TemplateEngine,
) -> Result<String, minijinja::Error> {
    templates.render_index(&topic_list(toc))
}
