//! Fixed page layouts.
//!
//! Two compiled-in templates: the document page (sidebar + content) and the
//! index landing page. Interpolated values are passed through unescaped,
//! matching the established output of this layout.

use minijinja::{context, Environment};

/// Everything needed to render one document page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Resolved page title.
    pub title: String,
    /// `description` meta tag content.
    pub summary: String,
    /// `keywords` meta tag content.
    pub tags: String,
    /// Sidebar outline fragment, inserted verbatim.
    pub outline: String,
    /// Body HTML, inserted verbatim.
    pub content: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the fixed templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("page.html".to_string(), PAGE_TEMPLATE.to_string())
            .expect("Failed to add page template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        Self { env }
    }

    /// Render a complete document page.
    pub fn render_page(&self, ctx: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            title => &ctx.title,
            summary => &ctx.summary,
            tags => &ctx.tags,
            outline => &ctx.outline,
            content => &ctx.content,
        })
    }

    /// Render the index landing page around a topic-list fragment.
    pub fn render_index(&self, topics: &str) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! { topics => topics })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a page title from the raw body: the first line opening a level-1
/// heading, or the literal `Documentation` when none exists.
pub fn page_title(body: &str) -> String {
    body.lines()
        .find_map(|line| line.strip_prefix("# ").map(|rest| rest.trim().to_string()))
        .unwrap_or_else(|| "Documentation".to_string())
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{{ summary | safe }}">
    <meta name="keywords" content="{{ tags | safe }}">
    <title>{{ title | safe }} - Simple Documentation</title>
    <link rel="stylesheet" href="../styles/main.css">
</head>
<body>
    <div class="container">
        <nav class="sidebar">
            <h2>Documentation</h2>
            <div class="toc">
                {{ outline | safe }}
            </div>
        </nav>
        <main class="content">
            {{ content | safe }}
        </main>
    </div>
</body>
</html>
"#;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Simple Documentation</title>
    <link rel="stylesheet" href="styles/main.css">
</head>
<body>
    <div class="container">
        <header class="hero">
            <h1>📚 Simple Documentation</h1>
            <p>A minimal Markdown-based documentation system</p>
        </header>
        <main class="content">
            <h2>Table of Contents</h2>
            {{ topics | safe }}

            <div class="info-box">
                <h3>About This Documentation</h3>
                <p>This is an MVP documentation site. It demonstrates:</p>
                <ul>
                    <li>Markdown to HTML conversion</li>
                    <li>Frontmatter metadata support</li>
                    <li>Table of contents generation</li>
                    <li>Simple navigation structure</li>
                </ul>
            </div>
        </main>
    </div>
</body>
</html>
"#;
