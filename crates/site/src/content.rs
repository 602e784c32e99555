//! Markdown content for the informational pages.
//!
//! Files in `content/pages/*.md` are loaded once at startup. Each file has a
//! YAML frontmatter block and a markdown body; the file stem is the slug:
//!
//! ```markdown
//! ---
//! title: About Us
//! description: Lovosis Technologies builds lab and training equipment.
//! order: 1
//! ---
//!
//! We have been supplying institutions since 2016...
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Frontmatter for a content page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Banner image shown above the body.
    #[serde(default)]
    pub hero_image: Option<String>,
    /// Position in the footer link list.
    #[serde(default)]
    pub order: i32,
}

/// A rendered page with metadata and HTML content.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// All loaded pages, shared read-only between requests.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load every page under `content_dir/pages`.
    ///
    /// A missing directory yields an empty store; a file that fails to parse
    /// is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }

            match Self::load_page(&path) {
                Ok(page) => {
                    tracing::info!("Loaded page: {}", page.slug);
                    pages.insert(page.slug.clone(), page);
                }
                Err(e) => {
                    tracing::error!("Failed to load page {:?}: {}", path, e);
                }
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let source = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;

        parse_page(slug, &source)
    }

    /// Get a page by slug.
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Pages sorted by their `order` field, then title.
    #[must_use]
    pub fn pages_in_order(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.values().collect();
        pages.sort_by(|a, b| {
            a.meta
                .order
                .cmp(&b.meta.order)
                .then_with(|| a.meta.title.cmp(&b.meta.title))
        });
        pages
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Split frontmatter from body and render the body.
fn parse_page(slug: &str, source: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(source)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug: slug.to_string(),
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with GitHub Flavored Markdown extensions.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    // Pages are authored in-repo, raw HTML (embedded maps, certificate grids) is allowed
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Content loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
