//! Content items: pages and posts

use indexmap::{IndexMap, IndexSet};
use serde_yaml::Value;

use super::date::{parse_date, PostDate};
use super::frontmatter::FrontMatter;
use super::permalink::{self, PostFields};
use crate::config::SiteConfig;
use crate::error::LoadError;
use crate::helpers::date::format_date;

/// Raw text of one source, keyed by its identifier (a `/`-separated path)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSource {
    pub id: String,
    pub text: String,
}

impl RawSource {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl<I: Into<String>, T: Into<String>> From<(I, T)> for RawSource {
    fn from((id, text): (I, T)) -> Self {
        Self::new(id, text)
    }
}

/// What an item is; posts carry the date they are ordered by
#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    Page,
    Post { date: PostDate },
}

/// A page or post parsed from a source
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    source: String,
    kind: ContentKind,
    title: String,
    layout: String,
    permalink: String,
    categories: IndexSet<String>,
    tags: IndexSet<String>,
    body: String,
    extra: IndexMap<String, Value>,
}

impl ContentItem {
    /// Parse a source into an item.
    ///
    /// An empty body is only reported here alongside other errors; call
    /// [`ContentItem::validate`] before letting the item into a collection.
    pub fn parse(source: &RawSource, config: &SiteConfig) -> Result<Self, Vec<LoadError>> {
        let id = source.id.as_str();
        let (fm, body) = FrontMatter::parse(&source.text)
            .map_err(|e| vec![LoadError::malformed(id, e)])?;

        let categories = collect_terms(fm.all_categories());
        let tags = collect_terms(fm.tags.iter().map(String::as_str));
        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let (kind, title, permalink, layout) = if is_post_source(id, config) {
            let mut errors = Vec::new();
            if title.is_none() {
                errors.push(LoadError::missing(id, "title"));
            }
            let date = match fm.date.as_deref() {
                None => {
                    errors.push(LoadError::missing(id, "date"));
                    None
                }
                Some(raw) => {
                    let parsed = parse_date(raw, config.timezone);
                    if parsed.is_none() {
                        errors.push(LoadError::InvalidDate {
                            source_id: id.to_string(),
                            value: raw.to_string(),
                        });
                    }
                    parsed
                }
            };
            let (Some(title), Some(date)) = (title, date) else {
                if body.trim().is_empty() {
                    errors.push(LoadError::EmptyBody {
                        source_id: id.to_string(),
                    });
                }
                return Err(errors);
            };

            let category_refs: Vec<&str> = categories.iter().map(String::as_str).collect();
            let file_slug = permalink::title_slug(id);
            let pattern = fm.permalink.as_deref().unwrap_or(&config.permalink);
            let path = permalink::post_path(
                pattern,
                &PostFields {
                    date: &date,
                    title: &title,
                    file_slug: &file_slug,
                    categories: &category_refs,
                },
            );
            let layout = fm.layout.unwrap_or_else(|| config.default_layout.clone());
            (ContentKind::Post { date }, title, path, layout)
        } else {
            let title = title.unwrap_or_else(|| page_title_fallback(id));
            let path = match fm.permalink.as_deref() {
                Some(p) => permalink::normalize(p),
                None => permalink::page_path(id),
            };
            let layout = fm.layout.unwrap_or_else(|| config.page_layout.clone());
            (ContentKind::Page, title, path, layout)
        };

        Ok(Self {
            source: id.to_string(),
            kind,
            title,
            layout,
            permalink,
            categories,
            tags,
            body: body.to_string(),
            extra: fm.extra,
        })
    }

    /// Check the invariants an item must meet to join a collection
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.body.trim().is_empty() {
            return Err(LoadError::EmptyBody {
                source_id: self.source.clone(),
            });
        }
        Ok(())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &ContentKind {
        &self.kind
    }

    pub fn is_post(&self) -> bool {
        matches!(self.kind, ContentKind::Post { .. })
    }

    pub fn is_page(&self) -> bool {
        matches!(self.kind, ContentKind::Page)
    }

    /// Publication date; `None` for pages
    pub fn date(&self) -> Option<&PostDate> {
        match &self.kind {
            ContentKind::Post { date } => Some(date),
            ContentKind::Page => None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Name of the template the renderer applies
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Normalized public path, e.g. `/about/`
    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    pub fn categories(&self) -> &IndexSet<String> {
        &self.categories
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    /// Raw markup, untouched
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Front-matter keys not modelled as fields
    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// Whether the item is filed under `category`, see [`term_key`]
    pub fn in_category(&self, category: &str) -> bool {
        let wanted = term_key(category);
        self.categories.iter().any(|c| term_key(c) == wanted)
    }

    /// Whether the item carries `tag`, see [`term_key`]
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = term_key(tag);
        self.tags.iter().any(|t| term_key(t) == wanted)
    }

    /// Date rendered with a Moment-style format, e.g. `YYYY-MM-DD`
    pub fn formatted_date(&self, format: &str) -> Option<String> {
        self.date().map(|d| format_date(d, format))
    }
}

/// Whether a source identifier lives under the posts directory
pub fn is_post_source(id: &str, config: &SiteConfig) -> bool {
    id.split('/').any(|component| component == config.posts_dir)
}

/// Key categories and tags are compared by.
///
/// Case is folded and runs of whitespace, `-` or `_` count as one separator,
/// so `Staff Engineer` and `staff-engineer` match. Other punctuation is kept:
/// `C`, `C++` and `C#` are distinct.
pub fn term_key(term: &str) -> String {
    term.trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn collect_terms<'a>(terms: impl Iterator<Item = &'a str>) -> IndexSet<String> {
    terms
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `about.md` is titled "about"; `about/index.md` takes its directory name
fn page_title_fallback(id: &str) -> String {
    let stem = permalink::file_stem(id);
    if stem != "index" {
        return stem.to_string();
    }
    id.rsplit('/')
        .nth(1)
        .filter(|dir| !dir.is_empty())
        .unwrap_or("index")
        .to_string()
}
