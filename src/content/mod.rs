//! Content module - front-matter, pages, posts and the collection they form

mod collection;
pub mod date;
mod frontmatter;
mod item;
pub mod loader;
pub mod permalink;

pub use collection::{Collection, PostFilter};
pub use frontmatter::{FrontMatter, FrontMatterError, FrontMatterFormat};
pub use item::{is_post_source, ContentItem, ContentKind, RawSource};
