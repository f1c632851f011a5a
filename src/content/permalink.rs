//! Permalink computation and normalization

use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::date::PostDate;

lazy_static! {
    /// Jekyll post filenames: `2022-11-14-my-post`
    static ref DATED_STEM: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-(.+)$").unwrap();
}

/// Normalize a URL path so equal locations compare equal.
///
/// `about`, `/about`, `//about/` and `/about/index.html` all become `/about/`;
/// a last segment with an extension (`/feed.xml`) keeps no trailing slash
/// unless the path already ends in one (`/notes/v1.2/`).
pub fn normalize(path: &str) -> String {
    let decoded = percent_decode_str(path.trim()).decode_utf8_lossy();
    let explicit_dir = decoded.ends_with('/');

    let mut segments: Vec<&str> = decoded.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last() == Some(&"index.html") {
        segments.pop();
        return dir_path(&segments);
    }

    match segments.last() {
        Some(last) if last.contains('.') && !explicit_dir => format!("/{}", segments.join("/")),
        _ => dir_path(&segments),
    }
}

fn dir_path(segments: &[&str]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// File stem without a Jekyll `YYYY-MM-DD-` prefix
pub fn title_slug(source: &str) -> String {
    let stem = file_stem(source);
    match DATED_STEM.captures(stem) {
        Some(caps) => caps[1].to_string(),
        None => stem.to_string(),
    }
}

/// Last path component without its extension
pub fn file_stem(source: &str) -> &str {
    let name = source.rsplit('/').next().unwrap_or(source);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}

/// Path of a page derived from its source identifier.
/// `about.md` → `/about/`, `about/index.md` → `/about/`, `index.md` → `/`.
pub fn page_path(source: &str) -> String {
    let without_ext = match source.rfind('.') {
        Some(i) if !source[i..].contains('/') => &source[..i],
        _ => source,
    };

    let path = if without_ext == "index" || without_ext.ends_with("/index") {
        without_ext.trim_end_matches("index").to_string()
    } else {
        format!("{}/", without_ext)
    };

    normalize(&path)
}

/// Values substituted into a post permalink pattern
pub struct PostFields<'a> {
    pub date: &'a PostDate,
    pub title: &'a str,
    pub file_slug: &'a str,
    pub categories: &'a [&'a str],
}

/// Expand a permalink pattern for a post
pub fn post_path(pattern: &str, fields: &PostFields<'_>) -> String {
    let date = fields.date;
    let categories = fields
        .categories
        .iter()
        .map(|c| slug::slugify(c))
        .collect::<Vec<_>>();
    let category = categories.first().cloned().unwrap_or_default();

    // `:categories` must be replaced before its prefix `:category`
    let result = pattern
        .replace(":categories", &categories.join("/"))
        .replace(":category", &category)
        .replace(":year", &date.format("%Y").to_string())
        .replace(":i_month", &date.format("%-m").to_string())
        .replace(":i_day", &date.format("%-d").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":hour", &date.format("%H").to_string())
        .replace(":minute", &date.format("%M").to_string())
        .replace(":second", &date.format("%S").to_string())
        .replace(":title", fields.file_slug)
        .replace(":slug", &slug::slugify(fields.title));

    normalize(&result)
}
