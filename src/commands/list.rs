//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::ContentItem;
use crate::helpers::{date_xml, full_url_for};
use crate::Folio;

/// Metadata of one item as printed by `list --json` and `show --json`
#[derive(Debug, Serialize)]
pub struct ItemSummary<'a> {
    pub kind: &'static str,
    pub title: &'a str,
    pub permalink: &'a str,
    pub url: String,
    pub layout: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub categories: Vec<&'a str>,
    pub tags: Vec<&'a str>,
    pub source: &'a str,
}

impl<'a> ItemSummary<'a> {
    pub fn new(folio: &Folio, item: &'a ContentItem) -> Self {
        Self {
            kind: if item.is_post() { "post" } else { "page" },
            title: item.title(),
            permalink: item.permalink(),
            url: full_url_for(&folio.config, item.permalink()),
            layout: item.layout(),
            date: item.date().map(date_xml),
            categories: item.categories().iter().map(String::as_str).collect(),
            tags: item.tags().iter().map(String::as_str).collect(),
            source: item.source(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TermCount<'a> {
    name: &'a str,
    count: usize,
}

/// List site content by type
pub fn run(folio: &Folio, content_type: &str, json: bool) -> Result<()> {
    let collection = folio.load()?;
    let date_format = &folio.config.date_format;

    match content_type {
        "post" | "posts" => {
            if json {
                let posts: Vec<_> = collection
                    .list_posts()
                    .map(|p| ItemSummary::new(folio, p))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            println!("Posts ({}):", collection.list_posts().len());
            for post in collection.list_posts() {
                println!(
                    "  {} - {} {} [{}]",
                    post.formatted_date(date_format).unwrap_or_default(),
                    post.title(),
                    post.permalink(),
                    post.source()
                );
            }
        }
        "page" | "pages" => {
            if json {
                let pages: Vec<_> = collection
                    .list_pages()
                    .map(|p| ItemSummary::new(folio, p))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&pages)?);
                return Ok(());
            }
            println!("Pages ({}):", collection.list_pages().count());
            for page in collection.list_pages() {
                println!("  {} {} [{}]", page.title(), page.permalink(), page.source());
            }
        }
        "tag" | "tags" => print_terms("Tags", &collection.tags(), json)?,
        "category" | "categories" => print_terms("Categories", &collection.categories(), json)?,
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

fn print_terms(heading: &str, terms: &[(String, usize)], json: bool) -> Result<()> {
    if json {
        let terms: Vec<_> = terms
            .iter()
            .map(|(name, count)| TermCount { name, count: *count })
            .collect();
        println!("{}", serde_json::to_string_pretty(&terms)?);
        return Ok(());
    }

    println!("{} ({}):", heading, terms.len());
    for (name, count) in terms {
        println!("  {} ({})", name, count);
    }
    Ok(())
}
