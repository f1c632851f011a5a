//! Show a single item by permalink

use anyhow::Result;
use serde::Serialize;

use super::list::ItemSummary;
use crate::helpers::full_date;
use crate::Folio;

#[derive(Serialize)]
struct ItemDetail<'a> {
    #[serde(flatten)]
    summary: ItemSummary<'a>,
    extra: &'a indexmap::IndexMap<String, serde_yaml::Value>,
    body: &'a str,
}

/// Print the metadata and raw body of the item at `permalink`
pub fn run(folio: &Folio, permalink: &str, json: bool) -> Result<()> {
    let collection = folio.load()?;
    let Some(item) = collection.find_by_permalink(permalink) else {
        anyhow::bail!("No content at {}", permalink);
    };

    if json {
        let detail = ItemDetail {
            summary: ItemSummary::new(folio, item),
            extra: item.extra(),
            body: item.body(),
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("title:     {}", item.title());
    println!("permalink: {}", item.permalink());
    println!("layout:    {}", item.layout());
    println!("source:    {}", item.source());
    if let Some(date) = item.date() {
        println!("date:      {}", full_date(date));
    }
    if !item.categories().is_empty() {
        let categories: Vec<_> = item.categories().iter().map(String::as_str).collect();
        println!("categories: {}", categories.join(", "));
    }
    if !item.tags().is_empty() {
        let tags: Vec<_> = item.tags().iter().map(String::as_str).collect();
        println!("tags:      {}", tags.join(", "));
    }
    for (key, value) in item.extra() {
        let value = serde_yaml::to_string(value)?;
        println!("{}: {}", key, value.trim_end());
    }

    if item.is_post() {
        if let Some(prev) = collection.previous_post(item) {
            println!("previous:  {} {}", prev.title(), prev.permalink());
        }
        if let Some(next) = collection.next_post(item) {
            println!("next:      {} {}", next.title(), next.permalink());
        }
    }

    println!();
    print!("{}", item.body());
    Ok(())
}
