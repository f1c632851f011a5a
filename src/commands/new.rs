//! Create a new post or page

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create a new post/page source file and return its path
pub fn create_post(folio: &Folio, title: &str, layout: &str) -> Result<PathBuf> {
    let now = Utc::now().with_timezone(&folio.config.timezone);
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} has no characters usable in a file name", title);
    }

    let (file_path, front_matter) = if layout == folio.config.page_layout {
        let path = folio.source_dir.join(&slug).join("index.md");
        let fm = format!(
            "---\nlayout: {}\ntitle: {}\npermalink: /{}/\n---\n",
            layout,
            yaml_string(title),
            slug
        );
        (path, fm)
    } else {
        let filename = folio
            .config
            .new_post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
            .replace(":i_month", &now.format("%-m").to_string())
            .replace(":i_day", &now.format("%-d").to_string());
        let path = folio.source_dir.join(&folio.config.posts_dir).join(filename);
        let fm = format!(
            "---\nlayout: {}\ntitle: {}\ndate: {}\ncategories: []\n---\n",
            layout,
            yaml_string(title),
            now.format("%Y-%m-%d %H:%M:%S %z")
        );
        (path, fm)
    };

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!("{}\nWrite {} here.\n", front_matter, title);
    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// Quote a title so YAML keeps it a string (`title: "Yes: no"`)
fn yaml_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
}

/// Run the new command
pub fn run(folio: &Folio, title: &str, layout: Option<&str>) -> Result<PathBuf> {
    let layout = layout.unwrap_or(&folio.config.default_layout);
    create_post(folio, title, layout)
}
