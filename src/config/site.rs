//! Site configuration (_config.yml)

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    /// IANA timezone used to interpret dates without an offset
    pub timezone: Tz,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub markdown_ext: Vec<String>,

    // Writing
    pub new_post_name: String,
    pub default_layout: String,
    pub page_layout: String,

    // Date / Time format
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: String::new(),
            timezone: Tz::UTC,

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: "/:categories/:year/:month/:day/:title/".to_string(),

            source_dir: ".".to_string(),
            posts_dir: "_posts".to_string(),
            exclude: vec![
                "README.md".to_string(),
                "node_modules".to_string(),
                "vendor".to_string(),
            ],
            markdown_ext: vec!["md".to_string(), "markdown".to_string()],

            new_post_name: ":year-:month-:day-:title.md".to_string(),
            default_layout: "post".to_string(),
            page_layout: "page".to_string(),

            date_format: "YYYY-MM-DD".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Whether a file extension marks a content source
    pub fn is_content_ext(&self, ext: &str) -> bool {
        self.markdown_ext
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
