//! folio: content collection core for Jekyll-style sites
//!
//! Loads pages and posts (front-matter plus a raw markup body) from a site
//! directory, validates them, and exposes ordered views for a renderer.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod watch;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{Collection, ContentItem, ContentKind, RawSource};
pub use error::{LoadError, LoadErrors};

/// Config file looked up in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site on disk
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
}

impl Folio {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site directory with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        Self {
            config,
            base_dir,
            source_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Read and load every source under the source directory
    pub fn load(&self) -> Result<Collection> {
        let loader = content::loader::ContentLoader::new(self)?;
        Ok(loader.load()?)
    }

    /// Create a new post or page source
    pub fn new_post(&self, title: &str, layout: Option<&str>) -> Result<PathBuf> {
        commands::new::run(self, title, layout)
    }
}
