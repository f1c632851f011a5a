//! Content loader - reads sources from the source directory

use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::{Collection, RawSource};
use crate::error::{LoadError, LoadErrors};
use crate::Folio;

/// Reads content sources from disk
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    exclude: Vec<Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Result<Self> {
        let exclude = folio
            .config
            .exclude
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern {:?}", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { folio, exclude })
    }

    /// Read every content source, sorted by identifier.
    /// Files that cannot be read come back as `UnreadableSource` errors.
    pub fn read_sources(&self) -> (Vec<RawSource>, Vec<LoadError>) {
        let root = &self.folio.source_dir;
        let mut sources = Vec::new();
        let mut errors = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| self.should_visit(root, e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let id = e
                        .path()
                        .map(|p| source_id(root, p))
                        .filter(|id| !id.is_empty())
                        .unwrap_or_else(|| root.display().to_string());
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                    errors.push(LoadError::UnreadableSource {
                        source_id: id,
                        source,
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_content_file(path) {
                continue;
            }

            let id = source_id(root, path);
            match fs::read_to_string(path) {
                Ok(text) => sources.push(RawSource::new(id, text)),
                Err(source) => errors.push(LoadError::UnreadableSource {
                    source_id: id,
                    source,
                }),
            }
        }

        sources.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!("Read {} sources from {:?}", sources.len(), root);

        (sources, errors)
    }

    /// Read and load all content into a collection
    pub fn load(&self) -> std::result::Result<Collection, LoadErrors> {
        let (sources, errors) = self.read_sources();
        Collection::load_with(sources, errors, &self.folio.config)
    }

    fn should_visit(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir()
            && (name.starts_with('_') || name.starts_with('.'))
            && name != self.folio.config.posts_dir.as_str()
        {
            return false;
        }

        let id = source_id(root, entry.path());
        !self.exclude.iter().any(|p| p.matches(&id))
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.folio.config.is_content_ext(e))
            .unwrap_or(false)
    }
}

/// Source identifier: path relative to the source directory with `/` separators
fn source_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_id() {
        let root = PathBuf::from("site");
        assert_eq!(
            source_id(&root, &root.join("_posts").join("2022-11-14-x.md")),
            "_posts/2022-11-14-x.md"
        );
        assert_eq!(source_id(&root, &root.join("about.md")), "about.md");
    }
}
