//! Reload content whenever sources change

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::watch::LiveCollection;
use crate::{Collection, Folio, CONFIG_FILE};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Watch the site and rebuild the collection on every change
pub fn run(folio: &Folio) -> Result<()> {
    let mut site = folio.clone();
    let live = LiveCollection::new(initial_load(&site)?);

    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
    for (path, mode) in watched_paths(&site) {
        debouncer.watcher().watch(&path, mode)?;
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", site.source_dir);

    for result in rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        if !events.iter().any(|e| is_relevant(&site, &e.path)) {
            continue;
        }

        if events.iter().any(|e| e.path.ends_with(CONFIG_FILE)) {
            match Folio::new(&site.base_dir) {
                Ok(reloaded) => {
                    tracing::info!("Configuration changed, reloading");
                    let old = watched_paths(&site);
                    let new = watched_paths(&reloaded);
                    for (path, _) in &old {
                        if new.iter().any(|(p, _)| p == path) {
                            continue;
                        }
                        if let Err(e) = debouncer.watcher().unwatch(path) {
                            tracing::debug!("Failed to unwatch {:?}: {:?}", path, e);
                        }
                    }
                    for (path, mode) in &new {
                        if old.iter().any(|(p, _)| p == path) {
                            continue;
                        }
                        match debouncer.watcher().watch(path, *mode) {
                            Ok(()) => tracing::info!("Now watching {:?}", path),
                            Err(e) => tracing::error!("Failed to watch {:?}: {:?}", path, e),
                        }
                    }
                    site = reloaded;
                }
                Err(e) => {
                    tracing::error!("Failed to reload configuration: {:#}", e);
                    continue;
                }
            }
        }

        let loader = match ContentLoader::new(&site) {
            Ok(loader) => loader,
            Err(e) => {
                tracing::error!("{:#}", e);
                continue;
            }
        };

        match live.rebuild(|| loader.load()) {
            Ok(collection) => tracing::info!(
                "Reloaded {} items (generation {})",
                collection.len(),
                live.generation()
            ),
            Err(errors) => {
                for err in &errors {
                    tracing::error!("{}", err);
                }
            }
        }
    }

    Ok(())
}

/// The source directory, plus the config file when it lives outside it
fn watched_paths(site: &Folio) -> Vec<(PathBuf, RecursiveMode)> {
    let mut paths = vec![(site.source_dir.clone(), RecursiveMode::Recursive)];
    let config_path = site.config_path();
    if config_path.exists() && !config_path.starts_with(&site.source_dir) {
        paths.push((config_path, RecursiveMode::NonRecursive));
    }
    paths
}

/// First load; on failure the watcher starts empty and waits for a fix
fn initial_load(site: &Folio) -> Result<Collection> {
    match ContentLoader::new(site)?.load() {
        Ok(collection) => Ok(collection),
        Err(errors) => {
            for err in &errors {
                tracing::error!("{}", err);
            }
            tracing::warn!("Starting with no content until the errors above are fixed");
            Ok(Collection::default())
        }
    }
}

/// Content files, the config file, and paths without an extension
/// (directories being created, renamed or removed)
fn is_relevant(site: &Folio, path: &Path) -> bool {
    if path.ends_with(CONFIG_FILE) {
        return true;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => site.config.is_content_ext(ext),
        None => true,
    }
}
