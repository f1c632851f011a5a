//! Validate all content without producing output

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::Folio;

/// Load every source and report all problems at once
pub fn run(folio: &Folio) -> Result<()> {
    let loader = ContentLoader::new(folio)?;

    match loader.load() {
        Ok(collection) => {
            println!(
                "OK: {} posts, {} pages",
                collection.list_posts().len(),
                collection.list_pages().count()
            );
            Ok(())
        }
        Err(errors) => {
            for err in &errors {
                eprintln!("error: {}", err);
            }
            anyhow::bail!("{} problems found in {:?}", errors.len(), folio.source_dir)
        }
    }
}
