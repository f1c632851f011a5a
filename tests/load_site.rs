use std::fs;
use std::path::Path;

use folio::{Folio, LoadError, LoadErrors};

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scaffold(root: &Path) {
    write(
        root,
        "_config.yml",
        b"title: Personal Site\nurl: https://example.com\ntimezone: Europe/Berlin\nexclude:\n  - README.md\n  - drafts/**\n",
    );
    write(
        root,
        "about.md",
        b"---\nlayout: page\ntitle: About\npermalink: /about/\ncustom_css: about\n---\n\nI write about Kotlin.\n",
    );
    write(
        root,
        "_posts/2022-11-14-x.md",
        b"---\nlayout: post\ntitle: X\ndate: 2022-11-14 09:00:00 +0100\ncategories: [kotlin]\n---\n\n```kotlin\nfun main() {}\n```\n",
    );
    write(
        root,
        "_posts/2023-02-01-staff.md",
        b"---\nlayout: post\ntitle: Staff\ndate: 2023-02-01\ncategories: staff-engineer\n---\nNotes.\n",
    );
    // ignored: excluded, underscore directory, hidden directory, not markdown
    write(root, "README.md", b"# Repo readme without front matter\n");
    write(root, "drafts/wip.md", b"unfinished");
    write(root, "_site/about/index.md", b"generated");
    write(root, ".git/notes.md", b"internal");
    write(root, "assets/style.css", b"body {}");
}

fn load_errors(site: &Folio) -> LoadErrors {
    site.load()
        .unwrap_err()
        .downcast::<LoadErrors>()
        .expect("load should fail with LoadErrors")
}

#[test]
fn loads_pages_and_posts_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());

    let site = Folio::new(dir.path()).unwrap();
    let collection = site.load().unwrap();

    assert_eq!(collection.len(), 3);

    let pages: Vec<_> = collection.list_pages().map(|p| p.title()).collect();
    assert_eq!(pages, vec!["About"]);

    let posts: Vec<_> = collection.list_posts().map(|p| p.title()).collect();
    assert_eq!(posts, vec!["Staff", "X"]);

    let x = collection.find_by_permalink("/kotlin/2022/11/14/x/").unwrap();
    assert_eq!(x.formatted_date("YYYY-MM-DD HH:mm").unwrap(), "2022-11-14 09:00");
    assert!(x.body().contains("fun main() {}"));

    let filtered: Vec<_> = collection
        .filter_by_category("kotlin")
        .map(|p| p.title())
        .collect();
    assert_eq!(filtered, vec!["X"]);
    assert_eq!(collection.filter_by_category("rust").count(), 0);

    let about = collection.find_by_permalink("/about").unwrap();
    assert!(about.extra().contains_key("custom_css"));
}

#[test]
fn reload_yields_equal_collections() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());

    let site = Folio::new(dir.path()).unwrap();
    assert_eq!(site.load().unwrap(), site.load().unwrap());
}

#[test]
fn reports_every_problem_in_one_pass() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    write(dir.path(), "_posts/2023-03-01-undated.md", b"---\ntitle: Undated\n---\nBody\n");
    write(dir.path(), "about/index.md", b"---\ntitle: About again\n---\nBody\n");
    write(dir.path(), "latin1.md", b"---\ntitle: Caf\xe9\n---\nBody\n");

    let site = Folio::new(dir.path()).unwrap();
    let errors = load_errors(&site);

    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| matches!(
        e,
        LoadError::MissingRequiredField { source_id, field: "date" }
            if source_id == "_posts/2023-03-01-undated.md"
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        LoadError::DuplicatePermalink { first, second, .. }
            if first == "about.md" && second == "about/index.md"
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        LoadError::UnreadableSource { source_id, .. } if source_id == "latin1.md"
    )));
}

#[test]
fn missing_source_dir_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "_config.yml", b"source_dir: content\n");

    let site = Folio::new(dir.path()).unwrap();
    let errors = load_errors(&site);
    assert!(matches!(errors.errors()[0], LoadError::UnreadableSource { .. }));
}

#[test]
fn invalid_timezone_fails_config_load() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "_config.yml", b"timezone: Nowhere/City\n");
    assert!(Folio::new(dir.path()).is_err());
}
