//! The loaded, validated set of pages and posts

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use indexmap::IndexMap;

use super::item::{term_key, ContentItem, RawSource};
use super::permalink;
use crate::config::SiteConfig;
use crate::error::{LoadError, LoadErrors};

/// Immutable collection of content items.
///
/// Built once by [`Collection::load`]; a change to any source means loading
/// a new collection rather than mutating this one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Vec<ContentItem>,
    /// Indices of posts, newest first
    posts: Vec<usize>,
    by_permalink: HashMap<String, usize>,
}

impl Collection {
    /// Parse and validate every source.
    ///
    /// Errors are collected across the whole batch. Duplicate permalinks are
    /// checked after every item has been parsed on its own.
    pub fn load<I, S>(sources: I, config: &SiteConfig) -> Result<Self, LoadErrors>
    where
        I: IntoIterator<Item = S>,
        S: Into<RawSource>,
    {
        Self::load_with(sources, Vec::new(), config)
    }

    /// Like [`Collection::load`], starting from errors a file reader already
    /// hit so one report covers the whole batch
    pub fn load_with<I, S>(
        sources: I,
        mut errors: Vec<LoadError>,
        config: &SiteConfig,
    ) -> Result<Self, LoadErrors>
    where
        I: IntoIterator<Item = S>,
        S: Into<RawSource>,
    {
        let mut items = Vec::new();

        for source in sources {
            let source = source.into();
            match ContentItem::parse(&source, config) {
                Ok(item) => match item.validate() {
                    Ok(()) => {
                        tracing::debug!("Parsed {} -> {}", item.source(), item.permalink());
                        items.push(item);
                    }
                    Err(e) => errors.push(e),
                },
                Err(mut item_errors) => errors.append(&mut item_errors),
            }
        }

        let mut by_permalink: HashMap<String, usize> = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match by_permalink.entry(item.permalink().to_string()) {
                Entry::Occupied(existing) => errors.push(LoadError::DuplicatePermalink {
                    permalink: item.permalink().to_string(),
                    first: items[*existing.get()].source().to_string(),
                    second: item.source().to_string(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
        }

        if !errors.is_empty() {
            return Err(LoadErrors::new(errors));
        }

        let mut posts: Vec<usize> = (0..items.len()).filter(|&i| items[i].is_post()).collect();
        posts.sort_by(|&a, &b| {
            let (a, b) = (&items[a], &items[b]);
            b.date()
                .cmp(&a.date())
                .then_with(|| a.source().cmp(b.source()))
        });

        tracing::info!(
            "Loaded {} posts and {} pages",
            posts.len(),
            items.len() - posts.len()
        );

        Ok(Self {
            items,
            posts,
            by_permalink,
        })
    }

    /// Posts, most recent first; equal dates fall back to source order
    pub fn list_posts(
        &self,
    ) -> impl ExactSizeIterator<Item = &ContentItem> + DoubleEndedIterator + Clone + '_ {
        self.posts.iter().map(move |&i| &self.items[i])
    }

    /// Pages in the order they were loaded
    pub fn list_pages(&self) -> impl Iterator<Item = &ContentItem> + Clone + '_ {
        self.items.iter().filter(|item| item.is_page())
    }

    /// Look up an item by path; the path is normalized first, so
    /// `/about`, `about/` and `/about/index.html` all find `/about/`
    pub fn find_by_permalink(&self, path: &str) -> Option<&ContentItem> {
        self.by_permalink
            .get(&permalink::normalize(path))
            .map(|&i| &self.items[i])
    }

    /// Posts filed under `category`, newest first.
    ///
    /// The iterator is lazy and can be cloned to walk the same posts again.
    pub fn filter_by_category(&self, category: &str) -> PostFilter<'_> {
        PostFilter::new(self, Term::Category(term_key(category)))
    }

    /// Posts carrying `tag`, newest first
    pub fn filter_by_tag(&self, tag: &str) -> PostFilter<'_> {
        PostFilter::new(self, Term::Tag(term_key(tag)))
    }

    /// Categories with their post counts, most used first
    pub fn categories(&self) -> Vec<(String, usize)> {
        count_terms(self.list_posts().flat_map(|p| p.categories().iter()))
    }

    /// Tags with their post counts, most used first
    pub fn tags(&self) -> Vec<(String, usize)> {
        count_terms(self.list_posts().flat_map(|p| p.tags().iter()))
    }

    /// The post published just before `post`
    pub fn previous_post(&self, post: &ContentItem) -> Option<&ContentItem> {
        let pos = self.post_position(post)?;
        self.posts.get(pos + 1).map(|&i| &self.items[i])
    }

    /// The post published just after `post`
    pub fn next_post(&self, post: &ContentItem) -> Option<&ContentItem> {
        let pos = self.post_position(post)?;
        pos.checked_sub(1).map(|p| &self.items[self.posts[p]])
    }

    fn post_position(&self, post: &ContentItem) -> Option<usize> {
        self.posts
            .iter()
            .position(|&i| self.items[i].source() == post.source())
    }

    /// All items in load order
    pub fn iter(&self) -> std::slice::Iter<'_, ContentItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone)]
enum Term {
    Category(String),
    Tag(String),
}

/// Lazy view over the posts matching a category or tag
#[derive(Debug, Clone)]
pub struct PostFilter<'a> {
    collection: &'a Collection,
    posts: std::slice::Iter<'a, usize>,
    term: Term,
}

impl<'a> PostFilter<'a> {
    fn new(collection: &'a Collection, term: Term) -> Self {
        Self {
            collection,
            posts: collection.posts.iter(),
            term,
        }
    }

    fn matches(&self, item: &ContentItem) -> bool {
        match &self.term {
            Term::Category(wanted) => item.categories().iter().any(|c| &term_key(c) == wanted),
            Term::Tag(wanted) => item.tags().iter().any(|t| &term_key(t) == wanted),
        }
    }
}

impl<'a> Iterator for PostFilter<'a> {
    type Item = &'a ContentItem;

    fn next(&mut self) -> Option<Self::Item> {
        let collection = self.collection;
        while let Some(&i) = self.posts.next() {
            let item = &collection.items[i];
            if self.matches(item) {
                return Some(item);
            }
        }
        None
    }
}

/// Count terms by [`term_key`], keeping the first spelling seen
fn count_terms<'a>(terms: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, (String, usize)> = IndexMap::new();
    for term in terms {
        counts
            .entry(term_key(term))
            .or_insert_with(|| (term.clone(), 0))
            .1 += 1;
    }

    let mut counts: Vec<_> = counts.into_values().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, title: &str, date: &str, categories: &str) -> (String, String) {
        (
            id.to_string(),
            format!(
                "---\nlayout: post\ntitle: {}\ndate: {}\ncategories: [{}]\n---\nBody of {}\n",
                title, date, categories, title
            ),
        )
    }

    fn about() -> (String, String) {
        (
            "about.md".to_string(),
            "---\nlayout: page\ntitle: About\npermalink: /about/\n---\nHello.\n".to_string(),
        )
    }

    fn load(sources: Vec<(String, String)>) -> Result<Collection, LoadErrors> {
        Collection::load(sources, &SiteConfig::default())
    }

    fn titles<'a>(items: impl Iterator<Item = &'a ContentItem>) -> Vec<&'a str> {
        items.map(|i| i.title()).collect()
    }

    #[test]
    fn test_about_and_one_post() {
        let collection = load(vec![
            about(),
            post("_posts/2022-11-14-x.md", "X", "2022-11-14", "kotlin"),
        ])
        .unwrap();

        assert_eq!(titles(collection.list_pages()), vec!["About"]);
        assert_eq!(titles(collection.list_posts()), vec!["X"]);
        assert_eq!(titles(collection.filter_by_category("kotlin")), vec!["X"]);
        assert_eq!(collection.filter_by_category("staff-engineer").count(), 0);
        assert_eq!(collection.find_by_permalink("/about/").unwrap().title(), "About");
    }

    #[test]
    fn test_posts_newest_first_with_source_tiebreak() {
        let collection = load(vec![
            post("_posts/b.md", "B", "2022-01-01", "a"),
            post("_posts/c.md", "C", "2023-06-01", "a"),
            post("_posts/a.md", "A", "2022-01-01", "a"),
        ])
        .unwrap();

        assert_eq!(titles(collection.list_posts()), vec!["C", "A", "B"]);

        let dates: Vec<_> = collection.list_posts().map(|p| *p.date().unwrap()).collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_find_by_permalink_is_total() {
        let collection = load(vec![about()]).unwrap();
        assert!(collection.find_by_permalink("/about").is_some());
        assert!(collection.find_by_permalink("about/index.html").is_some());
        assert!(collection.find_by_permalink("/missing/").is_none());
        assert!(collection.find_by_permalink("").is_none());
    }

    #[test]
    fn test_reload_is_deterministic() {
        let sources = vec![
            about(),
            post("_posts/2022-11-14-x.md", "X", "2022-11-14", "kotlin"),
            post("_posts/2022-11-15-y.md", "Y", "2022-11-15", "kotlin, jvm"),
        ];
        let first = load(sources.clone()).unwrap();
        let second = load(sources).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_permalink_names_both_sources() {
        let errors = load(vec![
            about(),
            (
                "about/index.md".to_string(),
                "---\ntitle: Also About\n---\nDup.\n".to_string(),
            ),
        ])
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        match &errors.errors()[0] {
            LoadError::DuplicatePermalink {
                permalink,
                first,
                second,
            } => {
                assert_eq!(permalink, "/about/");
                assert_eq!(first, "about.md");
                assert_eq!(second, "about/index.md");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_post_without_date() {
        let errors = load(vec![(
            "_posts/x.md".to_string(),
            "---\ntitle: X\n---\nBody\n".to_string(),
        )])
        .unwrap_err();
        assert!(matches!(
            errors.errors()[0],
            LoadError::MissingRequiredField { field: "date", .. }
        ));
    }

    #[test]
    fn test_undated_post_with_empty_body_reports_both() {
        let errors = load(vec![("_posts/a.md".to_string(), "---\ntitle: A\n---\n".to_string())])
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, LoadError::MissingRequiredField { field: "date", .. })));
        assert!(errors.iter().any(|e| matches!(e, LoadError::EmptyBody { .. })));
    }

    #[test]
    fn test_errors_are_aggregated() {
        let errors = load(vec![
            ("broken.md".to_string(), "no metadata".to_string()),
            ("_posts/x.md".to_string(), "---\ntitle: X\n---\nBody".to_string()),
            ("empty.md".to_string(), "---\ntitle: Empty\n---\n".to_string()),
            about(),
            ("about-copy.md".to_string(), "---\npermalink: /about\n---\nx".to_string()),
        ])
        .unwrap_err();

        let ids: Vec<_> = errors.iter().flat_map(|e| e.source_ids()).collect();
        assert_eq!(errors.len(), 4);
        for id in ["broken.md", "_posts/x.md", "empty.md", "about.md", "about-copy.md"] {
            assert!(ids.contains(&id), "missing {id}");
        }
    }

    #[test]
    fn test_filter_is_restartable() {
        let collection = load(vec![
            post("_posts/a.md", "A", "2022-01-01", "Staff Engineer"),
            post("_posts/b.md", "B", "2022-02-01", "kotlin"),
            post("_posts/c.md", "C", "2022-03-01", "staff-engineer"),
        ])
        .unwrap();

        let filter = collection.filter_by_category("staff-engineer");
        let once: Vec<_> = titles(filter.clone());
        let twice: Vec<_> = titles(filter);
        assert_eq!(once, vec!["C", "A"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_keeps_punctuated_categories_apart() {
        let collection = load(vec![
            post("_posts/a.md", "A", "2022-01-01", "\"C\""),
            post("_posts/b.md", "B", "2022-02-01", "\"C++\""),
        ])
        .unwrap();

        assert_eq!(titles(collection.filter_by_category("C++")), vec!["B"]);
        assert_eq!(titles(collection.filter_by_category("c")), vec!["A"]);
        assert_eq!(
            collection.categories(),
            vec![("C".to_string(), 1), ("C++".to_string(), 1)]
        );
    }

    #[test]
    fn test_tag_filter() {
        let collection = load(vec![(
            "_posts/a.md".to_string(),
            "---\ntitle: A\ndate: 2022-01-01\ntags: rust cli\n---\nBody".to_string(),
        )])
        .unwrap();

        assert_eq!(collection.filter_by_tag("cli").count(), 1);
        assert_eq!(collection.filter_by_tag("go").count(), 0);
    }

    #[test]
    fn test_category_counts() {
        let collection = load(vec![
            post("_posts/a.md", "A", "2022-01-01", "Kotlin"),
            post("_posts/b.md", "B", "2022-02-01", "kotlin, jvm"),
            post("_posts/c.md", "C", "2022-03-01", "android"),
        ])
        .unwrap();

        let cats = collection.categories();
        assert_eq!(cats[0], ("kotlin".to_string(), 2));
        assert_eq!(cats.len(), 3);
    }

    #[test]
    fn test_post_navigation() {
        let collection = load(vec![
            post("_posts/a.md", "A", "2022-01-01", "x"),
            post("_posts/b.md", "B", "2022-02-01", "x"),
            post("_posts/c.md", "C", "2022-03-01", "x"),
        ])
        .unwrap();

        let b = collection.find_by_permalink("/x/2022/02/01/b/").unwrap();
        assert_eq!(collection.previous_post(b).unwrap().title(), "A");
        assert_eq!(collection.next_post(b).unwrap().title(), "C");

        let c = collection.list_posts().next().unwrap();
        assert!(collection.next_post(c).is_none());
    }

    #[test]
    fn test_empty_collection() {
        let collection = load(Vec::new()).unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.list_posts().len(), 0);
    }
}
