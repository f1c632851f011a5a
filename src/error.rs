//! Load errors reported by the content collection

use std::fmt;
use std::io;

use thiserror::Error;

/// A single problem found while loading content sources
#[derive(Error, Debug)]
pub enum LoadError {
    /// The metadata block is missing, unterminated, or not a mapping
    #[error("{source_id}: malformed front-matter: {reason}")]
    MalformedFrontMatter { source_id: String, reason: String },

    /// A field the item kind requires is absent
    #[error("{source_id}: missing required field `{field}`")]
    MissingRequiredField {
        source_id: String,
        field: &'static str,
    },

    /// A `date` value that none of the accepted formats match
    #[error("{source_id}: invalid date `{value}`")]
    InvalidDate { source_id: String, value: String },

    /// The body after the front-matter is empty
    #[error("{source_id}: body is empty")]
    EmptyBody { source_id: String },

    /// Two sources resolve to the same URL
    #[error("duplicate permalink `{permalink}` in {first} and {second}")]
    DuplicatePermalink {
        permalink: String,
        first: String,
        second: String,
    },

    /// The file-access collaborator could not read a source
    #[error("{source_id}: unreadable source: {source}")]
    UnreadableSource {
        source_id: String,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub fn malformed(source_id: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::MalformedFrontMatter {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing(source_id: impl Into<String>, field: &'static str) -> Self {
        Self::MissingRequiredField {
            source_id: source_id.into(),
            field,
        }
    }

    /// Source identifiers this error refers to
    pub fn source_ids(&self) -> Vec<&str> {
        match self {
            Self::MalformedFrontMatter { source_id, .. }
            | Self::MissingRequiredField { source_id, .. }
            | Self::InvalidDate { source_id, .. }
            | Self::EmptyBody { source_id }
            | Self::UnreadableSource { source_id, .. } => vec![source_id.as_str()],
            Self::DuplicatePermalink { first, second, .. } => {
                vec![first.as_str(), second.as_str()]
            }
        }
    }
}

/// Every error found during one load attempt
#[derive(Debug)]
pub struct LoadErrors(Vec<LoadError>);

impl LoadErrors {
    pub(crate) fn new(errors: Vec<LoadError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn errors(&self) -> &[LoadError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoadError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<LoadError> {
        self.0
    }
}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "failed to load content ({} {})", count, noun)?;
        for err in &self.0 {
            write!(f, "\n  {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadErrors {}

impl IntoIterator for LoadErrors {
    type Item = LoadError;
    type IntoIter = std::vec::IntoIter<LoadError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LoadErrors {
    type Item = &'a LoadError;
    type IntoIter = std::slice::Iter<'a, LoadError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_both_sources() {
        let err = LoadError::DuplicatePermalink {
            permalink: "/about/".to_string(),
            first: "about.md".to_string(),
            second: "about/index.md".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("about.md"));
        assert!(msg.contains("about/index.md"));
        assert_eq!(err.source_ids(), vec!["about.md", "about/index.md"]);
    }

    #[test]
    fn test_aggregate_display_lists_every_error() {
        let errors = LoadErrors::new(vec![
            LoadError::missing("_posts/a.md", "date"),
            LoadError::EmptyBody {
                source_id: "b.md".to_string(),
            },
        ]);
        let msg = errors.to_string();
        assert!(msg.contains("2 errors"));
        assert!(msg.contains("_posts/a.md: missing required field `date`"));
        assert!(msg.contains("b.md: body is empty"));
    }

    #[test]
    fn test_aggregate_display_single_error() {
        let errors = LoadErrors::new(vec![LoadError::missing("_posts/a.md", "title")]);
        let msg = errors.to_string();
        assert!(msg.starts_with("failed to load content (1 error)\n"));
    }

    #[test]
    fn test_unreadable_source_keeps_io_cause() {
        use std::error::Error as _;

        let err = LoadError::UnreadableSource {
            source_id: "x.md".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("denied"));
    }
}
