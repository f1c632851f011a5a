//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Why a front-matter block could not be read as a mapping
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("no front-matter block (expected `---` or `+++` on the first line)")]
    Missing,

    #[error("opening `{0}` must be on its own line")]
    OpeningLine(&'static str),

    #[error("no closing `{0}` found")]
    Unterminated(&'static str),

    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[source] toml::de::Error),

    #[error("expected a mapping, found {0}")]
    NotMapping(&'static str),

    #[error("{0}")]
    Fields(#[source] serde_yaml::Error),
}

/// Delimiter syntax of a front-matter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    /// YAML delimited by `---`
    Yaml,
    /// TOML delimited by `+++`
    Toml,
}

impl FrontMatterFormat {
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }

    fn is_closing(&self, line: &str) -> bool {
        match self {
            // YAML documents may also end with `...`
            Self::Yaml => line == "---" || line == "...",
            Self::Toml => line == "+++",
        }
    }
}

/// Custom deserializer for a scalar read as a string (`title: 2024` is "2024")
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => scalar_to_string(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a string or number")),
    }
}

/// Custom deserializer that handles both a single string and a list of strings.
/// A single string is split on whitespace, so `categories: kotlin android`
/// yields two categories.
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.split_whitespace().map(str::to_string).collect())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<Value>()? {
                match scalar_to_string(&item) {
                    Some(s) => vec.push(s),
                    None => return Err(de::Error::custom("list items must be strings")),
                }
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    pub layout: Option<String>,
    pub permalink: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub categories: Vec<String>,
    /// Jekyll's singular form, merged into `categories`
    #[serde(deserialize_with = "scalar_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Keys not modelled above, kept in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (format, block, body) = split(content)?;
        let mapping = match format {
            FrontMatterFormat::Yaml => parse_yaml_mapping(block)?,
            FrontMatterFormat::Toml => parse_toml_mapping(block)?,
        };
        let fm = serde_yaml::from_value(Value::Mapping(mapping)).map_err(FrontMatterError::Fields)?;
        Ok((fm, body))
    }

    /// All categories, with the singular `category` key first
    pub fn all_categories(&self) -> impl Iterator<Item = &str> {
        self.category
            .as_deref()
            .into_iter()
            .chain(self.categories.iter().map(String::as_str))
    }
}

/// Split content into its format, raw metadata block and body
pub fn split(content: &str) -> Result<(FrontMatterFormat, &str, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontMatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontMatterFormat::Toml
    } else {
        return Err(FrontMatterError::Missing);
    };
    let delimiter = format.delimiter();

    let after_open = &content[delimiter.len()..];
    let (opening_rest, rest) = match after_open.find('\n') {
        Some(i) => (&after_open[..i], &after_open[i + 1..]),
        None => (after_open, ""),
    };
    if !opening_rest.trim().is_empty() {
        return Err(FrontMatterError::OpeningLine(delimiter));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if format.is_closing(line.trim_end()) {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((format, block, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated(delimiter))
}

fn parse_yaml_mapping(block: &str) -> Result<Mapping, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(block).map_err(FrontMatterError::Yaml)? {
        Value::Mapping(m) => Ok(m),
        // a block holding only comments
        Value::Null => Ok(Mapping::new()),
        other => Err(FrontMatterError::NotMapping(value_kind(&other))),
    }
}

fn parse_toml_mapping(block: &str) -> Result<Mapping, FrontMatterError> {
    let table: toml::Table = toml::from_str(block).map_err(FrontMatterError::Toml)?;
    let mut mapping = Mapping::new();
    for (key, value) in table {
        mapping.insert(Value::String(key), toml_to_yaml(value));
    }
    Ok(mapping)
}

/// TOML datetimes have no YAML counterpart; they become strings
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
