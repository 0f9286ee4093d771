//! Document record.
//!
//! A [Document] is one line of a shard. Known fields are typed, everything else
//! is kept in [Document::extra] and written back untouched.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A shard record.
///
/// Writing a document back is not byte-identical to the line it was read from:
/// - known optional fields that are `null` or missing are left out,
/// - a single `languages` string is written as a one-element list.
///
/// Unknown fields, `null` ones included, are written back as they were read.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Accepts `"en"` as well as `["en", "zh"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }),
    )
}

impl Document {
    pub fn new(content: String) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    /// Build a document from WARC identity headers.
    pub fn with_headers(id: Option<String>, url: Option<String>, timestamp: Option<String>) -> Self {
        Self {
            id,
            url,
            timestamp,
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub fn languages(&self) -> Option<&[String]> {
        self.languages.as_deref()
    }

    pub fn set_languages(&mut self, languages: Vec<String>) {
        self.languages = Some(languages);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Fields that are not part of the typed schema.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Best identifier available for logging.
    pub fn label(&self) -> &str {
        self.id()
            .or_else(|| self.url())
            .unwrap_or("<unidentified>")
    }
}
