//! Raw documents as returned by the content API

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize null as default (empty string, empty vec)
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// A field that must be present but may be null
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

/// One page of a paginated feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    /// Cursor (URL) of the next page; `None` once the feed is exhausted
    #[serde(deserialize_with = "required_nullable")]
    pub next_page: Option<String>,
    pub results: Vec<FeedEntry>,
}

impl FeedPage {
    pub fn new(next_page: Option<String>, results: Vec<FeedEntry>) -> Self {
        Self { next_page, results }
    }
}

/// A post as listed in a feed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub uid: String,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    pub data: SummaryData,
}

/// Listing fields of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_default")]
    pub author: String,
}

/// A fully resolved post document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDocument {
    pub uid: String,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    pub data: PostData,
}

/// Body fields of a post document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_default")]
    pub banner: Banner,
    #[serde(default, deserialize_with = "null_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_default")]
    pub content: Vec<ContentBlock>,
}

/// Image field; empty images come back as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A heading followed by rich-text body segments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default, deserialize_with = "null_default")]
    pub heading: String,
    #[serde(default, deserialize_with = "null_default")]
    pub body: Vec<RichTextSegment>,
}

impl ContentBlock {
    pub fn new(heading: &str, body: &[&str]) -> Self {
        Self {
            heading: heading.to_string(),
            body: body.iter().map(|t| RichTextSegment::paragraph(t)).collect(),
        }
    }
}

/// One rich-text element (paragraph, heading, list item, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextSegment {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub spans: Vec<Span>,
    /// Image URL for `image` elements
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl RichTextSegment {
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// Inline formatting over a character range of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<SpanData>,
}

/// Link or label payload of a span
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}
