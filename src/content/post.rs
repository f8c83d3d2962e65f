//! Post models ready for display

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::document::{ContentBlock, PostDocument};
use crate::helpers::{parse_timestamp, post_path};

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Post uid (slug), unique within a feed
    pub uid: String,

    /// Publication instant, if the post was ever published
    pub published_at: Option<DateTime<FixedOffset>>,

    /// Formatted publication date, or the unpublished label
    pub date: String,

    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Site path of the detail page
    pub path: String,
}

/// A fully resolved post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub uid: String,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub banner_url: Option<String>,
    pub banner_alt: Option<String>,
    pub author: String,
    pub content: Vec<ContentBlock>,
}

impl PostDetail {
    /// Build from a raw document; unparseable timestamps count as absent
    pub fn from_document(doc: PostDocument) -> Self {
        let published_at = doc.first_publication_date.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::warn!("Unparseable publication date {:?} on {}", raw, doc.uid);
            }
            parsed
        });

        Self {
            uid: doc.uid,
            published_at,
            title: doc.data.title,
            subtitle: doc.data.subtitle,
            banner_url: doc.data.banner.url.filter(|u| !u.is_empty()),
            banner_alt: doc.data.banner.alt,
            author: doc.data.author,
            content: doc.data.content,
        }
    }

    /// Site path of this post
    pub fn path(&self) -> String {
        post_path(&self.uid)
    }
}
