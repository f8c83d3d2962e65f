//! Content API access
//!
//! The rest of the crate only talks to [`ContentSource`]; [`PrismicClient`]
//! is the production implementation, produced per request by
//! [`ContentClientFactory`].

mod client;
mod link;

use async_trait::async_trait;

use crate::content::{FeedPage, PostDocument};
use crate::error::Result;

pub use client::{
    validate_cursor, ClientConfig, ContentClientFactory, PrismicClient, RequestContext,
    PREVIEW_COOKIE,
};
pub use link::{resolve_link, DocumentKind};

/// Read access to the published documents of a repository
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page of documents of the given type
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<FeedPage>;

    /// A single document by type and uid
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<PostDocument>;

    /// The feed page a cursor points at
    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage>;
}
