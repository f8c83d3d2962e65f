//! Incremental assembly of the post listing

use std::collections::HashSet;

use crate::content::{FeedEntry, FeedPage, PostSummary};
use crate::error::Result;
use crate::helpers::{parse_timestamp, post_path, Helpers};
use crate::prismic::ContentSource;

/// Turn one raw feed entry into a display-ready summary
pub fn normalize(entry: FeedEntry, helpers: &Helpers) -> PostSummary {
    let published_at = entry.first_publication_date.as_deref().and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            tracing::warn!("Unparseable publication date {:?} on {}", raw, entry.uid);
        }
        parsed
    });
    let date = helpers.publication_date(published_at.as_ref());

    PostSummary {
        path: post_path(&entry.uid),
        uid: entry.uid,
        published_at,
        date,
        title: entry.data.title,
        subtitle: entry.data.subtitle,
        author: entry.data.author,
    }
}

/// Ordered post list plus the cursor of the next page
///
/// The list only grows. Every fallible step of [`FeedAssembler::load_more`]
/// completes before the list or cursor is touched, so a failed or dropped
/// call leaves both as they were.
#[derive(Debug, Clone)]
pub struct FeedAssembler {
    posts: Vec<PostSummary>,
    cursor: Option<String>,
    seen: HashSet<String>,
    helpers: Helpers,
}

impl FeedAssembler {
    /// Start a feed from its first page
    pub fn initialize(first_page: FeedPage, helpers: Helpers) -> Self {
        let mut feed = Self::resume(None, helpers);
        feed.append(first_page);
        feed
    }

    /// Start an empty feed positioned at `cursor`
    pub fn resume(cursor: Option<String>, helpers: Helpers) -> Self {
        Self {
            posts: Vec::new(),
            cursor,
            seen: HashSet::new(),
            helpers,
        }
    }

    /// Fetch and initialize from the first page of `doc_type`
    pub async fn fetch_first(
        source: &dyn ContentSource,
        doc_type: &str,
        page_size: usize,
        helpers: Helpers,
    ) -> Result<Self> {
        let page = source.get_by_type(doc_type, page_size).await?;
        Ok(Self::initialize(page, helpers))
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Whether the load-more affordance should be offered
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Fetch the page at the cursor and append it
    ///
    /// Returns the number of appended posts; an exhausted feed returns 0
    /// without fetching.
    pub async fn load_more(&mut self, source: &dyn ContentSource) -> Result<usize> {
        let Some(cursor) = self.cursor.as_deref() else {
            return Ok(0);
        };

        let page = source.fetch_page(cursor).await?;
        Ok(self.append(page))
    }

    fn append(&mut self, page: FeedPage) -> usize {
        let FeedPage { next_page, results } = page;
        let added = results.len();

        for entry in results {
            let summary = normalize(entry, &self.helpers);
            if !self.seen.insert(summary.uid.clone()) {
                tracing::warn!("Post {} appears more than once in the feed", summary.uid);
            }
            self.posts.push(summary);
        }
        self.cursor = next_page;

        tracing::debug!(
            "Appended {} posts ({} total, more: {})",
            added,
            self.posts.len(),
            self.cursor.is_some()
        );
        added
    }

    pub fn into_parts(self) -> (Vec<PostSummary>, Option<String>) {
        (self.posts, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::testing::{entry, page, FakeReply, FakeSource};

    #[test]
    fn test_normalize_formats_date() {
        let summary = normalize(
            entry("a", Some("2023-05-19T00:00:00Z")),
            &Helpers::default(),
        );
        assert_eq!(summary.uid, "a");
        assert_eq!(summary.date, "19 Mai 2023");
        assert_eq!(summary.title, "Title a");
        assert_eq!(summary.subtitle, "Subtitle a");
        assert_eq!(summary.author, "Author a");
        assert_eq!(summary.path, "/post/a");
    }

    #[test]
    fn test_normalize_without_date() {
        let summary = normalize(entry("a", None), &Helpers::default());
        assert_eq!(summary.date, "Não publicado");
        assert!(summary.published_at.is_none());
    }

    #[test]
    fn test_initialize() {
        let feed = FeedAssembler::initialize(
            page(Some("url2"), vec![entry("a", Some("2023-05-19T00:00:00Z"))]),
            Helpers::default(),
        );
        assert_eq!(feed.posts().len(), 1);
        assert_eq!(feed.posts()[0].date, "19 Mai 2023");
        assert_eq!(feed.cursor(), Some("url2"));
        assert!(feed.has_more());
    }

    #[tokio::test]
    async fn test_load_more_appends_in_order() {
        let source = FakeSource::new().with_reply(
            "url2",
            FakeReply::Page(page(None, vec![entry("b", None), entry("c", None)])),
        );
        let mut feed = FeedAssembler::initialize(
            page(Some("url2"), vec![entry("a", None)]),
            Helpers::default(),
        );
        let before = feed.posts().to_vec();

        let added = feed.load_more(&source).await.unwrap();
        assert_eq!(added, 2);
        let uids: Vec<_> = feed.posts().iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, ["a", "b", "c"]);
        assert_eq!(&feed.posts()[..1], &before[..]);
        assert_eq!(feed.cursor(), None);
        assert!(!feed.has_more());
    }

    #[tokio::test]
    async fn test_exhausted_feed_does_not_fetch() {
        let source = FakeSource::new();
        let mut feed = FeedAssembler::initialize(page(None, vec![entry("a", None)]), Helpers::default());

        assert_eq!(feed.load_more(&source).await.unwrap(), 0);
        assert!(source.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_state() {
        let source = FakeSource::new().with_reply("url2", FakeReply::NetworkDown);
        let mut feed = FeedAssembler::initialize(
            page(Some("url2"), vec![entry("a", None)]),
            Helpers::default(),
        );

        let err = feed.load_more(&source).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert_eq!(feed.posts().len(), 1);
        assert_eq!(feed.cursor(), Some("url2"));
    }

    #[tokio::test]
    async fn test_malformed_page_leaves_state() {
        let source = FakeSource::new().with_reply("url2", FakeReply::Malformed);
        let mut feed = FeedAssembler::initialize(
            page(Some("url2"), vec![entry("a", None)]),
            Helpers::default(),
        );

        let err = feed.load_more(&source).await.unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert_eq!(feed.posts().len(), 1);
        assert_eq!(feed.cursor(), Some("url2"));
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let source = FakeSource::new()
            .with_reply("url2", FakeReply::Page(page(None, vec![entry("a", None)])));
        let mut feed = FeedAssembler::initialize(
            page(Some("url2"), vec![entry("a", None)]),
            Helpers::default(),
        );
        feed.load_more(&source).await.unwrap();
        assert_eq!(feed.posts().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_first() {
        let source = FakeSource::new()
            .with_first(page(Some("url2"), vec![entry("a", None), entry("b", None)]));
        let feed = FeedAssembler::fetch_first(&source, "post", 2, Helpers::default())
            .await
            .unwrap();
        assert_eq!(feed.posts().len(), 2);
        assert_eq!(source.first_requests(), vec![("post".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_resume_from_cursor() {
        let source = FakeSource::new()
            .with_reply("url3", FakeReply::Page(page(Some("url4"), vec![entry("x", None)])));
        let mut feed = FeedAssembler::resume(Some("url3".to_string()), Helpers::default());
        feed.load_more(&source).await.unwrap();

        let (posts, cursor) = feed.into_parts();
        assert_eq!(posts.len(), 1);
        assert_eq!(cursor.as_deref(), Some("url4"));
    }
}
