//! Single-flight controller owning the listing state

use std::sync::Arc;
use tokio::sync::Mutex;

use super::FeedAssembler;
use crate::content::PostSummary;
use crate::error::Result;
use crate::prismic::ContentSource;

/// Commands accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    /// Load the page behind the current cursor
    RequestMorePosts,
}

/// Outcome of a handled command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// A page was appended
    Appended { count: usize, exhausted: bool },
    /// The cursor is null; nothing was fetched
    Exhausted,
    /// Another request is still in flight; nothing was fetched
    Busy,
}

/// Owns the feed and serializes every mutation of it
pub struct FeedController {
    feed: Mutex<FeedAssembler>,
    source: Arc<dyn ContentSource>,
}

impl FeedController {
    pub fn new(feed: FeedAssembler, source: Arc<dyn ContentSource>) -> Self {
        Self {
            feed: Mutex::new(feed),
            source,
        }
    }

    /// Handle a command
    ///
    /// A command arriving while a fetch is in flight is rejected with
    /// [`FeedEvent::Busy`] instead of queueing behind it.
    pub async fn handle(&self, command: FeedCommand) -> Result<FeedEvent> {
        match command {
            FeedCommand::RequestMorePosts => {
                let Ok(mut feed) = self.feed.try_lock() else {
                    tracing::debug!("Load more ignored, a request is in flight");
                    return Ok(FeedEvent::Busy);
                };
                if !feed.has_more() {
                    return Ok(FeedEvent::Exhausted);
                }
                let count = feed.load_more(self.source.as_ref()).await?;
                Ok(FeedEvent::Appended {
                    count,
                    exhausted: !feed.has_more(),
                })
            }
        }
    }

    /// Keep requesting pages until the feed is exhausted
    pub async fn load_all(&self) -> Result<usize> {
        let mut total = 0;
        loop {
            match self.handle(FeedCommand::RequestMorePosts).await? {
                FeedEvent::Appended { count, .. } => total += count,
                FeedEvent::Exhausted => return Ok(total),
                FeedEvent::Busy => tokio::task::yield_now().await,
            }
        }
    }

    /// Current posts and cursor
    pub async fn snapshot(&self) -> (Vec<PostSummary>, Option<String>) {
        let feed = self.feed.lock().await;
        (feed.posts().to_vec(), feed.cursor().map(str::to_string))
    }
}
