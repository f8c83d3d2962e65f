//! In-memory content source and fixtures for tests

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::content::{
    ContentBlock, FeedEntry, FeedPage, PostData, PostDocument, SummaryData,
};
use crate::error::{Error, Result};
use crate::prismic::ContentSource;

/// Canned reply for a cursor
#[derive(Debug, Clone)]
pub enum FakeReply {
    Page(FeedPage),
    NetworkDown,
    Malformed,
}

/// Content source backed by maps, recording what was asked
#[derive(Default)]
pub struct FakeSource {
    first: Option<FeedPage>,
    replies: HashMap<String, FakeReply>,
    documents: HashMap<String, PostDocument>,
    first_requests: Mutex<Vec<(String, usize)>>,
    fetched: Mutex<Vec<String>>,
    /// When set, `fetch_page` signals `started` and waits on `release`
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first(mut self, page: FeedPage) -> Self {
        self.first = Some(page);
        self
    }

    pub fn with_reply(mut self, cursor: &str, reply: FakeReply) -> Self {
        self.replies.insert(cursor.to_string(), reply);
        self
    }

    pub fn with_document(mut self, doc: PostDocument) -> Self {
        self.documents.insert(doc.uid.clone(), doc);
        self
    }

    /// Hold every `fetch_page` until `release` is notified
    pub fn gated(mut self, started: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((started, release));
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn first_requests(&self) -> Vec<(String, usize)> {
        self.first_requests.lock().unwrap().clone()
    }
}

fn network_down(url: &str) -> Error {
    Error::Status {
        status: StatusCode::BAD_GATEWAY,
        url: url.to_string(),
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<FeedPage> {
        self.first_requests
            .lock()
            .unwrap()
            .push((doc_type.to_string(), page_size));
        self.first.clone().ok_or_else(|| network_down("first page"))
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<PostDocument> {
        self.documents
            .get(uid)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage> {
        self.fetched.lock().unwrap().push(cursor.to_string());
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        match self.replies.get(cursor) {
            Some(FakeReply::Page(page)) => Ok(page.clone()),
            Some(FakeReply::Malformed) => {
                Err(serde_json::from_str::<FeedPage>(r#"{"results":[]}"#)
                    .unwrap_err()
                    .into())
            }
            Some(FakeReply::NetworkDown) | None => Err(network_down(cursor)),
        }
    }
}

/// Feed entry with predictable field values
pub fn entry(uid: &str, date: Option<&str>) -> FeedEntry {
    FeedEntry {
        uid: uid.to_string(),
        doc_type: Some("post".to_string()),
        first_publication_date: date.map(str::to_string),
        data: SummaryData {
            title: format!("Title {}", uid),
            subtitle: format!("Subtitle {}", uid),
            author: format!("Author {}", uid),
        },
    }
}

pub fn page(next: Option<&str>, results: Vec<FeedEntry>) -> FeedPage {
    FeedPage::new(next.map(str::to_string), results)
}

/// Post document with one content block
pub fn document(uid: &str, date: Option<&str>, blocks: Vec<ContentBlock>) -> PostDocument {
    PostDocument {
        uid: uid.to_string(),
        doc_type: Some("post".to_string()),
        first_publication_date: date.map(str::to_string),
        data: PostData {
            title: format!("Title {}", uid),
            subtitle: String::new(),
            banner: crate::content::Banner {
                url: Some(format!("https://images.prismic.io/{}.png", uid)),
                alt: None,
            },
            author: format!("Author {}", uid),
            content: blocks,
        },
    }
}
