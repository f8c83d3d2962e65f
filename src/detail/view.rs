//! Post page view model and its loading state machine

use serde::Serialize;

use super::reading::estimate_read_minutes_at;
use super::richtext::render_rich_text;
use crate::config::SiteConfig;
use crate::content::{PostDetail, PostDocument};
use crate::error::{Error, Result};
use crate::helpers::{date_xml, Helpers};

/// Formatted metadata line of a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMeta {
    /// Display date, or the unpublished label
    pub date: String,
    /// Machine-readable date for `<time datetime>`
    pub datetime: Option<String>,
    pub author: String,
    pub read_minutes: u32,
    /// e.g. `4 min`
    pub read_time: String,
}

/// One rendered content block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBlock {
    pub heading: String,
    pub html: String,
}

/// Everything the post template needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub uid: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub banner_url: Option<String>,
    pub banner_alt: Option<String>,
    pub meta: PostMeta,
    pub blocks: Vec<RenderedBlock>,
}

/// Computes reading time and metadata for resolved posts
#[derive(Debug, Clone)]
pub struct DetailRenderer {
    helpers: Helpers,
    words_per_minute: usize,
}

impl DetailRenderer {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            helpers: Helpers::new(config),
            words_per_minute: config.words_per_minute,
        }
    }

    /// Date, author and reading time of a post
    pub fn format_metadata(&self, post: &PostDetail) -> PostMeta {
        let read_minutes = estimate_read_minutes_at(&post.content, self.words_per_minute);
        PostMeta {
            date: self.helpers.publication_date(post.published_at.as_ref()),
            datetime: post.published_at.as_ref().map(date_xml),
            author: post.author.clone(),
            read_minutes,
            read_time: format!("{} min", read_minutes),
        }
    }

    /// Build the full page model
    pub fn render(&self, post: PostDetail) -> PostPage {
        let meta = self.format_metadata(&post);
        let path = post.path();
        let blocks = post
            .content
            .iter()
            .map(|block| RenderedBlock {
                heading: block.heading.clone(),
                html: render_rich_text(&block.body),
            })
            .collect();

        PostPage {
            uid: post.uid,
            path,
            title: post.title,
            subtitle: post.subtitle,
            banner_url: post.banner_url,
            banner_alt: post.banner_alt,
            meta,
            blocks,
        }
    }
}

impl Default for DetailRenderer {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}

/// State of a post page
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    /// Content not resolved yet; a placeholder is shown
    Loading,
    /// Content resolved
    Ready(Box<PostPage>),
    /// The requested uid does not resolve to a post
    NotFound { uid: String },
}

impl DetailView {
    pub fn loading() -> Self {
        DetailView::Loading
    }

    /// Settle a loading view with the fetch outcome
    ///
    /// Only `Loading` transitions; a settled view is returned unchanged.
    /// Errors other than not-found are handed back to the caller.
    pub fn resolve(self, outcome: Result<PostDocument>, renderer: &DetailRenderer) -> Result<Self> {
        if !matches!(self, DetailView::Loading) {
            tracing::debug!("Ignoring resolve on a settled post view");
            return Ok(self);
        }

        match outcome {
            Ok(doc) => Ok(DetailView::Ready(Box::new(
                renderer.render(PostDetail::from_document(doc)),
            ))),
            Err(Error::NotFound { uid, .. }) => Ok(DetailView::NotFound { uid }),
            Err(e) => Err(e),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailView::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentBlock;
    use crate::error::ErrorKind;
    use crate::testing::document;
    use reqwest::StatusCode;

    fn intro() -> Vec<ContentBlock> {
        vec![ContentBlock::new("Intro", &["one two three"])]
    }

    #[test]
    fn test_format_metadata() {
        let renderer = DetailRenderer::default();
        let post = PostDetail::from_document(document(
            "a",
            Some("2023-05-19T00:00:00+0000"),
            intro(),
        ));
        let meta = renderer.format_metadata(&post);
        assert_eq!(meta.date, "19 Mai 2023");
        assert_eq!(meta.datetime.as_deref(), Some("2023-05-19T00:00:00+00:00"));
        assert_eq!(meta.author, "Author a");
        assert_eq!(meta.read_minutes, 1);
        assert_eq!(meta.read_time, "1 min");
    }

    #[test]
    fn test_format_metadata_without_date() {
        let renderer = DetailRenderer::default();
        let post = PostDetail::from_document(document("a", None, intro()));
        let meta = renderer.format_metadata(&post);
        assert_eq!(meta.date, "Não publicado");
        assert_eq!(meta.datetime, None);
    }

    #[test]
    fn test_render_blocks() {
        let renderer = DetailRenderer::default();
        let page = renderer.render(PostDetail::from_document(document("a", None, intro())));
        assert_eq!(page.path, "/post/a");
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].heading, "Intro");
        assert_eq!(page.blocks[0].html, "<p>one two three</p>");
    }

    #[test]
    fn test_loading_to_ready() {
        let renderer = DetailRenderer::default();
        let view = DetailView::loading();
        assert!(view.is_loading());

        let view = view
            .resolve(Ok(document("a", None, intro())), &renderer)
            .unwrap();
        let DetailView::Ready(page) = &view else {
            panic!("expected ready view, got {:?}", view);
        };
        assert_eq!(page.uid, "a");

        // A settled view never goes back to loading
        let again = view
            .clone()
            .resolve(Ok(document("b", None, intro())), &renderer)
            .unwrap();
        assert_eq!(again, view);
    }

    #[test]
    fn test_loading_to_not_found() {
        let renderer = DetailRenderer::default();
        let view = DetailView::loading()
            .resolve(
                Err(Error::NotFound {
                    doc_type: "post".to_string(),
                    uid: "missing".to_string(),
                }),
                &renderer,
            )
            .unwrap();
        assert_eq!(
            view,
            DetailView::NotFound {
                uid: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_fetch_error_is_returned() {
        let renderer = DetailRenderer::default();
        let err = DetailView::loading()
            .resolve(
                Err(Error::Status {
                    status: StatusCode::BAD_GATEWAY,
                    url: "x".to_string(),
                }),
                &renderer,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
    }
}
