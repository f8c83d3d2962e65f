//! Content module - raw API documents and their display models

mod document;
mod post;

pub use document::{
    Banner, ContentBlock, FeedEntry, FeedPage, PostData, PostDocument, RichTextSegment, Span,
    SpanData, SummaryData,
};
pub use post::{PostDetail, PostSummary};
