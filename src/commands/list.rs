//! List posts from the content API

use anyhow::Result;
use std::sync::Arc;

use crate::content::PostSummary;
use crate::feed::{FeedAssembler, FeedController};
use crate::helpers::Helpers;
use crate::prismic::{ClientConfig, ContentSource};
use crate::Blog;

/// Print the first page of posts, or every page with `all`
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let client = blog.client_factory()?.client(ClientConfig::default());
    let (posts, cursor) = collect(blog, Arc::new(client), all).await?;

    println!("Posts ({}):", posts.len());
    for line in format_lines(&posts) {
        println!("{}", line);
    }
    if cursor.is_some() {
        println!("More posts available (use --all)");
    }

    Ok(())
}

async fn collect(
    blog: &Blog,
    source: Arc<dyn ContentSource>,
    all: bool,
) -> Result<(Vec<PostSummary>, Option<String>)> {
    let config = &blog.config;
    let feed = FeedAssembler::fetch_first(
        source.as_ref(),
        &config.post_type,
        config.page_size,
        Helpers::new(config),
    )
    .await?;

    let controller = FeedController::new(feed, source);
    if all {
        let added = controller.load_all().await?;
        tracing::debug!("Loaded {} more posts", added);
    }
    Ok(controller.snapshot().await)
}

fn format_lines(posts: &[PostSummary]) -> Vec<String> {
    posts
        .iter()
        .map(|post| format!("  {} - {} [{}] by {}", post.date, post.title, post.uid, post.author))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::testing::{entry, page, FakeReply, FakeSource};

    fn source() -> Arc<FakeSource> {
        Arc::new(
            FakeSource::new()
                .with_first(page(
                    Some("url2"),
                    vec![entry("a", Some("2023-05-19T00:00:00Z"))],
                ))
                .with_reply("url2", FakeReply::Page(page(None, vec![entry("b", None)]))),
        )
    }

    #[tokio::test]
    async fn test_first_page_only() {
        let blog = Blog::with_config(".", SiteConfig::default());
        let (posts, cursor) = collect(&blog, source(), false).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(cursor.as_deref(), Some("url2"));
    }

    #[tokio::test]
    async fn test_all_pages() {
        let blog = Blog::with_config(".", SiteConfig::default());
        let (posts, cursor) = collect(&blog, source(), true).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(cursor.is_none());

        let lines = format_lines(&posts);
        assert_eq!(lines[0], "  19 Mai 2023 - Title a [a] by Author a");
        assert_eq!(lines[1], "  Não publicado - Title b [b] by Author b");
    }
}
