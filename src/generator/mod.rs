//! Generator module - writes the site as static HTML files
//!
//! Listing pages accumulate: `page/N/index.html` shows pages 1..N of the
//! feed and links to `page/N+1/` while the cursor is non-null.

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::detail::{DetailRenderer, DetailView};
use crate::feed::FeedAssembler;
use crate::helpers::{page_path, Helpers};
use crate::prismic::ContentSource;
use crate::templates::{LoadMore, SiteData, TemplateRenderer};
use crate::Blog;

/// Counts reported after a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub listing_pages: usize,
    pub posts: usize,
    pub skipped: usize,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    detail: DetailRenderer,
    site: SiteData,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
            detail: DetailRenderer::new(&blog.config),
            site: SiteData::new(&blog.config),
        })
    }

    /// Generate the entire site from a content source
    pub async fn generate(&self, source: &dyn ContentSource) -> Result<GenerateStats> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let config = &self.blog.config;
        let mut feed = FeedAssembler::fetch_first(
            source,
            &config.post_type,
            config.page_size,
            Helpers::new(config),
        )
        .await?;

        let listing_pages = self.generate_listing_pages(source, &mut feed).await?;
        let (posts, skipped) = self.generate_post_pages(source, &feed).await?;

        let not_found = self.renderer.render_detail(
            &self.site,
            &DetailView::NotFound { uid: String::new() },
        )?;
        self.write("404.html", &not_found)?;

        Ok(GenerateStats {
            listing_pages,
            posts,
            skipped,
        })
    }

    /// Write one accumulated listing page per feed page
    async fn generate_listing_pages(
        &self,
        source: &dyn ContentSource,
        feed: &mut FeedAssembler,
    ) -> Result<usize> {
        let mut seen_cursors = HashSet::new();
        let mut page_no = 1;

        loop {
            let next = feed.has_more().then(|| page_path(page_no + 1));
            let html =
                self.renderer
                    .render_index(&self.site, feed.posts(), &LoadMore::link(next))?;
            self.write(&listing_file(page_no), &html)?;
            tracing::debug!("Wrote listing page {} ({} posts)", page_no, feed.posts().len());

            let Some(cursor) = feed.cursor() else {
                break;
            };
            if !seen_cursors.insert(cursor.to_string()) {
                tracing::warn!("Feed cursor repeats, stopping pagination at page {}", page_no);
                break;
            }

            feed.load_more(source).await?;
            page_no += 1;
        }

        Ok(page_no)
    }

    /// Resolve and write every listed post
    async fn generate_post_pages(
        &self,
        source: &dyn ContentSource,
        feed: &FeedAssembler,
    ) -> Result<(usize, usize)> {
        let post_type = &self.blog.config.post_type;
        let mut written = HashSet::new();
        let mut skipped = 0;

        for summary in feed.posts() {
            if !is_safe_segment(&summary.uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", summary.uid);
                skipped += 1;
                continue;
            }
            if written.contains(&summary.uid) {
                continue;
            }

            let outcome = source.get_by_uid(post_type, &summary.uid).await;
            let view = DetailView::loading().resolve(outcome, &self.detail)?;
            if let DetailView::NotFound { uid } = &view {
                tracing::warn!("Listed post {} could not be resolved", uid);
                skipped += 1;
                continue;
            }

            let html = self.renderer.render_detail(&self.site, &view)?;
            self.write(&format!("post/{}/index.html", summary.uid), &html)?;
            written.insert(summary.uid.clone());
        }

        tracing::info!("Generated {} post pages", written.len());
        Ok((written.len(), skipped))
    }

    fn write(&self, relative: &str, content: &str) -> Result<()> {
        let path: PathBuf = self.blog.public_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        tracing::debug!("Generated: {:?}", path);
        Ok(())
    }
}

/// Output file of listing page `n`
fn listing_file(n: usize) -> String {
    let path = page_path(n);
    format!("{}index.html", path.trim_start_matches('/'))
}

/// A uid usable as a single directory name
fn is_safe_segment(uid: &str) -> bool {
    !uid.is_empty()
        && !uid.starts_with('.')
        && !uid.contains(['/', '\\'])
        && !uid.chars().any(char::is_control)
}
