//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::prismic::ClientConfig;
use crate::Blog;

/// Fetch every post and write the static site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let client = blog.client_factory()?.client(ClientConfig::default());
    let generator = Generator::new(blog)?;
    let stats = generator.generate(&client).await?;

    if stats.skipped > 0 {
        tracing::warn!("Skipped {} posts that could not be resolved", stats.skipped);
    }
    tracing::info!(
        "Generated {} listing pages and {} posts in {:.2}s",
        stats.listing_pages,
        stats.posts,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
