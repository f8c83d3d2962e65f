//! prismic-blog: a blog front end backed by the Prismic content API
//!
//! Posts are listed with incremental "load more" pagination and rendered
//! one per page with a reading-time estimate. The same views back a live
//! server and a static site generator.

pub mod commands;
pub mod config;
pub mod content;
pub mod detail;
pub mod error;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod prismic;
pub mod server;
pub mod templates;

#[cfg(test)]
mod testing;

pub use error::{Error, ErrorKind, Result};

use std::path::Path;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    ///
    /// Reads `_config.yml` when present, then applies environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();
        config.validate()?;

        Ok(Self::with_config(base_dir, config))
    }

    /// Create from an already built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Client factory bound to this blog's repository
    pub fn client_factory(&self) -> Result<prismic::ContentClientFactory> {
        prismic::ContentClientFactory::new(&self.config)
    }

    /// Generate the static site
    pub async fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "title: Space\napi_endpoint: https://space.cdn.prismic.io/api/v2\npublic_dir: out\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Space");
        assert_eq!(blog.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "page_size: 0\n").unwrap();
        assert!(Blog::new(dir.path()).is_err());
    }
}
