//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::Locale;

/// Environment variable overriding `api_endpoint`
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";
/// Environment variable overriding `access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Content API
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub post_type: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
    /// Surface malformed API payloads as hard failures instead of retryable ones
    pub strict_schema: bool,

    // Display
    pub locale: Locale,
    pub date_format: String,
    pub unpublished_label: String,
    pub words_per_minute: usize,

    // Directory
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),

            api_endpoint: "https://your-repo.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            post_type: "post".to_string(),
            page_size: 1,
            request_timeout_secs: 10,
            strict_schema: false,

            locale: Locale::PtBr,
            date_format: "DD MMM YYYY".to_string(),
            unpublished_label: "Não publicado".to_string(),
            words_per_minute: 200,

            public_dir: "public".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `PRISMIC_API_ENDPOINT` / `PRISMIC_ACCESS_TOKEN` overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENDPOINT_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            tracing::debug!("Using API endpoint from {}", ENDPOINT_ENV);
            self.api_endpoint = endpoint.trim().to_string();
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token.trim().to_string());
        }
    }

    /// Reject settings the rest of the crate cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let endpoint = self.api_endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(crate::Error::Config(format!(
                "api_endpoint must be an http(s) URL, got {:?}",
                self.api_endpoint
            )));
        }
        if self.page_size == 0 {
            return Err(crate::Error::Config("page_size must be at least 1".into()));
        }
        if self.words_per_minute == 0 {
            return Err(crate::Error::Config(
                "words_per_minute must be at least 1".into(),
            ));
        }
        if self.post_type.trim().is_empty() {
            return Err(crate::Error::Config("post_type must not be empty".into()));
        }
        Ok(())
    }

    /// Repository name derived from the endpoint host
    ///
    /// `https://my-blog.cdn.prismic.io/api/v2` -> `my-blog`
    pub fn repository_name(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.api_endpoint).ok()?;
        let host = url.host_str()?;
        host.split('.')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
