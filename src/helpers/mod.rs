//! Helper functions for views
//!
//! Date formatting, HTML escaping and URL building shared by the feed,
//! the detail renderer and the templates.

mod date;
mod html;
mod url;

use chrono::{DateTime, FixedOffset};

pub use date::*;
pub use html::*;
pub use url::*;

use crate::config::SiteConfig;

/// Display helpers bound to the site configuration
#[derive(Debug, Clone)]
pub struct Helpers {
    date_format: String,
    locale: Locale,
    unpublished_label: String,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            locale: config.locale,
            unpublished_label: config.unpublished_label.clone(),
        }
    }

    /// Format a publication date, or the unpublished label when absent
    pub fn publication_date(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        format_publication_date(date, &self.date_format, self.locale, &self.unpublished_label)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Default for Helpers {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}
