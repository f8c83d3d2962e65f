//! Built-in theme templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::PostSummary;
use crate::detail::DetailView;
use crate::error::Result;
use crate::helpers::{html_escape, Locale};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // CMS text is untrusted; keep autoescaping on, but leave `/` alone in URLs
        tera.autoescape_on(vec![".html"]);
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post_cards.html", include_str!("theme/post_cards.html")),
            ("post.html", include_str!("theme/post.html")),
            ("loading.html", include_str!("theme/loading.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            ("error.html", include_str!("theme/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("theme/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Listing page
    pub fn render_index(
        &self,
        site: &SiteData,
        posts: &[PostSummary],
        load_more: &LoadMore,
    ) -> Result<String> {
        let mut context = base_context(site);
        context.insert("posts", posts);
        context.insert("load_more", load_more);
        self.render("index.html", &context)
    }

    /// Post cards only, for appending to an already rendered listing
    pub fn render_post_cards(&self, site: &SiteData, posts: &[PostSummary]) -> Result<String> {
        let mut context = base_context(site);
        context.insert("posts", posts);
        self.render("post_cards.html", &context)
    }

    /// Post page in whatever state it is in
    pub fn render_detail(&self, site: &SiteData, view: &DetailView) -> Result<String> {
        let mut context = base_context(site);
        match view {
            DetailView::Loading => self.render("loading.html", &context),
            DetailView::Ready(post) => {
                context.insert("post", post.as_ref());
                self.render("post.html", &context)
            }
            DetailView::NotFound { uid } => {
                context.insert("uid", uid);
                self.render("not_found.html", &context)
            }
        }
    }

    /// Failure page with an optional retry link
    pub fn render_error(
        &self,
        site: &SiteData,
        message: Option<&str>,
        retry_href: Option<&str>,
    ) -> Result<String> {
        let mut context = base_context(site);
        context.insert("message", &message);
        context.insert("retry_href", &retry_href);
        self.render("error.html", &context)
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

fn base_context(site: &SiteData) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    context.insert("labels", &Labels::for_locale(site.locale));
    context
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(crate::helpers::truncate(
        &s,
        length,
        Some("..."),
    )))
}

/// Site-wide template data
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub lang: String,
    pub version: String,
    #[serde(skip)]
    pub locale: Locale,
}

impl SiteData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            lang: config.locale.tag().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            locale: config.locale,
        }
    }
}

/// How the listing offers the next page
///
/// Generated sites link to the next accumulated page; the server hands the
/// cursor to the browser, which fetches the next page itself. Both unset
/// means the feed is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadMore {
    pub href: Option<String>,
    pub cursor: Option<String>,
}

impl LoadMore {
    pub fn link(href: Option<String>) -> Self {
        Self { href, cursor: None }
    }

    pub fn fetch(cursor: Option<String>) -> Self {
        Self { href: None, cursor }
    }

    pub fn is_offered(&self) -> bool {
        self.href.is_some() || self.cursor.is_some()
    }
}

/// Interface strings
#[derive(Debug, Clone, Serialize)]
pub struct Labels {
    pub load_more: &'static str,
    pub loading: &'static str,
    pub not_found: &'static str,
    pub back_home: &'static str,
    pub load_failed: &'static str,
    pub retry: &'static str,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::PtBr => Self {
                load_more: "Carregar mais posts",
                loading: "Carregando...",
                not_found: "Post não encontrado",
                back_home: "Voltar para o início",
                load_failed: "Não foi possível carregar os posts",
                retry: "Tentar novamente",
            },
            Locale::En => Self {
                load_more: "Load more posts",
                loading: "Loading...",
                not_found: "Post not found",
                back_home: "Back to home",
                load_failed: "Could not load posts",
                retry: "Try again",
            },
        }
    }
}
