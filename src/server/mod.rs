//! HTTP server rendering pages from the content API on each request

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::detail::{DetailRenderer, DetailView};
use crate::error::{Error, ErrorKind};
use crate::feed::FeedAssembler;
use crate::helpers::Helpers;
use crate::prismic::{ClientConfig, ContentClientFactory, ContentSource, RequestContext};
use crate::templates::{LoadMore, SiteData, TemplateRenderer};
use crate::Blog;

/// Hands out a content source per inbound request
pub trait SourceProvider: Send + Sync {
    fn source(&self, config: ClientConfig) -> Arc<dyn ContentSource>;
}

impl SourceProvider for ContentClientFactory {
    fn source(&self, config: ClientConfig) -> Arc<dyn ContentSource> {
        Arc::new(self.client(config))
    }
}

/// Server state
struct ServerState {
    config: SiteConfig,
    provider: Box<dyn SourceProvider>,
    renderer: TemplateRenderer,
    detail: DetailRenderer,
    site: SiteData,
}

impl ServerState {
    fn source(&self, headers: &HeaderMap) -> Arc<dyn ContentSource> {
        let request = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(RequestContext::from_cookie_header)
            .unwrap_or_default();
        self.provider.source(ClientConfig {
            request: Some(request),
        })
    }

    fn helpers(&self) -> Helpers {
        Helpers::new(&self.config)
    }

    /// Status for a failed fetch
    fn failure_status(&self, err: &Error) -> StatusCode {
        match err.kind() {
            ErrorKind::NotFoundError => StatusCode::NOT_FOUND,
            _ if matches!(err, Error::InvalidCursor(_)) => StatusCode::BAD_REQUEST,
            _ if err.is_recoverable(self.config.strict_schema) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTML error page; recoverable failures get a retry link
    fn error_page(&self, err: &Error, retry_href: &str) -> Response {
        let status = self.failure_status(err);
        tracing::error!("Request failed ({}): {}", status, err);

        let retry = err
            .is_recoverable(self.config.strict_schema)
            .then_some(retry_href);
        // Upstream details are only shown while developing
        let message = self.config.strict_schema.then(|| err.to_string());
        match self
            .renderer
            .render_error(&self.site, message.as_deref(), retry)
        {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => plain_error(e),
        }
    }
}

fn plain_error(err: Error) -> Response {
    tracing::error!("Failed to render error page: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

/// Build the application router
fn router(config: SiteConfig, provider: Box<dyn SourceProvider>) -> crate::Result<Router> {
    let state = Arc::new(ServerState {
        renderer: TemplateRenderer::new()?,
        detail: DetailRenderer::new(&config),
        site: SiteData::new(&config),
        config,
        provider,
    });

    Ok(Router::new()
        .route("/", get(list_handler))
        .route("/posts", get(list_handler))
        .route("/post/:slug", get(post_handler))
        .route("/api/posts/more", get(more_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let factory = blog.client_factory()?;
    let app = router(blog.config.clone(), Box::new(factory))?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// First page of the feed
async fn list_handler(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let source = state.source(&headers);
    let config = &state.config;

    let feed = match FeedAssembler::fetch_first(
        source.as_ref(),
        &config.post_type,
        config.page_size,
        state.helpers(),
    )
    .await
    {
        Ok(feed) => feed,
        Err(e) => return state.error_page(&e, "/"),
    };

    let load_more = LoadMore::fetch(feed.cursor().map(str::to_string));
    match state
        .renderer
        .render_index(&state.site, feed.posts(), &load_more)
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => plain_error(e),
    }
}

/// Single post
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let source = state.source(&headers);
    let outcome = source.get_by_uid(&state.config.post_type, &slug).await;

    let view = match DetailView::loading().resolve(outcome, &state.detail) {
        Ok(view) => view,
        Err(e) => return state.error_page(&e, &crate::helpers::post_path(&slug)),
    };

    let status = match view {
        DetailView::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    match state.renderer.render_detail(&state.site, &view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => plain_error(e),
    }
}

#[derive(Debug, Deserialize)]
struct MoreParams {
    cursor: Option<String>,
}

/// Response of the load-more endpoint
#[derive(Debug, Serialize, Deserialize)]
struct MoreResponse {
    /// Post cards to append to the list
    html: String,
    next_page: Option<String>,
}

#[derive(Debug, Serialize)]
struct MoreError {
    error: String,
    retry: bool,
}

/// Next page of post cards for the browser's load-more button
async fn more_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<MoreParams>,
    headers: HeaderMap,
) -> Response {
    let Some(cursor) = params.cursor.filter(|c| !c.is_empty()) else {
        return more_error(&state, &Error::InvalidCursor("missing cursor".to_string()));
    };

    let source = state.source(&headers);
    let mut feed = FeedAssembler::resume(Some(cursor), state.helpers());
    if let Err(e) = feed.load_more(source.as_ref()).await {
        return more_error(&state, &e);
    }

    let (posts, next_page) = feed.into_parts();
    match state.renderer.render_post_cards(&state.site, &posts) {
        Ok(html) => Json(MoreResponse { html, next_page }).into_response(),
        Err(e) => plain_error(e),
    }
}

fn more_error(state: &ServerState, err: &Error) -> Response {
    let status = state.failure_status(err);
    tracing::warn!("Load more failed ({}): {}", status, err);
    let body = MoreError {
        error: err.to_string(),
        retry: status == StatusCode::BAD_GATEWAY,
    };
    (status, Json(body)).into_response()
}

async fn fallback_handler(State(state): State<Arc<ServerState>>) -> Response {
    let view = DetailView::NotFound { uid: String::new() };
    match state.renderer.render_detail(&state.site, &view) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => plain_error(e),
    }
}
