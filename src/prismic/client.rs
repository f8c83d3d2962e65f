//! Prismic REST API v2 client

use reqwest::{Client, ClientBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::ContentSource;
use crate::config::SiteConfig;
use crate::content::{FeedPage, PostDocument};
use crate::error::{Error, Result};
use crate::helpers::decode_url;

/// Cookie set by the Prismic toolbar while previewing a release or draft
pub const PREVIEW_COOKIE: &str = "io.prismic.preview";

/// `GET {endpoint}` response, reduced to what we use
#[derive(Debug, Deserialize)]
struct ApiInfo {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// `documents/search` response, reduced to the result list
#[derive(Debug, Deserialize)]
struct SearchResults<T> {
    results: Vec<T>,
}

/// Inbound request details used for preview-aware fetches
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cookies: HashMap<String, String>,
}

impl RequestContext {
    /// Build from a raw `Cookie` header (`a=b; c=d`)
    pub fn from_cookie_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { cookies }
    }

    /// Preview ref from the preview cookie, if any
    ///
    /// The toolbar stores either the bare ref or a JSON object keyed by
    /// repository host: `{"repo.prismic.io":{"preview":"<ref>"}}`.
    pub fn preview_ref(&self, repository: Option<&str>) -> Option<String> {
        let raw = decode_url(self.cookies.get(PREVIEW_COOKIE)?);
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if !raw.starts_with('{') {
            return Some(raw.to_string());
        }

        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        let object = value.as_object()?;
        let entry = match repository {
            Some(repo) => object
                .iter()
                .find(|(host, _)| host.split('.').next() == Some(repo))
                .map(|(_, v)| v),
            None => object.values().next(),
        }?;
        entry
            .get("preview")
            .and_then(|p| p.as_str())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }
}

/// Per-client options
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Inbound request; enables preview fetches when it carries the preview cookie
    pub request: Option<RequestContext>,
}

/// Produces clients bound to the configured repository
#[derive(Debug, Clone)]
pub struct ContentClientFactory {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
    repository: Option<String>,
}

impl ContentClientFactory {
    /// Build the shared HTTP client from the site configuration
    pub fn new(config: &SiteConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Url::parse(config.api_endpoint.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid api_endpoint: {}", e)))?;

        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("prismic-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone(),
            repository: config.repository_name(),
        })
    }

    /// Create a client, honoring preview cookies from the inbound request
    pub fn client(&self, config: ClientConfig) -> PrismicClient {
        let preview_ref = config
            .request
            .as_ref()
            .and_then(|req| req.preview_ref(self.repository.as_deref()));
        if preview_ref.is_some() {
            tracing::debug!("Preview ref found, bypassing master ref");
        }

        PrismicClient {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            access_token: self.access_token.clone(),
            preview_ref,
            master_ref: OnceCell::new(),
        }
    }
}

/// Client for one repository, resolving the content ref lazily
#[derive(Debug)]
pub struct PrismicClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
    preview_ref: Option<String>,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    /// Ref used for queries: preview ref if set, otherwise the master ref
    async fn reference(&self) -> Result<String> {
        if let Some(preview) = &self.preview_ref {
            return Ok(preview.clone());
        }
        let master = self
            .master_ref
            .get_or_try_init(|| self.fetch_master_ref())
            .await?;
        Ok(master.clone())
    }

    async fn fetch_master_ref(&self) -> Result<String> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        let info: ApiInfo = self.get_json(url).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| Error::Schema("API response has no master ref".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", redact(&url));
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: redact(&url),
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn search<T: DeserializeOwned>(&self, predicate: &str, page_size: usize) -> Result<T> {
        let reference = self.reference().await?;
        let url = search_url(
            &self.endpoint,
            &reference,
            predicate,
            page_size,
            self.access_token.as_deref(),
        );
        self.get_json(url).await
    }
}

#[async_trait::async_trait]
impl ContentSource for PrismicClient {
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<FeedPage> {
        let predicate = format!(r#"[[at(document.type,"{}")]]"#, doc_type);
        self.search(&predicate, page_size).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<PostDocument> {
        let not_found = || Error::NotFound {
            doc_type: doc_type.to_string(),
            uid: uid.to_string(),
        };
        if uid.is_empty() || uid.contains(['"', '\\', ']']) {
            return Err(not_found());
        }

        let predicate = format!(r#"[[at(my.{}.uid,"{}")]]"#, doc_type, uid);
        let found: SearchResults<PostDocument> = self.search(&predicate, 1).await?;
        found.results.into_iter().next().ok_or_else(not_found)
    }

    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage> {
        let url = validate_cursor(&self.endpoint, cursor)?;
        self.get_json(url).await
    }
}

/// Build a `documents/search` URL
fn search_url(
    endpoint: &Url,
    reference: &str,
    predicate: &str,
    page_size: usize,
    access_token: Option<&str>,
) -> Url {
    let mut url = endpoint.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["documents", "search"]);
    }
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("ref", reference)
            .append_pair("q", predicate)
            .append_pair("pageSize", &page_size.to_string());
        if let Some(token) = access_token {
            query.append_pair("access_token", token);
        }
    }
    url
}

/// Accept only cursors on the same origin and under the API path
pub fn validate_cursor(endpoint: &Url, cursor: &str) -> Result<Url> {
    let url = Url::parse(cursor).map_err(|_| Error::InvalidCursor(cursor.to_string()))?;
    let same_origin = url.scheme() == endpoint.scheme()
        && url.host_str() == endpoint.host_str()
        && url.port_or_known_default() == endpoint.port_or_known_default();
    if !same_origin || !url.path().starts_with(endpoint.path()) {
        return Err(Error::InvalidCursor(cursor.to_string()));
    }
    Ok(url)
}

/// URL for logs, without the access token
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return shown.to_string();
    }
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("https://spacetraveling.cdn.prismic.io/api/v2").unwrap()
    }

    #[test]
    fn test_search_url() {
        let url = search_url(
            &endpoint(),
            "YZ123",
            r#"[[at(document.type,"post")]]"#,
            1,
            Some("tok"),
        );
        assert_eq!(url.path(), "/api/v2/documents/search");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["ref"], "YZ123");
        assert_eq!(pairs["q"], r#"[[at(document.type,"post")]]"#);
        assert_eq!(pairs["pageSize"], "1");
        assert_eq!(pairs["access_token"], "tok");
    }

    #[test]
    fn test_validate_cursor() {
        let ok = "https://spacetraveling.cdn.prismic.io/api/v2/documents/search?ref=X&page=2";
        assert!(validate_cursor(&endpoint(), ok).is_ok());

        let other_host = "https://evil.example.com/api/v2/documents/search?page=2";
        assert!(matches!(
            validate_cursor(&endpoint(), other_host),
            Err(Error::InvalidCursor(_))
        ));

        let other_scheme = "http://spacetraveling.cdn.prismic.io/api/v2/documents/search";
        assert!(validate_cursor(&endpoint(), other_scheme).is_err());

        let other_path = "https://spacetraveling.cdn.prismic.io/admin";
        assert!(validate_cursor(&endpoint(), other_path).is_err());

        assert!(validate_cursor(&endpoint(), "not a url").is_err());
    }

    #[test]
    fn test_redact() {
        let url = Url::parse("https://x.prismic.io/api/v2?access_token=secret&ref=R").unwrap();
        let shown = redact(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("ref=R"));
    }

    #[test]
    fn test_preview_ref_plain() {
        let ctx = RequestContext::from_cookie_header("theme=dark; io.prismic.preview=REF123");
        assert_eq!(ctx.preview_ref(None).as_deref(), Some("REF123"));
    }

    #[test]
    fn test_preview_ref_json() {
        let json = r#"{"spacetraveling.prismic.io":{"preview":"https://spacetraveling.prismic.io/previews/abc"}}"#;
        let header = format!("{}={}", PREVIEW_COOKIE, crate::helpers::encode_url(json));
        let ctx = RequestContext::from_cookie_header(&header);
        assert_eq!(
            ctx.preview_ref(Some("spacetraveling")).as_deref(),
            Some("https://spacetraveling.prismic.io/previews/abc")
        );
        assert_eq!(ctx.preview_ref(Some("other-repo")), None);
    }

    #[test]
    fn test_no_preview_cookie() {
        let ctx = RequestContext::from_cookie_header("session=1");
        assert_eq!(ctx.preview_ref(None), None);
        assert_eq!(RequestContext::default().preview_ref(None), None);
    }

    #[test]
    fn test_factory_applies_preview() {
        let mut config = SiteConfig::default();
        config.api_endpoint = "https://spacetraveling.cdn.prismic.io/api/v2".to_string();
        let factory = ContentClientFactory::new(&config).unwrap();

        let plain = factory.client(ClientConfig::default());
        assert!(plain.preview_ref.is_none());

        let request = RequestContext::from_cookie_header("io.prismic.preview=R1");
        let preview = factory.client(ClientConfig {
            request: Some(request),
        });
        assert_eq!(preview.preview_ref.as_deref(), Some("R1"));
    }

    #[test]
    fn test_factory_rejects_bad_config() {
        let mut config = SiteConfig::default();
        config.page_size = 0;
        assert!(matches!(
            ContentClientFactory::new(&config),
            Err(Error::Config(_))
        ));
    }
}
