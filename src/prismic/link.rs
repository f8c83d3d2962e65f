//! Document link resolution

use crate::helpers::post_path;

/// The closed set of document kinds the site knows how to route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Homepage,
    Posts,
    Post { uid: String },
    /// Any other custom type; has no page on this site
    Other(String),
}

impl DocumentKind {
    /// Classify a document from its API `type` and `uid`
    pub fn from_parts(doc_type: &str, uid: Option<&str>) -> Self {
        match (doc_type, uid) {
            ("homepage", _) => DocumentKind::Homepage,
            ("posts", _) => DocumentKind::Posts,
            ("post", Some(uid)) if !uid.is_empty() => DocumentKind::Post {
                uid: uid.to_string(),
            },
            (other, _) => DocumentKind::Other(other.to_string()),
        }
    }
}

/// Site path for a document, `None` when it has no page
pub fn resolve_link(kind: &DocumentKind) -> Option<String> {
    match kind {
        DocumentKind::Homepage => Some("/".to_string()),
        DocumentKind::Posts => Some("/posts".to_string()),
        DocumentKind::Post { uid } => Some(post_path(uid)),
        DocumentKind::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_kinds() {
        assert_eq!(
            resolve_link(&DocumentKind::from_parts("homepage", None)).as_deref(),
            Some("/")
        );
        assert_eq!(
            resolve_link(&DocumentKind::from_parts("posts", None)).as_deref(),
            Some("/posts")
        );
        assert_eq!(
            resolve_link(&DocumentKind::from_parts("post", Some("hello"))).as_deref(),
            Some("/post/hello")
        );
    }

    #[test]
    fn test_unknown_kind_has_no_path() {
        assert_eq!(resolve_link(&DocumentKind::from_parts("author", Some("x"))), None);
        // A post without uid cannot be routed either
        assert_eq!(
            DocumentKind::from_parts("post", None),
            DocumentKind::Other("post".to_string())
        );
    }
}
