//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Encode a value for use in a query string or path segment
pub fn encode_url(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Decode a percent-encoded value (cookie values, path segments)
pub fn decode_url(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Site path of a post detail page
///
/// # Examples
/// ```ignore
/// post_path("my-first-post") // -> "/post/my-first-post"
/// ```
pub fn post_path(uid: &str) -> String {
    format!("/post/{}", utf8_percent_encode(uid, SEGMENT))
}

/// Path of the accumulated listing page `n` in a generated site
pub fn page_path(n: usize) -> String {
    if n <= 1 {
        "/".to_string()
    } else {
        format!("/page/{}/", n)
    }
}
