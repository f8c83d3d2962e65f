//! Rich text to HTML
//!
//! Content comes from the CMS and is treated as untrusted: every piece of
//! text is escaped and only a fixed set of tags is produced.

use crate::content::{RichTextSegment, Span};
use crate::helpers::{html_escape, is_safe_href};
use crate::prismic::{resolve_link, DocumentKind};

/// Render a sequence of rich-text segments
pub fn render_rich_text(segments: &[RichTextSegment]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for segment in segments {
        let list = match segment.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };
        if open_list != list {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list;
        }
        html.push_str(&render_segment(segment));
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }
    html
}

fn render_segment(segment: &RichTextSegment) -> String {
    let tag = match segment.kind.as_str() {
        "heading1" => "h1",
        "heading2" => "h2",
        "heading3" => "h3",
        "heading4" => "h4",
        "heading5" => "h5",
        "heading6" => "h6",
        "preformatted" => "pre",
        "list-item" | "o-list-item" => "li",
        "image" => return render_image(segment),
        "embed" => return String::new(),
        _ => "p",
    };
    format!(
        "<{tag}>{}</{tag}>",
        render_inline(&segment.text, &segment.spans),
        tag = tag
    )
}

fn render_image(segment: &RichTextSegment) -> String {
    match segment.url.as_deref() {
        Some(url) if is_safe_href(url) => format!(
            r#"<img src="{}" alt="{}">"#,
            html_escape(url),
            html_escape(segment.alt.as_deref().unwrap_or(""))
        ),
        _ => String::new(),
    }
}

/// Span bounds in char indices
struct Bounds<'a> {
    start: usize,
    end: usize,
    span: &'a Span,
}

/// Render text with its spans; overlapping spans are split so tags nest
///
/// Span offsets count UTF-16 code units.
fn render_inline(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    // UTF-16 offset at which each char starts
    let starts: Vec<usize> = chars
        .iter()
        .scan(0, |offset, c| {
            let start = *offset;
            *offset += c.len_utf16();
            Some(start)
        })
        .collect();
    let to_char = |offset: usize| starts.partition_point(|&start| start < offset);

    let mut spans: Vec<Bounds> = spans
        .iter()
        .map(|span| Bounds {
            start: to_char(span.start),
            end: to_char(span.end),
            span,
        })
        .filter(|b| b.start < b.end)
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut cuts: Vec<usize> = vec![0, len];
    for bounds in &spans {
        cuts.push(bounds.start);
        cuts.push(bounds.end);
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut out = String::with_capacity(text.len());
    for window in cuts.windows(2) {
        let (from, to) = (window[0], window[1]);
        let piece: String = chars[from..to].iter().collect();
        let mut piece = html_escape(&piece).replace('\n', "<br />");

        for bounds in spans
            .iter()
            .rev()
            .filter(|b| b.start <= from && b.end >= to)
        {
            if let Some((open, close)) = span_tags(bounds.span) {
                piece = format!("{}{}{}", open, piece, close);
            }
        }
        out.push_str(&piece);
    }
    out
}

fn span_tags(span: &Span) -> Option<(String, String)> {
    match span.kind.as_str() {
        "strong" => Some(("<strong>".into(), "</strong>".into())),
        "em" => Some(("<em>".into(), "</em>".into())),
        "hyperlink" => {
            let data = span.data.as_ref()?;
            let (href, external) = match data.link_type.as_deref() {
                Some("Document") => {
                    let kind = DocumentKind::from_parts(
                        data.doc_type.as_deref().unwrap_or(""),
                        data.uid.as_deref(),
                    );
                    (resolve_link(&kind)?, false)
                }
                _ => (data.url.clone()?, true),
            };
            if !is_safe_href(&href) {
                tracing::debug!("Dropping unsafe link target {:?}", href);
                return None;
            }
            let attrs = if external && !href.starts_with('/') {
                r#" target="_blank" rel="noopener noreferrer""#
            } else {
                ""
            };
            Some((
                format!(r#"<a href="{}"{}>"#, html_escape(&href), attrs),
                "</a>".into(),
            ))
        }
        "label" => {
            let label: String = span
                .data
                .as_ref()
                .and_then(|d| d.label.as_deref())
                .unwrap_or("")
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            Some((format!(r#"<span class="{}">"#, label), "</span>".into()))
        }
        _ => None,
    }
}
