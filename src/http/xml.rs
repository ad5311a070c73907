//! Minimal XML element extraction for REST-XML responses
//!
//! Only flat element lookup is supported: no namespaces, attributes,
//! CDATA or nesting of an element inside one of the same name.

/// Bodies of every `<tag>...</tag>` element, in document order.
///
/// Self-closing elements yield an empty body.
pub(crate) fn elements<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut found = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find(&open) {
        let after = &rest[start + open.len()..];

        // `<Bucket` must not match `<Buckets>`
        if !after.starts_with(|c: char| c == '>' || c == '/' || c.is_whitespace()) {
            rest = after;
            continue;
        }

        let Some(end) = after.find('>') else {
            break;
        };
        if after[..end].ends_with('/') {
            found.push("");
            rest = &after[end + 1..];
            continue;
        }

        let body = &after[end + 1..];
        let Some(stop) = body.find(&close) else {
            break;
        };
        found.push(&body[..stop]);
        rest = &body[stop + close.len()..];
    }

    found
}

/// Unescaped, trimmed text of the first `<tag>` element
pub(crate) fn element_text(xml: &str, tag: &str) -> Option<String> {
    elements(xml, tag)
        .first()
        .map(|body| unescape(body.trim()))
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
