//! HTML escaping.

use std::borrow::Cow;

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape an attribute value. Same character set as [`escape`].
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Insert `snippet` before the last `</body>`, or append it when there is none.
pub fn inject_before_body_end(content: &[u8], snippet: &[u8]) -> Vec<u8> {
    const PATTERN: &[u8] = b"</body>";

    let mut result = Vec::with_capacity(content.len() + snippet.len());
    match content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        Some(pos) => {
            result.extend_from_slice(&content[..pos]);
            result.extend_from_slice(snippet);
            result.extend_from_slice(&content[pos..]);
        }
        None => {
            result.extend_from_slice(content);
            result.extend_from_slice(snippet);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("\"q\" 'x'"), "&quot;q&quot; &#39;x&#39;");
        assert!(matches!(escape("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_inject_before_body_end() {
        let out = inject_before_body_end(b"<html><body>x</BODY></html>", b"<s/>");
        assert_eq!(out, b"<html><body>x<s/></BODY></html>");
    }

    #[test]
    fn test_inject_last_body_wins() {
        let out = inject_before_body_end(b"<pre></body></pre></body>", b"!");
        assert_eq!(out, b"<pre></body></pre>!</body>");
    }

    #[test]
    fn test_inject_without_body() {
        assert_eq!(inject_before_body_end(b"<p>x</p>", b"!"), b"<p>x</p>!");
    }
}
