//! Markup escaping shared by the stream builder and the document serializer.

use std::borrow::Cow;

/// Which characters [`escape`] replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum EscapeMode {
    /// Escape `<`, `>`, `"` and `'`. Existing character references such as `&nbsp;` pass through.
    Standard,

    /// Escape `&` as well, so every byte of the input survives a round trip through a parser.
    #[default]
    Strict,
}

/// Escape `text` for use in an attribute value or a text position.
///
/// Escaping is a single pass: running it twice over the same input in [`EscapeMode::Strict`] escapes the
/// ampersands introduced by the first pass. The output only borrows when nothing had to be replaced.
///
/// ```rust
/// use tagstream_dom::{escape, EscapeMode};
///
/// assert_eq!(escape("a < b", EscapeMode::Strict), "a &lt; b");
/// assert_eq!(escape("&nbsp;", EscapeMode::Standard), "&nbsp;");
/// assert_eq!(escape("&nbsp;", EscapeMode::Strict), "&amp;nbsp;");
/// ```
pub fn escape(text: &str, mode: EscapeMode) -> Cow<'_, str> {
    let needs_escape = |c: char| match c {
        '<' | '>' | '"' | '\'' => true,
        '&' => mode == EscapeMode::Strict,
        _ => false,
    };

    let Some(first) = text.find(needs_escape) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '&' if mode == EscapeMode::Strict => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode the character references [`escape`] produces, plus their named/hex spellings.
///
/// Unknown references are kept verbatim.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = REFERENCES
            .iter()
            .find(|(reference, _)| rest.starts_with(reference));

        match decoded {
            Some((reference, c)) => {
                out.push(*c);
                rest = &rest[reference.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

const REFERENCES: &[(&str, char)] = &[
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&#34;", '"'),
    ("&#39;", '\''),
    ("&#x27;", '\''),
    ("&#60;", '<'),
    ("&#62;", '>'),
];

/// Elements that never have content or an end tag.
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_escapes_every_special_character() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#, EscapeMode::Strict),
            "&lt;a href=&#34;x&#34;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn standard_leaves_ampersands() {
        assert_eq!(escape("Tom & <Jerry>", EscapeMode::Standard), "Tom & &lt;Jerry&gt;");
    }

    #[test]
    fn clean_input_is_borrowed() {
        assert!(matches!(escape("plain text", EscapeMode::Strict), Cow::Borrowed(_)));
    }

    #[test]
    fn escaping_is_single_pass() {
        let once = escape("&", EscapeMode::Strict).into_owned();
        assert_eq!(once, "&amp;");
        assert_eq!(escape(&once, EscapeMode::Strict), "&amp;amp;");
    }

    #[test]
    fn unescape_reverses_strict_escape() {
        let input = r#"<p class="x">it's & more</p>"#;
        let escaped = escape(input, EscapeMode::Strict);
        assert_eq!(unescape(&escaped), input);
    }

    #[test]
    fn unescape_keeps_unknown_references() {
        assert_eq!(unescape("a &nbsp; b &amp; c"), "a &nbsp; b & c");
        assert_eq!(unescape("trailing &"), "trailing &");
    }
}
