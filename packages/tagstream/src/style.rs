use convert_case::{Case, Casing};

/// Serialize CSS properties into an inline `style` attribute value.
///
/// Property names may be written in camel case (`backgroundColor`) and are rewritten to their hyphenated form. A
/// leading capital marks a vendor prefix (`WebkitTransition` becomes `-webkit-transition`). Names that already contain
/// a hyphen are kept as they are.
///
/// ```rust
/// use tagstream::inline_style;
///
/// let style = inline_style([("backgroundColor", "red"), ("margin-top", "4px")]);
/// assert_eq!(style, "background-color:red;margin-top:4px;");
/// ```
pub fn inline_style<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    for (name, value) in properties {
        out.push_str(&css_property(name.as_ref()));
        out.push(':');
        out.push_str(value.as_ref());
        out.push(';');
    }
    out
}

fn css_property(name: &str) -> String {
    if name.contains('-') {
        return name.to_string();
    }

    let hyphenated = name.to_case(Case::Kebab);
    match name.starts_with(|c: char| c.is_ascii_uppercase()) {
        true => format!("-{hyphenated}"),
        false => hyphenated,
    }
}
