//! Turning markup into nodes with `html_parser`.

use html_parser::{Dom, Node as HtmlNode};

use crate::escape::unescape;
use crate::{DomError, DomResult, ElementNode, NodeType, TextNode};

/// A parsed, not yet inserted, piece of markup.
///
/// Parsing is separated from insertion so callers can validate markup up front and only touch the document once
/// everything parsed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFragment {
    pub(crate) roots: Vec<ParsedNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedNode {
    pub(crate) value: NodeType,
    pub(crate) children: Vec<ParsedNode>,
}

impl ParsedNode {
    fn text(text: impl Into<String>) -> Self {
        Self {
            value: NodeType::Text(TextNode::new(text.into())),
            children: Vec::new(),
        }
    }
}

impl ParsedFragment {
    /// Parse a fragment of markup.
    ///
    /// Whitespace between elements is kept as text nodes, so the fragment serializes back to what was parsed. Markup
    /// the parser could not make sense of is an error, even where `html_parser` would fall back to reading it as text.
    pub fn parse(markup: &str) -> DomResult<Self> {
        if markup.is_empty() {
            return Ok(Self::default());
        }
        if markup.trim().is_empty() {
            return Ok(Self {
                roots: vec![ParsedNode::text(markup)],
            });
        }

        let dom = Dom::parse(markup)?;
        if let Some(err) = dom.errors.first() {
            return Err(DomError::Parse(err.clone()));
        }

        let roots = convert_children(&dom.children, markup, false)?;
        Ok(Self { roots })
    }

    /// The number of top level nodes in the fragment
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the fragment has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Convert `children`, which were parsed from `source`, putting back the whitespace-only text `html_parser` drops.
fn convert_children(children: &[HtmlNode], source: &str, raw_text: bool) -> DomResult<Vec<ParsedNode>> {
    let mut nodes = Vec::with_capacity(children.len());
    let mut cursor = 0;

    for child in children {
        if let Some((offset, len)) = locate(child, &source[cursor..]) {
            push_whitespace(&mut nodes, &source[cursor..cursor + offset]);
            cursor += offset + len;
        }
        if let Some(node) = convert(child, raw_text)? {
            nodes.push(node);
        }
    }
    push_whitespace(&mut nodes, &source[cursor..]);

    Ok(nodes)
}

fn push_whitespace(nodes: &mut Vec<ParsedNode>, gap: &str) {
    if !gap.is_empty() && gap.trim().is_empty() {
        nodes.push(ParsedNode::text(gap));
    }
}

/// Where `node` starts in `rest` and how many bytes of source it spans.
fn locate(node: &HtmlNode, rest: &str) -> Option<(usize, usize)> {
    match node {
        HtmlNode::Text(text) => rest.find(text.as_str()).map(|at| (at, text.len())),
        HtmlNode::Element(el) => {
            let source = el.source_span.text.as_str();
            rest.find(source).map(|at| (at, source.len()))
        }
        HtmlNode::Comment(body) => {
            let start = rest.find("<!")?;
            let body_end = start + rest[start..].find(body.as_str())? + body.len();
            let end = body_end + rest[body_end..].find("-->")? + 3;
            Some((start, end - start))
        }
    }
}

/// The source between an element's start tag and its end tag.
fn inner_source(source: &str) -> &str {
    let mut quote = None;
    let mut start = source.len();
    for (at, c) in source.char_indices().skip(1) {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => {
                start = at + 1;
                break;
            }
            (None, _) => {}
        }
    }

    match source.rfind("</") {
        Some(end) if end >= start => &source[start..end],
        _ => "",
    }
}

fn is_raw_text_element(name: &str) -> bool {
    ["script", "style", "title", "textarea"]
        .iter()
        .any(|raw| name.eq_ignore_ascii_case(raw))
}

fn convert(node: &HtmlNode, raw_text: bool) -> DomResult<Option<ParsedNode>> {
    match node {
        // html_parser reads markup it cannot match as an element as plain text
        HtmlNode::Text(text) if !raw_text && text.contains('<') => Err(DomError::Parse(format!(
            "unexpected markup in text {text:?}"
        ))),

        HtmlNode::Text(text) => Ok(Some(ParsedNode::text(unescape(text)))),

        HtmlNode::Element(el) => {
            let mut element = ElementNode::new(el.name.clone());

            // html_parser pulls `id` and `class` out of the attribute map
            if let Some(id) = &el.id {
                element.set_attribute("id", unescape(id));
            }
            if !el.classes.is_empty() {
                element.set_attribute("class", unescape(&el.classes.join(" ")));
            }

            let mut attributes: Vec<_> = el.attributes.iter().collect();
            attributes.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in attributes {
                let value = value.as_deref().map(unescape).unwrap_or_default();
                element.set_attribute(name.clone(), value);
            }

            let children = convert_children(
                &el.children,
                inner_source(&el.source_span.text),
                is_raw_text_element(&el.name),
            )?;

            Ok(Some(ParsedNode {
                value: NodeType::Element(element),
                children,
            }))
        }

        // We ignore comments
        HtmlNode::Comment(_) => Ok(None),
    }
}
