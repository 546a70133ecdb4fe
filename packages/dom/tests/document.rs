use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use tagstream_dom::{Document, DomError, EventKind, NodeType};

#[test]
fn inserted_markup_serializes_back() {
    let mut doc = Document::new();
    let body = doc.root();
    let markup = r#"<div id="id0"><p class="cls" id="id1"><span id="id2">Hi</span><a href="http://x" id="id3"></a></p></div>"#;

    let roots = doc.insert_html(body, markup).unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(doc.tag_name(roots[0]), Some("div"));

    let span = doc.element_by_id("id2").unwrap();
    assert_eq!(doc.text_content(span), "Hi");
    assert_eq!(doc.attribute(doc.element_by_id("id3").unwrap(), "href"), Some("http://x"));
    assert!(doc.has_class(doc.element_by_id("id1").unwrap(), "cls"));
}

#[test]
fn serializer_escapes_and_closes_void_elements() {
    let mut doc = Document::new();
    let p = doc.create_element("p");
    doc.set_attribute(p, "title", "say \"hi\"").unwrap();
    let text = doc.create_text("<b>&</b>");
    let img = doc.create_element("img");
    doc.set_attribute(img, "src", "a.png").unwrap();

    doc.append_child(doc.root(), p).unwrap();
    doc.append_child(p, text).unwrap();
    doc.append_child(p, img).unwrap();

    assert_eq!(
        doc.inner_html(doc.root()),
        r#"<p title="say &#34;hi&#34;">&lt;b&gt;&amp;&lt;/b&gt;<img src="a.png"/></p>"#
    );
    assert_eq!(
        doc.outer_html(doc.root()),
        format!("<body>{}</body>", doc.inner_html(doc.root()))
    );
}

#[test]
fn escaped_markup_round_trips_through_the_parser() {
    let mut doc = Document::new();
    let body = doc.root();
    let roots = doc
        .insert_html(body, r#"<p title="a &#39;b&#39;">1 &lt; 2 &amp; 3</p>"#)
        .unwrap();

    assert_eq!(doc.attribute(roots[0], "title"), Some("a 'b'"));
    assert_eq!(doc.text_content(roots[0]), "1 < 2 & 3");

    let Some(NodeType::Text(text)) = doc
        .children(roots[0])
        .first()
        .and_then(|id| doc.get(*id))
        .map(|node| node.node_type())
    else {
        panic!("expected a text child");
    };
    assert_eq!(text.text, "1 < 2 & 3");
}

#[test]
fn id_lookup_can_be_scoped() {
    let mut doc = Document::new();
    let body = doc.root();
    let roots = doc
        .insert_html(
            body,
            r#"<section id="a"><b id="dup">one</b></section><section id="b"><b id="dup">two</b></section>"#,
        )
        .unwrap();

    let first = doc.element_by_id("dup").unwrap();
    assert_eq!(doc.text_content(first), "one");

    let second = doc.element_by_id_in(roots[1], "dup").unwrap();
    assert_eq!(doc.text_content(second), "two");

    assert_eq!(doc.element_by_id("missing"), None);
}

#[test]
fn inserting_into_missing_or_text_nodes_fails() {
    let mut doc = Document::new();
    let text = doc.create_text("hello");
    let before = doc.len();

    assert_eq!(
        doc.insert_html(text, "<b>no</b>"),
        Err(DomError::NotAnElement(text))
    );
    assert!(matches!(
        doc.insert_html(tagstream_dom::NodeId(999), "<b>no</b>"),
        Err(DomError::NodeNotFound(_))
    ));
    assert_eq!(doc.len(), before);
}

#[test]
fn click_bubbles_to_ancestors_in_order() {
    let mut doc = Document::new();
    let body = doc.root();
    doc.insert_html(body, r#"<div id="outer"><button id="inner">Go</button></div>"#)
        .unwrap();
    let outer = doc.element_by_id("outer").unwrap();
    let inner = doc.element_by_id("inner").unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    for (node, name) in [(inner, "inner"), (outer, "outer")] {
        let log = log.clone();
        doc.add_listener(
            node,
            EventKind::Click,
            Box::new(move |_, event| {
                log.borrow_mut()
                    .push((name, event.target(), event.current_target()))
            }),
        )
        .unwrap();
    }

    assert_eq!(doc.dispatch(inner, EventKind::Click), 2);
    assert_eq!(
        *log.borrow(),
        vec![("inner", inner, inner), ("outer", inner, outer)]
    );
}

#[test]
fn stop_propagation_keeps_the_event_on_the_current_node() {
    let mut doc = Document::new();
    let body = doc.root();
    doc.insert_html(body, r#"<ul id="list"><li id="item">x</li></ul>"#)
        .unwrap();
    let list = doc.element_by_id("list").unwrap();
    let item = doc.element_by_id("item").unwrap();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let c = calls.clone();
    doc.add_listener(
        item,
        EventKind::Click,
        Box::new(move |_, event| {
            event.stop_propagation();
            c.borrow_mut().push("first");
        }),
    )
    .unwrap();
    let c = calls.clone();
    doc.add_listener(
        item,
        EventKind::Click,
        Box::new(move |_, _| c.borrow_mut().push("second")),
    )
    .unwrap();
    let c = calls.clone();
    doc.add_listener(
        list,
        EventKind::Click,
        Box::new(move |_, _| c.borrow_mut().push("list")),
    )
    .unwrap();

    assert_eq!(doc.dispatch(item, EventKind::Click), 2);
    assert_eq!(*calls.borrow(), vec!["first", "second"]);
}

#[test]
fn hover_listeners_can_mutate_the_document() {
    let mut doc = Document::new();
    let body = doc.root();
    doc.insert_html(body, r#"<div id="box" class="card">hover me</div>"#)
        .unwrap();
    let node = doc.element_by_id("box").unwrap();

    for kind in [EventKind::MouseEnter, EventKind::MouseLeave] {
        doc.add_listener(
            node,
            kind,
            Box::new(|doc, event| {
                if let Ok(el) = doc.element_mut(event.current_target()) {
                    el.toggle_class("yellow");
                }
            }),
        )
        .unwrap();
    }

    doc.dispatch(node, EventKind::MouseEnter);
    assert!(doc.has_class(node, "yellow"));
    assert_eq!(doc.attribute(node, "class"), Some("card yellow"));

    doc.dispatch(node, EventKind::MouseLeave);
    assert!(!doc.has_class(node, "yellow"));

    // Nothing listens for clicks
    assert_eq!(doc.dispatch(node, EventKind::Click), 0);
}

#[test]
fn whitespace_and_stray_markup() {
    let mut doc = Document::new();
    let body = doc.root();

    let markup = "<p><b>one</b> <b>two</b></p>\n<p>three</p>";
    doc.insert_html(body, markup).unwrap();
    assert_eq!(doc.inner_html(body), markup);

    let before = doc.len();
    assert!(matches!(doc.insert_html(body, "<p>unclosed"), Err(DomError::Parse(_))));
    assert_eq!(doc.len(), before);
}
