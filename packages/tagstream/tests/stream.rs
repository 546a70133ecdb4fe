//! How the tag stream turns chained calls into markup.

use pretty_assertions::assert_eq;
use tagstream::{render_to_string, render_to_string_with, AttrName, BuildConfig, TagName};
use tagstream_dom::EscapeMode;

fn render(f: impl FnOnce(tagstream::Html<'_>)) -> String {
    let _ = tagstream_logger::try_init(tracing::Level::TRACE);
    render_to_string(f).unwrap()
}

#[test]
fn nested_example() {
    let markup = render(|html| {
        let p = html.child(TagName::Div).child_with(TagName::P, "cls");
        p.child(TagName::Span).text("Hi");
        p.child(TagName::A).href("http://x").ensure_id();
    });

    assert_eq!(
        markup,
        r#"<div id="id0"><p class="cls" id="id1"><span id="id2">Hi</span><a href="http://x" id="id3"></a></p></div>"#
    );
}

#[test]
fn siblings_close_each_other() {
    let markup = render(|html| {
        let root = html.child(TagName::Section);
        root.child(TagName::H1).text("Title");
        root.child(TagName::P).child(TagName::Em).text("deep");
        root.child(TagName::Footer);
        html.child(TagName::Aside);
    });

    assert_eq!(
        markup,
        concat!(
            r#"<section id="id0">"#,
            r#"<h1 id="id1">Title</h1>"#,
            r#"<p id="id2"><em id="id3">deep</em></p>"#,
            r#"<footer id="id4"></footer>"#,
            r#"</section>"#,
            r#"<aside id="id5"></aside>"#,
        )
    );
}

#[test]
fn start_and_end_tags_balance() {
    let markup = render(|html| {
        let table = html.child(TagName::Table);
        for row in 0..3 {
            let tr = table.child(TagName::Tr);
            for col in 0..2 {
                tr.child(TagName::Td).child(TagName::B).text(format!("{row}/{col}"));
            }
        }
    });

    // Every element written is closed again, innermost first
    let mut stack = Vec::new();
    let mut rest = markup.as_str();
    while let Some(start) = rest.find('<') {
        let end = rest[start..].find('>').unwrap() + start;
        let tag = &rest[start + 1..end];
        match tag.strip_prefix('/') {
            Some(name) => assert_eq!(stack.pop(), Some(name.to_string())),
            None => stack.push(tag.split_whitespace().next().unwrap().to_string()),
        }
        rest = &rest[end + 1..];
    }
    assert!(stack.is_empty());
    assert_eq!(markup.matches("<td").count(), 6);
}

#[test]
fn text_and_attributes_are_escaped() {
    let markup = render(|html| {
        html.child(TagName::P)
            .title(r#"<"quoted" & 'single'>"#)
            .text(r#"<script>alert("&")</script>"#);
    });

    assert_eq!(
        markup,
        r#"<p title="&lt;&#34;quoted&#34; &amp; &#39;single&#39;&gt;" id="id0">&lt;script&gt;alert(&#34;&amp;&#34;)&lt;/script&gt;</p>"#
    );
}

#[test]
fn standard_escaping_leaves_ampersands() {
    let config = BuildConfig::default().with_escape(EscapeMode::Standard);
    let markup = render_to_string_with(&config, |html| {
        html.child(TagName::P).text("fish &amp; <chips>");
    })
    .unwrap();

    assert_eq!(markup, r#"<p id="id0">fish &amp; &lt;chips&gt;</p>"#);
}

#[test]
fn raw_markup_is_written_verbatim() {
    let markup = render(|html| {
        html.child(TagName::Div).raw("<b>bold</b> &amp; <i>it's</i>");
    });

    assert_eq!(markup, r#"<div id="id0"><b>bold</b> &amp; <i>it's</i></div>"#);
}

#[test]
fn last_attribute_write_wins_and_classes_accumulate() {
    let markup = render(|html| {
        html.child(TagName::A)
            .href("/first")
            .add_class("btn")
            .href("/second")
            .add_class("primary")
            .add_class_if("hidden", false)
            .add_class_if("wide", true)
            .text("Go");
    });

    assert_eq!(
        markup,
        r#"<a href="/second" class="btn primary wide" id="id0">Go</a>"#
    );
}

#[test]
fn init_arguments() {
    let markup = render(|html| {
        let form = html.child_with(TagName::Form, [(AttrName::Action, "/signup"), (AttrName::Method, "post")]);
        form.child_with(TagName::Input, vec![(AttrName::Type, "email".to_string())])
            .name("email")
            .placeholder("you@example.com");
        form.child_with(TagName::Button, "primary").kind("submit").text("Sign up");
    });

    assert_eq!(
        markup,
        concat!(
            r#"<form action="/signup" method="post" id="id0">"#,
            r#"<input type="email" name="email" placeholder="you@example.com" id="id1"/>"#,
            r#"<button class="primary" type="submit" id="id2">Sign up</button>"#,
            r#"</form>"#,
        )
    );
}

#[test]
fn explicit_ids_are_kept() {
    let markup = render(|html| {
        let nav = html.child(TagName::Nav).id("main-nav");
        nav.child(TagName::A).href("/");
    });

    assert_eq!(
        markup,
        r#"<nav id="main-nav"><a href="/" id="id0"></a></nav>"#
    );
}

#[test]
fn inline_styles_and_data_attributes() {
    let markup = render(|html| {
        html.child(TagName::Div)
            .set_style([("backgroundColor", "yellow"), ("WebkitTransition", "none")])
            .data("role", "banner")
            .width(300);
    });

    assert_eq!(
        markup,
        r#"<div style="background-color:yellow;-webkit-transition:none;" data-role="banner" width="300" id="id0"></div>"#
    );
}

#[test]
fn boolean_attributes() {
    let markup = render(|html| {
        let select = html.child(TagName::Select).multiple(true).disabled(true).disabled(false);
        select.child(TagName::Option).value("a").selected(true).text("A");
        select.child(TagName::Option).value("b").selected(false).text("B");
        html.child(TagName::Input).kind("checkbox").checked(true);
    });

    assert_eq!(
        markup,
        concat!(
            r#"<select multiple="multiple" id="id0">"#,
            r#"<option value="a" selected="selected" id="id1">A</option>"#,
            r#"<option value="b" id="id2">B</option>"#,
            r#"</select>"#,
            r#"<input type="checkbox" checked="checked" id="id3"/>"#,
        )
    );
}

#[test]
fn void_elements_have_no_end_tag() {
    let markup = render(|html| {
        let p = html.child(TagName::P);
        p.text("line one");
        html.child(TagName::Hr);
        html.child(TagName::Img).src("a.png").set_attr(AttrName::Alt, "A");
    });

    assert_eq!(
        markup,
        r#"<p id="id0">line one</p><hr id="id1"/><img src="a.png" alt="A" id="id2"/>"#
    );
}

#[test]
fn text_after_children_lands_after_them() {
    let markup = render(|html| {
        let li = html.child(TagName::Li);
        li.child(TagName::B).text("Name:");
        li.text(" Ferris").text("!");
    });

    assert_eq!(markup, r#"<li id="id0"><b id="id1">Name:</b> Ferris!</li>"#);
}

#[test]
fn space_and_with() {
    let markup = render(|html| {
        html.child(TagName::P).with(|p| {
            p.child(TagName::Strong).text("a");
            p.space();
            p.child(TagName::Em).text("b");
        });
    });

    assert_eq!(
        markup,
        r#"<p id="id0"><strong id="id1">a</strong><span id="id2"> </span><em id="id3">b</em></p>"#
    );
}

#[test]
fn map_children_uses_default_child_tags() {
    let markup = render(|html| {
        html.child(TagName::Ul).map_children([1, 2, 3], |item, li, _| {
            li.text(item.to_string());
        });
    });

    assert_eq!(
        markup,
        r#"<ul id="id0"><li id="id1">1</li><li id="id2">2</li><li id="id3">3</li></ul>"#
    );

    let markup = render(|html| {
        html.child(TagName::Tr)
            .map_children(["x", "y"], |item, td, idx| {
                td.data("index", idx.to_string()).text(item);
            });
        html.child(TagName::Section)
            .map_children(Vec::<&str>::new(), |_, _, _| unreachable!());
    });

    assert_eq!(
        markup,
        concat!(
            r#"<tr id="id0"><td data-index="0" id="id1">x</td><td data-index="1" id="id2">y</td></tr>"#,
            r#"<section id="id3"></section>"#,
        )
    );
}

#[test]
fn custom_prefixes_and_custom_tags() {
    let config = BuildConfig::default().with_id_prefix("w-");
    let markup = render_to_string_with(&config, |html| {
        html.child(TagName::Custom("x-card"))
            .set_attr(AttrName::Custom("aria-label"), "card")
            .text("hi");
    })
    .unwrap();

    assert_eq!(markup, r#"<x-card aria-label="card" id="w-0">hi</x-card>"#);
}

#[test]
fn every_build_counts_ids_from_zero() {
    let first = render(|html| {
        html.child(TagName::Div);
    });
    let second = render(|html| {
        html.child(TagName::Div);
    });
    assert_eq!(first, second);
    assert_eq!(first, r#"<div id="id0"></div>"#);
}

#[test]
fn empty_build() {
    assert_eq!(render(|_| {}), "");
}
