//! Builds a small sign up teaser, then plays a few events against it.
//!
//! Run with `TAGSTREAM_LOG=trace` to watch every tag open and close.

use std::cell::Cell;
use std::rc::Rc;
use tagstream::prelude::*;

fn main() {
    tagstream_logger::init(tracing::Level::DEBUG);

    let mut doc = Document::new();
    let body = doc.root();
    let confirmations = Rc::new(Cell::new(0));
    let confirmed = confirmations.clone();
    let mut links = None;

    let built = doc
        .build(body, |html| {
            let registry = html.make_registry();

            let div = html.child(TagName::Div).on(EventKind::MouseOver, |doc, event| {
                if let Ok(el) = doc.element_mut(event.current_target()) {
                    el.toggle_class("yellow");
                }
            });

            let p = div.child_with(TagName::P, "my-paragraph");
            p.child_with(TagName::Span, "good-advice")
                .text("If you haven't already, you should sign up for ");

            let a = p
                .child(TagName::A)
                .href("http://www.twitter.com")
                .on(EventKind::Click, move |_, event| {
                    confirmed.set(confirmed.get() + 1);
                    tracing::info!("Are you sure you want to do this? ({})", event.target());
                });
            registry.insert("twitter", a);
            a.child(TagName::Strong).text("Twitter");

            links = Some(registry);
        })
        .unwrap_or_else(|err| panic!("the page should build: {err}"));

    println!("{}", built.markup);

    let Some(twitter) = links.and_then(|links| links.node(&"twitter")) else {
        panic!("the link should be installed");
    };

    // Hovering the bold text bubbles up to the outer div
    let strong = doc.children(twitter)[0];
    doc.dispatch(strong, EventKind::MouseOver);
    println!("{}", doc.inner_html(body));

    doc.dispatch(twitter, EventKind::Click);
    println!("confirmations: {}", confirmations.get());
}
