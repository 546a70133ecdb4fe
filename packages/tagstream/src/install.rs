//! Turning a flushed session into real nodes.
//!
//! Installation walks the tree the session recorded and creates one element per tag, remembering which node each
//! [`TagKey`] became. Registries, listeners and the other deferred handlers are then resolved through that map, so the
//! ids written into the markup are never looked up.

use tagstream_dom::{Document, NodeId};

use crate::error::BuildResult;
use crate::handlers::{PendingHandler, Trigger};
use crate::session::{Content, Flushed, Mounted};
use crate::{Built, TagKey};

pub(crate) fn install(flushed: Flushed, doc: &mut Document, parent: NodeId) -> BuildResult<Built> {
    let mut mounted = Mounted::default();
    let mut root_nodes = Vec::with_capacity(flushed.roots.len());
    for &root in &flushed.roots {
        root_nodes.push(materialize(doc, parent, root, &flushed, &mut mounted)?);
    }

    let Flushed {
        markup,
        registries,
        handlers,
        ..
    } = flushed;

    let mut unresolved = 0;
    for registry in &registries {
        unresolved += registry.resolve(&mounted);
    }
    if unresolved > 0 {
        tracing::warn!("{unresolved} registry entries point at tags that were never installed");
    }

    let mut listeners = 0;
    let mut later = Vec::new();
    let mut append = Vec::new();

    // Handlers are keyed by creation order, so listeners are attached in document order
    for (key, set) in handlers {
        let Some(&node) = mounted.get(&key) else {
            tracing::warn!("Dropping {} handlers of {key}, it was never installed", set.len());
            continue;
        };

        for (trigger, handler) in set.into_entries() {
            match handler {
                PendingHandler::Listener(listener) => {
                    let Trigger::Event(kind) = trigger else {
                        continue;
                    };
                    doc.add_listener(node, kind, listener)?;
                    listeners += 1;
                }
                PendingHandler::Later(f) => later.push((node, f)),
                PendingHandler::Append(f) => append.push((node, f)),
            }
        }
    }

    let later_count = later.len();
    for (node, f) in later {
        f(doc, node);
    }

    let append_count = append.len();
    for (node, f) in append {
        let markup = f(doc, node);
        if let Err(err) = doc.insert_html(node, &markup) {
            tracing::warn!("Skipping markup appended to {node}: {err}");
        }
    }

    tracing::debug!(
        "Installed {} tags under {parent}: {} registries, {listeners} listeners, {later_count} later, {append_count} append",
        mounted.len(),
        registries.len(),
    );

    Ok(Built {
        markup,
        roots: root_nodes,
    })
}

fn materialize(
    doc: &mut Document,
    parent: NodeId,
    key: TagKey,
    flushed: &Flushed,
    mounted: &mut Mounted,
) -> BuildResult<NodeId> {
    let tag = &flushed.nodes[key.0];
    let element = doc.create_element(tag.name.as_str());
    for (name, value) in &tag.attributes {
        doc.set_attribute(element, name.as_str(), flushed.decoded(value))?;
    }
    doc.append_child(parent, element)?;
    mounted.insert(key, element);

    for content in &tag.content {
        match content {
            Content::Element(child) => {
                materialize(doc, element, *child, flushed, mounted)?;
            }
            Content::Text(text) => {
                let text = doc.create_text(flushed.decoded(text));
                doc.append_child(element, text)?;
            }
            Content::Raw(fragment) => {
                doc.insert_fragment(element, fragment)?;
            }
        }
    }

    Ok(element)
}
