//! Invisible text that still participates in layout.

use marrow_core::{emit_node, location_key, with_composer, NodeId};

use crate::nodes::TextNode;
use crate::widgets::update_node;

/// Text that occupies its normal space but is never painted. Measurement
/// probes wrap their content in this so the real footprint can be read
/// without flashing the text on screen.
#[allow(non_snake_case)]
pub fn HiddenText(text: &str) -> NodeId {
    let key = location_key(file!(), line!(), column!());
    with_composer(|composer| {
        composer.with_group(key, || {
            let id = emit_node(|| {
                let mut node = TextNode::new(text);
                node.visible = false;
                node
            });
            update_node::<TextNode>(id, |node| {
                if node.text != text {
                    node.text = text.to_string();
                }
                node.visible = false;
            });
            id
        })
    })
}
