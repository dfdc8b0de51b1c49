//! Base widgets: visible text and generic blocks.

use marrow_core::{
    emit_node, location_key, pop_parent, push_parent, with_composer, with_node_mut, Node, NodeId,
};

use crate::geometry::Size;
use crate::nodes::{Arrangement, BlockNode, BlockRole, TextNode};

/// Apply `f` to the node behind `id`. Emission and update happen in the
/// same slot, so failure means the tree is corrupt; log and move on rather
/// than take the composition down.
pub(crate) fn update_node<N: Node + 'static>(id: NodeId, f: impl FnOnce(&mut N)) {
    if let Err(err) = with_node_mut::<N, _>(id, f) {
        log::error!("node update failed: {err}");
    }
}

#[allow(non_snake_case)]
pub fn Text(text: &str) -> NodeId {
    let key = location_key(file!(), line!(), column!());
    with_composer(|composer| {
        composer.with_group(key, || {
            let id = emit_node(|| TextNode::new(text));
            update_node::<TextNode>(id, |node| {
                if node.text != text {
                    node.text = text.to_string();
                }
                node.visible = true;
            });
            id
        })
    })
}

/// Configuration for a [`Block`].
#[derive(Clone, Debug, Default)]
pub struct BlockSpec {
    class_name: Option<String>,
    size: Option<Size>,
    arrangement: Option<Arrangement>,
    role: Option<BlockRole>,
}

impl BlockSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn maybe_class_name(mut self, class_name: Option<&str>) -> Self {
        self.class_name = class_name.map(str::to_string);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn arrangement(mut self, arrangement: Arrangement) -> Self {
        self.arrangement = Some(arrangement);
        self
    }

    pub fn role(mut self, role: BlockRole) -> Self {
        self.role = Some(role);
        self
    }
}

#[allow(non_snake_case)]
pub fn Block(spec: BlockSpec, content: impl FnOnce()) -> NodeId {
    let key = location_key(file!(), line!(), column!());
    with_composer(|composer| {
        composer.with_group(key, || {
            let id = emit_node(BlockNode::new);
            update_node::<BlockNode>(id, |node| {
                node.class_name = spec.class_name;
                node.explicit_size = spec.size;
                node.arrangement = spec.arrangement.unwrap_or(Arrangement::Stack);
                node.role = spec.role.unwrap_or(BlockRole::Plain);
            });
            push_parent(id);
            content();
            pop_parent();
            id
        })
    })
}
