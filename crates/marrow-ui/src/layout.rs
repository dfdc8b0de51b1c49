//! Headless layout.
//!
//! One top-down pass resolves a [`Geometry`] for every node: parents hand
//! their children an available [`Size`], text resolves through the
//! [`TextMeasurer`], and containers size to what comes back. There is no
//! positioning; consumers of the tree only need footprints.

use marrow_core::{Applier, Geometry, MemoryApplier, NodeError, NodeId};

use crate::geometry::Size;
use crate::nodes::{Arrangement, BarNode, BlockNode, BlockRole, TextNode};
use crate::text::TextMeasurer;

/// Height fraction of its line slot that a placeholder bar occupies.
pub const BAR_HEIGHT_RATIO: f32 = 0.8;

enum Snapshot {
    Block {
        role: BlockRole,
        arrangement: Arrangement,
        explicit_size: Option<Size>,
        children: Vec<NodeId>,
    },
    Text {
        text: String,
    },
    Bar {
        explicit_size: Option<Size>,
    },
    Container {
        children: Vec<NodeId>,
    },
}

fn snapshot(applier: &MemoryApplier, id: NodeId) -> Result<Snapshot, NodeError> {
    if let Ok(snap) = applier.with_node::<BlockNode, _>(id, |block| Snapshot::Block {
        role: block.role,
        arrangement: block.arrangement,
        explicit_size: block.explicit_size,
        children: marrow_core::Node::children(block).to_vec(),
    }) {
        return Ok(snap);
    }
    if let Ok(snap) = applier.with_node::<TextNode, _>(id, |text| Snapshot::Text {
        text: text.text.clone(),
    }) {
        return Ok(snap);
    }
    if let Ok(snap) = applier.with_node::<BarNode, _>(id, |bar| Snapshot::Bar {
        explicit_size: bar.explicit_size,
    }) {
        return Ok(snap);
    }
    let node = applier.node(id).ok_or(NodeError::Missing { id })?;
    Ok(Snapshot::Container {
        children: node.children().to_vec(),
    })
}

/// Lay out the subtree under `root` within `viewport`.
pub fn layout_tree(
    applier: &mut MemoryApplier,
    root: NodeId,
    viewport: Size,
    measurer: &dyn TextMeasurer,
) -> Result<(), NodeError> {
    layout_node(applier, root, viewport, measurer)?;
    Ok(())
}

fn layout_node(
    applier: &mut MemoryApplier,
    id: NodeId,
    avail: Size,
    measurer: &dyn TextMeasurer,
) -> Result<Geometry, NodeError> {
    let geometry = match snapshot(applier, id)? {
        Snapshot::Text { text } => {
            let metrics = measurer.measure(&text, avail.width);
            Geometry {
                width: metrics.width,
                height: metrics.height,
                line_height: Some(metrics.line_height),
            }
        }
        Snapshot::Bar { explicit_size } => {
            let size = explicit_size
                .unwrap_or_else(|| Size::new(avail.width, avail.height * BAR_HEIGHT_RATIO));
            Geometry {
                width: size.width,
                height: size.height,
                line_height: None,
            }
        }
        Snapshot::Block {
            role,
            arrangement,
            explicit_size,
            children,
        } => match role {
            // A probe is a block-level wrapper: its footprint spans the
            // available width regardless of how wide the text came out.
            BlockRole::Probe => {
                let mut height = 0.0;
                let mut line_height = None;
                for child in children {
                    let child_geometry = layout_node(applier, child, avail, measurer)?;
                    height += child_geometry.height;
                    if line_height.is_none() {
                        line_height = child_geometry.line_height;
                    }
                }
                Geometry {
                    width: avail.width,
                    height,
                    line_height,
                }
            }
            BlockRole::SimulatedBox => {
                let size = explicit_size.unwrap_or(avail);
                if arrangement == Arrangement::SpaceEvenly && !children.is_empty() {
                    let slot = Size::new(size.width, size.height / children.len() as f32);
                    for child in children {
                        layout_node(applier, child, slot, measurer)?;
                    }
                } else {
                    for child in children {
                        layout_node(applier, child, size, measurer)?;
                    }
                }
                Geometry {
                    width: size.width,
                    height: size.height,
                    line_height: None,
                }
            }
            BlockRole::Line => {
                for child in children {
                    layout_node(applier, child, avail, measurer)?;
                }
                Geometry {
                    width: avail.width,
                    height: avail.height,
                    line_height: None,
                }
            }
            BlockRole::Plain => {
                let inner = explicit_size.unwrap_or(avail);
                let mut width = 0.0f32;
                let mut height = 0.0f32;
                let mut line_height = None;
                for child in children {
                    let child_geometry = layout_node(applier, child, inner, measurer)?;
                    width = width.max(child_geometry.width);
                    height += child_geometry.height;
                    if line_height.is_none() {
                        line_height = child_geometry.line_height;
                    }
                }
                let size = explicit_size.unwrap_or_else(|| Size::new(width, height));
                Geometry {
                    width: size.width,
                    height: size.height,
                    line_height,
                }
            }
        },
        Snapshot::Container { children } => {
            for child in children {
                layout_node(applier, child, avail, measurer)?;
            }
            Geometry {
                width: avail.width,
                height: avail.height,
                line_height: None,
            }
        }
    };
    let node = applier.node_mut(id).ok_or(NodeError::Missing { id })?;
    node.set_resolved_geometry(geometry);
    Ok(geometry)
}
