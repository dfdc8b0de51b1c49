//! The bare placeholder bar.

use marrow_core::{emit_node, location_key, with_composer, NodeId};

use crate::geometry::Size;
use crate::nodes::BarNode;
use crate::theme::skeleton_style;
use crate::widgets::update_node;

/// A single rounded bar in the ambient [`SkeletonStyle`]. With no explicit
/// `size` it fills the line slot it is placed in.
///
/// [`SkeletonStyle`]: crate::theme::SkeletonStyle
#[allow(non_snake_case)]
pub fn Skeleton(size: Option<Size>) -> NodeId {
    let style = skeleton_style();
    let key = location_key(file!(), line!(), column!());
    with_composer(|composer| {
        composer.with_group(key, || {
            let id = emit_node(BarNode::new);
            update_node::<BarNode>(id, |bar| {
                bar.color = style.color;
                bar.border_radius = style.border_radius;
                bar.class_name = style.class_name;
                bar.style = style.style;
                bar.explicit_size = size;
            });
            id
        })
    })
}
