//! Retained node types emitted by the widget layer.

use marrow_core::{Geometry, Node, NodeId};
use smallvec::SmallVec;

use crate::geometry::Size;

/// What a [`BlockNode`] is for. Layout treats the roles differently; see
/// `layout.rs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockRole {
    /// Generic container, sizes to its content.
    Plain,
    /// Full-width measurement target wrapping hidden text.
    Probe,
    /// Fixed-size container replaying a measured footprint.
    SimulatedBox,
    /// One row inside a simulated box, fills its slot.
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrangement {
    /// Children stack vertically, content-sized.
    Stack,
    /// Children split the container height into equal slots.
    SpaceEvenly,
}

pub struct BlockNode {
    pub class_name: Option<String>,
    pub explicit_size: Option<Size>,
    pub arrangement: Arrangement,
    pub role: BlockRole,
    children: SmallVec<[NodeId; 4]>,
    parent: Option<NodeId>,
    geometry: Option<Geometry>,
}

impl BlockNode {
    pub fn new() -> Self {
        Self {
            class_name: None,
            explicit_size: None,
            arrangement: Arrangement::Stack,
            role: BlockRole::Plain,
            children: SmallVec::new(),
            parent: None,
            geometry: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl Default for BlockNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for BlockNode {
    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn update_children(&mut self, children: Vec<NodeId>) {
        self.children = SmallVec::from_vec(children);
    }

    fn on_attached_to_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    fn resolved_geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    fn set_resolved_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    fn debug_label(&self) -> &str {
        match self.role {
            BlockRole::Plain => "block",
            BlockRole::Probe => "probe",
            BlockRole::SimulatedBox => "simulated-box",
            BlockRole::Line => "line",
        }
    }
}

pub struct TextNode {
    pub text: String,
    /// Hidden text still takes up space; it just must not be painted.
    pub visible: bool,
    parent: Option<NodeId>,
    geometry: Option<Geometry>,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            parent: None,
            geometry: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl Node for TextNode {
    fn on_attached_to_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    fn resolved_geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    fn set_resolved_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    fn debug_label(&self) -> &str {
        if self.visible {
            "text"
        } else {
            "hidden-text"
        }
    }
}

/// A rounded placeholder bar. Without an explicit size it fills its line
/// slot at 80% height, leaving a visual gap between rows.
pub struct BarNode {
    pub color: String,
    pub border_radius: String,
    pub class_name: Option<String>,
    pub style: Option<String>,
    pub explicit_size: Option<Size>,
    parent: Option<NodeId>,
    geometry: Option<Geometry>,
}

impl BarNode {
    pub fn new() -> Self {
        Self {
            color: String::new(),
            border_radius: String::new(),
            class_name: None,
            style: None,
            explicit_size: None,
            parent: None,
            geometry: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl Default for BarNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for BarNode {
    fn on_attached_to_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    fn resolved_geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    fn set_resolved_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    fn debug_label(&self) -> &str {
        "bar"
    }
}
