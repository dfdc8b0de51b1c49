//! A small retained-node composition runtime.
//!
//! Content is described by plain functions that run inside a composition
//! pass. Positional memoization (the slot table) keeps state and emitted
//! nodes stable across passes, so a function that runs again with the same
//! position and keys updates its nodes in place instead of rebuilding them.
//!
//! The pieces:
//!
//! * [`Composition`] owns a frame loop: compose, lay out (caller-driven),
//!   then run layout effects.
//! * [`Applier`] is the retained node store; [`MemoryApplier`] is the
//!   in-memory implementation used by tests and headless apps.
//! * [`MutableState`] cells schedule a new frame when written.
//! * [`LayoutEffect!`] defers work until after layout, with cancellation
//!   tied to the lifetime of the call site's slot group.

use std::any::Any;
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

mod composer;
mod composer_context;
mod composition;
mod effects;
mod owned;
mod runtime;
mod slot_table;
mod state;

pub use composer::Composer;
pub use composer_context::{is_composing, with_composer};
pub use composition::Composition;
pub use effects::{LayoutEffectScope, SideEffect, __layout_effect_impl};
pub use owned::Owned;
pub use runtime::{Runtime, RuntimeHandle};
pub use state::MutableState;

/// Identity of a slot group among its siblings.
pub type Key = u64;

/// Identity of a node in an [`Applier`]. Ids are never reused.
pub type NodeId = u64;

pub fn hash_key<K: Hash + ?Sized>(key: &K) -> Key {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Key for a source location, the default group identity of a composable
/// call site. Use [`with_key`] when siblings share a call site.
pub fn location_key(file: &str, line: u32, column: u32) -> Key {
    let mut hasher = FxHasher::default();
    file.hash(&mut hasher);
    line.hash(&mut hasher);
    column.hash(&mut hasher);
    hasher.finish()
}

/// Resolved size of a node after a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    /// Line height of the text content that produced this geometry, when
    /// the node contains any.
    pub line_height: Option<f32>,
}

/// A retained tree node. Concrete node types live with the widget layer;
/// the runtime only moves children around and stores resolved geometry.
pub trait Node: Any {
    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn update_children(&mut self, _children: Vec<NodeId>) {}

    fn on_attached_to_parent(&mut self, _parent: NodeId) {}

    fn resolved_geometry(&self) -> Option<Geometry> {
        None
    }

    fn set_resolved_geometry(&mut self, _geometry: Geometry) {}

    fn debug_label(&self) -> &str {
        "node"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    Missing { id: NodeId },
    TypeMismatch { id: NodeId, expected: &'static str },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Missing { id } => write!(f, "node {id} is not in the tree"),
            NodeError::TypeMismatch { id, expected } => {
                write!(f, "node {id} is not a {expected}")
            }
        }
    }
}

impl std::error::Error for NodeError {}

/// Retained node store mutated by the composer and read by layout.
pub trait Applier {
    fn insert(&mut self, node: Box<dyn Node>) -> NodeId;
    fn remove(&mut self, id: NodeId);
    fn node(&self, id: NodeId) -> Option<&dyn Node>;
    fn node_mut(&mut self, id: NodeId) -> Option<&mut dyn Node>;
}

/// Shared, dynamically borrowable applier. The runtime holds a weak handle
/// so callbacks outliving the composition degrade to no-ops.
pub trait ApplierHost {
    fn borrow_dyn(&self) -> RefMut<'_, dyn Applier>;
}

pub(crate) struct ConcreteApplierHost<A: Applier> {
    applier: RefCell<A>,
}

impl<A: Applier> ConcreteApplierHost<A> {
    pub(crate) fn new(applier: A) -> Self {
        Self {
            applier: RefCell::new(applier),
        }
    }

    pub(crate) fn applier_mut(&self) -> RefMut<'_, A> {
        self.applier.borrow_mut()
    }
}

impl<A: Applier + 'static> ApplierHost for ConcreteApplierHost<A> {
    fn borrow_dyn(&self) -> RefMut<'_, dyn Applier> {
        RefMut::map(self.applier.borrow_mut(), |applier| {
            applier as &mut dyn Applier
        })
    }
}

/// Map-backed [`Applier`] with monotonically increasing ids.
#[derive(Default)]
pub struct MemoryApplier {
    nodes: FxHashMap<NodeId, Box<dyn Node>>,
    next_id: NodeId,
}

impl MemoryApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All live node ids, in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn with_node<N: Node + 'static, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&N) -> R,
    ) -> Result<R, NodeError> {
        let node = self.nodes.get(&id).ok_or(NodeError::Missing { id })?;
        let any: &dyn Any = &**node;
        let typed = any.downcast_ref::<N>().ok_or(NodeError::TypeMismatch {
            id,
            expected: std::any::type_name::<N>(),
        })?;
        Ok(f(typed))
    }

    pub fn with_node_mut<N: Node + 'static, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut N) -> R,
    ) -> Result<R, NodeError> {
        let node = self.nodes.get_mut(&id).ok_or(NodeError::Missing { id })?;
        let any: &mut dyn Any = &mut **node;
        let typed = any.downcast_mut::<N>().ok_or(NodeError::TypeMismatch {
            id,
            expected: std::any::type_name::<N>(),
        })?;
        Ok(f(typed))
    }

    /// Indented rendering of the subtree under `root`, one node per line.
    pub fn dump_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(root, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        let Some(node) = self.nodes.get(&id) else {
            out.push_str(&format!("<missing #{id}>\n"));
            return;
        };
        out.push_str(node.debug_label());
        if let Some(geometry) = node.resolved_geometry() {
            out.push_str(&format!(" [{}x{}]", geometry.width, geometry.height));
        }
        out.push('\n');
        let children: Vec<NodeId> = node.children().to_vec();
        for child in children {
            self.dump_into(child, depth + 1, out);
        }
    }
}

impl Applier for MemoryApplier {
    fn insert(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn remove(&mut self, id: NodeId) {
        self.nodes.remove(&id);
    }

    fn node(&self, id: NodeId) -> Option<&dyn Node> {
        self.nodes.get(&id).map(|node| &**node)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut dyn Node> {
        self.nodes.get_mut(&id).map(|node| &mut **node)
    }
}

/// An ambient value with a scoped override stack. Declare one in a
/// `thread_local!` and read it with [`CompositionLocal::current`].
pub struct CompositionLocal<T: 'static> {
    default: fn() -> T,
    stack: RefCell<Vec<T>>,
}

impl<T: Clone + 'static> CompositionLocal<T> {
    pub const fn new(default: fn() -> T) -> Self {
        Self {
            default,
            stack: RefCell::new(Vec::new()),
        }
    }

    /// The innermost provided value, or the default when none is in scope.
    pub fn current(&self) -> T {
        let stack = self.stack.borrow();
        match stack.last() {
            Some(value) => value.clone(),
            None => (self.default)(),
        }
    }

    /// Run `content` with `value` as the innermost value of this local.
    pub fn provides<R>(&self, value: T, content: impl FnOnce() -> R) -> R {
        self.stack.borrow_mut().push(value);
        let _pop = PopOnDrop(&self.stack);
        content()
    }
}

/// Free-function spelling of [`CompositionLocal::provides`].
#[allow(non_snake_case)]
pub fn CompositionLocalProvider<T: Clone + 'static, R>(
    local: &CompositionLocal<T>,
    value: T,
    content: impl FnOnce() -> R,
) -> R {
    local.provides(value, content)
}

struct PopOnDrop<'a, T>(&'a RefCell<Vec<T>>);

impl<T> Drop for PopOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.borrow_mut().pop();
    }
}

/// Remember a value in the current group. See [`Composer::remember`].
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Owned<T> {
    with_composer(|composer| composer.remember(init))
}

/// Remember a [`MutableState`] cell in the current group.
#[allow(non_snake_case)]
pub fn useState<T: 'static>(init: impl FnOnce() -> T) -> MutableState<T> {
    with_composer(|composer| composer.mutable_state_of(init))
}

/// Run `content` in a group keyed by `key` instead of by call-site
/// position. Required when siblings are produced from the same call site,
/// e.g. in a loop, and must keep identity tied to their data.
pub fn with_key<K: Hash + ?Sized, R>(key: &K, content: impl FnOnce() -> R) -> R {
    with_composer(|composer| composer.with_group(hash_key(key), content))
}

/// Emit a node in the current slot. See [`Composer::emit_node`].
pub fn emit_node<N: Node + 'static>(create: impl FnOnce() -> N) -> NodeId {
    with_composer(|composer| composer.emit_node(create))
}

/// Mutate an emitted node as its concrete type.
pub fn with_node_mut<N: Node + 'static, R>(
    id: NodeId,
    f: impl FnOnce(&mut N) -> R,
) -> Result<R, NodeError> {
    with_composer(|composer| composer.with_node_mut(id, f))
}

pub fn push_parent(id: NodeId) {
    with_composer(|composer| composer.push_parent(id));
}

pub fn pop_parent() {
    with_composer(|composer| composer.pop_parent());
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;
