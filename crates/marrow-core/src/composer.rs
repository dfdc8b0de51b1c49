//! The composer drives one positional-memoization pass over a content
//! closure: it opens and closes slot groups, hands out remembered values,
//! emits nodes into the applier and collects them into their parents.

use std::rc::Rc;

use crate::owned::Owned;
use crate::runtime::RuntimeHandle;
use crate::slot_table::{EmittedNode, SlotTable};
use crate::state::MutableState;
use crate::{ApplierHost, Key, Node, NodeError, NodeId};

struct ComposerCore {
    slots: std::cell::RefCell<SlotTable>,
    host: Rc<dyn ApplierHost>,
    runtime: RuntimeHandle,
    parents: std::cell::RefCell<Vec<(NodeId, Vec<NodeId>)>>,
    side_effects: std::cell::RefCell<Vec<Box<dyn FnOnce()>>>,
}

/// Shared handle to the composition pass state. Cheap to clone; all clones
/// refer to the same slot table and applier.
pub struct Composer {
    core: Rc<ComposerCore>,
}

impl Clone for Composer {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl Composer {
    pub(crate) fn new(host: Rc<dyn ApplierHost>, runtime: RuntimeHandle) -> Self {
        Self {
            core: Rc::new(ComposerCore {
                slots: std::cell::RefCell::new(SlotTable::new()),
                host,
                runtime,
                parents: std::cell::RefCell::new(Vec::new()),
                side_effects: std::cell::RefCell::new(Vec::new()),
            }),
        }
    }

    /// Run `content` inside a slot group identified by `key` among its
    /// siblings. Every composable call site wraps itself in one of these.
    pub fn with_group<R>(&self, key: Key, content: impl FnOnce() -> R) -> R {
        self.core.slots.borrow_mut().begin_group(key);
        let out = content();
        self.core.slots.borrow_mut().end_group();
        out
    }

    /// Remember a value in the current group, initializing it on first pass.
    pub fn remember<T: 'static>(&self, init: impl FnOnce() -> T) -> Owned<T> {
        self.core.slots.borrow_mut().remember_value(init)
    }

    /// Remember a [`MutableState`] bound to this composition's runtime.
    pub fn mutable_state_of<T: 'static>(&self, init: impl FnOnce() -> T) -> MutableState<T> {
        let runtime = self.core.runtime.clone();
        self.remember(move || MutableState::with_runtime(init(), runtime))
            .with(|state| state.clone())
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.core.runtime.clone()
    }

    /// Emit a node for the current slot, creating it in the applier on the
    /// first pass and reusing its id afterwards. The id is recorded as a
    /// child of the innermost open parent.
    pub fn emit_node<N: Node + 'static>(&self, create: impl FnOnce() -> N) -> NodeId {
        let host = Rc::clone(&self.core.host);
        let slot = self.core.slots.borrow_mut().remember_value(move || {
            let id = host.borrow_dyn().insert(Box::new(create()));
            EmittedNode(id)
        });
        let id = slot.with(|node| node.0);
        if let Some((_, children)) = self.core.parents.borrow_mut().last_mut() {
            children.push(id);
        }
        id
    }

    /// Mutate the node behind `id` as its concrete type.
    pub fn with_node_mut<N: Node + 'static, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&mut N) -> R,
    ) -> Result<R, NodeError> {
        let mut applier = self.core.host.borrow_dyn();
        let node = applier.node_mut(id).ok_or(NodeError::Missing { id })?;
        let any: &mut dyn std::any::Any = node;
        let typed = any
            .downcast_mut::<N>()
            .ok_or_else(|| NodeError::TypeMismatch {
                id,
                expected: std::any::type_name::<N>(),
            })?;
        Ok(f(typed))
    }

    /// Open `id` as the parent for subsequently emitted nodes.
    pub fn push_parent(&self, id: NodeId) {
        self.core.parents.borrow_mut().push((id, Vec::new()));
    }

    /// Close the innermost parent and commit its collected children.
    pub fn pop_parent(&self) {
        let (parent, children) = self
            .core
            .parents
            .borrow_mut()
            .pop()
            .expect("pop_parent without matching push_parent");
        let mut applier = self.core.host.borrow_dyn();
        for &child in &children {
            if let Some(node) = applier.node_mut(child) {
                node.on_attached_to_parent(parent);
            }
        }
        if let Some(node) = applier.node_mut(parent) {
            node.update_children(children);
        }
    }

    pub fn register_side_effect(&self, effect: Box<dyn FnOnce()>) {
        self.core.side_effects.borrow_mut().push(effect);
    }

    pub(crate) fn take_side_effects(&self) -> Vec<Box<dyn FnOnce()>> {
        std::mem::take(&mut *self.core.side_effects.borrow_mut())
    }

    pub(crate) fn take_released_nodes(&self) -> Vec<NodeId> {
        self.core.slots.borrow_mut().take_released()
    }
}
