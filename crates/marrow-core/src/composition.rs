//! Owner of a composition: the applier, the runtime and the slot table live
//! here and persist across frames. Dropping the [`Composition`] drops the
//! runtime, after which every outstanding [`RuntimeHandle`] goes inert and
//! callbacks captured by still-scheduled work become no-ops.

use std::cell::RefMut;
use std::rc::{Rc, Weak};

use crate::composer::Composer;
use crate::composer_context;
use crate::runtime::{Runtime, RuntimeHandle};
use crate::{Applier, ApplierHost, ConcreteApplierHost, Key, Node, NodeId};

#[derive(Default)]
struct RootNode {
    children: Vec<NodeId>,
}

impl Node for RootNode {
    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn update_children(&mut self, children: Vec<NodeId>) {
        self.children = children;
    }

    fn debug_label(&self) -> &str {
        "root"
    }
}

pub struct Composition<A: Applier + 'static> {
    host: Rc<ConcreteApplierHost<A>>,
    composer: Composer,
    runtime: Runtime,
    root: NodeId,
}

impl<A: Applier + 'static> Composition<A> {
    pub fn new(applier: A) -> Self {
        let runtime = Runtime::new();
        let host = Rc::new(ConcreteApplierHost::new(applier));
        let weak: Weak<dyn ApplierHost> = Rc::downgrade(&(host.clone() as Rc<dyn ApplierHost>));
        runtime.handle().set_applier_host(weak);
        let root = host.borrow_dyn().insert(Box::new(RootNode::default()));
        let composer = Composer::new(host.clone() as Rc<dyn ApplierHost>, runtime.handle());
        Self {
            host,
            composer,
            runtime,
            root,
        }
    }

    /// Compose one frame of `content` under the root group `key`, then
    /// evict released nodes and run committed side effects.
    pub fn render(&mut self, key: Key, content: impl FnOnce()) {
        let handle = self.runtime.handle();
        handle.clear_needs_frame();
        let composer = self.composer.clone();
        {
            let _guard = composer_context::enter(composer.clone());
            let root = self.root;
            composer.with_group(key, || {
                composer.push_parent(root);
                content();
                composer.pop_parent();
            });
        }
        for id in composer.take_released_nodes() {
            log::trace!("evicting node #{id}");
            self.host.applier_mut().remove(id);
        }
        for effect in composer.take_side_effects() {
            effect();
        }
    }

    /// True when state written since the last frame requires another pass.
    pub fn should_render(&self) -> bool {
        self.runtime.handle().needs_frame()
    }

    pub fn has_pending_layout_effects(&self) -> bool {
        self.runtime.handle().has_layout_effects()
    }

    /// Run every effect scheduled for "after layout". Call once layout has
    /// resolved node geometry for the current frame.
    pub fn run_layout_effects(&mut self) {
        for effect in self.runtime.handle().take_layout_effects() {
            effect();
        }
    }

    pub fn applier_mut(&self) -> RefMut<'_, A> {
        self.host.applier_mut()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }
}
