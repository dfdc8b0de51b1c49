use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::{Applier, ApplierHost};

type LayoutEffectTask = Box<dyn FnOnce()>;

struct RuntimeInner {
    needs_frame: Cell<bool>,
    layout_effects: RefCell<Vec<LayoutEffectTask>>,
    applier: RefCell<Option<Weak<dyn ApplierHost>>>,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            needs_frame: Cell::new(false),
            layout_effects: RefCell::new(Vec::new()),
            applier: RefCell::new(None),
        }
    }
}

/// Owner of the per-composition scheduling state. Created by `Composition`,
/// handed out to state cells and effects as a [`RuntimeHandle`].
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new()),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak handle to a [`Runtime`].
///
/// Handles may outlive their composition (captured in deferred callbacks);
/// every operation on a dead runtime is a silent no-op so that stale
/// callbacks can never mutate torn-down state.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    fn upgrade(&self) -> Option<Rc<RuntimeInner>> {
        self.inner.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Request a recomposition frame. Called by state cells on every write.
    pub fn mark_needs_frame(&self) {
        if let Some(inner) = self.upgrade() {
            inner.needs_frame.set(true);
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn clear_needs_frame(&self) {
        if let Some(inner) = self.upgrade() {
            inner.needs_frame.set(false);
        }
    }

    /// Queue a callback to run after the next completed layout pass.
    pub fn schedule_layout_effect(&self, task: LayoutEffectTask) {
        if let Some(inner) = self.upgrade() {
            inner.layout_effects.borrow_mut().push(task);
        }
    }

    pub fn has_layout_effects(&self) -> bool {
        self.upgrade()
            .map(|inner| !inner.layout_effects.borrow().is_empty())
            .unwrap_or(false)
    }

    pub fn take_layout_effects(&self) -> Vec<LayoutEffectTask> {
        self.upgrade()
            .map(|inner| std::mem::take(&mut *inner.layout_effects.borrow_mut()))
            .unwrap_or_default()
    }

    pub(crate) fn set_applier_host(&self, host: Weak<dyn ApplierHost>) {
        if let Some(inner) = self.upgrade() {
            *inner.applier.borrow_mut() = Some(host);
        }
    }

    /// Borrow the node tree owned by this runtime's composition, if it is
    /// still alive. Deferred callbacks use this for read-only probes of
    /// resolved geometry.
    pub fn with_applier<R>(&self, f: impl FnOnce(&mut dyn Applier) -> R) -> Option<R> {
        let inner = self.upgrade()?;
        let host = {
            let slot = inner.applier.borrow();
            slot.as_ref().and_then(Weak::upgrade)
        }?;
        let mut applier = host.borrow_dyn();
        Some(f(&mut *applier))
    }
}
