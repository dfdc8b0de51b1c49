//! Composition effects.
//!
//! [`LayoutEffect!`] runs its body once after the next layout pass, re-running
//! only when its key changes. The body receives a [`LayoutEffectScope`] and
//! may call [`LayoutEffectScope::relaunch`] to try again after a later layout
//! pass, e.g. when the geometry it wanted to read was not available yet.
//! When the owning group leaves the composition the remembered state is
//! dropped and any still-pending run is cancelled.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::composer_context::with_composer;
use crate::runtime::RuntimeHandle;

pub(crate) struct LayoutEffectState {
    key_hash: Option<u64>,
    active: Rc<Cell<bool>>,
}

impl LayoutEffectState {
    pub(crate) fn new() -> Self {
        Self {
            key_hash: None,
            active: Rc::new(Cell::new(false)),
        }
    }

    /// Record `key_hash`; returns true when the effect must (re)launch, in
    /// which case the previous launch, if any, is cancelled.
    fn arm(&mut self, key_hash: u64) -> bool {
        if self.key_hash == Some(key_hash) {
            return false;
        }
        self.active.set(false);
        self.key_hash = Some(key_hash);
        self.active = Rc::new(Cell::new(true));
        true
    }

    fn active_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.active)
    }
}

impl Drop for LayoutEffectState {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

type EffectBody = Rc<RefCell<Box<dyn FnMut(&LayoutEffectScope)>>>;

/// Handle passed to a layout effect body.
pub struct LayoutEffectScope {
    active: Rc<Cell<bool>>,
    runtime: RuntimeHandle,
    body: EffectBody,
}

impl LayoutEffectScope {
    /// False once the owning composable has left the composition or the
    /// effect key has changed. The scheduler already skips inactive effects;
    /// bodies only need this when they hand callbacks further out.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    /// Schedule the effect body to run again after the next layout pass.
    /// A relaunch of a cancelled effect is silently dropped.
    pub fn relaunch(&self) {
        let scope = LayoutEffectScope {
            active: Rc::clone(&self.active),
            runtime: self.runtime.clone(),
            body: Rc::clone(&self.body),
        };
        self.runtime.schedule_layout_effect(Box::new(move || run_scope(scope)));
        self.runtime.mark_needs_frame();
    }
}

fn run_scope(scope: LayoutEffectScope) {
    if !scope.active.get() {
        return;
    }
    let body = Rc::clone(&scope.body);
    let mut body = body.borrow_mut();
    (*body)(&scope);
}

#[doc(hidden)]
pub fn __layout_effect_impl(key_hash: u64, effect: impl FnMut(&LayoutEffectScope) + 'static) {
    with_composer(|composer| {
        let state = composer.remember(LayoutEffectState::new);
        let should_launch = state.borrow_mut().arm(key_hash);
        if !should_launch {
            return;
        }
        let runtime = composer.runtime_handle();
        let scope = LayoutEffectScope {
            active: state.borrow().active_flag(),
            runtime: runtime.clone(),
            body: Rc::new(RefCell::new(Box::new(effect))),
        };
        runtime.schedule_layout_effect(Box::new(move || run_scope(scope)));
    });
}

/// Run `effect` after the next layout pass, re-running when `$key` changes.
#[macro_export]
macro_rules! LayoutEffect {
    ($key:expr, $effect:expr $(,)?) => {
        $crate::__layout_effect_impl($crate::hash_key(&$key), $effect)
    };
}

/// Run `f` after the current composition pass commits. Unlike
/// [`LayoutEffect!`] this fires on every pass that reaches the call site.
#[allow(non_snake_case)]
pub fn SideEffect(f: impl FnOnce() + 'static) {
    with_composer(|composer| composer.register_side_effect(Box::new(f)));
}
