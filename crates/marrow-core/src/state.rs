//! Observable state cells.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::RuntimeHandle;

struct StateInner<T> {
    value: RefCell<T>,
    runtime: RuntimeHandle,
}

/// A writable state cell. Writing schedules a new frame on the runtime the
/// cell was created under; reads go through [`MutableState::get`] or
/// [`MutableState::with`].
pub struct MutableState<T> {
    inner: Rc<StateInner<T>>,
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> MutableState<T> {
    pub fn with_runtime(value: T, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(value),
                runtime,
            }),
        }
    }

    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.inner.runtime.mark_needs_frame();
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }
}

impl<T: Clone> MutableState<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MutableState")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}
