use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Shared handle to a slot-table value. The slot keeps one and every
/// revisit of `remember` hands out another; all of them alias the same
/// cell, so remembered state survives recomposition for as long as its
/// group does.
pub struct Owned<T>(Rc<RefCell<T>>);

impl<T> Owned<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for Owned<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}
