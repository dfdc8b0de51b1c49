//! Thread-local composer stack.
//!
//! Composable functions are plain Rust functions, so the active [`Composer`]
//! is carried through a thread-local stack rather than as a parameter. The
//! guard returned by [`enter`] pops the stack when composition of that root
//! unwinds.

use crate::composer::Composer;

thread_local! {
    static COMPOSERS: std::cell::RefCell<Vec<Composer>> = const { std::cell::RefCell::new(Vec::new()) };
}

pub(crate) struct ComposerGuard(());

impl Drop for ComposerGuard {
    fn drop(&mut self) {
        COMPOSERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

pub(crate) fn enter(composer: Composer) -> ComposerGuard {
    COMPOSERS.with(|stack| stack.borrow_mut().push(composer));
    ComposerGuard(())
}

/// Run `f` with the innermost active composer. The handle is cloned out of
/// the stack first so `f` may itself start nested compositions.
///
/// # Panics
///
/// Panics when called outside of composition.
pub fn with_composer<R>(f: impl FnOnce(&Composer) -> R) -> R {
    let composer = COMPOSERS.with(|stack| {
        stack
            .borrow()
            .last()
            .cloned()
            .expect("composable called outside of composition")
    });
    f(&composer)
}

/// True while a composition pass is running on this thread.
pub fn is_composing() -> bool {
    COMPOSERS.with(|stack| !stack.borrow().is_empty())
}
