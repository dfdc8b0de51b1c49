use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    emit_node, is_composing, useState, with_key, Applier, Composition, CompositionLocalProvider,
    MemoryApplier, MutableState, Node, NodeId, SideEffect,
};

struct DummyNode {
    label: &'static str,
    children: Vec<NodeId>,
}

impl DummyNode {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

impl Node for DummyNode {
    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn update_children(&mut self, children: Vec<NodeId>) {
        self.children = children;
    }

    fn debug_label(&self) -> &str {
        self.label
    }
}

thread_local! {
    static AMBIENT: crate::CompositionLocal<u32> = const { crate::CompositionLocal::new(|| 7) };
}

#[test]
fn remembered_state_survives_recomposition() {
    let mut composition = Composition::new(MemoryApplier::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let handle: Rc<RefCell<Option<MutableState<u32>>>> = Rc::new(RefCell::new(None));

    for _ in 0..2 {
        let seen = Rc::clone(&seen);
        let captured = Rc::clone(&handle);
        composition.render(1, move || {
            let counter = useState(|| 0u32);
            seen.borrow_mut().push(counter.get());
            *captured.borrow_mut() = Some(counter);
        });
        if let Some(counter) = handle.borrow().as_ref() {
            counter.set(counter.get() + 1);
        }
    }

    assert_eq!(*seen.borrow(), vec![0, 1]);
}

#[test]
fn state_write_requests_a_frame() {
    let mut composition = Composition::new(MemoryApplier::new());
    let handle: Rc<RefCell<Option<MutableState<bool>>>> = Rc::new(RefCell::new(None));

    let captured = Rc::clone(&handle);
    composition.render(1, move || {
        let flag = useState(|| false);
        *captured.borrow_mut() = Some(flag);
    });
    assert!(!composition.should_render());

    handle.borrow().as_ref().unwrap().set(true);
    assert!(composition.should_render());

    composition.render(1, || {});
    assert!(!composition.should_render());
}

#[test]
fn composition_local_default_and_override() {
    assert_eq!(AMBIENT.with(|local| local.current()), 7);

    let outer = AMBIENT.with(|local| {
        local.provides(1, || {
            let inner = AMBIENT.with(|local| {
                CompositionLocalProvider(local, 2, || AMBIENT.with(|l| l.current()))
            });
            (AMBIENT.with(|l| l.current()), inner)
        })
    });
    assert_eq!(outer, (1, 2));

    assert_eq!(AMBIENT.with(|local| local.current()), 7);
}

#[test]
fn side_effects_run_after_the_frame_commits() {
    let mut composition = Composition::new(MemoryApplier::new());
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let captured = Rc::clone(&order);
    composition.render(1, move || {
        captured.borrow_mut().push("compose");
        let captured = Rc::clone(&captured);
        SideEffect(move || captured.borrow_mut().push("commit"));
    });

    assert_eq!(*order.borrow(), vec!["compose", "commit"]);
}

#[test]
fn composing_is_only_observable_during_a_pass() {
    let mut composition = Composition::new(MemoryApplier::new());
    let observed = Rc::new(Cell::new(false));

    assert!(!is_composing());
    let captured = Rc::clone(&observed);
    composition.render(1, move || captured.set(is_composing()));

    assert!(observed.get());
    assert!(!is_composing());
}

#[test]
fn layout_effect_runs_once_for_a_stable_key() {
    let mut composition = Composition::new(MemoryApplier::new());
    let runs = Rc::new(Cell::new(0u32));

    for _ in 0..3 {
        let runs = Rc::clone(&runs);
        composition.render(1, move || {
            let runs = runs.clone();
            crate::LayoutEffect!((), move |_scope| {
                runs.set(runs.get() + 1);
            });
        });
        composition.run_layout_effects();
    }

    assert_eq!(runs.get(), 1);
}

#[test]
fn layout_effect_relaunches_when_key_changes() {
    let mut composition = Composition::new(MemoryApplier::new());
    let runs = Rc::new(Cell::new(0u32));

    for key in [10u32, 10, 11] {
        let runs = Rc::clone(&runs);
        composition.render(1, move || {
            let runs = runs.clone();
            crate::LayoutEffect!(key, move |_scope| {
                runs.set(runs.get() + 1);
            });
        });
        composition.run_layout_effects();
    }

    assert_eq!(runs.get(), 2);
}

#[test]
fn pending_layout_effect_is_cancelled_when_its_group_leaves() {
    let mut composition = Composition::new(MemoryApplier::new());
    let runs = Rc::new(Cell::new(0u32));

    let compose = |show: bool, runs: Rc<Cell<u32>>| {
        move || {
            if show {
                with_key(&"effectful", || {
                    let runs = runs.clone();
                    crate::LayoutEffect!((), move |_scope| {
                        runs.set(runs.get() + 1);
                    });
                });
            } else {
                with_key(&"empty", || {});
            }
        }
    };

    composition.render(1, compose(true, Rc::clone(&runs)));
    assert!(composition.has_pending_layout_effects());

    // The group is torn down before its effect ever gets to run.
    composition.render(1, compose(false, Rc::clone(&runs)));
    composition.run_layout_effects();

    assert_eq!(runs.get(), 0);
}

#[test]
fn nodes_from_abandoned_branches_are_evicted() {
    let mut composition = Composition::new(MemoryApplier::new());

    let compose = |which: &'static str| {
        move || {
            with_key(which, || {
                emit_node(move || DummyNode::new(which));
            });
        }
    };

    composition.render(1, compose("first"));
    let first_ids = composition.applier_mut().node_ids();
    // Root plus the emitted node.
    assert_eq!(first_ids.len(), 2);

    composition.render(1, compose("second"));
    let second_ids = composition.applier_mut().node_ids();
    assert_eq!(second_ids.len(), 2);
    assert_ne!(first_ids, second_ids);

    let root = composition.root();
    let dump = composition.applier_mut().dump_tree(root);
    assert!(dump.contains("second"));
    assert!(!dump.contains("first"));
}

#[test]
fn keyed_nodes_keep_identity_across_reorders() {
    let mut composition = Composition::new(MemoryApplier::new());

    let compose = |order: Vec<&'static str>| {
        move || {
            for label in &order {
                with_key(label, || {
                    emit_node({
                        let label = *label;
                        move || DummyNode::new(label)
                    });
                });
            }
        }
    };

    composition.render(1, compose(vec!["a", "b"]));
    let before = composition.applier_mut().node_ids();

    composition.render(1, compose(vec!["b", "a"]));
    let after = composition.applier_mut().node_ids();

    assert_eq!(before, after);
}

#[test]
fn stale_runtime_handle_is_inert() {
    let composition = Composition::new(MemoryApplier::new());
    let handle = composition.runtime_handle();
    drop(composition);

    assert!(!handle.is_alive());
    handle.mark_needs_frame();
    assert!(!handle.needs_frame());
    assert!(handle
        .with_applier(|applier| applier.node(0).is_some())
        .is_none());
}
