//! Positional memoization storage.
//!
//! The slot table is a tree of groups mirroring the shape of the composable
//! call graph. Each group is identified by a [`Key`] among its siblings and
//! owns the values remembered while it was open. A recomposition pass walks
//! the same tree; any group that is not revisited by the time its parent
//! closes is dropped, which releases its remembered values (running their
//! destructors, e.g. effect cancellation) and reports the node ids it had
//! emitted so the applier can evict them.

use std::any::Any;

use crate::owned::Owned;
use crate::{Key, NodeId};

/// Marker wrapper for node ids stored in slots by `emit_node`. Dropping a
/// slot of this type releases the node from the applier tree.
pub(crate) struct EmittedNode(pub(crate) NodeId);

struct GroupSlot {
    key: Key,
    values: Vec<Box<dyn Any>>,
    value_cursor: usize,
    children: Vec<usize>,
    child_cursor: usize,
}

impl GroupSlot {
    fn new(key: Key) -> Self {
        Self {
            key,
            values: Vec::new(),
            value_cursor: 0,
            children: Vec::new(),
            child_cursor: 0,
        }
    }
}

#[derive(Default)]
pub(crate) struct SlotTable {
    arena: Vec<Option<GroupSlot>>,
    free: Vec<usize>,
    root: Option<usize>,
    stack: Vec<usize>,
    released_nodes: Vec<NodeId>,
}

impl SlotTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn group(&self, index: usize) -> &GroupSlot {
        self.arena[index].as_ref().expect("group slot vacated")
    }

    fn group_mut(&mut self, index: usize) -> &mut GroupSlot {
        self.arena[index].as_mut().expect("group slot vacated")
    }

    fn alloc(&mut self, key: Key) -> usize {
        let slot = GroupSlot::new(key);
        match self.free.pop() {
            Some(index) => {
                self.arena[index] = Some(slot);
                index
            }
            None => {
                self.arena.push(Some(slot));
                self.arena.len() - 1
            }
        }
    }

    /// Open the child group with `key` under the current group, creating or
    /// reordering as needed. With an empty stack this opens the root group.
    pub(crate) fn begin_group(&mut self, key: Key) {
        let index = match self.stack.last().copied() {
            Some(parent) => {
                let cursor = self.group(parent).child_cursor;
                let found = self.group(parent).children[cursor..]
                    .iter()
                    .position(|&child| self.group(child).key == key)
                    .map(|offset| cursor + offset);
                let index = match found {
                    Some(position) => {
                        let child = self.group_mut(parent).children.remove(position);
                        self.group_mut(parent).children.insert(cursor, child);
                        child
                    }
                    None => {
                        let child = self.alloc(key);
                        self.group_mut(parent).children.insert(cursor, child);
                        child
                    }
                };
                self.group_mut(parent).child_cursor += 1;
                index
            }
            None => match self.root {
                Some(root) if self.group(root).key == key => root,
                stale => {
                    if let Some(old) = stale {
                        self.drop_group(old);
                    }
                    let root = self.alloc(key);
                    self.root = Some(root);
                    root
                }
            },
        };
        let group = self.group_mut(index);
        group.value_cursor = 0;
        group.child_cursor = 0;
        self.stack.push(index);
    }

    /// Close the current group, dropping every child and value slot that was
    /// not revisited during this pass.
    pub(crate) fn end_group(&mut self) {
        let index = self.stack.pop().expect("end_group without begin_group");
        let stale_children: Vec<usize> = {
            let group = self.group_mut(index);
            group.children.split_off(group.child_cursor)
        };
        for child in stale_children {
            self.drop_group(child);
        }
        let stale_values: Vec<Box<dyn Any>> = {
            let group = self.group_mut(index);
            group.values.split_off(group.value_cursor)
        };
        for value in stale_values {
            self.release_value(value);
        }
    }

    /// Fetch or initialize the next value slot of the current group.
    pub(crate) fn remember_value<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        let index = *self.stack.last().expect("remember outside of a group");
        let cursor = self.group(index).value_cursor;
        if cursor < self.group(index).values.len() {
            if let Some(existing) = self.group(index).values[cursor].downcast_ref::<Owned<T>>() {
                let handle = existing.clone();
                self.group_mut(index).value_cursor += 1;
                return handle;
            }
            // The slot holds a value of a different type: the call site
            // changed shape, so the old value is torn down and replaced.
            let handle = Owned::new(init());
            let old = std::mem::replace(
                &mut self.group_mut(index).values[cursor],
                Box::new(handle.clone()),
            );
            self.release_value(old);
            self.group_mut(index).value_cursor += 1;
            return handle;
        }
        let handle = Owned::new(init());
        let group = self.group_mut(index);
        group.values.push(Box::new(handle.clone()));
        group.value_cursor += 1;
        handle
    }

    /// Node ids released by group teardown since the last call.
    pub(crate) fn take_released(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.released_nodes)
    }

    fn drop_group(&mut self, index: usize) {
        let Some(group) = self.arena[index].take() else {
            return;
        };
        for child in group.children {
            self.drop_group(child);
        }
        for value in group.values {
            self.release_value(value);
        }
        self.free.push(index);
    }

    fn release_value(&mut self, value: Box<dyn Any>) {
        if let Some(emitted) = value.downcast_ref::<Owned<EmittedNode>>() {
            self.released_nodes.push(emitted.with(|node| node.0));
        }
        drop(value);
    }
}
