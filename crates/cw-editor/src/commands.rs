//! Undo/Redo command history.
//!
//! Every mutating edit is recorded as an `UndoEntry` holding a forward and
//! an inverse `EditOp`. Ops are tagged enum values with the old/new payloads
//! captured at record time — self-contained, inspectable, and serializable,
//! never closures over live state. Undo applies the inverse against whatever
//! store the caller passes in; redo re-applies the forward op.
//!
//! Two bounded stacks: recording a new entry clears the redo stack
//! (branching history is not kept), and the undo stack drops its oldest
//! entry when it would exceed `max_depth`.

use cw_core::{Card, CardRef, CardStore};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default undo depth.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// One reversible edit against a card store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditOp {
    MoveCard {
        from_group: usize,
        from_index: usize,
        to_group: usize,
        to_index: usize,
    },
    /// Remove `indices` from `from_group`, insert as one block at `to_index`.
    MoveCards {
        from_group: usize,
        indices: Vec<usize>,
        to_group: usize,
        to_index: usize,
    },
    /// Remove a contiguous run and re-insert at the original scattered
    /// positions. Inverse of `MoveCards`.
    RestoreCards {
        from_group: usize,
        start: usize,
        count: usize,
        to_group: usize,
        to_indices: Vec<usize>,
    },
    InsertCard {
        group: usize,
        index: usize,
        card: Card,
    },
    RemoveCard {
        group: usize,
        index: usize,
    },
    /// `value: None` removes the field.
    SetField {
        target: CardRef,
        field: String,
        value: Option<String>,
    },
    InsertDetail {
        target: CardRef,
        line: usize,
        text: String,
    },
    RemoveDetail {
        target: CardRef,
        line: usize,
    },
    MoveDetail {
        target: CardRef,
        from_line: usize,
        to_line: usize,
    },
}

impl EditOp {
    /// Apply this op to the store. `false` means the store rejected it
    /// (stale indices); the store is untouched in that case.
    pub fn apply(&self, store: &mut dyn CardStore) -> bool {
        match self {
            EditOp::MoveCard {
                from_group,
                from_index,
                to_group,
                to_index,
            } => store.move_card(*from_group, *from_index, *to_group, *to_index),
            EditOp::MoveCards {
                from_group,
                indices,
                to_group,
                to_index,
            } => store.move_cards(*from_group, indices, *to_group, *to_index),
            EditOp::RestoreCards {
                from_group,
                start,
                count,
                to_group,
                to_indices,
            } => store.restore_cards(*from_group, *start, *count, *to_group, to_indices),
            EditOp::InsertCard { group, index, card } => {
                store.insert(*group, *index, card.clone())
            }
            EditOp::RemoveCard { group, index } => store.remove(*group, *index).is_some(),
            EditOp::SetField {
                target,
                field,
                value,
            } => store.set_field(*target, field, value.as_deref()),
            EditOp::InsertDetail { target, line, text } => {
                store.insert_detail(*target, *line, text)
            }
            EditOp::RemoveDetail { target, line } => store.remove_detail(*target, *line).is_some(),
            EditOp::MoveDetail {
                target,
                from_line,
                to_line,
            } => store.move_detail(*target, *from_line, *to_line),
        }
    }
}

/// A recorded edit: forward op, its inverse, and bookkeeping.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub description: String,
    pub timestamp: Instant,
    pub forward: EditOp,
    pub inverse: EditOp,
}

impl UndoEntry {
    pub fn new(description: impl Into<String>, forward: EditOp, inverse: EditOp) -> Self {
        Self {
            description: description.into(),
            timestamp: Instant::now(),
            forward,
            inverse,
        }
    }
}

/// Bounded two-stack undo/redo history.
pub struct CommandHistory {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl CommandHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Push an already-applied edit. Discards the redo branch and trims the
    /// oldest entry when over capacity.
    pub fn record(&mut self, entry: UndoEntry) {
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the most recent entry. Returns its description, or `None` when
    /// the stack is empty or the store rejected the inverse (the entry is
    /// dropped as stale in that case).
    pub fn undo(&mut self, store: &mut dyn CardStore) -> Option<String> {
        let entry = self.undo_stack.pop()?;
        if !entry.inverse.apply(store) {
            log::warn!("undo '{}' rejected by store; dropping entry", entry.description);
            return None;
        }
        let desc = entry.description.clone();
        self.redo_stack.push(entry);
        Some(desc)
    }

    /// Re-apply the most recently undone entry.
    pub fn redo(&mut self, store: &mut dyn CardStore) -> Option<String> {
        let entry = self.redo_stack.pop()?;
        if !entry.forward.apply(store) {
            log::warn!("redo '{}' rejected by store; dropping entry", entry.description);
            return None;
        }
        let desc = entry.description.clone();
        self.undo_stack.push(entry);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Descriptions of pending undo entries, most recent last.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().map(|e| e.description.as_str())
    }
}
