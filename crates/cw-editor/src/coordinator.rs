//! Editing coordinator: glue between the drag engine, the selection, the
//! undo history, and the embedder's card store.
//!
//! Every mutation flows through here so that it is (a) validated against
//! the store's current state, (b) recorded as one undo entry, and (c)
//! reflected in the selection. The selection is remapped optimistically
//! before a move is applied; if the store rejects the move, the remap is
//! rolled back and the failure goes to the notification sink.

use crate::commands::{CommandHistory, EditOp, UndoEntry};
use crate::drag::MoveIntent;
use crate::selection::SelectionModel;
use cw_core::{Card, CardRef, CardStore};

/// Where user-visible failures go (toast layer, status bar, test recorder).
pub trait FailureSink {
    fn report_failure(&mut self, message: &str);
}

impl<F: FnMut(&str)> FailureSink for F {
    fn report_failure(&mut self, message: &str) {
        self(message)
    }
}

pub struct EditingCoordinator {
    pub selection: SelectionModel,
    pub history: CommandHistory,
    sink: Box<dyn FailureSink>,
}

impl EditingCoordinator {
    pub fn new(sink: Box<dyn FailureSink>) -> Self {
        Self {
            selection: SelectionModel::new(),
            history: CommandHistory::default(),
            sink,
        }
    }

    // ─── Moves ───────────────────────────────────────────────────────────

    /// Apply a move intent from the drag engine. Returns `false` when the
    /// move was aborted (stale indices) or rejected by the store.
    pub fn apply_move(&mut self, intent: &MoveIntent, store: &mut dyn CardStore) -> bool {
        // A group or card may have vanished mid-drag (e.g. a concurrent
        // delete). Abort without recording anything.
        if store.group_len(intent.to_group).is_none()
            || intent
                .moved
                .iter()
                .any(|&i| store.get(intent.from_group, i).is_none())
        {
            log::debug!("move aborted: stale refs {:?}", intent);
            return false;
        }

        // Optimistic: point the selection at the destination slots.
        let snapshot = self.selection.state().clone();
        let dest: Vec<CardRef> = (0..intent.moved.len())
            .map(|o| CardRef::new(intent.to_group, intent.to_index + o))
            .collect();
        self.selection.select_many(&dest);

        let (forward, inverse, description) = if intent.is_multi {
            (
                EditOp::MoveCards {
                    from_group: intent.from_group,
                    indices: intent.moved.clone(),
                    to_group: intent.to_group,
                    to_index: intent.to_index,
                },
                EditOp::RestoreCards {
                    from_group: intent.to_group,
                    start: intent.to_index,
                    count: intent.moved.len(),
                    to_group: intent.from_group,
                    to_indices: intent.moved.clone(),
                },
                format!("Move {} cards", intent.moved.len()),
            )
        } else {
            (
                EditOp::MoveCard {
                    from_group: intent.from_group,
                    from_index: intent.from_index,
                    to_group: intent.to_group,
                    to_index: intent.to_index,
                },
                EditOp::MoveCard {
                    from_group: intent.to_group,
                    from_index: intent.to_index,
                    to_group: intent.from_group,
                    to_index: intent.from_index,
                },
                "Move card".to_string(),
            )
        };

        if !forward.apply(store) {
            self.selection.restore(&snapshot);
            self.sink.report_failure("Could not move the selected cards");
            return false;
        }
        self.history.record(UndoEntry::new(description, forward, inverse));
        true
    }

    // ─── Field & card edits ──────────────────────────────────────────────

    /// Set (or remove, with `None`) a named field on a card.
    pub fn edit_field(
        &mut self,
        target: CardRef,
        field: &str,
        value: Option<&str>,
        store: &mut dyn CardStore,
    ) -> bool {
        let Some(card) = store.get(target.group, target.index) else {
            return false;
        };
        let old = card.field(field).map(str::to_string);

        let forward = EditOp::SetField {
            target,
            field: field.to_string(),
            value: value.map(str::to_string),
        };
        let inverse = EditOp::SetField {
            target,
            field: field.to_string(),
            value: old,
        };
        self.apply_and_record(format!("Edit field '{field}'"), forward, inverse, store)
    }

    pub fn add_card(
        &mut self,
        group: usize,
        index: usize,
        card: Card,
        store: &mut dyn CardStore,
    ) -> bool {
        let forward = EditOp::InsertCard { group, index, card };
        let inverse = EditOp::RemoveCard { group, index };
        self.apply_and_record("Add card".to_string(), forward, inverse, store)
    }

    pub fn remove_card(&mut self, group: usize, index: usize, store: &mut dyn CardStore) -> bool {
        let Some(card) = store.get(group, index).cloned() else {
            return false;
        };
        let forward = EditOp::RemoveCard { group, index };
        let inverse = EditOp::InsertCard { group, index, card };
        if !self.apply_and_record("Remove card".to_string(), forward, inverse, store) {
            return false;
        }
        // The slot is gone; drop it from the selection.
        self.selection.remove(CardRef::new(group, index));
        true
    }

    // ─── Detail-line edits ───────────────────────────────────────────────

    pub fn add_detail(
        &mut self,
        target: CardRef,
        line: usize,
        text: &str,
        store: &mut dyn CardStore,
    ) -> bool {
        let forward = EditOp::InsertDetail {
            target,
            line,
            text: text.to_string(),
        };
        let inverse = EditOp::RemoveDetail { target, line };
        self.apply_and_record("Add detail line".to_string(), forward, inverse, store)
    }

    pub fn remove_detail(
        &mut self,
        target: CardRef,
        line: usize,
        store: &mut dyn CardStore,
    ) -> bool {
        let Some(text) = store
            .get(target.group, target.index)
            .and_then(|c| c.details.get(line).cloned())
        else {
            return false;
        };
        let forward = EditOp::RemoveDetail { target, line };
        let inverse = EditOp::InsertDetail { target, line, text };
        self.apply_and_record("Remove detail line".to_string(), forward, inverse, store)
    }

    pub fn move_detail(
        &mut self,
        target: CardRef,
        from_line: usize,
        to_line: usize,
        store: &mut dyn CardStore,
    ) -> bool {
        let Some(len) = store
            .get(target.group, target.index)
            .map(|c| c.details.len())
        else {
            return false;
        };
        if from_line >= len {
            return false;
        }
        // The store clamps the destination; mirror that here so the
        // recorded inverse starts from where the line actually landed.
        let landed = to_line.min(len - 1);
        let forward = EditOp::MoveDetail {
            target,
            from_line,
            to_line: landed,
        };
        let inverse = EditOp::MoveDetail {
            target,
            from_line: landed,
            to_line: from_line,
        };
        self.apply_and_record("Move detail line".to_string(), forward, inverse, store)
    }

    // ─── Undo / redo ─────────────────────────────────────────────────────

    /// Undo the last edit. Empty history is a silent `false`; a store
    /// rejection (board changed underneath the entry) is surfaced.
    pub fn undo(&mut self, store: &mut dyn CardStore) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        match self.history.undo(store) {
            Some(desc) => {
                log::debug!("undid '{desc}'");
                true
            }
            None => {
                self.sink
                    .report_failure("Undo failed: the board changed since that edit");
                false
            }
        }
    }

    pub fn redo(&mut self, store: &mut dyn CardStore) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        match self.history.redo(store) {
            Some(desc) => {
                log::debug!("redid '{desc}'");
                true
            }
            None => {
                self.sink
                    .report_failure("Redo failed: the board changed since that edit");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn apply_and_record(
        &mut self,
        description: String,
        forward: EditOp,
        inverse: EditOp,
        store: &mut dyn CardStore,
    ) -> bool {
        if !forward.apply(store) {
            self.sink.report_failure(&format!("{description} failed"));
            return false;
        }
        self.history.record(UndoEntry::new(description, forward, inverse));
        true
    }
}
