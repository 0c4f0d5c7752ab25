//! Selection model: which cards are currently selected.
//!
//! Invariants held after every operation:
//! - `selected` never contains duplicate refs (box-select gestures can feed
//!   in overlapping batches, so `select_many` de-duplicates rather than
//!   trusting the caller);
//! - `primary` is a member of `selected` whenever the selection is non-empty;
//! - `is_multi == (count > 1)`.

use cw_core::{CardRef, ListenerId, Listeners};
use serde::{Deserialize, Serialize};

/// Snapshot of the current selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub primary: Option<CardRef>,
    pub selected: Vec<CardRef>,
    pub is_multi: bool,
}

/// Single writer of `SelectionState`.
pub struct SelectionModel {
    state: SelectionState,
    listeners: Listeners<SelectionState>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionModel {
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
            listeners: Listeners::new(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn on_change(&mut self, f: impl FnMut(&SelectionState) + 'static) -> ListenerId {
        self.listeners.register(f)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    fn commit(&mut self, primary: Option<CardRef>, selected: Vec<CardRef>) {
        let next = SelectionState {
            is_multi: selected.len() > 1,
            primary,
            selected,
        };
        if next != self.state {
            self.state = next.clone();
            self.listeners.emit(&next);
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Replace the selection with a single card.
    pub fn select_single(&mut self, r: CardRef) {
        self.commit(Some(r), vec![r]);
    }

    pub fn add(&mut self, r: CardRef) {
        if self.is_selected(r) {
            return;
        }
        let mut selected = self.state.selected.clone();
        selected.push(r);
        let primary = self.state.primary.or(Some(r));
        self.commit(primary, selected);
    }

    /// Remove one ref. Empties to a full clear; otherwise the first
    /// remaining member becomes primary if the primary was removed.
    pub fn remove(&mut self, r: CardRef) {
        let mut selected = self.state.selected.clone();
        selected.retain(|s| *s != r);
        if selected.is_empty() {
            self.clear();
            return;
        }
        let primary = match self.state.primary {
            Some(p) if p != r => Some(p),
            _ => Some(selected[0]),
        };
        self.commit(primary, selected);
    }

    /// Replace the selection with a batch, de-duplicated by (group, index).
    /// The first unique ref becomes primary.
    pub fn select_many(&mut self, refs: &[CardRef]) {
        let mut selected: Vec<CardRef> = Vec::with_capacity(refs.len());
        for &r in refs {
            if !selected.contains(&r) {
                selected.push(r);
            }
        }
        let primary = selected.first().copied();
        self.commit(primary, selected);
    }

    pub fn toggle(&mut self, r: CardRef) {
        if self.is_selected(r) {
            self.remove(r);
        } else {
            self.add(r);
        }
    }

    pub fn clear(&mut self) {
        self.commit(None, Vec::new());
    }

    /// Restore a previously captured snapshot, re-checking the invariants
    /// (used to roll back an optimistic update).
    pub fn restore(&mut self, snapshot: &SelectionState) {
        let mut selected: Vec<CardRef> = Vec::with_capacity(snapshot.selected.len());
        for &r in &snapshot.selected {
            if !selected.contains(&r) {
                selected.push(r);
            }
        }
        let primary = match snapshot.primary {
            Some(p) if selected.contains(&p) => Some(p),
            _ => selected.first().copied(),
        };
        self.commit(primary, selected);
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn is_selected(&self, r: CardRef) -> bool {
        self.state.selected.contains(&r)
    }

    pub fn is_primary(&self, r: CardRef) -> bool {
        self.state.primary == Some(r)
    }

    pub fn count(&self) -> usize {
        self.state.selected.len()
    }

    pub fn is_multi(&self) -> bool {
        self.state.is_multi
    }
}
