//! The card-collection store interface.
//!
//! The editing core never owns persistence — it mutates whatever collection
//! the embedder supplies through `CardStore`. `Board` is the in-memory
//! reference implementation, used directly by tests and by embedders that
//! keep the collection in process.
//!
//! Bulk moves are atomic: every index is validated before anything is
//! touched, so a rejected call leaves the store exactly as it was.

use crate::model::{Board, Card, CardRef};

/// Mutation surface over a card collection.
///
/// All operations report success as `bool`/`Option` instead of panicking;
/// out-of-range indices are a plain rejection.
pub trait CardStore {
    fn group_count(&self) -> usize;

    /// Number of cards in a group, or `None` if the group does not exist.
    fn group_len(&self, group: usize) -> Option<usize>;

    fn get(&self, group: usize, index: usize) -> Option<&Card>;

    /// Move one card. `to_index` addresses the target group *after* the card
    /// has been removed from its source position.
    fn move_card(&mut self, from_group: usize, from_index: usize, to_group: usize, to_index: usize)
    -> bool;

    /// Move several cards from one group as a single block, preserving their
    /// relative order. `indices` must be unique; `insert_at` addresses the
    /// target group after removal. All-or-nothing.
    fn move_cards(
        &mut self,
        from_group: usize,
        indices: &[usize],
        to_group: usize,
        insert_at: usize,
    ) -> bool;

    /// Remove a contiguous run of `count` cards starting at `start` and
    /// re-insert them at the given individual positions in `to_group`,
    /// ascending. Inverse of `move_cards` for originally scattered cards.
    fn restore_cards(
        &mut self,
        from_group: usize,
        start: usize,
        count: usize,
        to_group: usize,
        to_indices: &[usize],
    ) -> bool;

    fn insert(&mut self, group: usize, index: usize, card: Card) -> bool;

    fn remove(&mut self, group: usize, index: usize) -> Option<Card>;

    /// Set or remove (`None`) a named field on a card.
    fn set_field(&mut self, target: CardRef, field: &str, value: Option<&str>) -> bool;

    fn insert_detail(&mut self, target: CardRef, line: usize, text: &str) -> bool;

    fn remove_detail(&mut self, target: CardRef, line: usize) -> Option<String>;

    fn move_detail(&mut self, target: CardRef, from_line: usize, to_line: usize) -> bool;
}

impl CardStore for Board {
    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn group_len(&self, group: usize) -> Option<usize> {
        self.groups.get(group).map(|g| g.cards.len())
    }

    fn get(&self, group: usize, index: usize) -> Option<&Card> {
        self.groups.get(group)?.cards.get(index)
    }

    fn move_card(
        &mut self,
        from_group: usize,
        from_index: usize,
        to_group: usize,
        to_index: usize,
    ) -> bool {
        if self.get(from_group, from_index).is_none() || to_group >= self.groups.len() {
            return false;
        }
        let card = self.groups[from_group].cards.remove(from_index);
        let target = &mut self.groups[to_group].cards;
        let at = to_index.min(target.len());
        target.insert(at, card);
        true
    }

    fn move_cards(
        &mut self,
        from_group: usize,
        indices: &[usize],
        to_group: usize,
        insert_at: usize,
    ) -> bool {
        let Some(from_len) = self.group_len(from_group) else {
            return false;
        };
        if to_group >= self.groups.len() || indices.is_empty() {
            return false;
        }
        // Validate before mutating: indices in range and unique.
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        if sorted.last().is_some_and(|&i| i >= from_len) {
            return false;
        }
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return false;
        }
        let remaining = if from_group == to_group {
            from_len - sorted.len()
        } else {
            self.groups[to_group].cards.len()
        };
        if insert_at > remaining {
            return false;
        }

        // Remove descending so earlier indices stay valid.
        let mut block: Vec<Card> = Vec::with_capacity(sorted.len());
        for &i in sorted.iter().rev() {
            block.push(self.groups[from_group].cards.remove(i));
        }
        block.reverse();
        let target = &mut self.groups[to_group].cards;
        for (offset, card) in block.into_iter().enumerate() {
            target.insert(insert_at + offset, card);
        }
        true
    }

    fn restore_cards(
        &mut self,
        from_group: usize,
        start: usize,
        count: usize,
        to_group: usize,
        to_indices: &[usize],
    ) -> bool {
        let Some(from_len) = self.group_len(from_group) else {
            return false;
        };
        if to_group >= self.groups.len()
            || count == 0
            || to_indices.len() != count
            || start + count > from_len
        {
            return false;
        }
        let block: Vec<Card> = self.groups[from_group]
            .cards
            .drain(start..start + count)
            .collect();
        // Ascending insertion reproduces the original scatter.
        let target = &mut self.groups[to_group].cards;
        for (card, &at) in block.into_iter().zip(to_indices) {
            target.insert(at.min(target.len()), card);
        }
        true
    }

    fn insert(&mut self, group: usize, index: usize, card: Card) -> bool {
        let Some(g) = self.groups.get_mut(group) else {
            return false;
        };
        if index > g.cards.len() {
            return false;
        }
        g.cards.insert(index, card);
        true
    }

    fn remove(&mut self, group: usize, index: usize) -> Option<Card> {
        let g = self.groups.get_mut(group)?;
        if index >= g.cards.len() {
            return None;
        }
        Some(g.cards.remove(index))
    }

    fn set_field(&mut self, target: CardRef, field: &str, value: Option<&str>) -> bool {
        match self.card_mut(target) {
            Some(card) => {
                card.set_field(field, value);
                true
            }
            None => false,
        }
    }

    fn insert_detail(&mut self, target: CardRef, line: usize, text: &str) -> bool {
        match self.card_mut(target) {
            Some(card) if line <= card.details.len() => {
                card.details.insert(line, text.to_string());
                true
            }
            _ => false,
        }
    }

    fn remove_detail(&mut self, target: CardRef, line: usize) -> Option<String> {
        let card = self.card_mut(target)?;
        if line >= card.details.len() {
            return None;
        }
        Some(card.details.remove(line))
    }

    fn move_detail(&mut self, target: CardRef, from_line: usize, to_line: usize) -> bool {
        let Some(card) = self.card_mut(target) else {
            return false;
        };
        if from_line >= card.details.len() {
            return false;
        }
        let text = card.details.remove(from_line);
        let at = to_line.min(card.details.len());
        card.details.insert(at, text);
        true
    }
}
