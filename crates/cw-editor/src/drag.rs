//! Pointer-driven drag-and-drop reorder engine.
//!
//! State machine: Idle → Dragging → Idle. Crossing into another group's
//! drop-zone re-parents the drag in place (the tracked source group becomes
//! the target and the dragged indices are renumbered), so a single gesture
//! can travel through several groups without restarting.
//!
//! The engine runs on every pointer-move event, so `update` stays cheap:
//! one drop-zone lookup, one pass over the hovered group's rendered bounds,
//! and a composite-key check that suppresses repeat emissions for an
//! unchanged target.
//!
//! Three distinct move decisions, on purpose:
//! - cross-group: plain insertion before the first card whose center lies
//!   past the pointer;
//! - same-group multi-card: insertion index against non-dragged cards only,
//!   proposed only when it falls outside the dragged block's footprint;
//! - same-group single-card: hysteresis — the card swaps with a neighbor
//!   only once the pointer crosses that neighbor's center, not at the
//!   midpoint. The asymmetry with the multi-card branch is deliberate UX
//!   tuning; do not unify them.

use cw_core::CardRef;
use cw_view::{HitTestProvider, ViewportTransform, insertion_index};
use smallvec::SmallVec;

/// Dragged card indices within the tracked source group, sorted ascending.
pub type IndexSet = SmallVec<[usize; 4]>;

/// Live drag-gesture state. Reset to inactive on `end_drag`.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub active: bool,
    /// Sorted, duplicate-free indices in `source_group`.
    pub dragged: IndexSet,
    /// Re-parented mid-drag on a cross-group move.
    pub source_group: usize,
    /// Pointer position in world coordinates, for ghost rendering.
    pub preview: (f32, f32),
    pub is_multi: bool,
}

/// One proposed move, consumed immediately by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveIntent {
    pub from_group: usize,
    /// First dragged index (the whole set is in `moved`).
    pub from_index: usize,
    pub to_group: usize,
    /// Insertion index in the target group, addressed after the dragged
    /// cards have been removed.
    pub to_index: usize,
    pub moved: Vec<usize>,
    pub is_multi: bool,
}

/// Computes proposed moves from pointer positions. Owns no card data —
/// bounds come from the injected `HitTestProvider`, coordinates from the
/// `ViewportTransform`.
pub struct DragReorderEngine {
    state: DragState,
    /// `(from_group, to_group, to_index)` of the last emitted intent;
    /// suppresses duplicate emission while the pointer sits on one target.
    last_emitted: Option<(usize, usize, usize)>,
}

impl Default for DragReorderEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DragReorderEngine {
    pub fn new() -> Self {
        Self {
            state: DragState::default(),
            last_emitted: None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.active
    }

    /// Begin a drag on the card at `(group, index)`.
    ///
    /// When `selection` holds more than one unique card and includes the
    /// touched one, the whole same-group selection is carried as a block;
    /// otherwise only the touched card moves. Duplicate indices in the
    /// resulting multi-drag set are a programmer error: the drag is
    /// rejected and the engine stays Idle.
    pub fn start_drag(
        &mut self,
        group: usize,
        index: usize,
        px: f32,
        py: f32,
        viewport: &ViewportTransform,
        selection: &[CardRef],
    ) -> Result<(), String> {
        // A new gesture force-clears any stale drag.
        self.end_drag();

        let in_group: Vec<usize> = selection
            .iter()
            .filter(|r| r.group == group)
            .map(|r| r.index)
            .collect();
        let touches_selection = in_group.contains(&index);

        let mut unique = in_group.clone();
        unique.sort_unstable();
        unique.dedup();

        let multi = touches_selection && unique.len() > 1;
        if multi && unique.len() != in_group.len() {
            log::warn!("drag rejected: duplicate indices in multi-drag set {in_group:?}");
            return Err(format!("duplicate indices in multi-drag set: {in_group:?}"));
        }

        let dragged: IndexSet = if multi {
            unique.into_iter().collect()
        } else {
            SmallVec::from_slice(&[index])
        };

        log::debug!("start drag: group {group} indices {dragged:?} (multi: {multi})");
        self.state = DragState {
            active: true,
            is_multi: multi,
            dragged,
            source_group: group,
            preview: viewport.screen_to_world(px, py),
        };
        Ok(())
    }

    /// Process one pointer-move event. Returns at most one `MoveIntent`;
    /// repeated calls over an unchanged target return `None`.
    pub fn update(
        &mut self,
        px: f32,
        py: f32,
        viewport: &ViewportTransform,
        hit: &dyn HitTestProvider,
    ) -> Option<MoveIntent> {
        if !self.state.active {
            return None;
        }
        let (wx, wy) = viewport.screen_to_world(px, py);
        self.state.preview = (wx, wy);

        let to_group = hit.group_at(wx, wy)?;
        let cards = hit.cards_in(to_group);
        if cards.is_empty() {
            return None;
        }

        if to_group != self.state.source_group {
            self.cross_group_move(to_group, wx, &cards)
        } else if self.state.is_multi {
            self.same_group_block_move(wx, &cards)
        } else {
            self.same_group_swap(wx, &cards)
        }
    }

    /// End the gesture and return to Idle.
    pub fn end_drag(&mut self) {
        self.state = DragState::default();
        self.last_emitted = None;
    }

    // ─── Move decisions ──────────────────────────────────────────────────

    /// Crossing into another group always proposes a move, then re-parents
    /// the drag so the gesture continues inside the new group.
    fn cross_group_move(
        &mut self,
        to_group: usize,
        wx: f32,
        cards: &[cw_view::CardBounds],
    ) -> Option<MoveIntent> {
        let t = insertion_index(cards, wx);
        let intent = self.emit(to_group, t)?;

        // Re-parent: the dragged cards now live in the target group as a
        // contiguous run starting at the insertion point.
        let count = self.state.dragged.len();
        self.state.source_group = to_group;
        self.state.dragged = (t..t + count).collect();
        Some(intent)
    }

    /// Block move within the source group. The insertion index is computed
    /// against non-dragged cards only (full-list positions), and a move is
    /// proposed only when it falls strictly outside the dragged block —
    /// anything over the block's own footprint is a no-op.
    fn same_group_block_move(
        &mut self,
        wx: f32,
        cards: &[cw_view::CardBounds],
    ) -> Option<MoveIntent> {
        let dragged = &self.state.dragged;
        let min = *dragged.first()?;
        let max = *dragged.last()?;

        let target = cards
            .iter()
            .find(|c| !dragged.contains(&c.index) && c.rect.center_x() > wx)
            .map(|c| c.index)
            .unwrap_or(cards.len());

        if target >= min && target <= max + 1 {
            return None;
        }

        // Convert to an insertion index among the remaining cards.
        let insert_at = cards
            .iter()
            .filter(|c| c.index < target && !dragged.contains(&c.index))
            .count();
        let group = self.state.source_group;
        let intent = self.emit(group, insert_at)?;

        let count = self.state.dragged.len();
        self.state.dragged = (insert_at..insert_at + count).collect();
        Some(intent)
    }

    /// Single-card swap with hysteresis: only propose once the pointer has
    /// crossed past the neighbor's center. The card doesn't jump at the
    /// midpoint between its own slot and the neighbor's.
    fn same_group_swap(&mut self, wx: f32, cards: &[cw_view::CardBounds]) -> Option<MoveIntent> {
        let current = *self.state.dragged.first()?;
        let pos = cards.iter().position(|c| c.index == current)?;

        let to = if pos > 0 && wx < cards[pos - 1].rect.center_x() {
            cards[pos - 1].index
        } else if pos + 1 < cards.len() && wx > cards[pos + 1].rect.center_x() {
            cards[pos + 1].index
        } else {
            return None;
        };

        let group = self.state.source_group;
        let intent = self.emit(group, to)?;
        self.state.dragged = SmallVec::from_slice(&[to]);
        Some(intent)
    }

    /// Build the intent for the current dragged set, unless the composite
    /// `from-to-index` key matches the previous emission.
    fn emit(&mut self, to_group: usize, to_index: usize) -> Option<MoveIntent> {
        let key = (self.state.source_group, to_group, to_index);
        if self.last_emitted == Some(key) {
            return None;
        }

        let intent = MoveIntent {
            from_group: self.state.source_group,
            from_index: *self.state.dragged.first()?,
            to_group,
            to_index,
            moved: self.state.dragged.to_vec(),
            is_multi: self.state.is_multi,
        };
        self.last_emitted = Some(key);
        log::debug!(
            "move intent: {:?} group {} -> group {} at {}",
            intent.moved,
            intent.from_group,
            intent.to_group,
            intent.to_index
        );
        Some(intent)
    }
}
