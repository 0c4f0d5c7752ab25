//! Hit testing interface: point → drop-zone / card lookup.
//!
//! The reorder engine never inspects rendered elements directly. The
//! embedding UI layer implements `HitTestProvider`, reporting world-space
//! bounds for whatever it currently renders; the engine asks for the
//! drop-zone under the pointer and the visual card order inside it.

use cw_core::Rect;

/// World-space bounds of one rendered card within a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    /// Card position within its group.
    pub index: usize,
    pub rect: Rect,
}

/// Spatial index supplied by the embedder.
pub trait HitTestProvider {
    /// The group whose drop-zone contains the world point, if any.
    fn group_at(&self, wx: f32, wy: f32) -> Option<usize>;

    /// Bounds of the currently rendered cards of `group`, in visual
    /// left-to-right order. Empty when the group renders no cards.
    fn cards_in(&self, group: usize) -> Vec<CardBounds>;
}

/// Insertion position for a pointer at world x: before the first card whose
/// visual center lies past the pointer, or after the last card if none does.
pub fn insertion_index(cards: &[CardBounds], wx: f32) -> usize {
    cards
        .iter()
        .position(|c| c.rect.center_x() > wx)
        .unwrap_or(cards.len())
}
