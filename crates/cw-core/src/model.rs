//! Core data model for card boards.
//!
//! A board is an ordered list of named groups; each group holds an ordered
//! list of cards. Cards are addressed positionally by `CardRef` — indices are
//! positions in the sequence, not stable identities, and shift whenever cards
//! are inserted or removed around them. Anything that caches a `CardRef`
//! across a mutation must remap it.

use serde::{Deserialize, Serialize};

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ─── Card addressing ─────────────────────────────────────────────────────

/// Positional address of one card: group position + card position within it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CardRef {
    pub group: usize,
    pub index: usize,
}

impl CardRef {
    pub const fn new(group: usize, index: usize) -> Self {
        Self { group, index }
    }
}

// ─── Cards & groups ──────────────────────────────────────────────────────

/// One card: a title, free-form detail lines, and named fields.
///
/// Fields are an ordered list rather than a map so that emitted order is
/// stable and duplicate-free by construction (`set_field` updates in place).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub details: Vec<String>,
    pub fields: Vec<(String, String)>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or remove a field. Returns the previous value, if any.
    /// `None` removes the field entirely.
    pub fn set_field(&mut self, name: &str, value: Option<&str>) -> Option<String> {
        match (self.fields.iter().position(|(k, _)| k == name), value) {
            (Some(pos), Some(v)) => {
                Some(std::mem::replace(&mut self.fields[pos].1, v.to_string()))
            }
            (Some(pos), None) => Some(self.fields.remove(pos).1),
            (None, Some(v)) => {
                self.fields.push((name.to_string(), v.to_string()));
                None
            }
            (None, None) => None,
        }
    }
}

/// A named, ordered group of cards (one column / lane on the board).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub cards: Vec<Card>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }
}

/// The whole board: an ordered list of groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    pub groups: Vec<Group>,
}

impl Board {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    pub fn card(&self, r: CardRef) -> Option<&Card> {
        self.groups.get(r.group)?.cards.get(r.index)
    }

    pub fn card_mut(&mut self, r: CardRef) -> Option<&mut Card> {
        self.groups.get_mut(r.group)?.cards.get_mut(r.index)
    }

    /// Total number of cards across all groups.
    pub fn card_count(&self) -> usize {
        self.groups.iter().map(|g| g.cards.len()).sum()
    }
}
