//! Integration tests: full drag → move → history pipeline (cw-editor).
//!
//! Drives the reorder engine with pointer positions over a live board
//! layout, feeds the resulting intents through the coordinator, and checks
//! the board plus undo round-trips across crate boundaries.

use cw_core::{Board, Card, CardRef, CardStore, Group, Rect};
use cw_editor::coordinator::EditingCoordinator;
use cw_editor::drag::DragReorderEngine;
use cw_view::{CardBounds, HitTestProvider, ViewportTransform};

/// Layout mirror of a board: each group is a 200-tall horizontal band,
/// cards 100 wide with a 10px gutter.
struct WallLayout {
    row_lens: Vec<usize>,
}

impl WallLayout {
    fn of(board: &Board) -> Self {
        Self {
            row_lens: board.groups.iter().map(|g| g.cards.len()).collect(),
        }
    }
}

impl HitTestProvider for WallLayout {
    fn group_at(&self, wx: f32, wy: f32) -> Option<usize> {
        (0..self.row_lens.len())
            .find(|&g| Rect::new(0.0, g as f32 * 200.0, 2000.0, 200.0).contains(wx, wy))
    }

    fn cards_in(&self, group: usize) -> Vec<CardBounds> {
        (0..self.row_lens[group])
            .map(|i| CardBounds {
                index: i,
                rect: Rect::new(i as f32 * 110.0, group as f32 * 200.0 + 20.0, 100.0, 60.0),
            })
            .collect()
    }
}

fn board(groups: &[(&str, &[&str])]) -> Board {
    Board {
        groups: groups
            .iter()
            .map(|(name, cards)| Group {
                name: name.to_string(),
                cards: cards.iter().copied().map(Card::new).collect(),
            })
            .collect(),
    }
}

fn titles(b: &Board, group: usize) -> Vec<&str> {
    b.groups[group].cards.iter().map(|c| c.title.as_str()).collect()
}

fn coordinator() -> EditingCoordinator {
    EditingCoordinator::new(Box::new(|m: &str| panic!("unexpected failure: {m}")))
}

/// Center x of card `i` under the standard layout.
fn cx(i: usize) -> f32 {
    i as f32 * 110.0 + 50.0
}

/// Pointer y inside group `g`'s band.
fn gy(g: usize) -> f32 {
    g as f32 * 200.0 + 100.0
}

// ─── Single-card drags ──────────────────────────────────────────────────

#[test]
fn drag_x_past_y_center_yields_y_x_z() {
    let mut b = board(&[("A", &["X", "Y", "Z"])]);
    let vp = ViewportTransform::new();
    let mut engine = DragReorderEngine::new();
    let mut coord = coordinator();

    engine.start_drag(0, 0, cx(0), gy(0), &vp, &[]).unwrap();

    // Drift rightward; nothing happens until Y's center is crossed
    for x in [cx(0) + 20.0, (cx(0) + cx(1)) / 2.0] {
        let wall = WallLayout::of(&b);
        assert!(engine.update(x, gy(0), &vp, &wall).is_none());
    }

    let wall = WallLayout::of(&b);
    let intent = engine.update(cx(1) + 2.0, gy(0), &vp, &wall).unwrap();
    assert_eq!((intent.from_group, intent.from_index), (0, 0));
    assert_eq!((intent.to_group, intent.to_index), (0, 1));

    assert!(coord.apply_move(&intent, &mut b));
    engine.end_drag();
    assert_eq!(titles(&b, 0), vec!["Y", "X", "Z"]);
    assert_eq!(b.groups[0].cards.len(), 3);
}

#[test]
fn same_group_reorder_preserves_card_multiset() {
    let mut b = board(&[("A", &["a", "b", "c", "d", "e"])]);
    let vp = ViewportTransform::new();
    let mut engine = DragReorderEngine::new();
    let mut coord = coordinator();

    engine.start_drag(0, 2, cx(2), gy(0), &vp, &[]).unwrap();
    // Walk card c leftward to the front, one neighbor at a time
    for x in [cx(1) - 2.0, cx(0) - 2.0] {
        let wall = WallLayout::of(&b);
        if let Some(intent) = engine.update(x, gy(0), &vp, &wall) {
            assert!(coord.apply_move(&intent, &mut b));
        }
    }
    engine.end_drag();

    assert_eq!(titles(&b, 0), vec!["c", "a", "b", "d", "e"]);
    let mut sorted = titles(&b, 0);
    sorted.sort_unstable();
    assert_eq!(sorted, vec!["a", "b", "c", "d", "e"]);
}

// ─── Cross-group drags ──────────────────────────────────────────────────

#[test]
fn cross_group_move_is_atomic_and_count_invariant() {
    let mut b = board(&[("A", &["a", "b", "c"]), ("B", &["d", "e"])]);
    let vp = ViewportTransform::new();
    let mut engine = DragReorderEngine::new();
    let mut coord = coordinator();

    engine.start_drag(0, 1, cx(1), gy(0), &vp, &[]).unwrap();
    let wall = WallLayout::of(&b);
    let intent = engine.update(cx(0) - 10.0, gy(1), &vp, &wall).unwrap();
    assert!(coord.apply_move(&intent, &mut b));
    engine.end_drag();

    assert_eq!(b.groups[0].cards.len(), 2);
    assert_eq!(b.groups[1].cards.len(), 3);
    assert_eq!(b.card_count(), 5);
    assert_eq!(titles(&b, 1), vec!["b", "d", "e"]);
}

#[test]
fn continuous_drag_through_two_groups() {
    let mut b = board(&[("A", &["a", "b"]), ("B", &["c", "d"])]);
    let vp = ViewportTransform::new();
    let mut engine = DragReorderEngine::new();
    let mut coord = coordinator();

    engine.start_drag(0, 0, cx(0), gy(0), &vp, &[]).unwrap();

    // Into group B after its last card
    let wall = WallLayout::of(&b);
    let intent = engine.update(cx(1) + 100.0, gy(1), &vp, &wall).unwrap();
    assert_eq!((intent.to_group, intent.to_index), (1, 2));
    assert!(coord.apply_move(&intent, &mut b));
    assert_eq!(titles(&b, 1), vec!["c", "d", "a"]);

    // Same gesture keeps dragging inside B, back toward the front
    let wall = WallLayout::of(&b);
    let intent = engine.update(cx(1) - 2.0, gy(1), &vp, &wall).unwrap();
    assert_eq!((intent.from_group, intent.to_group), (1, 1));
    assert!(coord.apply_move(&intent, &mut b));
    engine.end_drag();
    assert_eq!(titles(&b, 1), vec!["c", "a", "d"]);
}

// ─── Multi-card drags ───────────────────────────────────────────────────

#[test]
fn multi_drag_moves_selection_block_across_groups() {
    let mut b = board(&[("A", &["a", "b", "c", "d"]), ("B", &["e"])]);
    let vp = ViewportTransform::new();
    let mut engine = DragReorderEngine::new();
    let mut coord = coordinator();

    let selection = [CardRef::new(0, 1), CardRef::new(0, 3)];
    coord.selection.select_many(&selection);
    engine.start_drag(0, 1, cx(1), gy(0), &vp, &selection).unwrap();

    let wall = WallLayout::of(&b);
    let intent = engine.update(cx(0) + 60.0, gy(1), &vp, &wall).unwrap();
    assert!(intent.is_multi);
    assert_eq!(intent.moved, vec![1, 3]);
    assert!(coord.apply_move(&intent, &mut b));
    engine.end_drag();

    assert_eq!(titles(&b, 0), vec!["a", "c"]);
    assert_eq!(titles(&b, 1), vec!["e", "b", "d"]);
    // Selection followed the block to its new home
    assert!(coord.selection.is_selected(CardRef::new(1, 1)));
    assert!(coord.selection.is_selected(CardRef::new(1, 2)));

    // One undo restores the scattered source positions
    assert!(coord.undo(&mut b));
    assert_eq!(titles(&b, 0), vec!["a", "b", "c", "d"]);
    assert_eq!(titles(&b, 1), vec!["e"]);
}

#[test]
fn duplicate_indices_never_reach_the_board() {
    let mut b = board(&[("A", &["a", "b", "c"]), ("B", &[])]);
    let vp = ViewportTransform::new();
    let mut engine = DragReorderEngine::new();

    let selection = [CardRef::new(0, 1), CardRef::new(0, 1), CardRef::new(0, 2)];
    assert!(engine.start_drag(0, 1, cx(1), gy(0), &vp, &selection).is_err());

    // No intent, no mutation, ever
    let wall = WallLayout::of(&b);
    assert!(engine.update(cx(0), gy(0), &vp, &wall).is_none());
    assert_eq!(titles(&b, 0), vec!["a", "b", "c"]);
    assert!(!b.move_cards(0, &[1, 1, 2], 1, 0));
}

// ─── Undo/redo over sequences ───────────────────────────────────────────

#[test]
fn n_actions_undo_n_restores_initial_state() {
    let mut b = board(&[("A", &["a", "b", "c"]), ("B", &["d"])]);
    let initial = b.clone();
    let vp = ViewportTransform::new();
    let mut coord = coordinator();

    // Five distinct recorded edits
    assert!(coord.edit_field(CardRef::new(0, 0), "points", Some("3"), &mut b));
    assert!(coord.add_detail(CardRef::new(0, 1), 0, "note", &mut b));
    assert!(coord.add_card(1, 0, Card::new("new"), &mut b));
    {
        let mut engine = DragReorderEngine::new();
        engine.start_drag(0, 0, cx(0), gy(0), &vp, &[]).unwrap();
        let wall = WallLayout::of(&b);
        let intent = engine.update(cx(1) + 2.0, gy(0), &vp, &wall).unwrap();
        assert!(coord.apply_move(&intent, &mut b));
    }
    assert!(coord.remove_card(1, 1, &mut b));

    let edited = b.clone();

    for _ in 0..5 {
        assert!(coord.undo(&mut b));
    }
    assert_eq!(b, initial);
    assert!(!coord.can_undo());

    for _ in 0..5 {
        assert!(coord.redo(&mut b));
    }
    assert_eq!(b, edited);
    assert!(!coord.can_redo());
}

#[test]
fn history_bound_drops_oldest_edits() {
    let mut b = board(&[("A", &["a"])]);
    let mut coord = coordinator();
    let target = CardRef::new(0, 0);

    // CommandHistory::default() caps at 50; record 55 field edits
    for i in 0..55 {
        assert!(coord.edit_field(target, "points", Some(&i.to_string()), &mut b));
    }

    let mut undone = 0;
    while coord.undo(&mut b) {
        undone += 1;
    }
    assert_eq!(undone, 50);
    // The 5 oldest edits are beyond reach: values 0..=4 were trimmed, so
    // unwinding stops at the state after edit #4
    assert_eq!(b.card(target).unwrap().field("points"), Some("4"));
}
