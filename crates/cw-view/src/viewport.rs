//! Viewport spatial transform: pan, zoom, and coordinate conversion.
//!
//! The transform is the single writer of `ViewportState`. Consumers read
//! snapshots or subscribe to change events; the drag engine uses
//! `screen_to_world` to map pointer positions into board space.
//!
//! Every input is clamped rather than rejected — this component cannot
//! fail, only saturate at its zoom/pan boundaries.

use cw_core::{Listeners, Rect};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Zoom applied by `focus_on` when the caller does not request one.
pub const FOCUS_ZOOM: f32 = 1.5;

/// Current zoom/pan snapshot. `world_to_screen(p) = p * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// In-flight animation between two transform states.
#[derive(Debug, Clone, Copy)]
struct Animation {
    from: ViewportState,
    to: ViewportState,
    start_ms: f64,
    duration_ms: f64,
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Owns the viewport state and all mutations of it.
pub struct ViewportTransform {
    state: ViewportState,
    animation: Option<Animation>,
    listeners: Listeners<ViewportState>,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportTransform {
    pub fn new() -> Self {
        Self {
            state: ViewportState::default(),
            animation: None,
            listeners: Listeners::new(),
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    /// Subscribe to state changes. Fired after every mutation, including
    /// each animation frame.
    pub fn on_change(
        &mut self,
        f: impl FnMut(&ViewportState) + 'static,
    ) -> cw_core::ListenerId {
        self.listeners.register(f)
    }

    pub fn remove_listener(&mut self, id: cw_core::ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    fn apply(&mut self, next: ViewportState) {
        if next != self.state {
            self.state = next;
            self.listeners.emit(&next);
        }
    }

    // ─── Discrete mutations ──────────────────────────────────────────────

    /// Any discrete transform call cancels a pending animation.
    pub fn set_transform(&mut self, zoom: f32, pan_x: f32, pan_y: f32) {
        self.animation = None;
        self.apply(ViewportState {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            pan_x,
            pan_y,
        });
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let s = self.state;
        self.set_transform(zoom, s.pan_x, s.pan_y);
    }

    pub fn set_pan(&mut self, pan_x: f32, pan_y: f32) {
        let zoom = self.state.zoom;
        self.set_transform(zoom, pan_x, pan_y);
    }

    /// Multiply the current zoom by `factor`, clamped.
    pub fn adjust_zoom(&mut self, factor: f32) {
        self.set_zoom(self.state.zoom * factor);
    }

    /// Zoom anchored at a screen point: the world point currently under
    /// `(px, py)` stays under the same screen point after the zoom.
    pub fn zoom_at_point(&mut self, factor: f32, px: f32, py: f32) {
        let (wx, wy) = self.screen_to_world(px, py);
        let zoom = (self.state.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.set_transform(zoom, px - wx * zoom, py - wy * zoom);
    }

    /// Center `bounds` inside `container` at `zoom` (default 1.5×).
    pub fn focus_on(&mut self, bounds: Rect, container: Rect, zoom: Option<f32>) {
        let zoom = zoom.unwrap_or(FOCUS_ZOOM).clamp(MIN_ZOOM, MAX_ZOOM);
        let pan_x = container.center_x() - bounds.center_x() * zoom;
        let pan_y = container.center_y() - bounds.center_y() * zoom;
        log::debug!("focus_on: zoom {zoom} pan ({pan_x}, {pan_y})");
        self.set_transform(zoom, pan_x, pan_y);
    }

    /// Clamp pan so the content never drifts entirely off-screen. The pan is
    /// held within `max(0, (content*zoom - container)/2)` of the centered
    /// position in each axis; content smaller than the container is centered.
    pub fn constrain_pan(&mut self, content: Rect, container: Rect) {
        let s = self.state;
        let centered_x = (container.w - content.w * s.zoom) / 2.0;
        let centered_y = (container.h - content.h * s.zoom) / 2.0;
        let max_x = ((content.w * s.zoom - container.w) / 2.0).max(0.0);
        let max_y = ((content.h * s.zoom - container.h) / 2.0).max(0.0);
        self.apply(ViewportState {
            zoom: s.zoom,
            pan_x: s.pan_x.clamp(centered_x - max_x, centered_x + max_x),
            pan_y: s.pan_y.clamp(centered_y - max_y, centered_y + max_y),
        });
    }

    // ─── Coordinate conversion ───────────────────────────────────────────

    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        let s = self.state;
        ((sx - s.pan_x) / s.zoom, (sy - s.pan_y) / s.zoom)
    }

    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        let s = self.state;
        (wx * s.zoom + s.pan_x, wy * s.zoom + s.pan_y)
    }

    /// CSS transform string for a bound render target.
    pub fn to_css(&self) -> String {
        let s = self.state;
        format!(
            "translate({}px, {}px) scale({})",
            s.pan_x, s.pan_y, s.zoom
        )
    }

    // ─── Animation ───────────────────────────────────────────────────────

    /// Begin an ease-out-cubic animation toward the target transform.
    /// Replaces any pending animation. Call `tick` with wall-clock
    /// timestamps to advance.
    pub fn animate_to(
        &mut self,
        zoom: f32,
        pan_x: f32,
        pan_y: f32,
        duration_ms: f64,
        now_ms: f64,
    ) {
        let to = ViewportState {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            pan_x,
            pan_y,
        };
        if duration_ms <= 0.0 {
            self.animation = None;
            self.apply(to);
            return;
        }
        self.animation = Some(Animation {
            from: self.state,
            to,
            start_ms: now_ms,
            duration_ms,
        });
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the pending animation. Returns `true` while still animating;
    /// at `elapsed >= duration` the state lands exactly on the target.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let t = ((now_ms - anim.start_ms) / anim.duration_ms).clamp(0.0, 1.0) as f32;
        let e = ease_out_cubic(t);
        let lerp = |a: f32, b: f32| a + (b - a) * e;
        self.apply(ViewportState {
            zoom: lerp(anim.from.zoom, anim.to.zoom),
            pan_x: lerp(anim.from.pan_x, anim.to.pan_x),
            pan_y: lerp(anim.from.pan_y, anim.to.pan_y),
        });
        if t >= 1.0 {
            self.animation = None;
        }
        self.animation.is_some()
    }
}
