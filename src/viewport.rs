use crate::constants::{
    COMPACT_FRAME_FRACTION, FRAME_PADDING, MAX_ZOOM_OUT_FACTOR, MIN_VIEW_HEIGHT, MIN_VIEW_WIDTH,
    TAP_SLOP_PX, TAP_ZOOM_FRACTION, WHEEL_ZOOM_IN_STEP, WHEEL_ZOOM_OUT_STEP,
};
use crate::models::LineTopology;

/// Frame used before any line has been loaded.
const FALLBACK_EXTENT: ViewRect = ViewRect {
    x: 0.0,
    y: 0.0,
    width: 1600.0,
    height: 1000.0,
};

/// A window into the logical map coordinate space.
///
/// Panning may push the rectangle outside the nominal canvas; only its
/// width and height are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    fn centered_at(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }
}

/// Width/height clamps derived from the active line's full extent.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomBounds {
    min_width: f64,
    min_height: f64,
    max_width: f64,
    max_height: f64,
}

impl ZoomBounds {
    /// The minimums give way for lines whose full extent is already
    /// smaller than the configured floor, so the full-extent rectangle is
    /// always a legal view.
    fn for_extent(extent: ViewRect) -> Self {
        Self {
            min_width: MIN_VIEW_WIDTH.min(extent.width),
            min_height: MIN_VIEW_HEIGHT.min(extent.height),
            max_width: extent.width * MAX_ZOOM_OUT_FACTOR,
            max_height: extent.height * MAX_ZOOM_OUT_FACTOR,
        }
    }

    fn clamp(&self, width: f64, height: f64) -> (f64, f64) {
        (
            width.clamp(self.min_width, self.max_width),
            height.clamp(self.min_height, self.max_height),
        )
    }
}

/// The gesture session currently in progress. At most one is active at a
/// time, and the session's tracked baseline lives in its variant.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning { last_x: f64, last_y: f64 },
    Pinching { last_distance: f64 },
}

/// Gesture-driven pan/zoom controller over the logical map canvas.
///
/// All inputs are screen-space pixels relative to the render surface; the
/// surface's pixel size is passed in wherever a screen-to-logical scale is
/// needed.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    rect: ViewRect,
    full_extent: ViewRect,
    bounds: ZoomBounds,
    gesture: Gesture,
    tap_travel: f64,
    zoomed_in: bool,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            rect: FALLBACK_EXTENT,
            full_extent: FALLBACK_EXTENT,
            bounds: ZoomBounds::for_extent(FALLBACK_EXTENT),
            gesture: Gesture::Idle,
            tap_travel: 0.0,
            zoomed_in: false,
        }
    }
}

impl MapViewport {
    /// Reframe for a newly selected line: the view becomes the padded
    /// bounding box of its stations (or, on compact layouts, a pre-zoomed
    /// window centered on it), and every bit of gesture/zoom state from
    /// the previous line is discarded.
    pub fn load_line(&mut self, topology: &LineTopology, compact: bool) {
        let full = full_extent_for(topology);
        self.full_extent = full;
        self.bounds = ZoomBounds::for_extent(full);
        self.gesture = Gesture::Idle;
        self.tap_travel = 0.0;
        self.zoomed_in = false;
        self.rect = if compact {
            let (cx, cy) = full.center();
            let (width, height) = self.bounds.clamp(
                full.width * COMPACT_FRAME_FRACTION,
                full.height * COMPACT_FRAME_FRACTION,
            );
            ViewRect::centered_at(cx, cy, width, height)
        } else {
            full
        };
    }

    #[must_use]
    pub fn rect(&self) -> ViewRect {
        self.rect
    }

    #[must_use]
    pub fn full_extent(&self) -> ViewRect {
        self.full_extent
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    #[must_use]
    pub fn is_zoomed_in(&self) -> bool {
        self.zoomed_in
    }

    /// Whether the last pointer-down/up pair moved little enough to count
    /// as a tap. Valid until the next `begin_pan`.
    #[must_use]
    pub fn was_tap(&self) -> bool {
        self.tap_travel < TAP_SLOP_PX
    }

    /// Map a surface pixel position to logical canvas coordinates under
    /// the current view rectangle.
    #[must_use]
    pub fn screen_to_logical(
        &self,
        x: f64,
        y: f64,
        surface_width: f64,
        surface_height: f64,
    ) -> (f64, f64) {
        let fx = if surface_width > 0.0 { x / surface_width } else { 0.5 };
        let fy = if surface_height > 0.0 { y / surface_height } else { 0.5 };
        (
            self.rect.x + fx * self.rect.width,
            self.rect.y + fy * self.rect.height,
        )
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.gesture = Gesture::Panning { last_x: x, last_y: y };
        self.tap_travel = 0.0;
    }

    /// Translate the view by the pointer delta since the last call. Drag
    /// right moves the view left, mirroring direct manipulation of the
    /// map. Only effective while a pan session is active.
    pub fn pan_to(&mut self, x: f64, y: f64, surface_width: f64, surface_height: f64) {
        let Gesture::Panning { last_x, last_y } = self.gesture else {
            return;
        };
        if surface_width <= 0.0 || surface_height <= 0.0 {
            return;
        }
        let dx = x - last_x;
        let dy = y - last_y;
        self.tap_travel += dx.hypot(dy);
        self.rect.x -= dx * self.rect.width / surface_width;
        self.rect.y -= dy * self.rect.height / surface_height;
        self.gesture = Gesture::Panning { last_x: x, last_y: y };
    }

    pub fn end_pan(&mut self) {
        if matches!(self.gesture, Gesture::Panning { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Toggle between the full-extent frame and a close-up centered on the
    /// tapped point. A pointer sequence that travelled beyond the tap slop
    /// was a drag and is ignored here, so panning never flips the zoom.
    pub fn tap_toggle_zoom(
        &mut self,
        x: f64,
        y: f64,
        surface_width: f64,
        surface_height: f64,
    ) {
        if !self.was_tap() {
            return;
        }
        if self.zoomed_in {
            self.rect = self.full_extent;
            self.zoomed_in = false;
        } else {
            let (lx, ly) = self.screen_to_logical(x, y, surface_width, surface_height);
            let (width, height) = self.bounds.clamp(
                self.full_extent.width * TAP_ZOOM_FRACTION,
                self.full_extent.height * TAP_ZOOM_FRACTION,
            );
            self.rect = ViewRect::centered_at(lx, ly, width, height);
            self.zoomed_in = true;
        }
    }

    /// Wheel zoom anchored at the pointer: the logical point under the
    /// cursor stays put on screen across the resize.
    pub fn wheel_zoom(
        &mut self,
        x: f64,
        y: f64,
        delta_y: f64,
        surface_width: f64,
        surface_height: f64,
    ) {
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT_STEP
        } else {
            WHEEL_ZOOM_IN_STEP
        };
        let fx = if surface_width > 0.0 { x / surface_width } else { 0.5 };
        let fy = if surface_height > 0.0 { y / surface_height } else { 0.5 };
        let anchor_x = self.rect.x + fx * self.rect.width;
        let anchor_y = self.rect.y + fy * self.rect.height;
        let (width, height) = self
            .bounds
            .clamp(self.rect.width * factor, self.rect.height * factor);
        self.rect = ViewRect {
            x: anchor_x - fx * width,
            y: anchor_y - fy * height,
            width,
            height,
        };
        self.zoomed_in = true;
    }

    /// Start (or restart) a pinch session with the current inter-finger
    /// distance as the baseline.
    pub fn pinch_begin(&mut self, distance: f64) {
        if distance > 0.0 {
            self.gesture = Gesture::Pinching { last_distance: distance };
        }
    }

    /// Continue a pinch: scale by the ratio of the tracked baseline to the
    /// new distance, anchored at the rectangle's own center (two fingers
    /// give no single reliable anchor point). A move without a tracked
    /// baseline only establishes one.
    pub fn pinch_move(&mut self, distance: f64) {
        if distance <= 0.0 {
            return;
        }
        if let Gesture::Pinching { last_distance } = self.gesture {
            let scale = last_distance / distance;
            let (cx, cy) = self.rect.center();
            let (width, height) = self
                .bounds
                .clamp(self.rect.width * scale, self.rect.height * scale);
            self.rect = ViewRect::centered_at(cx, cy, width, height);
            self.zoomed_in = true;
        }
        self.gesture = Gesture::Pinching { last_distance: distance };
    }

    /// Drop the pinch baseline so the next pinch starts fresh instead of
    /// inheriting a stale distance.
    pub fn pinch_end(&mut self) {
        if matches!(self.gesture, Gesture::Pinching { .. }) {
            self.gesture = Gesture::Idle;
        }
    }
}

fn full_extent_for(topology: &LineTopology) -> ViewRect {
    match topology.bounding_box() {
        Some((min_x, min_y, max_x, max_y)) => ViewRect {
            x: min_x - FRAME_PADDING,
            y: min_y - FRAME_PADDING,
            width: (max_x - min_x) + 2.0 * FRAME_PADDING,
            height: (max_y - min_y) + 2.0 * FRAME_PADDING,
        },
        None => FALLBACK_EXTENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;

    const EPS: f64 = 1e-9;
    const SURFACE_W: f64 = 800.0;
    const SURFACE_H: f64 = 500.0;

    fn topology() -> LineTopology {
        LineTopology::new(
            vec![
                Station { name: "A".to_string(), x: 100.0, y: 100.0 },
                Station { name: "B".to_string(), x: 900.0, y: 100.0 },
                Station { name: "C".to_string(), x: 900.0, y: 600.0 },
            ],
            false,
            false,
        )
    }

    fn loaded_viewport() -> MapViewport {
        let mut viewport = MapViewport::default();
        viewport.load_line(&topology(), false);
        viewport
    }

    #[test]
    fn test_load_line_frames_padded_bounding_box() {
        let viewport = loaded_viewport();
        let rect = viewport.rect();
        assert!((rect.x - 40.0).abs() < EPS);
        assert!((rect.y - 40.0).abs() < EPS);
        assert!((rect.width - 920.0).abs() < EPS);
        assert!((rect.height - 620.0).abs() < EPS);
        assert!(!viewport.is_zoomed_in());
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_load_line_compact_starts_pre_zoomed() {
        let mut viewport = MapViewport::default();
        viewport.load_line(&topology(), true);
        let rect = viewport.rect();
        let full = viewport.full_extent();
        assert!((rect.width - full.width * COMPACT_FRAME_FRACTION).abs() < EPS);
        assert!((rect.height - full.height * COMPACT_FRAME_FRACTION).abs() < EPS);
        // Centered on the full extent's centroid.
        let (rcx, rcy) = rect.center();
        let (fcx, fcy) = full.center();
        assert!((rcx - fcx).abs() < EPS);
        assert!((rcy - fcy).abs() < EPS);
        // Pre-zoomed framing is the default, not a user zoom.
        assert!(!viewport.is_zoomed_in());
    }

    #[test]
    fn test_pan_moves_view_against_drag() {
        let mut viewport = loaded_viewport();
        let before = viewport.rect();
        viewport.begin_pan(400.0, 250.0);
        viewport.pan_to(480.0, 250.0, SURFACE_W, SURFACE_H);
        let after = viewport.rect();
        // Drag right by 80px on an 800px surface showing a 920-wide rect:
        // the view shifts left by 80 * 920 / 800 = 92 logical units.
        assert!((before.x - after.x - 92.0).abs() < EPS);
        assert!((after.y - before.y).abs() < EPS);
        assert!((after.width - before.width).abs() < EPS);
        assert!((after.height - before.height).abs() < EPS);
    }

    #[test]
    fn test_pan_without_begin_is_ignored() {
        let mut viewport = loaded_viewport();
        let before = viewport.rect();
        viewport.pan_to(480.0, 250.0, SURFACE_W, SURFACE_H);
        assert_eq!(viewport.rect(), before);
    }

    #[test]
    fn test_end_pan_keeps_rect_and_zoom_state() {
        let mut viewport = loaded_viewport();
        viewport.begin_pan(100.0, 100.0);
        viewport.pan_to(150.0, 120.0, SURFACE_W, SURFACE_H);
        let rect = viewport.rect();
        viewport.end_pan();
        assert_eq!(viewport.rect(), rect);
        assert!(!viewport.is_panning());
        assert!(!viewport.is_zoomed_in());
    }

    #[test]
    fn test_tap_toggle_round_trips_to_full_extent() {
        let mut viewport = loaded_viewport();
        let full = viewport.rect();
        viewport.begin_pan(300.0, 200.0);
        viewport.end_pan();
        viewport.tap_toggle_zoom(300.0, 200.0, SURFACE_W, SURFACE_H);
        assert!(viewport.is_zoomed_in());
        let zoomed = viewport.rect();
        assert!((zoomed.width - full.width * TAP_ZOOM_FRACTION).abs() < EPS);
        viewport.tap_toggle_zoom(300.0, 200.0, SURFACE_W, SURFACE_H);
        assert!(!viewport.is_zoomed_in());
        assert_eq!(viewport.rect(), full);
    }

    #[test]
    fn test_tap_zoom_centers_on_tapped_point() {
        let mut viewport = loaded_viewport();
        let (lx, ly) = viewport.screen_to_logical(200.0, 125.0, SURFACE_W, SURFACE_H);
        viewport.tap_toggle_zoom(200.0, 125.0, SURFACE_W, SURFACE_H);
        let (cx, cy) = viewport.rect().center();
        assert!((cx - lx).abs() < EPS);
        assert!((cy - ly).abs() < EPS);
    }

    #[test]
    fn test_drag_suppresses_tap_toggle() {
        let mut viewport = loaded_viewport();
        viewport.begin_pan(400.0, 250.0);
        viewport.pan_to(440.0, 250.0, SURFACE_W, SURFACE_H);
        viewport.end_pan();
        let rect = viewport.rect();
        viewport.tap_toggle_zoom(440.0, 250.0, SURFACE_W, SURFACE_H);
        assert_eq!(viewport.rect(), rect);
        assert!(!viewport.is_zoomed_in());

        // A fresh press that stays put counts as a tap again.
        viewport.begin_pan(440.0, 250.0);
        viewport.end_pan();
        viewport.tap_toggle_zoom(440.0, 250.0, SURFACE_W, SURFACE_H);
        assert!(viewport.is_zoomed_in());
    }

    #[test]
    fn test_wheel_zoom_preserves_anchor_point() {
        let mut viewport = loaded_viewport();
        let (px, py) = (610.0, 140.0);
        let before = viewport.screen_to_logical(px, py, SURFACE_W, SURFACE_H);
        viewport.wheel_zoom(px, py, -120.0, SURFACE_W, SURFACE_H);
        let after = viewport.screen_to_logical(px, py, SURFACE_W, SURFACE_H);
        assert!((before.0 - after.0).abs() < 1e-6);
        assert!((before.1 - after.1).abs() < 1e-6);
        assert!(viewport.is_zoomed_in());

        // Still anchored across a zoom-out step.
        viewport.wheel_zoom(px, py, 120.0, SURFACE_W, SURFACE_H);
        let out = viewport.screen_to_logical(px, py, SURFACE_W, SURFACE_H);
        assert!((before.0 - out.0).abs() < 1e-6);
        assert!((before.1 - out.1).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_stays_clamped_under_extreme_input() {
        let mut viewport = loaded_viewport();
        for _ in 0..100 {
            viewport.wheel_zoom(400.0, 250.0, -120.0, SURFACE_W, SURFACE_H);
        }
        let rect = viewport.rect();
        assert!((rect.width - MIN_VIEW_WIDTH).abs() < EPS);
        assert!((rect.height - MIN_VIEW_HEIGHT).abs() < EPS);

        for _ in 0..200 {
            viewport.wheel_zoom(400.0, 250.0, 120.0, SURFACE_W, SURFACE_H);
        }
        let rect = viewport.rect();
        let full = viewport.full_extent();
        assert!((rect.width - full.width * MAX_ZOOM_OUT_FACTOR).abs() < EPS);
        assert!((rect.height - full.height * MAX_ZOOM_OUT_FACTOR).abs() < EPS);

        // An absurd pinch ratio cannot escape the clamps either.
        viewport.pinch_begin(1000.0);
        viewport.pinch_move(1.0);
        assert!(viewport.rect().width <= full.width * MAX_ZOOM_OUT_FACTOR + EPS);
        viewport.pinch_move(100_000.0);
        assert!(viewport.rect().width + EPS >= MIN_VIEW_WIDTH);
    }

    #[test]
    fn test_pinch_scales_about_center() {
        let mut viewport = loaded_viewport();
        let center = viewport.rect().center();
        viewport.pinch_begin(100.0);
        viewport.pinch_move(200.0);
        let rect = viewport.rect();
        // Fingers spreading to twice the distance halves the rectangle.
        assert!((rect.width - 460.0).abs() < EPS);
        let after = rect.center();
        assert!((after.0 - center.0).abs() < EPS);
        assert!((after.1 - center.1).abs() < EPS);
        assert!(viewport.is_zoomed_in());
    }

    #[test]
    fn test_pinch_baseline_resets_between_sessions() {
        let mut viewport = loaded_viewport();
        viewport.pinch_begin(100.0);
        viewport.pinch_move(120.0);
        viewport.pinch_end();
        let rect = viewport.rect();

        // A new pinch at a very different distance must not scale by the
        // stale 120 -> 400 jump.
        viewport.pinch_begin(400.0);
        viewport.pinch_move(400.0);
        assert!((viewport.rect().width - rect.width).abs() < EPS);
    }

    #[test]
    fn test_pinch_move_without_begin_only_sets_baseline() {
        let mut viewport = loaded_viewport();
        let rect = viewport.rect();
        viewport.pinch_move(150.0);
        assert_eq!(viewport.rect(), rect);
        viewport.pinch_move(75.0);
        // Now the baseline exists, so the view zooms out by 2x (clamped).
        assert!(viewport.rect().width > rect.width);
    }

    #[test]
    fn test_line_switch_resets_everything() {
        let mut viewport = loaded_viewport();
        viewport.wheel_zoom(100.0, 100.0, -120.0, SURFACE_W, SURFACE_H);
        viewport.begin_pan(10.0, 10.0);
        viewport.pan_to(200.0, 200.0, SURFACE_W, SURFACE_H);

        let other = LineTopology::new(
            vec![
                Station { name: "X".to_string(), x: 0.0, y: 0.0 },
                Station { name: "Y".to_string(), x: 500.0, y: 0.0 },
            ],
            false,
            false,
        );
        viewport.load_line(&other, false);
        assert!(!viewport.is_zoomed_in());
        assert!(!viewport.is_panning());
        let rect = viewport.rect();
        assert!((rect.x + 60.0).abs() < EPS);
        assert!((rect.width - 620.0).abs() < EPS);
        // Zero-height stations still get a padded, non-degenerate frame.
        assert!((rect.height - 120.0).abs() < EPS);
    }

    #[test]
    fn test_screen_to_logical_guards_degenerate_surface() {
        let viewport = loaded_viewport();
        let (lx, ly) = viewport.screen_to_logical(10.0, 10.0, 0.0, 0.0);
        let (cx, cy) = viewport.rect().center();
        assert!((lx - cx).abs() < EPS);
        assert!((ly - cy).abs() < EPS);
    }
}
