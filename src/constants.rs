/// Poll cadence for live train positions, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 15_000;

/// Line shown on first load.
pub const DEFAULT_LINE_ID: &str = "loop";

/// Media query that selects the compact (phone) default framing.
pub const COMPACT_MEDIA_QUERY: &str = "(max-width: 768px)";

/// Perpendicular distance between opposite running directions on the same
/// track, in logical canvas units.
pub const LANE_OFFSET: f64 = 18.0;

/// Padding added around a line's station bounding box when computing its
/// full-extent view rectangle.
pub const FRAME_PADDING: f64 = 60.0;

/// Smallest view rectangle the zoom clamps allow.
pub const MIN_VIEW_WIDTH: f64 = 200.0;
pub const MIN_VIEW_HEIGHT: f64 = 150.0;

/// The view may zoom out to this multiple of the full-extent rectangle.
pub const MAX_ZOOM_OUT_FACTOR: f64 = 2.0;

/// Screen-space movement (px) below which a pointer-down/up pair still
/// counts as a tap rather than a drag.
pub const TAP_SLOP_PX: f64 = 5.0;

/// Size of the rectangle a tap zooms into, as a fraction of full extent.
pub const TAP_ZOOM_FRACTION: f64 = 0.35;

/// Default framing on compact layouts, as a fraction of full extent.
pub const COMPACT_FRAME_FRACTION: f64 = 0.6;

/// Per-notch wheel zoom step; scrolling down multiplies the rectangle by
/// this factor (zoom out), scrolling up by its inverse counterpart.
pub const WHEEL_ZOOM_OUT_STEP: f64 = 1.1;
pub const WHEEL_ZOOM_IN_STEP: f64 = 0.9;
