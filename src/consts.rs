//! Shared numeric defaults for the editor engine.
//!
//! These are the values behind [`crate::config::EditorConfig::default`];
//! nothing else should read them directly.

// ── Snapping ────────────────────────────────────────────────────

/// Maximum distance, in world units, at which a dragged node snaps.
pub const SNAP_THRESHOLD: f64 = 8.0;

/// Bounds closer than this are considered coincident for guide emission.
pub const GUIDE_TOLERANCE: f64 = 1.0;

/// Extra length added to both ends of a guide line.
pub const GUIDE_PADDING: f64 = 24.0;

// ── Commands ────────────────────────────────────────────────────

/// Offset applied to pasted and duplicated nodes.
pub const PASTE_OFFSET: f64 = 20.0;

/// Arrow-key nudge distance.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots kept on the undo stack.
pub const HISTORY_LIMIT: usize = 100;

// ── Pointer ─────────────────────────────────────────────────────

/// Pointer travel before a press on a node becomes a drag.
pub const DRAG_START_THRESHOLD: f64 = 3.0;

/// Hit slop for edges, measured from the center-to-center segment.
pub const EDGE_HIT_SLOP: f64 = 8.0;

// ── Grid layout ─────────────────────────────────────────────────

/// Left edge of the first layout column.
pub const GRID_ORIGIN_X: f64 = 40.0;

/// Top edge of the first layout row.
pub const GRID_ORIGIN_Y: f64 = 40.0;

/// Horizontal distance between layout columns.
pub const GRID_COLUMN_WIDTH: f64 = 240.0;

/// Vertical distance between layout rows.
pub const GRID_ROW_GAP: f64 = 140.0;

/// Fewest columns the grid layout will use.
pub const GRID_MIN_COLUMNS: usize = 3;

/// Most columns the grid layout will use.
pub const GRID_MAX_COLUMNS: usize = 6;

// ── Styling fallbacks ───────────────────────────────────────────

/// Edge stroke color when absent or unparsable.
pub const DEFAULT_EDGE_COLOR: &str = "#475569";

/// Edge stroke width when absent or not a positive finite number.
pub const DEFAULT_EDGE_WIDTH: f64 = 2.0;

/// Legend swatch color when absent.
pub const DEFAULT_LEGEND_COLOR: &str = "#94A3B8";

/// Node label font size when absent or non-finite.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;
