//! Editor tunables and their environment overrides.
//!
//! `EditorConfig::default()` carries the shipped values from
//! [`crate::consts`]. `EditorConfig::from_env()` overlays `LOGIGRAMME_*`
//! variables; a missing or unparsable variable keeps the default, and so
//! does a float outside its valid range (NaN, infinite, or negative where a
//! distance is expected).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use tracing::{debug, warn};

use crate::consts::{
    DRAG_START_THRESHOLD, EDGE_HIT_SLOP, HISTORY_LIMIT, NUDGE_STEP, NUDGE_STEP_LARGE, PASTE_OFFSET,
};
use crate::geom::Point;
use crate::guides::GuideOptions;
use crate::sync::GridLayout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Snap threshold, coincidence tolerance and guide padding.
    pub guides: GuideOptions,
    /// Grid unit for align/distribute. `None` leaves positions unsnapped.
    pub grid_unit: Option<f64>,
    /// Offset applied per paste/duplicate, on both axes.
    pub paste_offset: f64,
    /// Most undoable steps kept.
    pub history_limit: usize,
    /// Arrow-key nudge distance.
    pub nudge_step: f64,
    /// Arrow-key nudge distance with Shift.
    pub nudge_step_large: f64,
    /// Pointer travel before a press turns into a drag.
    pub drag_threshold: f64,
    /// Distance within which a click selects an edge.
    pub edge_hit_slop: f64,
    /// Placement grid for nodes created by sync.
    pub layout: GridLayout,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            guides: GuideOptions::default(),
            grid_unit: None,
            paste_offset: PASTE_OFFSET,
            history_limit: HISTORY_LIMIT,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            drag_threshold: DRAG_START_THRESHOLD,
            edge_hit_slop: EDGE_HIT_SLOP,
            layout: GridLayout::default(),
        }
    }
}

impl EditorConfig {
    /// Defaults overlaid with `LOGIGRAMME_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let base = Self::default();
        let grid = env_parse("LOGIGRAMME_GRID_UNIT", 0.0_f64);
        let config = Self {
            guides: GuideOptions {
                threshold: env_f64("LOGIGRAMME_SNAP_THRESHOLD", base.guides.threshold, positive),
                tolerance: env_f64("LOGIGRAMME_GUIDE_TOLERANCE", base.guides.tolerance, non_negative),
                padding: env_f64("LOGIGRAMME_GUIDE_PADDING", base.guides.padding, non_negative),
            },
            grid_unit: positive(grid).then_some(grid),
            paste_offset: env_f64("LOGIGRAMME_PASTE_OFFSET", base.paste_offset, non_negative),
            history_limit: env_parse("LOGIGRAMME_HISTORY_LIMIT", base.history_limit),
            nudge_step: env_f64("LOGIGRAMME_NUDGE_STEP", base.nudge_step, positive),
            nudge_step_large: env_f64("LOGIGRAMME_NUDGE_STEP_LARGE", base.nudge_step_large, positive),
            drag_threshold: env_f64("LOGIGRAMME_DRAG_THRESHOLD", base.drag_threshold, non_negative),
            edge_hit_slop: env_f64("LOGIGRAMME_EDGE_HIT_SLOP", base.edge_hit_slop, non_negative),
            layout: GridLayout {
                origin: Point::new(
                    env_f64("LOGIGRAMME_LAYOUT_ORIGIN_X", base.layout.origin.x, f64::is_finite),
                    env_f64("LOGIGRAMME_LAYOUT_ORIGIN_Y", base.layout.origin.y, f64::is_finite),
                ),
                column_width: env_f64("LOGIGRAMME_LAYOUT_COLUMN_WIDTH", base.layout.column_width, positive),
                row_gap: env_f64("LOGIGRAMME_LAYOUT_ROW_GAP", base.layout.row_gap, positive),
                min_columns: env_parse("LOGIGRAMME_LAYOUT_MIN_COLUMNS", base.layout.min_columns),
                max_columns: env_parse("LOGIGRAMME_LAYOUT_MAX_COLUMNS", base.layout.max_columns),
            },
        };
        debug!(
            snap_threshold = config.guides.threshold,
            grid_unit = ?config.grid_unit,
            history_limit = config.history_limit,
            "editor config loaded"
        );
        config
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Float override that keeps `default` unless `valid` accepts the value.
pub(crate) fn env_f64(key: &str, default: f64, valid: fn(f64) -> bool) -> f64 {
    let value = env_parse(key, default);
    if valid(value) {
        value
    } else {
        warn!(key, value, default, "out-of-range config value ignored");
        default
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}
