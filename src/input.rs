//! Input model: modifier keys, mouse buttons, keys, and the pointer gesture state.
//!
//! `Modifiers` and `Key` capture the user's intent at the time of an event.
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! A press only becomes a drag once the pointer travels past the drag
//! threshold; a release before that is a click.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::model::NodeId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Meta, the platform command modifier.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether a click should toggle membership instead of replacing the selection.
    #[must_use]
    pub fn additive(self) -> bool {
        self.shift || self.command()
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased key name, so `"Z"` (Shift held) matches `"z"`.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Unit direction for arrow keys.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            "ArrowUp" => Some((0.0, -1.0)),
            "ArrowDown" => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

/// Gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer went down on a node and has not moved past the drag threshold.
    PressingNode {
        id: NodeId,
        /// World position of the pointer-down.
        start: Point,
        modifiers: Modifiers,
    },
    /// Pointer went down on empty canvas.
    PressingCanvas { start: Point },
    /// One or more nodes are following the pointer.
    DraggingNodes {
        /// Node under the pointer; guides are computed for it.
        grabbed: NodeId,
        /// Pointer position where the drag was anchored.
        start: Point,
        /// Every moving node with its position at drag start.
        origins: Vec<(NodeId, Point)>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DraggingNodes { .. })
    }
}
