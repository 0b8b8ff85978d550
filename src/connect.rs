//! Connect-mode state machine.
//!
//! Modes are `Off`, `Fanout` and `Chain`. While a mode is on, node clicks
//! are interpreted here instead of as selection:
//!
//! - no pending source: the clicked node becomes the pending source
//! - click on the pending source: disarm
//! - click on another node: request an edge `source → clicked`; in chain
//!   mode the clicked node becomes the new source, in fan-out mode the
//!   source stays armed
//!
//! The machine only decides; the controller owns the graph and creates the
//! edge when the ordered pair is not already connected.

#[cfg(test)]
#[path = "connect_test.rs"]
mod connect_test;

use crate::model::NodeId;

/// Active connect mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    #[default]
    Off,
    /// One source, many targets.
    Fanout,
    /// Each target becomes the next source.
    Chain,
}

impl ConnectMode {
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Off)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Fanout => "fanout",
            Self::Chain => "chain",
        }
    }
}

/// Result of feeding a node click to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectStep {
    /// Mode is off; the click is a normal click.
    Inactive,
    /// The node is now the pending source.
    Armed(NodeId),
    /// The pending source was clicked again and is no longer armed.
    Disarmed(NodeId),
    /// Connect `source → target` unless that ordered edge already exists.
    Connect { source: NodeId, target: NodeId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectState {
    mode: ConnectMode,
    pending: Option<NodeId>,
}

impl ConnectState {
    #[must_use]
    pub fn mode(&self) -> ConnectMode {
        self.mode
    }

    /// Armed source node, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    /// Switch to `mode`, always clearing the pending source.
    ///
    /// Returns whether the mode changed.
    pub fn enter(&mut self, mode: ConnectMode) -> bool {
        self.pending = None;
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Return to `Off`. Returns whether anything changed.
    pub fn exit(&mut self) -> bool {
        let had_pending = self.pending.take().is_some();
        let was_on = self.mode.is_active();
        self.mode = ConnectMode::Off;
        was_on || had_pending
    }

    /// Clear the pending source without leaving the mode.
    pub fn disarm(&mut self) -> Option<NodeId> {
        self.pending.take()
    }

    /// Feed a click on node `id`.
    pub fn click_node(&mut self, id: &str) -> ConnectStep {
        if !self.mode.is_active() {
            return ConnectStep::Inactive;
        }
        match self.pending.take() {
            None => {
                self.pending = Some(id.to_string());
                ConnectStep::Armed(id.to_string())
            }
            Some(source) if source == id => ConnectStep::Disarmed(source),
            Some(source) => {
                self.pending = Some(match self.mode {
                    ConnectMode::Chain => id.to_string(),
                    ConnectMode::Fanout | ConnectMode::Off => source.clone(),
                });
                ConnectStep::Connect { source, target: id.to_string() }
            }
        }
    }

    /// Drop the pending source if it is no longer in `alive`.
    pub fn retain_pending(&mut self, alive: impl Fn(&str) -> bool) {
        if self.pending.as_deref().is_some_and(|id| !alive(id)) {
            self.pending = None;
        }
    }
}
