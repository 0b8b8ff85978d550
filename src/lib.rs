//! Editing engine for process flowcharts ("logigrammes").
//!
//! The crate owns everything with real state or algorithmic content in the
//! diagram editor: the graph model and its persisted document form, the
//! step-list synchronisation, drag-time alignment guides, clipboard and
//! delete commands, align/distribute operators, the undo/redo history, the
//! connect-mode state machine, and the controller that composes them. The
//! host view layer only forwards pointer/keyboard events and reacts to the
//! returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::DiagramEditor`], the controller and event router |
//! | [`model`] | Nodes, edges, legend items and the [`model::Graph`] container |
//! | [`codec`] | Persisted [`codec::Document`] and lenient decoding |
//! | [`shape`] | Shape kinds and the static shape registry |
//! | [`sync`] | Step-list synchronisation and grid layout |
//! | [`guides`] | Snap deltas and alignment guides during a drag |
//! | [`commands`] | Copy, paste, duplicate, delete with id remapping |
//! | [`arrange`] | Align and distribute operators |
//! | [`history`] | Linear undo/redo over graph snapshots |
//! | [`connect`] | Connect-mode state machine (fan-out / chain) |
//! | [`input`] | Modifiers, keys and the pointer gesture state |
//! | [`hit`] | Hit-testing nodes and edges |
//! | [`persist`] | Persistence seam, save errors and notifications |
//! | [`config`] | Tunables and environment overrides |
//! | [`error`] | The [`error::ErrorCode`] contract shared by error enums |
//! | [`geom`] | Points and axis-aligned bounds |
//! | [`consts`] | Shared numeric defaults |

pub mod arrange;
pub mod codec;
pub mod commands;
pub mod config;
pub mod connect;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geom;
pub mod guides;
pub mod hit;
pub mod history;
pub mod input;
pub mod model;
pub mod persist;
pub mod shape;
pub mod sync;
