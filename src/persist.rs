//! Persistence seam: the save service, save errors and user notifications.
//!
//! DESIGN
//! ======
//! Saving is fire-and-continue. The controller snapshots the document into
//! a [`SaveTicket`] stamped with its edit revision, the host awaits the
//! [`PersistenceService`], and the result is handed back to the
//! controller. Local state is authoritative throughout: a failed save never
//! rolls anything back, and a successful save only clears the dirty flag if
//! nothing was edited since the ticket was taken.
//!
//! ERROR HANDLING
//! ==============
//! Failures become dismissible [`Notification`]s carrying the error's code
//! and whether a retry may help. The user retries by saving again; there is
//! no automatic retry.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use async_trait::async_trait;

use crate::codec::Document;
use crate::error::ErrorCode;

// =============================================================================
// SERVICE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ErrorCode for SaveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "E_SAVE_REJECTED",
            Self::Transport(_) => "E_SAVE_TRANSPORT",
            Self::Serialize(_) => "E_SAVE_SERIALIZE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Rejected { status, .. } => *status >= 500,
            Self::Transport(_) => true,
            Self::Serialize(_) => false,
        }
    }
}

/// Stores a full document for a process. No partial updates.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Persist `document` as the flowchart of `process_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] when the document could not be stored.
    async fn save_document(&self, process_id: &str, document: &Document) -> Result<(), SaveError>;
}

/// Document captured for an in-flight save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    /// Edit revision at capture time.
    pub revision: u64,
    pub document: Document,
}

/// How a completed save left the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Stored, and no edits happened meanwhile; the editor is clean.
    Saved,
    /// Stored, but newer edits remain unsaved.
    Stale,
    /// Not stored; a notification with this id was raised.
    Failed { notification: u64 },
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Transient, dismissible report of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub code: &'static str,
    /// Whether trying the same operation again may succeed.
    pub retryable: bool,
}

/// Ordered list of open notifications.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    /// Open a notification for `err` and return its id.
    pub fn push(&mut self, err: &dyn ErrorCode) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notification {
            id,
            message: err.to_string(),
            code: err.error_code(),
            retryable: err.retryable(),
        });
        id
    }

    /// Close notification `id`. Returns whether it was open.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    #[must_use]
    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
