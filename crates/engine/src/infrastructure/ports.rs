//! Port traits for the host application.
//!
//! The conversion core reaches the outside world only through these traits:
//! the actor handle owned by the host's persistence layer, and the
//! notification surface owned by its UI layer. How the host persists or
//! renders anything is outside the core.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use sheetbridge_domain::SubRecord;

/// Errors surfaced by the host when a handle operation fails.
///
/// Carried through to the caller unmodified; the core performs no retries.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The host refused the operation for the current user.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// The host failed while persisting the change.
    #[error("operation rejected by host: {0}")]
    Rejected(String),
}

/// An embedded sub-record already present on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRecord {
    /// Host-assigned identifier, opaque to the core
    pub id: String,
    /// Target-schema type tag (e.g. "feat", "lore")
    pub record_type: String,
}

impl EmbeddedRecord {
    pub fn new(id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
        }
    }
}

/// Handle to the live character record owned by the host.
///
/// Every operation may suspend; the applier awaits each call before issuing
/// the next. The handle offers no transaction, so a failure can leave the
/// target partially updated (see [`crate::use_cases::ApplySheet`]).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorHandle: Send + Sync {
    /// Update scalar and nested fields by dotted path, in one call.
    async fn update_fields(&self, fields: Map<String, Value>) -> Result<(), HandleError>;

    /// List the embedded sub-records currently on the target.
    async fn embedded_records(&self) -> Result<Vec<EmbeddedRecord>, HandleError>;

    /// Delete the given embedded sub-records in one batch.
    async fn delete_embedded(&self, ids: Vec<String>) -> Result<(), HandleError>;

    /// Create the given sub-records in one batch, preserving their order.
    async fn create_embedded(&self, records: Vec<SubRecord>) -> Result<(), HandleError>;
}

/// Notification surface rendered by the host UI.
///
/// The core reports exactly three outcomes and performs no presentation;
/// diagnostic detail goes to the log, not through this port.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPort: Send + Sync {
    /// Conversion and apply both succeeded.
    fn import_complete(&self);

    /// The supplied text was not valid JSON.
    fn invalid_json(&self);

    /// Conversion or apply failed after parsing.
    fn conversion_failed(&self);
}
