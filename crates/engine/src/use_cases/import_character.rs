//! Import pipeline - parse, map, and apply in one strictly ordered flow.

use std::sync::Arc;

use thiserror::Error;

use crate::infrastructure::importers::{map_character, HeroLabExport, ValidationError};
use crate::infrastructure::ports::{ActorHandle, NotificationPort};
use crate::use_cases::apply_sheet::{ApplyError, ApplySheet};

/// Errors produced by the import pipeline, one kind per user-facing message.
///
/// All three propagate to the caller unmodified; there are no retries and no
/// silent recovery.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The supplied text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The JSON parsed but no character could be extracted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A host operation rejected the update mid-apply.
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Converts a raw export and applies it to a target record.
///
/// One invocation per user action; the host is responsible for serializing
/// invocations against the same target. Each outcome is reported through the
/// notification port exactly once, and failures are also returned to the
/// caller. Parsing happens first, so a malformed document creates no state
/// anywhere; a mapping failure likewise applies nothing to the target.
pub struct ImportCharacter {
    notifications: Arc<dyn NotificationPort>,
    apply: ApplySheet,
}

impl ImportCharacter {
    pub fn new(notifications: Arc<dyn NotificationPort>) -> Self {
        Self {
            notifications,
            apply: ApplySheet::new(),
        }
    }

    /// Run the full pipeline against one target record.
    pub async fn execute(
        &self,
        raw_json: &str,
        actor: &dyn ActorHandle,
    ) -> Result<(), ImportError> {
        let export: HeroLabExport = match serde_json::from_str(raw_json) {
            Ok(export) => export,
            Err(e) => {
                tracing::warn!(error = %e, "Import input is not valid JSON");
                self.notifications.invalid_json();
                return Err(ImportError::Parse(e));
            }
        };

        let sheet = match map_character(&export) {
            Ok(sheet) => sheet,
            Err(e) => {
                tracing::warn!(error = %e, "No character could be extracted from the export");
                self.notifications.conversion_failed();
                return Err(e.into());
            }
        };

        if let Err(e) = self.apply.execute(&sheet, actor).await {
            tracing::error!(error = %e, "Applying the converted sheet failed");
            self.notifications.conversion_failed();
            return Err(e.into());
        }

        tracing::info!(
            name = %sheet.name,
            records = sheet.records.len(),
            "Character import complete"
        );
        self.notifications.import_complete();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        EmbeddedRecord, HandleError, MockActorHandle, MockNotificationPort,
    };

    fn minimal_export() -> String {
        serde_json::json!({
            "actors": {
                "actor.1": {
                    "name": "Vexis Starling",
                    "gameValues": { "actLevelNet": 1, "actClassText": "Envoy 1" }
                }
            }
        })
        .to_string()
    }

    fn permissive_actor() -> MockActorHandle {
        let mut actor = MockActorHandle::new();
        actor.expect_update_fields().returning(|_| Ok(()));
        actor.expect_embedded_records().returning(|| Ok(Vec::new()));
        actor.expect_delete_embedded().returning(|_| Ok(()));
        actor.expect_create_embedded().returning(|_| Ok(()));
        actor
    }

    #[tokio::test]
    async fn successful_import_notifies_completion() {
        let mut notifications = MockNotificationPort::new();
        notifications.expect_import_complete().times(1).return_const(());
        notifications.expect_invalid_json().times(0);
        notifications.expect_conversion_failed().times(0);

        let actor = permissive_actor();
        let import = ImportCharacter::new(Arc::new(notifications));

        let result = import.execute(&minimal_export(), &actor).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn invalid_json_is_reported_and_touches_nothing() {
        let mut notifications = MockNotificationPort::new();
        notifications.expect_invalid_json().times(1).return_const(());
        notifications.expect_import_complete().times(0);
        notifications.expect_conversion_failed().times(0);

        let mut actor = MockActorHandle::new();
        actor.expect_update_fields().times(0);
        actor.expect_embedded_records().times(0);
        actor.expect_delete_embedded().times(0);
        actor.expect_create_embedded().times(0);

        let import = ImportCharacter::new(Arc::new(notifications));

        let result = import.execute("{ not json", &actor).await;
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[tokio::test]
    async fn missing_actor_is_reported_and_touches_nothing() {
        let mut notifications = MockNotificationPort::new();
        notifications
            .expect_conversion_failed()
            .times(1)
            .return_const(());
        notifications.expect_import_complete().times(0);
        notifications.expect_invalid_json().times(0);

        let mut actor = MockActorHandle::new();
        actor.expect_update_fields().times(0);
        actor.expect_embedded_records().times(0);
        actor.expect_delete_embedded().times(0);
        actor.expect_create_embedded().times(0);

        let import = ImportCharacter::new(Arc::new(notifications));

        let result = import.execute(r#"{ "actors": {} }"#, &actor).await;
        assert!(matches!(result, Err(ImportError::Validation(_))));
    }

    #[tokio::test]
    async fn apply_failure_is_reported_and_propagated() {
        let mut notifications = MockNotificationPort::new();
        notifications
            .expect_conversion_failed()
            .times(1)
            .return_const(());
        notifications.expect_import_complete().times(0);

        let mut actor = MockActorHandle::new();
        actor.expect_update_fields().returning(|_| Ok(()));
        actor
            .expect_embedded_records()
            .returning(|| Ok(vec![EmbeddedRecord::new("old.1", "class")]));
        actor
            .expect_delete_embedded()
            .returning(|_| Err(HandleError::Rejected("storage offline".to_string())));
        actor.expect_create_embedded().times(0);

        let import = ImportCharacter::new(Arc::new(notifications));

        let result = import.execute(&minimal_export(), &actor).await;
        assert!(matches!(result, Err(ImportError::Apply(_))));
    }
}
