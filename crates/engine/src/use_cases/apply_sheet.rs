//! Merger/applier - applies a converted sheet onto the live target record.

use std::fmt;

use serde_json::{json, Map, Value};
use thiserror::Error;

use sheetbridge_domain::{CharacterSheet, RecordKind};

use crate::infrastructure::ports::{ActorHandle, HandleError};

/// The three host operations, in the order the applier issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    UpdateFields,
    DeleteRecords,
    CreateRecords,
}

impl fmt::Display for ApplyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplyStep::UpdateFields => "field update",
            ApplyStep::DeleteRecords => "sub-record deletion",
            ApplyStep::CreateRecords => "sub-record creation",
        };
        f.write_str(name)
    }
}

/// A host operation failed mid-apply.
///
/// The update/delete/create sequence is not transactional: a failure on a
/// later step leaves every earlier step's effect in place. The host error is
/// carried unmodified.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct ApplyError {
    /// The step that failed
    pub step: ApplyStep,
    #[source]
    pub source: HandleError,
}

/// Applies a canonical sheet document onto a target record.
///
/// Three strictly ordered steps, each awaited before the next begins:
///
/// 1. flatten the core fields into dotted paths and update them in a single
///    host call (atomic from the core's point of view, no rollback);
/// 2. delete every existing sub-record of a recognized category in one batch
///    (a full replace, not a diff - target-side edits on those records are
///    not preserved);
/// 3. create the new sub-records in one batch, preserving their order.
///
/// A failure stops the sequence; a failure after step 1 leaves the target in
/// a documented partially-updated state with no compensating action.
#[derive(Debug, Default)]
pub struct ApplySheet;

impl ApplySheet {
    pub fn new() -> Self {
        Self
    }

    /// Apply the sheet to the target behind the given handle.
    pub async fn execute(
        &self,
        sheet: &CharacterSheet,
        actor: &dyn ActorHandle,
    ) -> Result<(), ApplyError> {
        actor
            .update_fields(flatten_sheet(sheet))
            .await
            .map_err(|source| ApplyError {
                step: ApplyStep::UpdateFields,
                source,
            })?;

        let existing = actor
            .embedded_records()
            .await
            .map_err(|source| ApplyError {
                step: ApplyStep::DeleteRecords,
                source,
            })?;
        let stale: Vec<String> = existing
            .into_iter()
            .filter(|record| RecordKind::from_tag(&record.record_type).is_some())
            .map(|record| record.id)
            .collect();
        let replaced = stale.len();
        if !stale.is_empty() {
            actor
                .delete_embedded(stale)
                .await
                .map_err(|source| ApplyError {
                    step: ApplyStep::DeleteRecords,
                    source,
                })?;
        }

        actor
            .create_embedded(sheet.records.clone())
            .await
            .map_err(|source| ApplyError {
                step: ApplyStep::CreateRecords,
                source,
            })?;

        tracing::debug!(
            created = sheet.records.len(),
            replaced,
            "Applied converted sheet to target record"
        );
        Ok(())
    }
}

/// Flatten the sheet's core fields into a path-keyed update map.
///
/// Nested attribute bags become dotted paths under `system.`; arrays stay
/// whole values. The display name and its token mirror ride along so the
/// whole update lands in one host call.
fn flatten_sheet(sheet: &CharacterSheet) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), Value::String(sheet.name.clone()));
    fields.insert(
        "prototypeToken.name".to_string(),
        Value::String(sheet.name.clone()),
    );
    flatten_into(&mut fields, "system", &system_value(sheet));
    fields
}

/// The target-schema system block for the sheet's core fields.
fn system_value(sheet: &CharacterSheet) -> Value {
    json!({
        "details": {
            "level": { "value": sheet.details.level },
            "keyability": { "value": sheet.details.key_ability },
            "languages": { "value": sheet.details.languages, "details": "" },
            "biography": { "appearance": "", "backstory": sheet.details.backstory },
            "alliance": sheet.details.alliance,
        },
        "abilities": {
            "str": { "value": sheet.abilities.strength },
            "dex": { "value": sheet.abilities.dexterity },
            "con": { "value": sheet.abilities.constitution },
            "int": { "value": sheet.abilities.intelligence },
            "wis": { "value": sheet.abilities.wisdom },
            "cha": { "value": sheet.abilities.charisma },
        },
        "attributes": {
            "hp": {
                "value": sheet.attributes.hp.value,
                "max": sheet.attributes.hp.max,
                "temp": sheet.attributes.hp.temp,
            },
            "speed": { "value": sheet.attributes.speed },
            "initiative": { "statistic": sheet.attributes.initiative_statistic },
            "heroPoints": {
                "value": sheet.attributes.hero_points.value,
                "max": sheet.attributes.hero_points.max,
            },
        },
    })
}

/// Recursively flatten nested objects into dotted paths.
fn flatten_into(out: &mut Map<String, Value>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(out, &format!("{prefix}.{key}"), child);
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{EmbeddedRecord, MockActorHandle};
    use mockall::Sequence;
    use sheetbridge_domain::{
        AbilityScores, HeroPoints, HitPoints, RecordData, SheetAttributes, SheetDetails, SubRecord,
    };

    fn test_sheet() -> CharacterSheet {
        CharacterSheet {
            name: "Vexis Starling".to_string(),
            details: SheetDetails {
                level: 3,
                key_ability: "cha".to_string(),
                languages: vec!["common".to_string(), "sylvan".to_string()],
                backstory: "Imported from HLO.".to_string(),
                alliance: "party".to_string(),
            },
            abilities: AbilityScores::default(),
            attributes: SheetAttributes {
                hp: HitPoints::full(23),
                speed: 30,
                initiative_statistic: "perception".to_string(),
                hero_points: HeroPoints { value: 1, max: 3 },
            },
            records: vec![SubRecord::new(
                "Drift Lore",
                RecordData::Lore {
                    proficient: 1,
                    modifier: 0,
                },
            )],
        }
    }

    #[test]
    fn flattened_fields_use_dotted_paths() {
        let fields = flatten_sheet(&test_sheet());

        assert_eq!(fields["name"], "Vexis Starling");
        assert_eq!(fields["prototypeToken.name"], "Vexis Starling");
        assert_eq!(fields["system.details.level.value"], 3);
        assert_eq!(fields["system.details.keyability.value"], "cha");
        assert_eq!(fields["system.abilities.str.value"], 10);
        assert_eq!(fields["system.attributes.hp.max"], 23);
        assert_eq!(fields["system.attributes.initiative.statistic"], "perception");
        // Arrays are leaves, not recursion points
        assert_eq!(
            fields["system.details.languages.value"],
            serde_json::json!(["common", "sylvan"])
        );
    }

    #[tokio::test]
    async fn runs_the_three_steps_in_order() {
        let mut actor = MockActorHandle::new();
        let mut seq = Sequence::new();

        actor
            .expect_update_fields()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|fields| fields["name"] == "Vexis Starling")
            .returning(|_| Ok(()));
        actor
            .expect_embedded_records()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![EmbeddedRecord::new("old.1", "feat")]));
        actor
            .expect_delete_embedded()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|ids| ids.as_slice() == ["old.1"])
            .returning(|_| Ok(()));
        actor
            .expect_create_embedded()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|records| records.len() == 1 && records[0].name == "Drift Lore")
            .returning(|_| Ok(()));

        let result = ApplySheet::new().execute(&test_sheet(), &actor).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn only_recognized_record_types_are_deleted() {
        let mut actor = MockActorHandle::new();

        actor.expect_update_fields().returning(|_| Ok(()));
        actor.expect_embedded_records().returning(|| {
            Ok(vec![
                EmbeddedRecord::new("old.1", "feat"),
                EmbeddedRecord::new("old.2", "spell"),
                EmbeddedRecord::new("old.3", "lore"),
            ])
        });
        actor
            .expect_delete_embedded()
            .withf(|ids| ids.as_slice() == ["old.1", "old.3"])
            .returning(|_| Ok(()));
        actor.expect_create_embedded().returning(|_| Ok(()));

        let result = ApplySheet::new().execute(&test_sheet(), &actor).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_is_skipped_when_nothing_matches() {
        let mut actor = MockActorHandle::new();

        actor.expect_update_fields().returning(|_| Ok(()));
        actor
            .expect_embedded_records()
            .returning(|| Ok(vec![EmbeddedRecord::new("old.1", "spell")]));
        actor.expect_delete_embedded().times(0);
        actor.expect_create_embedded().times(1).returning(|_| Ok(()));

        let result = ApplySheet::new().execute(&test_sheet(), &actor).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failed_update_stops_the_sequence() {
        let mut actor = MockActorHandle::new();

        actor
            .expect_update_fields()
            .returning(|_| Err(HandleError::PermissionDenied("not an owner".to_string())));
        actor.expect_embedded_records().times(0);
        actor.expect_delete_embedded().times(0);
        actor.expect_create_embedded().times(0);

        let err = ApplySheet::new()
            .execute(&test_sheet(), &actor)
            .await
            .expect_err("update should fail");
        assert_eq!(err.step, ApplyStep::UpdateFields);
    }

    #[tokio::test]
    async fn failed_delete_prevents_create() {
        let mut actor = MockActorHandle::new();

        actor.expect_update_fields().returning(|_| Ok(()));
        actor
            .expect_embedded_records()
            .returning(|| Ok(vec![EmbeddedRecord::new("old.1", "feat")]));
        actor
            .expect_delete_embedded()
            .returning(|_| Err(HandleError::Rejected("storage offline".to_string())));
        actor.expect_create_embedded().times(0);

        let err = ApplySheet::new()
            .execute(&test_sheet(), &actor)
            .await
            .expect_err("delete should fail");
        assert_eq!(err.step, ApplyStep::DeleteRecords);
    }
}
