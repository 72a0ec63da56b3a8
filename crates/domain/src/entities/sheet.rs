//! Character sheet entity - the canonical document produced by conversion.
//!
//! This is the sole contract between the extractor/mapper and the
//! merger/applier: a flat core-fields record plus an ordered list of typed
//! sub-records. It is a value type owned by the conversion pipeline and is
//! never retained after the merge step.

use serde::{Deserialize, Serialize};

use super::record::SubRecord;

/// A converted character sheet ready to be applied to a target record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    /// Display name of the character
    pub name: String,
    /// Level, key ability, languages, and other scalar details
    pub details: SheetDetails,
    /// The six ability scores
    pub abilities: AbilityScores,
    /// Derived combat attributes
    pub attributes: SheetAttributes,
    /// Ordered sub-records; relative order is preserved through the merge
    pub records: Vec<SubRecord>,
}

/// Scalar details of the character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDetails {
    /// Character level, taken from the source's top-level level field
    pub level: i32,
    /// Key ability abbreviation (e.g. "cha")
    pub key_ability: String,
    /// Known languages, lower-cased, in source order
    pub languages: Vec<String>,
    /// Biography backstory text
    pub backstory: String,
    /// Alliance tag on the target sheet
    pub alliance: String,
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    /// Baseline score of 10 in every ability.
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

/// Hit point track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    pub value: i32,
    pub max: i32,
    pub temp: i32,
}

impl HitPoints {
    /// A full track at the given maximum with no temporary points.
    pub fn full(max: i32) -> Self {
        Self {
            value: max,
            max,
            temp: 0,
        }
    }
}

/// Hero point track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPoints {
    pub value: i32,
    pub max: i32,
}

/// Derived combat attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetAttributes {
    pub hp: HitPoints,
    /// Land speed in feet
    pub speed: i32,
    /// Statistic rolled for initiative (e.g. "perception")
    pub initiative_statistic: String,
    pub hero_points: HeroPoints,
}
