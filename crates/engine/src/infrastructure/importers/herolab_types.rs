//! Type definitions for the HeroLab Online export format.
//!
//! These types mirror the exported JSON schema loosely: every field is
//! optional, numeric fields may arrive as numbers or numeric strings, and the
//! record maps keyed by internal opaque ids are read into vectors in document
//! order. The export writes those maps in insertion order, and field lookup
//! is defined as first-match in exactly that order, so the ids are dropped
//! and the order is kept.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Root structure of a HeroLab Online export.
#[derive(Debug, Default, Deserialize)]
pub struct HeroLabExport {
    /// Actor records in document order; only the first is used.
    #[serde(default, deserialize_with = "object_records")]
    pub actors: Vec<HeroLabActor>,
}

/// One exported actor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroLabActor {
    #[serde(default)]
    pub name: Option<String>,
    /// Flat mapping of scalar fields (race, class text, background text)
    #[serde(default)]
    pub game_values: GameValues,
    /// Item records in document order
    #[serde(default, deserialize_with = "object_records")]
    pub items: Vec<HeroLabItem>,
}

/// Flat scalar fields on an actor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameValues {
    #[serde(default)]
    pub act_level_net: Option<Stat>,
    #[serde(default)]
    pub act_race: Option<String>,
    #[serde(default)]
    pub act_background_text: Option<String>,
    #[serde(default)]
    pub act_class_text: Option<String>,
}

/// One item record on an actor.
///
/// The numeric fields' meaning depends on `key` and `compset`: `stNet`
/// carries ability scores and speeds, `rvMax` resource maximums, and
/// `reqLevelNet` feat prerequisite levels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroLabItem {
    /// Short opaque code whose prefix identifies the item's category
    #[serde(default)]
    pub key: Option<String>,
    /// Coarse type discriminator (e.g. "Heritage", "Feat", "Action")
    #[serde(default)]
    pub compset: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text trait markers; drives feat categorization
    #[serde(default, rename = "Trait")]
    pub trait_text: Option<String>,
    #[serde(default)]
    pub st_net: Option<Stat>,
    #[serde(default)]
    pub rv_max: Option<Stat>,
    #[serde(default)]
    pub req_level_net: Option<Stat>,
    #[serde(default)]
    pub use_in_play: Option<String>,
    #[serde(default)]
    pub re_special: Option<String>,
    #[serde(default)]
    pub re_prerequisites: Option<String>,
}

impl HeroLabItem {
    /// Whether the item's key starts with the given category prefix.
    pub fn key_starts_with(&self, prefix: &str) -> bool {
        self.key.as_deref().is_some_and(|key| key.starts_with(prefix))
    }

    /// Whether the item's compset equals the given discriminator.
    pub fn is_compset(&self, compset: &str) -> bool {
        self.compset.as_deref() == Some(compset)
    }
}

/// A numeric stat that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Stat {
    Number(f64),
    Text(String),
    /// Any other shape; never numeric
    Other(serde_json::Value),
}

impl Stat {
    /// The value as a finite number, if it is one.
    ///
    /// Strings are trimmed and parsed. Non-finite and unparseable values
    /// yield `None` so callers fall back to their documented defaults.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Stat::Number(n) => Some(*n),
            Stat::Text(s) => s.trim().parse().ok(),
            Stat::Other(_) => None,
        }
        .filter(|v: &f64| v.is_finite())
    }
}

/// Deserialize a JSON object's values into a `Vec`, preserving document order.
///
/// `null` deserializes as empty, matching the exporter's habit of emitting
/// `null` where a record map is absent.
fn object_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct ObjectRecords<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for ObjectRecords<T>
    where
        T: Deserialize<'de>,
    {
        type Value = Vec<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of id to record, or null")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut records = Vec::new();
            while let Some((_, record)) = map.next_entry::<IgnoredAny, T>()? {
                records.push(record);
            }
            Ok(records)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(ObjectRecords(PhantomData))
}
