//! Sub-record entities - typed embedded records attached to a character sheet.
//!
//! A converted sheet carries an ordered list of sub-records (ancestry,
//! heritage, background, class, feats, actions, lore skills). Each one has a
//! display name, an icon reference, and a type-specific attribute bag.

use serde::{Deserialize, Serialize};

/// The embedded record categories the conversion controls on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Ancestry,
    Heritage,
    Background,
    Class,
    Feat,
    Action,
    Lore,
}

impl RecordKind {
    /// Every recognized category, in a fixed order.
    ///
    /// The applier replaces exactly these categories on the target; embedded
    /// records of any other type are left untouched.
    pub const ALL: [RecordKind; 7] = [
        RecordKind::Ancestry,
        RecordKind::Heritage,
        RecordKind::Background,
        RecordKind::Class,
        RecordKind::Feat,
        RecordKind::Action,
        RecordKind::Lore,
    ];

    /// The type tag used by the target schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Ancestry => "ancestry",
            RecordKind::Heritage => "heritage",
            RecordKind::Background => "background",
            RecordKind::Class => "class",
            RecordKind::Feat => "feat",
            RecordKind::Action => "action",
            RecordKind::Lore => "lore",
        }
    }

    /// Parse a target-schema type tag. Unrecognized tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<RecordKind> {
        RecordKind::ALL.iter().copied().find(|k| k.as_str() == tag)
    }

    /// Placeholder icon shipped with the target system for this category.
    pub fn default_icon(&self) -> &'static str {
        match self {
            RecordKind::Ancestry => "systems/pf2e/icons/default-icons/ancestry.svg",
            RecordKind::Heritage => "systems/pf2e/icons/default-icons/heritage.svg",
            RecordKind::Background => "systems/pf2e/icons/default-icons/background.svg",
            RecordKind::Class => "systems/pf2e/icons/default-icons/class.svg",
            RecordKind::Feat => "systems/pf2e/icons/default-icons/feat.svg",
            RecordKind::Action => "systems/pf2e/icons/default-icons/action.svg",
            RecordKind::Lore => "systems/pf2e/icons/default-icons/lore.svg",
        }
    }
}

/// Rarity tag carried by most sub-records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
        }
    }
}

/// Category assigned to an imported feat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatCategory {
    Ancestry,
    Class,
    Skill,
    General,
}

impl FeatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatCategory::Ancestry => "ancestry",
            FeatCategory::Class => "class",
            FeatCategory::Skill => "skill",
            FeatCategory::General => "general",
        }
    }
}

/// Saving throw ranks on a class record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrows {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

/// Type-specific attributes of a sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordData {
    /// Ancestry entry derived from the source race field.
    Ancestry {
        rarity: Rarity,
        traits: Vec<String>,
        hp: i32,
        speed: i32,
        size: String,
    },
    /// Heritage entry, present only when the source carries one.
    Heritage {
        rarity: Rarity,
        traits: Vec<String>,
        /// Display name of the ancestry this heritage belongs to.
        ancestry: String,
    },
    /// Background entry named after the source background text.
    Background { rarity: Rarity, traits: Vec<String> },
    /// Class entry parsed from the source class text.
    Class {
        level: i32,
        key_ability: String,
        hp_per_level: i32,
        perception: i32,
        saving_throws: SavingThrows,
    },
    /// A feat with its derived category.
    Feat {
        level: i32,
        category: FeatCategory,
        rarity: Rarity,
        description: String,
    },
    /// An action usable in play.
    Action { rarity: Rarity, description: String },
    /// A lore skill with a proficiency rank.
    Lore { proficient: i32, modifier: i32 },
}

impl RecordData {
    /// The category this attribute bag belongs to.
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordData::Ancestry { .. } => RecordKind::Ancestry,
            RecordData::Heritage { .. } => RecordKind::Heritage,
            RecordData::Background { .. } => RecordKind::Background,
            RecordData::Class { .. } => RecordKind::Class,
            RecordData::Feat { .. } => RecordKind::Feat,
            RecordData::Action { .. } => RecordKind::Action,
            RecordData::Lore { .. } => RecordKind::Lore,
        }
    }
}

/// A typed sub-record attached to the sheet document.
///
/// Simple data struct with public fields; any combination of name, icon, and
/// attributes is a valid record, so there are no invariants to protect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRecord {
    /// Display name on the target sheet
    pub name: String,
    /// Icon reference understood by the target system
    pub img: String,
    /// Type tag plus type-specific attributes
    pub data: RecordData,
}

impl SubRecord {
    /// Create a sub-record with the placeholder icon for its kind.
    pub fn new(name: impl Into<String>, data: RecordData) -> Self {
        Self {
            name: name.into(),
            img: data.kind().default_icon().to_string(),
            data,
        }
    }

    /// The category of this record.
    pub fn kind(&self) -> RecordKind {
        self.data.kind()
    }
}
