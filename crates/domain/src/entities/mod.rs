//! Domain entities - the canonical character sheet document

mod record;
mod sheet;

pub use record::{FeatCategory, Rarity, RecordData, RecordKind, SavingThrows, SubRecord};
pub use sheet::{
    AbilityScores, CharacterSheet, HeroPoints, HitPoints, SheetAttributes, SheetDetails,
};
