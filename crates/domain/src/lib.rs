pub mod entities;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    AbilityScores, CharacterSheet, FeatCategory, HeroPoints, HitPoints, Rarity, RecordData,
    RecordKind, SavingThrows, SheetAttributes, SheetDetails, SubRecord,
};
