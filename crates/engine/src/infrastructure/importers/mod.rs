//! Character importers.
//!
//! This module converts character exports from external builder tools into
//! the canonical sheet document. Currently supports HeroLab Online exports.

mod herolab;
mod herolab_types;

pub use herolab::{map_character, ValidationError};
pub use herolab_types::{GameValues, HeroLabActor, HeroLabExport, HeroLabItem, Stat};
