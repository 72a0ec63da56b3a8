//! Use cases - the merger/applier and the import pipeline orchestration.

mod apply_sheet;
mod import_character;

pub use apply_sheet::{ApplyError, ApplySheet, ApplyStep};
pub use import_character::{ImportCharacter, ImportError};
