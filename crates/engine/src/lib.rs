//! Sheetbridge Engine library.
//!
//! Converts a HeroLab Online character export into the document schema of the
//! target virtual-tabletop sheet and merges it onto an existing character
//! record owned by the host application.
//!
//! ## Structure
//!
//! - `infrastructure/` - Raw source schema, the extractor/mapper, and the
//!   port traits the host implements (persistence handle, notifications)
//! - `use_cases/` - The merger/applier and the import pipeline orchestration
//!
//! The host's UI and persistence layers are external collaborators reached
//! only through the ports in [`infrastructure::ports`].

pub mod infrastructure;
pub mod use_cases;

pub use infrastructure::importers::{map_character, HeroLabExport, ValidationError};
pub use infrastructure::ports::{ActorHandle, EmbeddedRecord, HandleError, NotificationPort};
pub use use_cases::{ApplyError, ApplySheet, ApplyStep, ImportCharacter, ImportError};
