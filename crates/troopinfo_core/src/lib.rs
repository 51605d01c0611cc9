pub mod diff;
pub mod error;
pub mod layout;
pub mod reader;
pub mod troopinfo;
pub mod writer;

pub use error::{CoreError, CoreErrorCode, FormatError};
pub use troopinfo::{Container, FieldValue, LevelUpData, TroopField, TroopInfo};
