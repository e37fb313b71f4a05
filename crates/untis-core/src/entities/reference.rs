use serde::{Deserialize, Serialize};

use crate::enums::ReferenceKind;

/// A teacher, room, class or subject record from a reference listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceEntity {
    pub kind: ReferenceKind,
    pub id: i64,
    /// Short name (e.g. `5AHIF`, `E12`, a teacher's abbreviation).
    pub name: String,
    /// Long name. For teachers this starts with the family name.
    pub long_name: String,
    /// Given name. Only teachers carry one.
    pub fore_name: Option<String>,
    pub fore_color: Option<String>,
    pub back_color: Option<String>,
}

impl ReferenceEntity {
    /// First whitespace-delimited token of the long name.
    ///
    /// For teacher records this is the family name.
    #[must_use]
    pub fn family_name(&self) -> &str {
        self.long_name.split_whitespace().next().unwrap_or_default()
    }
}
