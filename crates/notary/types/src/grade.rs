//! Notary grades and hierarchy levels
//!
//! A grade is the rank held by a notary. It decides the highest hierarchy
//! level at which that notary may issue documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Notarization rank held by a caller, ordered from lowest to highest
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum NotaryGrade {
    /// No notarization rights
    #[default]
    None,
    /// May notarize unit-level documents
    Unit,
    /// May notarize clan-level documents
    Clan,
    /// May notarize region-level documents
    Region,
    /// May notarize apex-level documents
    Apex,
    /// Highest rank
    Chair,
}

impl NotaryGrade {
    /// All grades in ascending order
    pub const ALL: [NotaryGrade; 6] = [
        NotaryGrade::None,
        NotaryGrade::Unit,
        NotaryGrade::Clan,
        NotaryGrade::Region,
        NotaryGrade::Apex,
        NotaryGrade::Chair,
    ];

    /// Whether this grade satisfies a required minimum
    pub fn satisfies(&self, required: NotaryGrade) -> bool {
        *self >= required
    }

    pub fn is_none(&self) -> bool {
        matches!(self, NotaryGrade::None)
    }
}

impl fmt::Display for NotaryGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotaryGrade::None => "none",
            NotaryGrade::Unit => "unit",
            NotaryGrade::Clan => "clan",
            NotaryGrade::Region => "region",
            NotaryGrade::Apex => "apex",
            NotaryGrade::Chair => "chair",
        };
        f.write_str(name)
    }
}

/// Hierarchy level a document acts upon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Unit,
    Clan,
    Region,
    Apex,
}

impl HierarchyLevel {
    /// Grade required when no explicit requirement is configured
    pub fn default_grade(&self) -> NotaryGrade {
        match self {
            HierarchyLevel::Unit => NotaryGrade::Unit,
            HierarchyLevel::Clan => NotaryGrade::Clan,
            HierarchyLevel::Region => NotaryGrade::Region,
            HierarchyLevel::Apex => NotaryGrade::Apex,
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HierarchyLevel::Unit => "unit",
            HierarchyLevel::Clan => "clan",
            HierarchyLevel::Region => "region",
            HierarchyLevel::Apex => "apex",
        };
        f.write_str(name)
    }
}
