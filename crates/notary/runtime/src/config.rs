//! Hub configuration.
//!
//! Defines the grade each hierarchy level requires, unit and clan size
//! bounds, and how grade revocation treats pending documents. Loaded from
//! TOML; every field has a default.

use std::path::Path;

use notary_types::{HierarchyLevel, NotaryError, NotaryGrade, NotaryResult};
use serde::{Deserialize, Serialize};

/// Configuration for a notary hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Minimum grade required to issue at each hierarchy level.
    pub grades: GradeRequirements,

    /// Maximum number of seats a unit join document may list.
    pub max_unit_seats: usize,

    /// Minimum number of units a clan is registered with. Never below 2.
    pub min_clan_units: usize,

    /// When set, signing and finalizing re-check the issuer's current grade,
    /// so revoking a notary stalls the documents it issued.
    pub revocation_voids_pending: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            grades: GradeRequirements::default(),
            max_unit_seats: 10,
            min_clan_units: 2,
            revocation_voids_pending: false,
        }
    }
}

impl HubConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> NotaryResult<Self> {
        let config: HubConfig =
            toml::from_str(contents).map_err(|e| NotaryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> NotaryResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NotaryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> NotaryResult<()> {
        if self.min_clan_units < 2 {
            return Err(NotaryError::Config(format!(
                "min_clan_units must be at least 2, got {}",
                self.min_clan_units
            )));
        }
        if self.max_unit_seats == 0 {
            return Err(NotaryError::Config("max_unit_seats must be positive".into()));
        }
        self.grades.validate()
    }

    /// Grade needed to issue a document at `level`
    pub fn required_grade(&self, level: HierarchyLevel) -> NotaryGrade {
        self.grades.required_for(level)
    }
}

/// Minimum grade per hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeRequirements {
    pub unit: NotaryGrade,
    pub clan: NotaryGrade,
    pub region: NotaryGrade,
    pub apex: NotaryGrade,
}

impl Default for GradeRequirements {
    fn default() -> Self {
        Self {
            unit: HierarchyLevel::Unit.default_grade(),
            clan: HierarchyLevel::Clan.default_grade(),
            region: HierarchyLevel::Region.default_grade(),
            apex: HierarchyLevel::Apex.default_grade(),
        }
    }
}

impl GradeRequirements {
    pub fn required_for(&self, level: HierarchyLevel) -> NotaryGrade {
        match level {
            HierarchyLevel::Unit => self.unit,
            HierarchyLevel::Clan => self.clan,
            HierarchyLevel::Region => self.region,
            HierarchyLevel::Apex => self.apex,
        }
    }

    fn validate(&self) -> NotaryResult<()> {
        let ladder = [
            (HierarchyLevel::Unit, self.unit),
            (HierarchyLevel::Clan, self.clan),
            (HierarchyLevel::Region, self.region),
            (HierarchyLevel::Apex, self.apex),
        ];

        for (level, grade) in ladder {
            if grade.is_none() {
                return Err(NotaryError::Config(format!(
                    "{} level cannot be issued without a grade",
                    level
                )));
            }
        }
        // Higher levels may not be cheaper than the levels below them.
        for pair in ladder.windows(2) {
            if pair[1].1 < pair[0].1 {
                return Err(NotaryError::Config(format!(
                    "{} requires {} which is below {} for {}",
                    pair[1].0, pair[1].1, pair[0].1, pair[0].0
                )));
            }
        }
        Ok(())
    }
}
