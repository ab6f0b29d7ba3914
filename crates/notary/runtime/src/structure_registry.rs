//! Structure Registry: the hierarchical view
//!
//! Mirrors unit leaders from the membership index and groups units into
//! clans. Like the membership registry, it is read-open and every write
//! needs the registry capability.

use crate::capability::{OwnerSlot, RegistryCapability};
use chrono::{DateTime, Utc};
use notary_types::{Address, ClanId, DocumentId, NotaryError, NotaryResult, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// A unit's position in the hierarchy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitNode {
    pub leader: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clan: Option<ClanId>,
}

/// A registered clan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClanRecord {
    pub clan_id: ClanId,
    pub member_units: Vec<UnitId>,
    pub leader: Address,
    /// Finalized resolutions, in finalize order
    pub ratified_resolutions: Vec<DocumentId>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClanRecord {
    pub fn is_ratified(&self) -> bool {
        !self.ratified_resolutions.is_empty()
    }
}

/// Hierarchical index of units and clans
#[derive(Debug)]
pub struct StructureRegistry {
    owner: OwnerSlot,
    min_clan_units: usize,
    units: HashMap<UnitId, UnitNode>,
    clans: HashMap<ClanId, ClanRecord>,
}

impl StructureRegistry {
    pub fn new(capability: &RegistryCapability, min_clan_units: usize) -> Self {
        Self {
            owner: OwnerSlot::new("structure registry", capability),
            min_clan_units: min_clan_units.max(2),
            units: HashMap::new(),
            clans: HashMap::new(),
        }
    }

    /// Copy a unit's leader from the membership index
    pub fn mirror_leader(
        &mut self,
        capability: &RegistryCapability,
        unit_id: UnitId,
        leader: Address,
    ) -> NotaryResult<()> {
        self.owner.ensure(capability)?;

        debug!(unit = %unit_id, leader = %leader, "Unit leader mirrored");

        self.units
            .entry(unit_id)
            .and_modify(|node| node.leader = leader.clone())
            .or_insert(UnitNode { leader, clan: None });
        Ok(())
    }

    /// Group existing units into a new clan
    pub fn register_clan(
        &mut self,
        capability: &RegistryCapability,
        clan_id: ClanId,
        units: Vec<UnitId>,
        leader: Address,
    ) -> NotaryResult<()> {
        self.owner.ensure(capability)?;
        self.check_registrable(clan_id, &units)?;

        for unit_id in &units {
            if let Some(node) = self.units.get_mut(unit_id) {
                node.clan = Some(clan_id);
            }
        }

        info!(clan = %clan_id, units = units.len(), leader = %leader, "Clan registered");

        let now = Utc::now();
        self.clans.insert(
            clan_id,
            ClanRecord {
                clan_id,
                member_units: units,
                leader,
                ratified_resolutions: Vec::new(),
                registered_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    /// Check every registration rule without mutating
    pub fn check_registrable(&self, clan_id: ClanId, units: &[UnitId]) -> NotaryResult<()> {
        if units.len() < self.min_clan_units {
            return Err(NotaryError::InsufficientClanSize {
                required: self.min_clan_units,
                provided: units.len(),
            });
        }
        let distinct: BTreeSet<_> = units.iter().collect();
        if distinct.len() != units.len() {
            return Err(NotaryError::InvalidDocument(
                "clan lists a unit more than once".into(),
            ));
        }
        if self.clans.contains_key(&clan_id) {
            return Err(NotaryError::ClanAlreadyExists(clan_id));
        }
        for unit_id in units {
            let node = self
                .units
                .get(unit_id)
                .ok_or(NotaryError::UnitNotFound(*unit_id))?;
            if let Some(clan) = node.clan {
                return Err(NotaryError::UnitAlreadyInClan {
                    unit: *unit_id,
                    clan,
                });
            }
        }
        Ok(())
    }

    /// Replace a clan's leader, returning the previous one
    pub fn set_clan_leader(
        &mut self,
        capability: &RegistryCapability,
        clan_id: ClanId,
        leader: Address,
    ) -> NotaryResult<Address> {
        self.owner.ensure(capability)?;
        let clan = self
            .clans
            .get_mut(&clan_id)
            .ok_or(NotaryError::ClanNotFound(clan_id))?;

        let previous = std::mem::replace(&mut clan.leader, leader);
        clan.updated_at = Utc::now();

        info!(clan = %clan_id, previous = %previous, leader = %clan.leader, "Clan leader set");
        Ok(previous)
    }

    /// Record a finalized resolution against its clan
    pub fn mark_ratified(
        &mut self,
        capability: &RegistryCapability,
        clan_id: ClanId,
        document: DocumentId,
    ) -> NotaryResult<()> {
        self.owner.ensure(capability)?;
        let clan = self
            .clans
            .get_mut(&clan_id)
            .ok_or(NotaryError::ClanNotFound(clan_id))?;

        clan.ratified_resolutions.push(document);
        clan.updated_at = Utc::now();

        info!(clan = %clan_id, document = %document, "Clan resolution ratified");
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        current: &RegistryCapability,
        next: &RegistryCapability,
    ) -> NotaryResult<()> {
        self.owner.transfer(current, next)
    }

    pub fn check_owner(&self, capability: &RegistryCapability) -> NotaryResult<()> {
        self.owner.ensure(capability)
    }

    // --- Query methods ---

    pub fn leader_of(&self, unit_id: UnitId) -> Option<&Address> {
        self.units.get(&unit_id).map(|node| &node.leader)
    }

    pub fn clan_of(&self, unit_id: UnitId) -> Option<ClanId> {
        self.units.get(&unit_id).and_then(|node| node.clan)
    }

    pub fn clan(&self, clan_id: ClanId) -> Option<&ClanRecord> {
        self.clans.get(&clan_id)
    }

    pub fn clan_leader(&self, clan_id: ClanId) -> Option<&Address> {
        self.clans.get(&clan_id).map(|clan| &clan.leader)
    }

    pub fn clan_count(&self) -> usize {
        self.clans.len()
    }

    pub fn min_clan_units(&self) -> usize {
        self.min_clan_units
    }
}
