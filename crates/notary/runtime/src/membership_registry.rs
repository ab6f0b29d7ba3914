//! Membership Registry: flat index of units and seat assignments
//!
//! Tracks unit → leader and seat → unit. Readable by everyone; every write
//! requires the registry capability, so in practice only the hub's
//! finalize path mutates it. A seat belongs to at most one active unit.

use crate::capability::{OwnerSlot, RegistryCapability};
use chrono::{DateTime, Utc};
use notary_types::{Address, DocumentId, NotaryError, NotaryResult, SeatId, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// A unit as the membership index sees it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitRecord {
    pub unit_id: UnitId,
    pub leader: Address,
    /// Set when the unit is created. No operation dissolves a unit yet, so
    /// this stays `true`; seat exclusivity checks still go through it.
    pub active: bool,
    pub members: BTreeSet<SeatId>,
    /// Document that formed the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formed_by: Option<DocumentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnitRecord {
    fn new(unit_id: UnitId, leader: Address, formed_by: Option<DocumentId>) -> Self {
        let now = Utc::now();
        Self {
            unit_id,
            leader,
            active: true,
            members: BTreeSet::new(),
            formed_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Flat membership index
#[derive(Debug)]
pub struct MembershipRegistry {
    owner: OwnerSlot,
    units: HashMap<UnitId, UnitRecord>,
    seat_units: HashMap<SeatId, UnitId>,
}

impl MembershipRegistry {
    pub fn new(capability: &RegistryCapability) -> Self {
        Self {
            owner: OwnerSlot::new("membership registry", capability),
            units: HashMap::new(),
            seat_units: HashMap::new(),
        }
    }

    /// Create and activate a unit
    pub fn create_unit(
        &mut self,
        capability: &RegistryCapability,
        unit_id: UnitId,
        leader: Address,
        formed_by: Option<DocumentId>,
    ) -> NotaryResult<()> {
        self.owner.ensure(capability)?;
        self.check_creatable(unit_id)?;

        info!(unit = %unit_id, leader = %leader, "Unit created");

        self.units
            .insert(unit_id, UnitRecord::new(unit_id, leader, formed_by));
        Ok(())
    }

    /// Replace a unit's leader, returning the previous one
    pub fn set_leader(
        &mut self,
        capability: &RegistryCapability,
        unit_id: UnitId,
        leader: Address,
    ) -> NotaryResult<Address> {
        self.owner.ensure(capability)?;
        let unit = self
            .units
            .get_mut(&unit_id)
            .ok_or(NotaryError::UnitNotFound(unit_id))?;

        let previous = std::mem::replace(&mut unit.leader, leader);
        unit.updated_at = Utc::now();

        info!(unit = %unit_id, previous = %previous, leader = %unit.leader, "Unit leader set");
        Ok(previous)
    }

    /// Put a seat into a unit
    pub fn assign_seat(
        &mut self,
        capability: &RegistryCapability,
        seat: SeatId,
        unit_id: UnitId,
    ) -> NotaryResult<()> {
        self.owner.ensure(capability)?;
        self.check_assignable(seat, unit_id)?;

        if let Some(previous) = self.seat_units.insert(seat, unit_id) {
            if previous != unit_id {
                if let Some(old) = self.units.get_mut(&previous) {
                    old.members.remove(&seat);
                }
            }
        }
        if let Some(unit) = self.units.get_mut(&unit_id) {
            unit.members.insert(seat);
            unit.updated_at = Utc::now();
        }

        debug!(seat = %seat, unit = %unit_id, "Seat assigned");
        Ok(())
    }

    /// Check that `unit_id` could be created now
    pub fn check_creatable(&self, unit_id: UnitId) -> NotaryResult<()> {
        if self.units.contains_key(&unit_id) {
            return Err(NotaryError::UnitAlreadyExists(unit_id));
        }
        Ok(())
    }

    /// Check that `seat` could be assigned to `unit_id` now. The unit must
    /// already exist; use [`Self::check_seat_free`] for a unit not yet created.
    pub fn check_assignable(&self, seat: SeatId, unit_id: UnitId) -> NotaryResult<()> {
        self.check_seat_free(seat, unit_id)?;
        if !self.units.contains_key(&unit_id) {
            return Err(NotaryError::UnitNotFound(unit_id));
        }
        Ok(())
    }

    /// Check that `seat` is not held by an active unit other than `unit_id`
    pub fn check_seat_free(&self, seat: SeatId, unit_id: UnitId) -> NotaryResult<()> {
        match self.seat_units.get(&seat) {
            Some(current) if *current != unit_id && self.is_active(*current) => {
                Err(NotaryError::SeatAlreadyAssigned {
                    seat,
                    unit: *current,
                })
            }
            _ => Ok(()),
        }
    }

    /// Move ownership to a new capability
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
        self.units.get(&unit_id).map(|u| &u.leader)
    }

    pub fn unit_of(&self, seat: SeatId) -> Option<UnitId> {
        self.seat_units.get(&seat).copied()
    }

    pub fn members_of(&self, unit_id: UnitId) -> Vec<SeatId> {
        self.units
            .get(&unit_id)
            .map(|u| u.members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&UnitRecord> {
        self.units.get(&unit_id)
    }

    pub fn contains_unit(&self, unit_id: UnitId) -> bool {
        self.units.contains_key(&unit_id)
    }

    pub fn is_active(&self, unit_id: UnitId) -> bool {
        self.units.get(&unit_id).map(|u| u.active).unwrap_or(false)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<_> = self.units.keys().copied().collect();
        ids.sort();
        ids
    }
}
