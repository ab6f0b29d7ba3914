//! Notary Hub: the orchestrator
//!
//! The hub is the only entry point that issues documents and the only
//! holder of the registry capability. It composes the grade authority, the
//! two registries, the document registry and the journal behind one lock,
//! so every call is a serialized, all-or-nothing transaction.
//!
//! Finalize validates the whole payload against both registries before it
//! writes anything. A rejected finalize leaves the document, the registries
//! and the journal exactly as they were.

use crate::{
    authority::GradeAuthority,
    capability::RegistryCapability,
    config::HubConfig,
    document_registry::{DocumentRegistry, FinalizeOutcome},
    membership_registry::{MembershipRegistry, UnitRecord},
    seats::SeatDirectory,
    structure_registry::{ClanRecord, StructureRegistry},
};
use notary_types::{
    Address, CapabilityId, ClanId, DocHash, Document, DocumentId, DocumentPayload,
    DocumentSignature, HierarchyLevel, NotaryError, NotaryEvent, NotaryGrade, NotaryJournal,
    NotaryResult, SeatId, SignerRef, UnitId,
};
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// Result of an accepted signature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignOutcome {
    pub document: DocumentId,
    pub signer: SignerRef,
    pub signed_count: u32,
    pub min_signatures: u32,
    /// Whether the document can now be finalized
    pub quorum_met: bool,
}

/// Everything the hub mutates, guarded as one unit
struct HubState {
    capability: RegistryCapability,
    authority: GradeAuthority,
    membership: MembershipRegistry,
    structure: StructureRegistry,
    documents: DocumentRegistry,
    journal: NotaryJournal,
}

/// The Notary Hub
pub struct NotaryHub {
    config: HubConfig,
    seats: Arc<dyn SeatDirectory>,
    state: RwLock<HubState>,
}

impl NotaryHub {
    /// Create a hub with the default configuration
    pub fn new(admin: Address, seats: Arc<dyn SeatDirectory>) -> Self {
        Self::build(admin, seats, HubConfig::default())
    }

    /// Create a hub with a validated configuration
    pub fn with_config(
        admin: Address,
        seats: Arc<dyn SeatDirectory>,
        config: HubConfig,
    ) -> NotaryResult<Self> {
        config.validate()?;
        Ok(Self::build(admin, seats, config))
    }

    fn build(admin: Address, seats: Arc<dyn SeatDirectory>, config: HubConfig) -> Self {
        let capability = RegistryCapability::mint();

        info!(
            admin = %admin,
            capability = %capability.id().short(),
            "Notary hub created"
        );

        let state = HubState {
            membership: MembershipRegistry::new(&capability),
            structure: StructureRegistry::new(&capability, config.min_clan_units),
            authority: GradeAuthority::new(admin),
            documents: DocumentRegistry::new(),
            journal: NotaryJournal::new(),
            capability,
        };

        Self {
            config,
            seats,
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> NotaryResult<RwLockReadGuard<'_, HubState>> {
        self.state.read().map_err(|_| NotaryError::LockPoisoned)
    }

    fn write(&self) -> NotaryResult<RwLockWriteGuard<'_, HubState>> {
        self.state.write().map_err(|_| NotaryError::LockPoisoned)
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    // --- Grade administration ---

    pub fn grant_grade(
        &self,
        caller: &Address,
        notary: Address,
        grade: NotaryGrade,
    ) -> NotaryResult<()> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        state
            .authority
            .grant(caller, notary, grade, &mut state.journal)
    }

    pub fn revoke_grade(&self, caller: &Address, notary: &Address) -> NotaryResult<NotaryGrade> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        state.authority.revoke(caller, notary, &mut state.journal)
    }

    pub fn transfer_admin(&self, caller: &Address, admin: Address) -> NotaryResult<()> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        state
            .authority
            .transfer_admin(caller, admin, &mut state.journal)
    }

    /// Replace the registry capability in both registries at once
    pub fn rotate_capability(&self, caller: &Address) -> NotaryResult<CapabilityId> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        state
            .authority
            .ensure_admin(caller, "rotate the registry capability")?;

        state.membership.check_owner(&state.capability)?;
        state.structure.check_owner(&state.capability)?;

        let next = RegistryCapability::mint();
        state
            .membership
            .transfer_ownership(&state.capability, &next)?;
        state
            .structure
            .transfer_ownership(&state.capability, &next)?;
        let previous = std::mem::replace(&mut state.capability, next);

        let current = state.capability.id().clone();
        info!(
            previous = %previous.id().short(),
            current = %current.short(),
            "Registry capability rotated"
        );

        state.journal.log(NotaryEvent::CapabilityRotated {
            previous: previous.id().clone(),
            current: current.clone(),
        });
        Ok(current)
    }

    // --- Issuance ---

    /// Issue a document that forms `unit_id` from `member_seats`
    pub fn issue_unit_join(
        &self,
        caller: &Address,
        unit_id: UnitId,
        proposed_leader: Address,
        member_seats: Vec<SeatId>,
        min_signatures: u32,
        doc_hash: DocHash,
    ) -> NotaryResult<DocumentId> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        self.ensure_issuer(&state.authority, caller, HierarchyLevel::Unit)?;

        if member_seats.is_empty() {
            return Err(NotaryError::InvalidDocument(
                "unit join lists no seats".into(),
            ));
        }
        let distinct: BTreeSet<_> = member_seats.iter().collect();
        if distinct.len() != member_seats.len() {
            return Err(NotaryError::InvalidDocument(
                "unit join lists a seat more than once".into(),
            ));
        }
        if member_seats.len() > self.config.max_unit_seats {
            return Err(NotaryError::InvalidDocument(format!(
                "unit join lists {} seats, limit is {}",
                member_seats.len(),
                self.config.max_unit_seats
            )));
        }
        check_quorum(min_signatures, member_seats.len())?;

        for seat in &member_seats {
            if !self.seats.seat_exists(*seat) {
                return Err(NotaryError::SeatNotFound(*seat));
            }
            state.membership.check_seat_free(*seat, unit_id)?;
        }
        state.membership.check_creatable(unit_id)?;

        let payload = DocumentPayload::UnitJoin {
            unit_id,
            proposed_leader,
            member_seats,
        };
        Ok(state.documents.issue(
            payload,
            min_signatures,
            doc_hash,
            caller.clone(),
            &mut state.journal,
        ))
    }

    /// Issue a document replacing a unit's leader, signed by its current members
    pub fn issue_leader_appointment(
        &self,
        caller: &Address,
        unit_id: UnitId,
        new_leader: Address,
        min_signatures: u32,
        doc_hash: DocHash,
    ) -> NotaryResult<DocumentId> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        self.ensure_issuer(&state.authority, caller, HierarchyLevel::Unit)?;

        if !state.membership.is_active(unit_id) {
            return Err(NotaryError::UnitNotFound(unit_id));
        }
        // Membership is frozen here; later joins do not widen the signer set.
        let eligible_seats = state.membership.members_of(unit_id);
        check_quorum(min_signatures, eligible_seats.len())?;

        let payload = DocumentPayload::LeaderAppointment {
            unit_id,
            new_leader,
            eligible_seats,
        };
        Ok(state.documents.issue(
            payload,
            min_signatures,
            doc_hash,
            caller.clone(),
            &mut state.journal,
        ))
    }

    /// Issue a resolution every member unit's leader must ratify
    pub fn issue_clan_resolution(
        &self,
        caller: &Address,
        clan_id: ClanId,
        doc_hash: DocHash,
    ) -> NotaryResult<DocumentId> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        self.ensure_issuer(&state.authority, caller, HierarchyLevel::Clan)?;

        let member_units = state
            .structure
            .clan(clan_id)
            .ok_or(NotaryError::ClanNotFound(clan_id))?
            .member_units
            .clone();
        let min_signatures = member_units.len() as u32;

        let payload = DocumentPayload::ClanResolution {
            clan_id,
            member_units,
        };
        Ok(state.documents.issue(
            payload,
            min_signatures,
            doc_hash,
            caller.clone(),
            &mut state.journal,
        ))
    }

    /// Issue a document replacing a clan's leader, signed by unit leaders
    pub fn issue_clan_leader_appointment(
        &self,
        caller: &Address,
        clan_id: ClanId,
        new_leader: Address,
        min_signatures: u32,
        doc_hash: DocHash,
    ) -> NotaryResult<DocumentId> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        self.ensure_issuer(&state.authority, caller, HierarchyLevel::Clan)?;

        let member_units = state
            .structure
            .clan(clan_id)
            .ok_or(NotaryError::ClanNotFound(clan_id))?
            .member_units
            .clone();
        check_quorum(min_signatures, member_units.len())?;

        let payload = DocumentPayload::ClanLeaderAppointment {
            clan_id,
            new_leader,
            member_units,
        };
        Ok(state.documents.issue(
            payload,
            min_signatures,
            doc_hash,
            caller.clone(),
            &mut state.journal,
        ))
    }

    /// Group existing units into a clan. A precondition for clan
    /// documents, not itself a quorum document.
    pub fn register_clan(
        &self,
        caller: &Address,
        clan_id: ClanId,
        units: Vec<UnitId>,
        leader: Address,
    ) -> NotaryResult<()> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        self.ensure_issuer(&state.authority, caller, HierarchyLevel::Clan)?;

        state.structure.check_registrable(clan_id, &units)?;
        if let Some(inactive) = units.iter().find(|u| !state.membership.is_active(**u)) {
            return Err(NotaryError::UnitNotFound(*inactive));
        }

        state
            .structure
            .register_clan(&state.capability, clan_id, units.clone(), leader.clone())?;

        state.journal.log(NotaryEvent::ClanRegistered {
            clan: clan_id,
            units,
            leader,
            registered_by: caller.clone(),
        });
        Ok(())
    }

    // --- Signing and finalization ---

    /// Record `caller`'s signature for `signer` on a document
    pub fn sign(
        &self,
        caller: &Address,
        document_id: DocumentId,
        signer: SignerRef,
    ) -> NotaryResult<SignOutcome> {
        let mut guard = self.write()?;
        let state = &mut *guard;

        let document = state.documents.get(document_id)?;
        document.check_signable(&signer)?;
        if self.config.revocation_voids_pending {
            self.ensure_issuer_standing(&state.authority, document)?;
        }
        self.ensure_signer_control(&state.membership, caller, document_id, &signer)?;
        let min_signatures = document.min_signatures;

        let result = state.documents.sign(
            document_id,
            DocumentSignature::new(signer, caller.clone()),
            &mut state.journal,
        )?;

        Ok(SignOutcome {
            document: document_id,
            signer,
            signed_count: result.signed_count(),
            min_signatures,
            quorum_met: result.quorum_met(),
        })
    }

    /// Apply a document whose quorum is met. Anyone may call it, once.
    pub fn finalize(
        &self,
        caller: &Address,
        document_id: DocumentId,
    ) -> NotaryResult<FinalizeOutcome> {
        let mut guard = self.write()?;
        let state = &mut *guard;

        let (payload, signed_seats) = {
            let document = state.documents.check_finalizable(document_id)?;
            if self.config.revocation_voids_pending {
                self.ensure_issuer_standing(&state.authority, document)?;
            }
            (document.payload.clone(), document.signed_seats())
        };

        validate_payload(state, &payload, &signed_seats)?;
        apply_payload(state, document_id, &payload, &signed_seats)?;

        state
            .documents
            .complete_finalize(document_id, caller, &mut state.journal)
    }

    fn ensure_issuer(
        &self,
        authority: &GradeAuthority,
        caller: &Address,
        level: HierarchyLevel,
    ) -> NotaryResult<()> {
        authority.ensure_grade(caller, self.config.required_grade(level))
    }

    /// The issuer must still hold the grade the document's level needs
    fn ensure_issuer_standing(
        &self,
        authority: &GradeAuthority,
        document: &Document,
    ) -> NotaryResult<()> {
        self.ensure_issuer(authority, &document.issuer, document.level())
    }

    fn ensure_signer_control(
        &self,
        membership: &MembershipRegistry,
        caller: &Address,
        document_id: DocumentId,
        signer: &SignerRef,
    ) -> NotaryResult<()> {
        match signer {
            SignerRef::Seat(seat) => {
                if !self.seats.controls(caller, *seat) {
                    warn!(
                        caller = %caller,
                        seat = %seat,
                        document = %document_id,
                        "Signature without seat control"
                    );
                    return Err(NotaryError::Unauthorized(format!(
                        "{} does not control {}",
                        caller, seat
                    )));
                }
                Ok(())
            }
            // Unit leaders are resolved live, so a replaced leader loses the right to sign.
            SignerRef::UnitLeader(unit) => match membership.leader_of(*unit) {
                Some(leader) if leader == caller => Ok(()),
                _ => Err(NotaryError::NotEligibleSigner {
                    document: document_id,
                    signer: *signer,
                }),
            },
        }
    }

    // --- Query methods ---

    pub fn leader_of(&self, unit_id: UnitId) -> NotaryResult<Option<Address>> {
        Ok(self.read()?.membership.leader_of(unit_id).cloned())
    }

    pub fn unit_of(&self, seat: SeatId) -> NotaryResult<Option<UnitId>> {
        Ok(self.read()?.membership.unit_of(seat))
    }

    pub fn members_of(&self, unit_id: UnitId) -> NotaryResult<Vec<SeatId>> {
        Ok(self.read()?.membership.members_of(unit_id))
    }

    pub fn unit(&self, unit_id: UnitId) -> NotaryResult<Option<UnitRecord>> {
        Ok(self.read()?.membership.unit(unit_id).cloned())
    }

    pub fn clan_of(&self, unit_id: UnitId) -> NotaryResult<Option<ClanId>> {
        Ok(self.read()?.structure.clan_of(unit_id))
    }

    pub fn clan_leader(&self, clan_id: ClanId) -> NotaryResult<Option<Address>> {
        Ok(self.read()?.structure.clan_leader(clan_id).cloned())
    }

    pub fn clan(&self, clan_id: ClanId) -> NotaryResult<Option<ClanRecord>> {
        Ok(self.read()?.structure.clan(clan_id).cloned())
    }

    pub fn clan_count(&self) -> NotaryResult<usize> {
        Ok(self.read()?.structure.clan_count())
    }

    /// Unit leader as the structure registry mirrors it
    pub fn structure_leader_of(&self, unit_id: UnitId) -> NotaryResult<Option<Address>> {
        Ok(self.read()?.structure.leader_of(unit_id).cloned())
    }

    pub fn document(&self, document_id: DocumentId) -> NotaryResult<Document> {
        self.read()?.documents.get(document_id).cloned()
    }

    pub fn signed_count(&self, document_id: DocumentId) -> NotaryResult<u32> {
        Ok(self.read()?.documents.get(document_id)?.signed_count())
    }

    pub fn is_finalized(&self, document_id: DocumentId) -> NotaryResult<bool> {
        Ok(self.read()?.documents.get(document_id)?.is_finalized())
    }

    /// Ids of documents still collecting signatures
    pub fn pending_documents(&self) -> NotaryResult<Vec<DocumentId>> {
        Ok(self
            .read()?
            .documents
            .pending()
            .into_iter()
            .map(|d| d.id)
            .collect())
    }

    /// Ids of every document `issuer` has issued, oldest first
    pub fn documents_by_issuer(&self, issuer: &Address) -> NotaryResult<Vec<DocumentId>> {
        Ok(self
            .read()?
            .documents
            .by_issuer(issuer)
            .into_iter()
            .map(|d| d.id)
            .collect())
    }

    pub fn document_count(&self) -> NotaryResult<usize> {
        Ok(self.read()?.documents.count())
    }

    pub fn grade_of(&self, notary: &Address) -> NotaryResult<NotaryGrade> {
        Ok(self.read()?.authority.grade_of(notary))
    }

    pub fn notaries(&self) -> NotaryResult<Vec<(Address, NotaryGrade)>> {
        Ok(self.read()?.authority.notaries())
    }

    pub fn admin(&self) -> NotaryResult<Address> {
        Ok(self.read()?.authority.admin().clone())
    }

    pub fn capability_id(&self) -> NotaryResult<CapabilityId> {
        Ok(self.read()?.capability.id().clone())
    }

    /// Snapshot of the journal
    pub fn journal(&self) -> NotaryResult<NotaryJournal> {
        Ok(self.read()?.journal.clone())
    }

    /// Events that refer to one document, oldest first
    pub fn events_for(&self, document_id: DocumentId) -> NotaryResult<Vec<NotaryEvent>> {
        Ok(self
            .read()?
            .journal
            .receipts_for_document(document_id)
            .into_iter()
            .map(|r| r.event.clone())
            .collect())
    }

    /// Whether both registries agree on every unit's leader
    pub fn is_consistent(&self) -> NotaryResult<bool> {
        let state = self.read()?;
        Ok(state
            .membership
            .unit_ids()
            .into_iter()
            .all(|unit| state.membership.leader_of(unit) == state.structure.leader_of(unit)))
    }
}

fn check_quorum(min_signatures: u32, eligible: usize) -> NotaryResult<()> {
    if min_signatures == 0 || min_signatures as usize > eligible {
        return Err(NotaryError::InvalidQuorum {
            min_signatures,
            eligible,
        });
    }
    Ok(())
}

/// Run every check the payload's writes would run, without writing
fn validate_payload(
    state: &HubState,
    payload: &DocumentPayload,
    signed_seats: &[SeatId],
) -> NotaryResult<()> {
    state.membership.check_owner(&state.capability)?;
    state.structure.check_owner(&state.capability)?;

    match payload {
        DocumentPayload::UnitJoin { unit_id, .. } => {
            state.membership.check_creatable(*unit_id)?;
            for seat in signed_seats {
                state.membership.check_seat_free(*seat, *unit_id)?;
            }
        }
        DocumentPayload::LeaderAppointment { unit_id, .. } => {
            if !state.membership.contains_unit(*unit_id) {
                return Err(NotaryError::UnitNotFound(*unit_id));
            }
        }
        DocumentPayload::ClanResolution { clan_id, .. }
        | DocumentPayload::ClanLeaderAppointment { clan_id, .. } => {
            if state.structure.clan(*clan_id).is_none() {
                return Err(NotaryError::ClanNotFound(*clan_id));
            }
        }
    }
    Ok(())
}

/// Write a validated payload to both registries
fn apply_payload(
    state: &mut HubState,
    document_id: DocumentId,
    payload: &DocumentPayload,
    signed_seats: &[SeatId],
) -> NotaryResult<()> {
    let HubState {
        capability,
        membership,
        structure,
        ..
    } = state;

    match payload {
        DocumentPayload::UnitJoin {
            unit_id,
            proposed_leader,
            ..
        } => {
            membership.create_unit(
                capability,
                *unit_id,
                proposed_leader.clone(),
                Some(document_id),
            )?;
            for seat in signed_seats {
                membership.assign_seat(capability, *seat, *unit_id)?;
            }
            structure.mirror_leader(capability, *unit_id, proposed_leader.clone())?;
        }
        DocumentPayload::LeaderAppointment {
            unit_id,
            new_leader,
            ..
        } => {
            membership.set_leader(capability, *unit_id, new_leader.clone())?;
            structure.mirror_leader(capability, *unit_id, new_leader.clone())?;
        }
        DocumentPayload::ClanResolution { clan_id, .. } => {
            structure.mark_ratified(capability, *clan_id, document_id)?;
        }
        DocumentPayload::ClanLeaderAppointment {
            clan_id,
            new_leader,
            ..
        } => {
            structure.set_clan_leader(capability, *clan_id, new_leader.clone())?;
        }
    }
    Ok(())
}
