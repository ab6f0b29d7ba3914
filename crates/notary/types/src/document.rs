//! Notarized documents: the shared quorum state machine
//!
//! A document proposes one structural change. It is issued by a graded
//! notary, collects signatures from an eligible signer set, and is
//! finalized exactly once after its quorum is met. The document itself only
//! knows its own signature bookkeeping; applying the payload to the
//! registries is the hub's job.

use crate::{
    Address, ClanId, DocHash, DocumentId, HierarchyLevel, NotaryError, NotaryResult, SeatId,
    UnitId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a signature is counted for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerRef {
    /// A member seat, signed by the seat's controller
    Seat(SeatId),
    /// A member unit, signed by that unit's current leader
    UnitLeader(UnitId),
}

impl fmt::Display for SignerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerRef::Seat(seat) => write!(f, "{}", seat),
            SignerRef::UnitLeader(unit) => write!(f, "leader-of-{}", unit),
        }
    }
}

/// The closed set of document kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    UnitJoin,
    LeaderAppointment,
    ClanResolution,
    ClanLeaderAppointment,
}

impl DocumentKind {
    /// Hierarchy level the kind acts on, which decides the grade needed to
    /// issue it
    pub fn level(&self) -> HierarchyLevel {
        match self {
            DocumentKind::UnitJoin | DocumentKind::LeaderAppointment => HierarchyLevel::Unit,
            DocumentKind::ClanResolution | DocumentKind::ClanLeaderAppointment => {
                HierarchyLevel::Clan
            }
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::UnitJoin => "unit_join",
            DocumentKind::LeaderAppointment => "leader_appointment",
            DocumentKind::ClanResolution => "clan_resolution",
            DocumentKind::ClanLeaderAppointment => "clan_leader_appointment",
        };
        f.write_str(name)
    }
}

/// Kind-specific content of a document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentPayload {
    /// Form a new unit from a set of seats
    UnitJoin {
        unit_id: UnitId,
        proposed_leader: Address,
        member_seats: Vec<SeatId>,
    },
    /// Replace a unit's leader
    LeaderAppointment {
        unit_id: UnitId,
        new_leader: Address,
        /// Members of the unit at issuance time
        eligible_seats: Vec<SeatId>,
    },
    /// Ratify a registered clan by unanimous unit-leader signature
    ClanResolution {
        clan_id: ClanId,
        member_units: Vec<UnitId>,
    },
    /// Replace a clan's leader
    ClanLeaderAppointment {
        clan_id: ClanId,
        new_leader: Address,
        member_units: Vec<UnitId>,
    },
}

impl DocumentPayload {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentPayload::UnitJoin { .. } => DocumentKind::UnitJoin,
            DocumentPayload::LeaderAppointment { .. } => DocumentKind::LeaderAppointment,
            DocumentPayload::ClanResolution { .. } => DocumentKind::ClanResolution,
            DocumentPayload::ClanLeaderAppointment { .. } => DocumentKind::ClanLeaderAppointment,
        }
    }

    /// The signer set this payload admits
    pub fn eligibility(&self) -> Eligibility<'_> {
        match self {
            DocumentPayload::UnitJoin { member_seats, .. } => Eligibility::Seats(member_seats),
            DocumentPayload::LeaderAppointment { eligible_seats, .. } => {
                Eligibility::Seats(eligible_seats)
            }
            DocumentPayload::ClanResolution { member_units, .. }
            | DocumentPayload::ClanLeaderAppointment { member_units, .. } => {
                Eligibility::UnitLeaders(member_units)
            }
        }
    }
}

/// Signer set of a document.
///
/// Seat sets are fixed when the document is issued. Unit-leader sets fix
/// which units may sign; who currently leads each unit is resolved by the
/// caller at signing time.
#[derive(Clone, Copy, Debug)]
pub enum Eligibility<'a> {
    Seats(&'a [SeatId]),
    UnitLeaders(&'a [UnitId]),
}

impl Eligibility<'_> {
    /// Whether the signer is part of the set
    pub fn admits(&self, signer: &SignerRef) -> bool {
        match (self, signer) {
            (Eligibility::Seats(seats), SignerRef::Seat(seat)) => seats.contains(seat),
            (Eligibility::UnitLeaders(units), SignerRef::UnitLeader(unit)) => units.contains(unit),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Eligibility::Seats(seats) => seats.len(),
            Eligibility::UnitLeaders(units) => units.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Observable lifecycle state of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    /// Issued, no signature yet
    Issued,
    /// At least one signature collected
    Signing,
    /// Quorum met and payload applied (terminal)
    Finalized,
}

/// A signature recorded on a document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSignature {
    /// What the signature counts for
    pub signer: SignerRef,
    /// The caller that produced it
    pub signed_by: Address,
    pub signed_at: DateTime<Utc>,
}

impl DocumentSignature {
    pub fn new(signer: SignerRef, signed_by: Address) -> Self {
        Self {
            signer,
            signed_by,
            signed_at: Utc::now(),
        }
    }
}

/// A notarized document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub payload: DocumentPayload,
    pub doc_hash: DocHash,
    /// Notary that issued the document
    pub issuer: Address,
    pub issued_at: DateTime<Utc>,
    /// Quorum: signatures required before finalize
    pub min_signatures: u32,
    /// Signatures in the order they were recorded
    pub signatures: Vec<DocumentSignature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(
        id: DocumentId,
        payload: DocumentPayload,
        min_signatures: u32,
        doc_hash: DocHash,
        issuer: Address,
    ) -> Self {
        Self {
            id,
            payload,
            doc_hash,
            issuer,
            issued_at: Utc::now(),
            min_signatures,
            signatures: Vec::new(),
            finalized_at: None,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.payload.kind()
    }

    pub fn level(&self) -> HierarchyLevel {
        self.kind().level()
    }

    pub fn eligibility(&self) -> Eligibility<'_> {
        self.payload.eligibility()
    }

    pub fn state(&self) -> DocumentState {
        if self.finalized_at.is_some() {
            DocumentState::Finalized
        } else if self.signatures.is_empty() {
            DocumentState::Issued
        } else {
            DocumentState::Signing
        }
    }

    pub fn signed_count(&self) -> u32 {
        self.signatures.len() as u32
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_at.is_some()
    }

    pub fn has_signed(&self, signer: &SignerRef) -> bool {
        self.signatures.iter().any(|s| s.signer == *signer)
    }

    pub fn quorum_met(&self) -> bool {
        self.signed_count() >= self.min_signatures
    }

    /// Seats that have signed, in signing order
    pub fn signed_seats(&self) -> Vec<SeatId> {
        self.signatures
            .iter()
            .filter_map(|s| match s.signer {
                SignerRef::Seat(seat) => Some(seat),
                SignerRef::UnitLeader(_) => None,
            })
            .collect()
    }

    /// Check that a signature for `signer` would be accepted.
    ///
    /// Only the structural rules are checked here: terminal state, set
    /// membership, and duplicates. Proof that the caller speaks for the
    /// signer is checked by the hub.
    pub fn check_signable(&self, signer: &SignerRef) -> NotaryResult<()> {
        if self.is_finalized() {
            return Err(NotaryError::AlreadyFinalized(self.id));
        }
        if !self.eligibility().admits(signer) {
            return Err(NotaryError::NotEligibleSigner {
                document: self.id,
                signer: *signer,
            });
        }
        if self.has_signed(signer) {
            return Err(NotaryError::AlreadySigned {
                document: self.id,
                signer: *signer,
            });
        }
        Ok(())
    }

    /// Record a signature, returning the new signed count
    pub fn record_signature(&mut self, signature: DocumentSignature) -> NotaryResult<u32> {
        self.check_signable(&signature.signer)?;
        self.signatures.push(signature);
        Ok(self.signed_count())
    }

    /// Check that the document may be finalized now
    pub fn check_finalizable(&self) -> NotaryResult<()> {
        if self.is_finalized() {
            return Err(NotaryError::AlreadyFinalized(self.id));
        }
        if !self.quorum_met() {
            return Err(NotaryError::QuorumNotMet {
                required: self.min_signatures,
                current: self.signed_count(),
            });
        }
        Ok(())
    }

    /// Flip the document to its terminal state
    pub fn mark_finalized(&mut self) -> NotaryResult<()> {
        self.check_finalizable()?;
        self.finalized_at = Some(Utc::now());
        Ok(())
    }
}
