//! Error types for the notary layer

use crate::{Address, ClanId, DocumentId, NotaryGrade, SeatId, SignerRef, UnitId};

/// Errors that can occur in notary operations.
///
/// Every error is a full no-op: a rejected call leaves documents and
/// registries exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotaryError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient grade for {caller}: holds {held}, requires {required}")]
    InsufficientGrade {
        caller: Address,
        held: NotaryGrade,
        required: NotaryGrade,
    },

    #[error("Signer {signer} already signed {document}")]
    AlreadySigned {
        document: DocumentId,
        signer: SignerRef,
    },

    #[error("Signer {signer} is not eligible to sign {document}")]
    NotEligibleSigner {
        document: DocumentId,
        signer: SignerRef,
    },

    #[error("Document already finalized: {0}")]
    AlreadyFinalized(DocumentId),

    #[error("Quorum not met: required {required} signatures, have {current}")]
    QuorumNotMet { required: u32, current: u32 },

    #[error("Unit already exists: {0}")]
    UnitAlreadyExists(UnitId),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Seat {seat} already assigned to {unit}")]
    SeatAlreadyAssigned { seat: SeatId, unit: UnitId },

    #[error("Seat not found: {0}")]
    SeatNotFound(SeatId),

    #[error("Insufficient clan size: required {required} units, provided {provided}")]
    InsufficientClanSize { required: usize, provided: usize },

    #[error("Clan already exists: {0}")]
    ClanAlreadyExists(ClanId),

    #[error("Clan not found: {0}")]
    ClanNotFound(ClanId),

    #[error("Unit {unit} already belongs to {clan}")]
    UnitAlreadyInClan { unit: UnitId, clan: ClanId },

    #[error("Invalid quorum: {min_signatures} signatures over {eligible} eligible signers")]
    InvalidQuorum { min_signatures: u32, eligible: usize },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Hub state lock poisoned")]
    LockPoisoned,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotaryError {
    /// Whether this error belongs to the authorization family (missing
    /// grade, missing admin rights, missing capability, seat not controlled)
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            NotaryError::Unauthorized(_) | NotaryError::InsufficientGrade { .. }
        )
    }
}

/// Result type alias for notary operations
pub type NotaryResult<T> = Result<T, NotaryError>;
