//! Notary journal: receipts for every successful transition
//!
//! The journal is the hub's accountability record. Each receipt wraps one
//! event and serializes to a single JSON object, so off-chain indexers can
//! consume the journal as JSON lines.

use crate::{
    Address, CapabilityId, ClanId, DocHash, DocumentId, DocumentKind, NotaryGrade, SignerRef,
    UnitId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structural event emitted by the hub
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotaryEvent {
    GradeGranted {
        notary: Address,
        grade: NotaryGrade,
        granted_by: Address,
    },
    GradeRevoked {
        notary: Address,
        previous: NotaryGrade,
        revoked_by: Address,
    },
    AdminTransferred {
        previous: Address,
        admin: Address,
    },
    DocumentIssued {
        document: DocumentId,
        kind: DocumentKind,
        issuer: Address,
        doc_hash: DocHash,
        min_signatures: u32,
    },
    DocumentSigned {
        document: DocumentId,
        kind: DocumentKind,
        signer: SignerRef,
        signed_by: Address,
        signed_count: u32,
        min_signatures: u32,
    },
    DocumentFinalized {
        document: DocumentId,
        kind: DocumentKind,
        signed_count: u32,
        finalized_by: Address,
    },
    ClanRegistered {
        clan: ClanId,
        units: Vec<UnitId>,
        leader: Address,
        registered_by: Address,
    },
    CapabilityRotated {
        previous: CapabilityId,
        current: CapabilityId,
    },
}

impl NotaryEvent {
    /// The document this event refers to, if any
    pub fn document(&self) -> Option<DocumentId> {
        match self {
            NotaryEvent::DocumentIssued { document, .. }
            | NotaryEvent::DocumentSigned { document, .. }
            | NotaryEvent::DocumentFinalized { document, .. } => Some(*document),
            _ => None,
        }
    }
}

/// One journal entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotaryReceipt {
    pub receipt_id: String,
    #[serde(flatten)]
    pub event: NotaryEvent,
    pub timestamp: DateTime<Utc>,
}

impl NotaryReceipt {
    pub fn new(event: NotaryEvent) -> Self {
        Self {
            receipt_id: uuid::Uuid::new_v4().to_string(),
            event,
            timestamp: Utc::now(),
        }
    }

    /// Single-line JSON form for indexers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Append-only list of receipts
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NotaryJournal {
    pub receipts: Vec<NotaryReceipt>,
}

impl NotaryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an event, returning its receipt id
    pub fn log(&mut self, event: NotaryEvent) -> String {
        let receipt = NotaryReceipt::new(event);
        let id = receipt.receipt_id.clone();
        self.receipts.push(receipt);
        id
    }

    /// All receipts referring to a document, oldest first
    pub fn receipts_for_document(&self, document: DocumentId) -> Vec<&NotaryReceipt> {
        self.receipts
            .iter()
            .filter(|r| r.event.document() == Some(document))
            .collect()
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }

    pub fn last(&self) -> Option<&NotaryReceipt> {
        self.receipts.last()
    }

    /// Export as newline-delimited JSON
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for receipt in &self.receipts {
            out.push_str(&receipt.to_json()?);
            out.push('\n');
        }
        Ok(out)
    }
}
