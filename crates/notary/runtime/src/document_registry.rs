//! Document Registry: issuance, signature collection and finalization
//!
//! Owns every document the hub has issued and drives each through the
//! shared state machine. It knows nothing about registries or proof of
//! control; the hub checks those before calling in.

use notary_types::{
    Address, DocHash, Document, DocumentId, DocumentKind, DocumentPayload, DocumentSignature,
    NotaryError, NotaryEvent, NotaryJournal, NotaryResult,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Result of recording a signature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureResult {
    /// Signature accepted, quorum not yet met
    Accepted { signed_count: u32, min_signatures: u32 },
    /// Signature accepted and the document may now be finalized
    QuorumMet { signed_count: u32 },
}

impl SignatureResult {
    pub fn signed_count(&self) -> u32 {
        match self {
            SignatureResult::Accepted { signed_count, .. }
            | SignatureResult::QuorumMet { signed_count } => *signed_count,
        }
    }

    pub fn quorum_met(&self) -> bool {
        matches!(self, SignatureResult::QuorumMet { .. })
    }
}

/// Summary of a completed finalize
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub document: DocumentId,
    pub kind: DocumentKind,
    pub signed_count: u32,
}

/// All documents, keyed by sequential id
#[derive(Debug)]
pub struct DocumentRegistry {
    documents: BTreeMap<DocumentId, Document>,
    next_id: u64,
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Store a new document and assign the next id
    pub fn issue(
        &mut self,
        payload: DocumentPayload,
        min_signatures: u32,
        doc_hash: DocHash,
        issuer: Address,
        journal: &mut NotaryJournal,
    ) -> DocumentId {
        let id = DocumentId::new(self.next_id);
        self.next_id += 1;

        let document = Document::new(id, payload, min_signatures, doc_hash, issuer.clone());
        let kind = document.kind();

        info!(
            document = %id,
            kind = %kind,
            issuer = %issuer,
            min_signatures,
            "Document issued"
        );

        journal.log(NotaryEvent::DocumentIssued {
            document: id,
            kind,
            issuer,
            doc_hash,
            min_signatures,
        });

        self.documents.insert(id, document);
        id
    }

    /// Record a signature on a document
    pub fn sign(
        &mut self,
        document_id: DocumentId,
        signature: DocumentSignature,
        journal: &mut NotaryJournal,
    ) -> NotaryResult<SignatureResult> {
        let document = self
            .documents
            .get_mut(&document_id)
            .ok_or(NotaryError::DocumentNotFound(document_id))?;

        let signer = signature.signer;
        let signed_by = signature.signed_by.clone();
        let signed_count = document.record_signature(signature)?;
        let min_signatures = document.min_signatures;

        debug!(
            document = %document_id,
            signer = %signer,
            signed_count,
            min_signatures,
            "Document signed"
        );

        journal.log(NotaryEvent::DocumentSigned {
            document: document_id,
            kind: document.kind(),
            signer,
            signed_by,
            signed_count,
            min_signatures,
        });

        if document.quorum_met() {
            Ok(SignatureResult::QuorumMet { signed_count })
        } else {
            Ok(SignatureResult::Accepted {
                signed_count,
                min_signatures,
            })
        }
    }

    /// Check that a document exists and may be finalized now
    pub fn check_finalizable(&self, document_id: DocumentId) -> NotaryResult<&Document> {
        let document = self.get(document_id)?;
        document.check_finalizable()?;
        Ok(document)
    }

    /// Flip a document to finalized. The caller applies the payload first.
    pub fn complete_finalize(
        &mut self,
        document_id: DocumentId,
        finalized_by: &Address,
        journal: &mut NotaryJournal,
    ) -> NotaryResult<FinalizeOutcome> {
        let document = self
            .documents
            .get_mut(&document_id)
            .ok_or(NotaryError::DocumentNotFound(document_id))?;
        document.mark_finalized()?;

        let outcome = FinalizeOutcome {
            document: document_id,
            kind: document.kind(),
            signed_count: document.signed_count(),
        };

        info!(
            document = %document_id,
            kind = %outcome.kind,
            signed_count = outcome.signed_count,
            "Document finalized"
        );

        journal.log(NotaryEvent::DocumentFinalized {
            document: document_id,
            kind: outcome.kind,
            signed_count: outcome.signed_count,
            finalized_by: finalized_by.clone(),
        });

        Ok(outcome)
    }

    pub fn get(&self, document_id: DocumentId) -> NotaryResult<&Document> {
        self.documents
            .get(&document_id)
            .ok_or(NotaryError::DocumentNotFound(document_id))
    }

    /// Documents not yet finalized, oldest first
    pub fn pending(&self) -> Vec<&Document> {
        self.documents
            .values()
            .filter(|d| !d.is_finalized())
            .collect()
    }

    pub fn by_issuer(&self, issuer: &Address) -> Vec<&Document> {
        self.documents
            .values()
            .filter(|d| d.issuer == *issuer)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }
}
