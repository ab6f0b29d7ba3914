//! Notary Runtime
//!
//! This crate runs the notarized document protocol: graded notaries issue
//! documents, affected members sign them, and a finalized document applies
//! its change to the membership and structure registries in one step.
//!
//! # Architecture
//!
//! The [`NotaryHub`] is the main entry point. It composes:
//!
//! - [`GradeAuthority`]: which callers may issue at which hierarchy level
//! - [`DocumentRegistry`]: issuance, signature collection and finalization
//! - [`MembershipRegistry`]: unit → leader and seat → unit
//! - [`StructureRegistry`]: mirrored unit leaders and clans
//! - [`SeatDirectory`]: the external answer to "does this caller control
//!   this seat"
//!
//! # Key Invariants
//!
//! 1. Only the holder of the [`RegistryCapability`] mutates the registries,
//!    and only the hub holds it
//! 2. A seat belongs to at most one active unit
//! 3. Both registries agree on every unit's leader
//! 4. A document is finalized at most once, after its quorum is met
//! 5. Every successful transition produces a journal receipt
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use notary_runtime::{InMemorySeatDirectory, NotaryHub};
//! use notary_types::{Address, DocHash, NotaryGrade, SignerRef, UnitId};
//!
//! let seats = Arc::new(InMemorySeatDirectory::new());
//! let admin = Address::new("admin");
//! let hub = NotaryHub::new(admin.clone(), seats.clone());
//!
//! let notary = Address::new("notary");
//! hub.grant_grade(&admin, notary.clone(), NotaryGrade::Unit).unwrap();
//!
//! let member = Address::new("member");
//! let seat = seats.mint(member.clone()).unwrap();
//!
//! let doc = hub
//!     .issue_unit_join(
//!         &notary,
//!         UnitId::new(1),
//!         member.clone(),
//!         vec![seat],
//!         1,
//!         DocHash::of(b"charter"),
//!     )
//!     .unwrap();
//! hub.sign(&member, doc, SignerRef::Seat(seat)).unwrap();
//! hub.finalize(&member, doc).unwrap();
//!
//! assert_eq!(hub.unit_of(seat).unwrap(), Some(UnitId::new(1)));
//! ```

#![deny(unsafe_code)]

pub mod authority;
pub mod capability;
pub mod config;
pub mod document_registry;
pub mod membership_registry;
pub mod notary_hub;
pub mod seats;
pub mod structure_registry;

// Re-export main types for convenience
pub use authority::GradeAuthority;
pub use capability::RegistryCapability;
pub use config::{GradeRequirements, HubConfig};
pub use document_registry::{DocumentRegistry, FinalizeOutcome, SignatureResult};
pub use membership_registry::{MembershipRegistry, UnitRecord};
pub use notary_hub::{NotaryHub, SignOutcome};
pub use seats::{InMemorySeatDirectory, SeatDirectory};
pub use structure_registry::{ClanRecord, StructureRegistry, UnitNode};
