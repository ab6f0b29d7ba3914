//! Notary Domain Types
//!
//! This crate defines the domain types for the notarized document protocol
//! that governs a hierarchical membership organization: seats are grouped
//! into units, units are grouped into clans, and every structural change is
//! expressed as a document that a graded notary issues and affected members
//! ratify.
//!
//! # Key Concepts
//!
//! - **Seat**: a non-transferable member handle, owned by one caller.
//! - **Unit**: the base cell, one leader and a bounded set of seats.
//! - **Clan**: two or more units with one designated leader.
//! - **Notary grade**: the rank that decides at which hierarchy level a
//!   caller may issue documents.
//! - **Document**: a record collecting signatures toward one structural
//!   change. It is finalized exactly once.
//! - **Journal**: receipts for every successful transition, exportable for
//!   off-chain indexers.
//!
//! # Architecture
//!
//! This is a pure types crate. Registries and the hub that mutates them
//! live in `notary-runtime`. IDs use the newtype pattern and implement
//! `Display`.

#![deny(unsafe_code)]

mod document;
mod errors;
mod grade;
mod ids;
mod journal;

pub use document::*;
pub use errors::*;
pub use grade::*;
pub use ids::*;
pub use journal::*;
