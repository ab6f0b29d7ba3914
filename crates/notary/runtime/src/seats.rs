//! Seat directory: the identity boundary
//!
//! The hub never decides how seats are minted or how a caller proves it
//! controls one. It only asks a [`SeatDirectory`] two yes/no questions.

use notary_types::{Address, NotaryError, NotaryResult, SeatId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, warn};

/// Source of truth for seat existence and control
pub trait SeatDirectory: Send + Sync {
    /// Whether the seat has been minted
    fn seat_exists(&self, seat: SeatId) -> bool;

    /// Whether `caller` currently controls `seat`
    fn controls(&self, caller: &Address, seat: SeatId) -> bool;
}

#[derive(Debug, Default)]
struct SeatTable {
    next: u64,
    controllers: HashMap<SeatId, Address>,
}

/// In-process seat directory with sequential minting from 1
#[derive(Debug, Default)]
pub struct InMemorySeatDirectory {
    table: RwLock<SeatTable>,
}

impl InMemorySeatDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next seat to `controller`
    pub fn mint(&self, controller: Address) -> NotaryResult<SeatId> {
        let mut table = self.table.write().map_err(|_| NotaryError::LockPoisoned)?;
        table.next += 1;
        let seat = SeatId::new(table.next);
        debug!(seat = %seat, controller = %controller, "Seat minted");
        table.controllers.insert(seat, controller);
        Ok(seat)
    }

    /// Mint `count` seats to the same controller
    pub fn mint_many(&self, controller: &Address, count: usize) -> NotaryResult<Vec<SeatId>> {
        (0..count).map(|_| self.mint(controller.clone())).collect()
    }

    pub fn controller_of(&self, seat: SeatId) -> NotaryResult<Option<Address>> {
        Ok(self.read()?.controllers.get(&seat).cloned())
    }

    pub fn seat_count(&self) -> NotaryResult<usize> {
        Ok(self.read()?.controllers.len())
    }

    fn read(&self) -> NotaryResult<RwLockReadGuard<'_, SeatTable>> {
        self.table.read().map_err(|_| NotaryError::LockPoisoned)
    }

    /// Control lookup for the trait's yes/no answers. A poisoned table
    /// answers "no" after logging.
    fn lookup(&self, seat: SeatId) -> Option<Address> {
        match self.controller_of(seat) {
            Ok(controller) => controller,
            Err(err) => {
                warn!(seat = %seat, error = %err, "Seat directory unavailable");
                None
            }
        }
    }
}

impl SeatDirectory for InMemorySeatDirectory {
    fn seat_exists(&self, seat: SeatId) -> bool {
        self.lookup(seat).is_some()
    }

    fn controls(&self, caller: &Address, seat: SeatId) -> bool {
        self.lookup(seat).as_ref() == Some(caller)
    }
}
