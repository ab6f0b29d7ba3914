//! Registry capability: the exclusive right to mutate the registries
//!
//! The hub mints one capability at setup and threads it into both
//! registries. Registries record which capability owns them and reject
//! every mutation presented with any other. The token cannot be cloned or
//! constructed outside this crate, so holding it is the only way to write.

use notary_types::{CapabilityId, NotaryError, NotaryResult};
use tracing::warn;

/// Unforgeable mutation token held by the hub
#[derive(Debug)]
pub struct RegistryCapability {
    id: CapabilityId,
}

impl RegistryCapability {
    pub(crate) fn mint() -> Self {
        Self {
            id: CapabilityId::generate(),
        }
    }

    pub fn id(&self) -> &CapabilityId {
        &self.id
    }
}

/// Owner reference stored inside a registry
#[derive(Debug, Clone)]
pub(crate) struct OwnerSlot {
    registry: &'static str,
    owner: CapabilityId,
}

impl OwnerSlot {
    pub(crate) fn new(registry: &'static str, capability: &RegistryCapability) -> Self {
        Self {
            registry,
            owner: capability.id.clone(),
        }
    }

    /// Reject unless `capability` is the current owner
    pub(crate) fn ensure(&self, capability: &RegistryCapability) -> NotaryResult<()> {
        if capability.id != self.owner {
            warn!(
                registry = self.registry,
                presented = %capability.id.short(),
                "Registry mutation with foreign capability rejected"
            );
            return Err(NotaryError::Unauthorized(format!(
                "{} is owned by another capability",
                self.registry
            )));
        }
        Ok(())
    }

    /// Swap the owner reference; only the current owner may do it
    pub(crate) fn transfer(
        &mut self,
        current: &RegistryCapability,
        next: &RegistryCapability,
    ) -> NotaryResult<()> {
        self.ensure(current)?;
        self.owner = next.id.clone();
        Ok(())
    }
}
