//! Single-owner registry

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::VERSION;

/// Something with a stable identity for ownership logs
pub trait OwnedInstance {
    fn instance_id(&self) -> Uuid;
}

/// Holds the one live owner of a subsystem
///
/// The entry point creates a registry and passes it to whoever might create
/// an owner. The first live owner wins; later claimants get the existing
/// owner back and are dropped.
pub struct OwnerRegistry<T> {
    slot: Mutex<Option<Weak<T>>>,
}

impl<T: OwnedInstance> OwnerRegistry<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Register `candidate`, or return the owner that is already live
    pub fn claim(&self, candidate: Arc<T>) -> Arc<T> {
        let mut slot = self.slot.lock();

        if let Some(existing) = slot.as_ref().and_then(Weak::upgrade) {
            if !Arc::ptr_eq(&existing, &candidate) {
                warn!(
                    owner = %existing.instance_id(),
                    rejected = %candidate.instance_id(),
                    version = VERSION,
                    "Multiple instances detected, keeping the existing owner"
                );
            }
            return existing;
        }

        debug!(owner = %candidate.instance_id(), "Owner registered");
        *slot = Some(Arc::downgrade(&candidate));
        candidate
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.slot.lock().as_ref().and_then(Weak::upgrade)
    }

    pub fn has_owner(&self) -> bool {
        self.current().is_some()
    }
}

impl<T: OwnedInstance> Default for OwnerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
