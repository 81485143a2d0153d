//! Strong set-backed handler storage.
//!
//! Handlers are strongly held in a uniqueness-enforcing map keyed by `Arc`
//! identity. Iteration order is the map's natural order — unspecified and
//! non-deterministic across runs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::UnsupportedStrategy;

use super::factory::HostCapabilities;
use super::traits::{HandlerCollection, StorageStrategy};

/// Thin-pointer address used as the identity key.
fn identity_key<H: ?Sized>(handler: &Arc<H>) -> usize {
    Arc::as_ptr(handler).cast::<()>() as usize
}

/// Uniqueness-enforcing strong handler storage.
pub struct SetHandlerCollection<H: ?Sized> {
    handlers: HashMap<usize, Arc<H>>,
}

impl<H: ?Sized> SetHandlerCollection<H> {
    /// Construct, failing with [`UnsupportedStrategy`] when the host lacks a
    /// uniqueness-enforcing identity container.
    pub fn try_with(caps: HostCapabilities) -> Result<Self, UnsupportedStrategy> {
        if !caps.identity_sets {
            return Err(UnsupportedStrategy {
                strategy: "set",
                capability: "identity-sets",
            });
        }
        Ok(Self {
            handlers: HashMap::new(),
        })
    }
}

impl<H: ?Sized + Send + Sync> HandlerCollection<H> for SetHandlerCollection<H> {
    fn add(&mut self, handler: Arc<H>) {
        // Idempotent: re-adding an already-present handler keeps the
        // existing entry.
        self.handlers
            .entry(identity_key(&handler))
            .or_insert(handler);
    }

    fn remove(&mut self, handler: &Arc<H>) {
        self.handlers.remove(&identity_key(handler));
    }

    fn for_each_alive(&mut self, f: &mut dyn FnMut(&Arc<H>)) {
        for handler in self.handlers.values() {
            f(handler);
        }
    }

    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::Set
    }
}
