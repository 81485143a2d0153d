//! Weak-reference-backed handler storage.
//!
//! Handlers are held as `std::sync::Weak`, so the collection never keeps a
//! handler alive: when the caller drops the last strong handle, the entry
//! dies out-of-band and is pruned lazily on the next access. Each `add`
//! mints a fresh token used as the map key; the token list is the strongly
//! held, insertion-ordered enumeration of entries.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::error::UnsupportedStrategy;

use super::factory::HostCapabilities;
use super::traits::{same_handler, HandlerCollection, StorageStrategy};

/// Ephemeral identity key minted per `add` call.
type Token = u64;

/// Handler storage that does not keep its handlers alive.
///
/// Adding the same handler twice yields two independent entries, so it is
/// invoked twice per pass until one copy is removed or reclaimed.
pub struct WeakHandlerCollection<H: ?Sized> {
    /// Insertion-ordered tokens, strongly held for enumeration.
    tokens: Vec<Token>,
    /// Token → weakly-held handler. An entry can die out-of-band.
    entries: HashMap<Token, Weak<H>>,
    next_token: Token,
}

impl<H: ?Sized> WeakHandlerCollection<H> {
    /// Construct, failing with [`UnsupportedStrategy`] when the host lacks
    /// weak references or an identity set.
    pub fn try_with(caps: HostCapabilities) -> Result<Self, UnsupportedStrategy> {
        if !caps.weak_refs {
            return Err(UnsupportedStrategy {
                strategy: "weak",
                capability: "weak-refs",
            });
        }
        if !caps.identity_sets {
            return Err(UnsupportedStrategy {
                strategy: "weak",
                capability: "identity-sets",
            });
        }
        Ok(Self {
            tokens: Vec::new(),
            entries: HashMap::new(),
            next_token: 1,
        })
    }
}

impl<H: ?Sized + Send + Sync> HandlerCollection<H> for WeakHandlerCollection<H> {
    fn add(&mut self, handler: Arc<H>) {
        let token = self.next_token;
        self.next_token += 1;
        self.tokens.push(token);
        self.entries.insert(token, Arc::downgrade(&handler));
    }

    fn remove(&mut self, handler: &Arc<H>) {
        // Duplicates are possible, so every token is checked.
        let entries = &mut self.entries;
        self.tokens
            .retain(|token| match entries.get(token).and_then(Weak::upgrade) {
                Some(held) if same_handler(&held, handler) => {
                    entries.remove(token);
                    false
                }
                Some(_) => true,
                None => {
                    entries.remove(token);
                    false
                }
            });
    }

    fn for_each_alive(&mut self, f: &mut dyn FnMut(&Arc<H>)) {
        let entries = &mut self.entries;
        self.tokens
            .retain(|token| match entries.get(token).and_then(Weak::upgrade) {
                Some(handler) => {
                    f(&handler);
                    true
                }
                None => {
                    entries.remove(token);
                    false
                }
            });
    }

    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::Weak
    }
}
