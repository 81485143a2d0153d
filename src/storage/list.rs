//! Ordered list-backed handler storage — the fallback of last resort.
//!
//! Handlers are strongly held in a `Vec` and visited in insertion order.
//! Re-adding a handler moves it to the tail instead of duplicating it.

use std::sync::Arc;

use super::traits::{same_handler, HandlerCollection, StorageStrategy};

/// Ordered strong handler storage. Construction never fails.
pub struct ListHandlerCollection<H: ?Sized> {
    handlers: Vec<Arc<H>>,
}

impl<H: ?Sized> ListHandlerCollection<H> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<H: ?Sized> Default for ListHandlerCollection<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized + Send + Sync> HandlerCollection<H> for ListHandlerCollection<H> {
    fn add(&mut self, handler: Arc<H>) {
        // Re-adding moves the handler to the end, so it is never invoked
        // twice in one pass.
        self.remove(&handler);
        self.handlers.push(handler);
    }

    fn remove(&mut self, handler: &Arc<H>) {
        self.handlers.retain(|h| !same_handler(h, handler));
    }

    fn for_each_alive(&mut self, f: &mut dyn FnMut(&Arc<H>)) {
        for handler in &self.handlers {
            f(handler);
        }
    }

    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::List
    }
}
