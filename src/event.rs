//! Event / EventWithArg — the observer façade over pluggable handler storage.
//!
//! Handlers are stored as `Arc<dyn Fn(..) + Send + Sync>` and compared by
//! `Arc` identity. Snapshot-on-emit semantics mean:
//!   - A handler removed *during* emission is still called in that round.
//!   - A handler added *during* emission is NOT called until the next emit.
//!
//! Panics inside a handler propagate to the caller and abort the remainder
//! of the pass — handlers earlier in the order have already run and are
//! unaffected.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`),
//! and the lock is never held while a handler runs, so handlers may call
//! `register()` / `unregister()` / `emit()` on the same event during their
//! own invocation without deadlocking.
//!
//! With weak-preferred storage (the default) the handle returned by
//! `register` is the only strong reference the caller gets; dropping it lets
//! the handler be reclaimed and silently unregistered.

use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;

use crate::storage::{create_collection, HandlerCollection, HostCapabilities, StorageStrategy};

/// Closure type for handlers taking a payload.
pub type HandlerFn<T> = dyn Fn(&T) + Send + Sync;
/// An owned, identity-comparable handler taking a payload.
pub type Handler<T> = Arc<HandlerFn<T>>;

/// Closure type for payload-less handlers.
pub type UnitHandlerFn = dyn Fn() + Send + Sync;
/// An owned, identity-comparable payload-less handler.
pub type UnitHandler = Arc<UnitHandlerFn>;

// ============================================================================
// EmitterCore — shared state behind both façades
// ============================================================================

struct CoreInner<H: ?Sized> {
    handlers: Box<dyn HandlerCollection<H>>,
    /// Best-effort registration counter. Incremented on register, decremented
    /// (floored at zero) on unregister; NOT decremented when a weakly-held
    /// handler is reclaimed, so it may exceed the live count.
    registered_count: usize,
}

struct EmitterCore<H: ?Sized> {
    inner: Mutex<CoreInner<H>>,
    caps: HostCapabilities,
    prefer_weak: bool,
}

impl<H: ?Sized + Send + Sync + 'static> EmitterCore<H> {
    fn new(prefer_weak: bool, caps: HostCapabilities) -> Self {
        Self {
            inner: Mutex::new(CoreInner {
                handlers: create_collection(caps, prefer_weak),
                registered_count: 0,
            }),
            caps,
            prefer_weak,
        }
    }

    fn register(&self, handler: Arc<H>) -> Arc<H> {
        let mut inner = self.inner.lock();
        inner.handlers.add(Arc::clone(&handler));
        inner.registered_count += 1;
        drop(inner);
        handler
    }

    fn unregister(&self, handler: &Arc<H>) {
        let mut inner = self.inner.lock();
        inner.handlers.remove(handler);
        inner.registered_count = inner.registered_count.saturating_sub(1);
    }

    /// Snapshot the live handlers under the lock, pruning dead entries as a
    /// side effect. The lock is released before the caller invokes anything.
    fn snapshot(&self) -> Vec<Arc<H>> {
        let mut inner = self.inner.lock();
        let mut snapshot = Vec::new();
        inner
            .handlers
            .for_each_alive(&mut |handler| snapshot.push(Arc::clone(handler)));
        snapshot
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.handlers = create_collection(self.caps, self.prefer_weak);
        inner.registered_count = 0;
    }

    fn registered_count(&self) -> usize {
        self.inner.lock().registered_count
    }

    fn strategy(&self) -> StorageStrategy {
        self.inner.lock().handlers.strategy()
    }
}

// ============================================================================
// Event — no payload
// ============================================================================

/// An event with no payload. See the module docs for emission semantics.
pub struct Event {
    core: Arc<EmitterCore<UnitHandlerFn>>,
}

impl Event {
    /// Create an event with weak-preferred handler storage.
    pub fn new() -> Self {
        Self::with_weak_handlers(true)
    }

    /// Create an event, choosing whether handlers are held weakly.
    ///
    /// With `prefer_weak` set, the storage does not keep handlers alive:
    /// callers must retain the handle returned by `register` for as long as
    /// they want the handler invoked.
    pub fn with_weak_handlers(prefer_weak: bool) -> Self {
        Self::with_capabilities(prefer_weak, HostCapabilities::detect())
    }

    /// Create an event against an explicit capability probe.
    ///
    /// The factory falls back Weak → Set → List based on `caps`; see
    /// [`storage_strategy`](Self::storage_strategy) for the outcome.
    pub fn with_capabilities(prefer_weak: bool, caps: HostCapabilities) -> Self {
        Self {
            core: Arc::new(EmitterCore::new(prefer_weak, caps)),
        }
    }

    /// Register a handler and hand back the same handle.
    ///
    /// The handle is the handler's identity — keep it to `unregister` later
    /// (and, under weak storage, to keep the handler alive at all).
    pub fn register(&self, handler: UnitHandler) -> UnitHandler {
        self.core.register(handler)
    }

    /// Wrap `f` in a handle and register it.
    pub fn register_fn(&self, f: impl Fn() + Send + Sync + 'static) -> UnitHandler {
        self.register(Arc::new(f))
    }

    /// Register a handler that unregisters itself after its first
    /// invocation.
    ///
    /// Returns the wrapper, not `handler` — unregistering before the event
    /// fires requires the wrapper's identity.
    pub fn once(&self, handler: UnitHandler) -> UnitHandler {
        let core = Arc::clone(&self.core);
        let slot: Arc<OnceLock<Weak<UnitHandlerFn>>> = Arc::new(OnceLock::new());
        let wrapper_slot = Arc::clone(&slot);
        let wrapper: UnitHandler = Arc::new(move || {
            handler();
            if let Some(me) = wrapper_slot.get().and_then(Weak::upgrade) {
                core.unregister(&me);
            }
        });
        // The wrapper's identity exists only now; fill the slot before
        // anything can invoke it.
        let _ = slot.set(Arc::downgrade(&wrapper));
        self.register(wrapper)
    }

    /// [`once`](Self::once) over a bare closure.
    pub fn once_fn(&self, f: impl Fn() + Send + Sync + 'static) -> UnitHandler {
        self.once(Arc::new(f))
    }

    /// Unregister every occurrence of `handler`.
    ///
    /// Safe to call for a handler that was never registered (or already
    /// unregistered); the counter still decrements, floored at zero.
    pub fn unregister(&self, handler: &UnitHandler) {
        self.core.unregister(handler);
    }

    /// Invoke every live handler synchronously, in collection order.
    pub fn emit(&self) {
        for handler in self.core.snapshot() {
            handler();
        }
    }

    /// Drop every handler and reset the registration counter to zero.
    ///
    /// The backing collection is rebuilt through the factory with the
    /// event's configured storage preference.
    pub fn clear_handlers(&self) {
        self.core.clear();
    }

    /// Best-effort registration counter.
    ///
    /// Not authoritative: a weakly-held handler that is reclaimed does not
    /// decrement it.
    pub fn registered_count(&self) -> usize {
        self.core.registered_count()
    }

    /// The strategy backing the current collection.
    pub fn storage_strategy(&self) -> StorageStrategy {
        self.core.strategy()
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EventWithArg<T> — single typed payload
// ============================================================================

/// An event whose handlers receive a shared reference to a payload.
///
/// Identical to [`Event`] in every other respect; see the module docs for
/// emission semantics.
pub struct EventWithArg<T> {
    core: Arc<EmitterCore<HandlerFn<T>>>,
}

impl<T: 'static> EventWithArg<T> {
    /// Create an event with weak-preferred handler storage.
    pub fn new() -> Self {
        Self::with_weak_handlers(true)
    }

    /// Create an event, choosing whether handlers are held weakly.
    pub fn with_weak_handlers(prefer_weak: bool) -> Self {
        Self::with_capabilities(prefer_weak, HostCapabilities::detect())
    }

    /// Create an event against an explicit capability probe.
    pub fn with_capabilities(prefer_weak: bool, caps: HostCapabilities) -> Self {
        Self {
            core: Arc::new(EmitterCore::new(prefer_weak, caps)),
        }
    }

    /// Register a handler and hand back the same handle.
    pub fn register(&self, handler: Handler<T>) -> Handler<T> {
        self.core.register(handler)
    }

    /// Wrap `f` in a handle and register it.
    pub fn register_fn(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Handler<T> {
        self.register(Arc::new(f))
    }

    /// Register a handler that unregisters itself after its first
    /// invocation. Returns the wrapper.
    pub fn once(&self, handler: Handler<T>) -> Handler<T> {
        let core = Arc::clone(&self.core);
        let slot: Arc<OnceLock<Weak<HandlerFn<T>>>> = Arc::new(OnceLock::new());
        let wrapper_slot = Arc::clone(&slot);
        let wrapper: Handler<T> = Arc::new(move |payload: &T| {
            handler(payload);
            if let Some(me) = wrapper_slot.get().and_then(Weak::upgrade) {
                core.unregister(&me);
            }
        });
        let _ = slot.set(Arc::downgrade(&wrapper));
        self.register(wrapper)
    }

    /// [`once`](Self::once) over a bare closure.
    pub fn once_fn(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Handler<T> {
        self.once(Arc::new(f))
    }

    /// Unregister every occurrence of `handler`.
    pub fn unregister(&self, handler: &Handler<T>) {
        self.core.unregister(handler);
    }

    /// Invoke every live handler synchronously with `payload`, in collection
    /// order.
    pub fn emit(&self, payload: &T) {
        for handler in self.core.snapshot() {
            handler(payload);
        }
    }

    /// Drop every handler and reset the registration counter to zero.
    pub fn clear_handlers(&self) {
        self.core.clear();
    }

    /// Best-effort registration counter (see [`Event::registered_count`]).
    pub fn registered_count(&self) -> usize {
        self.core.registered_count()
    }

    /// The strategy backing the current collection.
    pub fn storage_strategy(&self) -> StorageStrategy {
        self.core.strategy()
    }
}

impl<T: 'static> Default for EventWithArg<T> {
    fn default() -> Self {
        Self::new()
    }
}
