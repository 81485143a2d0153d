//! Observer-pattern event primitive with pluggable handler storage.
//!
//! An [`Event`] (or typed [`EventWithArg`]) owns one handler collection,
//! chosen at construction from three interchangeable strategies — weak, set,
//! list — in priority order, falling back when the host lacks a required
//! primitive. Weak-preferred storage (the default) never keeps a handler
//! alive: the handle returned by `register` is the caller's to hold, and
//! dropping it silently unregisters the handler.
//!
//! ```
//! use weak_event::EventWithArg;
//!
//! let event: EventWithArg<u32> = EventWithArg::new();
//! let handle = event.register_fn(|n| println!("got {n}"));
//! event.emit(&7);
//! event.unregister(&handle);
//! ```

pub mod error;
pub mod event;
pub mod storage;

pub use error::UnsupportedStrategy;
pub use event::{Event, EventWithArg, Handler, HandlerFn, UnitHandler, UnitHandlerFn};
pub use storage::{HandlerCollection, HostCapabilities, StorageStrategy};
