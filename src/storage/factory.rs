//! Strategy selection — capability probe and fallback chain.
//!
//! [`create_collection`] attempts construction in priority order
//! Weak → Set → List and returns the first strategy the host supports. An
//! [`UnsupportedStrategy`](crate::error::UnsupportedStrategy) failure is an
//! expected outcome here: it is swallowed locally, logged at debug level,
//! and never surfaced to callers.

use super::list::ListHandlerCollection;
use super::set::SetHandlerCollection;
use super::traits::HandlerCollection;
use super::weak::WeakHandlerCollection;

/// Which storage primitives the host environment provides.
///
/// On `std` targets both primitives always exist, so [`detect`] reports full
/// support; the struct is public so embedders and tests can force a
/// downlevel strategy. The probe is static — capability does not change at
/// runtime, and it is re-run on every collection creation rather than
/// cached.
///
/// [`detect`]: HostCapabilities::detect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Ephemeral weak associations (`std::sync::Weak`) are available.
    pub weak_refs: bool,
    /// A uniqueness-enforcing identity container is available.
    pub identity_sets: bool,
}

impl HostCapabilities {
    /// Probe the host. `std` always provides both primitives.
    pub fn detect() -> Self {
        Self {
            weak_refs: true,
            identity_sets: true,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Build the best supported collection for `caps`.
///
/// The weak strategy is only attempted when `prefer_weak` is set; the list
/// strategy always succeeds.
pub fn create_collection<H>(
    caps: HostCapabilities,
    prefer_weak: bool,
) -> Box<dyn HandlerCollection<H>>
where
    H: ?Sized + Send + Sync + 'static,
{
    if prefer_weak {
        match WeakHandlerCollection::try_with(caps) {
            Ok(collection) => return Box::new(collection),
            Err(e) => {
                tracing::debug!(error = %e, "weak handler storage unavailable, falling back")
            }
        }
    }

    match SetHandlerCollection::try_with(caps) {
        Ok(collection) => return Box::new(collection),
        Err(e) => {
            tracing::debug!(error = %e, "set handler storage unavailable, falling back to list")
        }
    }

    Box::new(ListHandlerCollection::new())
}
