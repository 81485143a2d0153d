use thiserror::Error;

// ---------------------------------------------------------------------------
// UnsupportedStrategy
// ---------------------------------------------------------------------------

/// A handler storage strategy could not be constructed because the host
/// environment lacks a primitive it requires.
///
/// This is a construction-time signal consumed by the collection factory,
/// which recovers by falling back to the next strategy in the chain. It is
/// never surfaced to callers of the event façade.
#[derive(Debug, Clone, Error)]
#[error("\"{strategy}\" handler storage requires the host \"{capability}\" capability, which is unavailable")]
pub struct UnsupportedStrategy {
    /// The storage strategy that refused construction.
    pub strategy: &'static str,
    /// The missing host capability.
    pub capability: &'static str,
}

/// Convenience alias — the default error type is `UnsupportedStrategy`.
pub type Result<T, E = UnsupportedStrategy> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
