//! Unified error types for the dispatch core.
//!
//! Configuration problems are fatal and surface as [`ConfigError`] while the
//! registry or dispatcher is being assembled, never while a request is in
//! flight. Failures raised by filters or fallback chains are type-erased
//! [`BoxError`] values that pass through the dispatcher untouched.

use thiserror::Error;

/// Errors detected while assembling a chain registry or dispatcher.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A universal matcher was registered with entries after it.
    ///
    /// Every entry behind a catch-all matcher is unreachable, so the
    /// registry refuses to build rather than silently shadow them.
    #[error(
        "universal matcher at position {position} of {total} is followed by other chains, \
         which it would shadow; register the catch-all chain last"
    )]
    UniversalNotLast {
        /// Zero-based position of the offending matcher.
        position: usize,
        /// Total number of registered chains.
        total: usize,
    },

    /// A validator rejected the assembled configuration.
    #[error("chain configuration rejected: {0}")]
    Rejected(String),
}

impl ConfigError {
    /// Creates a rejection error, typically from a [`ChainValidator`].
    ///
    /// [`ChainValidator`]: crate::validator::ChainValidator
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type-erased error raised by a filter or a fallback chain.
///
/// The dispatch core never wraps, retries, or suppresses these; whatever a
/// filter returns reaches the dispatcher's caller unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for filter execution.
pub type FilterResult = Result<(), BoxError>;
