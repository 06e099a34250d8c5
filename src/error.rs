//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by configuration and strategy lookup.
///
/// The cache store itself never fails: a miss is a normal `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No strategy with that name exists in the catalog
    #[error("Unknown cache strategy: {0}")]
    UnknownStrategy(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Fetch Error ==
/// Failure returned by a caller-supplied fetcher.
///
/// Clonable so the same failure can be handed to every caller waiting on a
/// coalesced fetch. Display and `source()` forward to the original error.
#[derive(Clone)]
pub struct FetchError {
    inner: Arc<anyhow::Error>,
}

impl FetchError {
    /// Wraps the fetcher's error.
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Returns the original error.
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    /// Attempts to downcast the original error to a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.downcast_ref::<E>()
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}
