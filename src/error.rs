use crate::config::ResolveError;
use thiserror::Error;

/// Top-level error type for the deferred-env library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("lookup requires a configuration store")]
    MissingStore,
}
