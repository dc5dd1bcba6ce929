use thiserror::Error;

use crate::transport::TransportError;

/// The only way a resolution call fails: no snapshot could be taken.
/// Semantic absence is `ResolutionResult::NotFound`, never an error.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("snapshot transport failed while resolving '{description}': {source}")]
    Transport {
        description: String,
        #[source]
        source: TransportError,
    },
}
