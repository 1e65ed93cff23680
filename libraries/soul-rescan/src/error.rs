//! Error types for the rescan engine
//!
//! Item-level failures never surface here; they are absorbed by the pass.
//! These are the pass-level failures that stop a pass early.

use soul_core::{types::CompositionId, SoulError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RescanError {
    #[error("Scanner state error: {0}")]
    State(#[source] SoulError),

    #[error("Candidate selection failed: {0}")]
    Selection(#[source] SoulError),

    #[error("Failed to record scan time for composition {id}: {source}")]
    Stamp {
        id: CompositionId,
        #[source]
        source: SoulError,
    },

    #[error("Invalid scanner configuration: {0}")]
    InvalidConfig(String),
}

impl RescanError {
    /// Underlying collaborator error, if any
    pub fn cause(&self) -> Option<&SoulError> {
        match self {
            Self::State(e) | Self::Selection(e) | Self::Stamp { source: e, .. } => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}
