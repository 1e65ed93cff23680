//! Default error reporter

use soul_core::{ErrorReporter, SoulError};

/// Logs reported errors through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, error: &SoulError) {
        tracing::error!("File scanner error: {}", error);
    }
}
