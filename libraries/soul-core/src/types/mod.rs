mod composition;
mod scanner;

pub use composition::{Composition, CompositionId, NewComposition, SourceTags};
pub use scanner::{FileScannerState, ScanSnapshot, ScanVersion};

/// Unix epoch milliseconds
pub type Timestamp = i64;
