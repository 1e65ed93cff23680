//! Scanner status broadcast
//!
//! Single producer, many observers. Observers see the latest value as soon
//! as they subscribe and are only woken when the value actually changes.

use soul_core::types::FileScannerState;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, Clone)]
pub struct StatusChannel {
    sender: Arc<watch::Sender<FileScannerState>>,
}

impl StatusChannel {
    /// New channel starting at `Idle`
    pub fn new() -> Self {
        let (sender, _) = watch::channel(FileScannerState::Idle);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> FileScannerState {
        self.sender.borrow().clone()
    }

    /// Publish `state`. Returns false (and notifies nobody) if unchanged.
    pub fn publish(&self, state: FileScannerState) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<FileScannerState> {
        self.sender.subscribe()
    }

    /// Stream that yields the current value first, then each change
    pub fn stream(&self) -> WatchStream<FileScannerState> {
        WatchStream::new(self.subscribe())
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}
