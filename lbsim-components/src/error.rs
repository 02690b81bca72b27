//! Error types for simulation components

use thiserror::Error;

/// Errors related to queue operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is full (capacity: {capacity})")]
    Full { capacity: usize },
}
