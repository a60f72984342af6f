//! Error types for rowbind core systems.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in the core signal and dispatch systems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The dispatch queue a task was posted to has been dropped.
    #[error("Dispatch queue has been closed; task was not delivered")]
    DispatchClosed,
}
