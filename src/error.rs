use thiserror::Error;

/// Errors from reading or writing maze and game-state files.
#[derive(Debug, Error)]
pub enum SaveError {
    /// File could not be opened, read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents do not match the expected layout.
    #[error("invalid save file format: {0}")]
    Format(String),

    #[error("invalid save slot {0} (choose 1-5)")]
    InvalidSlot(u8),
}

impl SaveError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        SaveError::Format(msg.into())
    }
}
