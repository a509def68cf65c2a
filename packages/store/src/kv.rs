use thiserror::Error;

/// Errors raised by a [`KeyValueStore`] backend or the session layer on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Minimal string key/value storage, shaped after the browser's `localStorage`.
///
/// Reads never fail: a missing or unreadable key is simply absent. Writes
/// report errors so callers can log them, but nothing in the client treats a
/// failed write as fatal.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str);
}
