//! Persistent key/value storage for session state.

/// Device key/value store (AsyncStorage on the phone, a JSON file on desktop).
///
/// Implementations swallow and log their own I/O failures; a value that cannot
/// be read is reported as absent.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}
