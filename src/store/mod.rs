use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Per-sender single-slot mailbox for an image awaiting its follow-up
/// question.
///
/// `put` overwrites (last write wins, at most one entry per sender);
/// `take` is an atomic read-and-delete, so a staged image is consumed by
/// at most one completion request even under concurrent requests from the
/// same sender.
#[derive(Default)]
pub struct PendingImageStore {
    entries: Mutex<HashMap<String, String>>,
}

impl PendingImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a base64 image for `sender`, replacing any previous entry.
    pub fn put(&self, sender: &str, image_base64: String) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(sender.to_string(), image_base64);
    }

    /// Remove and return the staged image for `sender`, if any.
    pub fn take(&self, sender: &str) -> Option<String> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.remove(sender)
    }
}

#[cfg(test)]
mod tests;
