use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Mutex;

/// Key/value store attached to an image, used to persist display state.
pub trait PropertyStore: Debug + Send + Sync {
    fn get_property(&self, key: &str) -> Option<String>;
    fn set_property(&self, key: &str, value: String);
    fn remove_property(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get_property(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set_property(&self, key: &str, value: String) {
        self.lock().insert(key.to_string(), value);
    }

    fn remove_property(&self, key: &str) -> Option<String> {
        self.lock().remove(key)
    }
}
