use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::SessionStorage;

// In-memory session storage for one scope. Clones share the same entries,
// the way every component in a browser tab sees the same session storage.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| "session storage poisoned".to_string())?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "session storage poisoned".to_string())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "session storage poisoned".to_string())?;
        entries.remove(key);
        Ok(())
    }
}
