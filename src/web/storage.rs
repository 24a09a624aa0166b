use crate::connections::store::{KeyValueStore, StoreErr};
use super::describe_js_err;

/// window.localStorage, as a KeyValueStore
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// None when there's no window, or the browser refuses access to storage (private mode etc.)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreErr> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreErr::WriteFailed {
                key: key.to_string(),
                reason: describe_js_err(&err),
            })
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            log::warn!("failed to remove '{}': {}", key, describe_js_err(&err));
        }
    }

    fn keys(&self) -> Vec<String> {
        let len = self.storage.length().unwrap_or(0);
        (0..len)
            .filter_map(|idx| self.storage.key(idx).ok().flatten())
            .collect()
    }
}
