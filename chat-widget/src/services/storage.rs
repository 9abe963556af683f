//! Thread id persistence in `window.sessionStorage`

use web_sys::Storage;

use crate::error::{Result, WidgetError};
use crate::ports::ThreadStore;

#[derive(Clone, Debug)]
pub struct SessionThreadStore {
    key: String,
}

impl SessionThreadStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<Storage> {
        web_sys::window()
            .ok_or_else(|| WidgetError::Unavailable("no window".to_string()))?
            .session_storage()
            .map_err(|e| WidgetError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| WidgetError::Unavailable("sessionStorage".to_string()))
    }

    fn try_load(&self) -> Result<Option<String>> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| WidgetError::Storage(format!("{:?}", e)))
    }

    fn try_save(&self, thread_id: &str) -> Result<()> {
        Self::storage()?
            .set_item(&self.key, thread_id)
            .map_err(|e| WidgetError::Storage(format!("{:?}", e)))
    }
}

impl ThreadStore for SessionThreadStore {
    fn load(&self) -> Option<String> {
        match self.try_load() {
            Ok(thread) => thread.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Could not read {}: {}", self.key, e);
                None
            }
        }
    }

    fn save(&self, thread_id: &str) {
        if let Err(e) = self.try_save(thread_id) {
            log::warn!("Could not persist {}: {}", self.key, e);
        }
    }
}
