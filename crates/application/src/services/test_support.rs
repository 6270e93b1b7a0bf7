//! Shared test doubles for service tests

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ApplicationError;
use crate::ports::LocalCachePort;

/// In-memory cache standing in for the file-backed one
#[derive(Debug, Default)]
pub struct InMemoryCache {
    slots: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(slot: &str, value: &str) -> Self {
        let cache = Self::default();
        cache
            .slots
            .lock()
            .insert(slot.to_string(), value.to_string());
        cache
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock() = true;
    }

    pub fn raw(&self, slot: &str) -> Option<String> {
        self.slots.lock().get(slot).cloned()
    }
}

#[async_trait]
impl LocalCachePort for InMemoryCache {
    async fn read(&self, slot: &str) -> Result<Option<String>, ApplicationError> {
        Ok(self.slots.lock().get(slot).cloned())
    }

    async fn write(&self, slot: &str, value: &str) -> Result<(), ApplicationError> {
        if *self.fail_writes.lock() {
            return Err(ApplicationError::Cache("disk full".to_string()));
        }
        self.slots
            .lock()
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), ApplicationError> {
        self.slots.lock().remove(slot);
        Ok(())
    }
}
