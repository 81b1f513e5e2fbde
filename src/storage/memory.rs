use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{bail, Result};

use super::KeyValueStore;

#[derive(Default)]
struct MemoryInner {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

/// In-process store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set`/`delete` fail until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Direct read that bypasses fault injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Direct write that bypasses fault injection.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.inner.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check(&self, flag: &AtomicBool, op: &str, key: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            bail!("simulated {op} failure for key {key}");
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let result = self
            .check(&self.inner.fail_reads, "read", key)
            .map(|_| self.entries().get(key).cloned());
        async move { result }
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send {
        let result = self
            .check(&self.inner.fail_writes, "write", key)
            .map(|_| {
                self.entries().insert(key.to_string(), value);
            });
        async move { result }
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let result = self
            .check(&self.inner.fail_writes, "delete", key)
            .map(|_| {
                self.entries().remove(key);
            });
        async move { result }
    }
}
