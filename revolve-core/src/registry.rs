//! Registry for managing multiple slider controllers keyed by a caller id.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::controller::SliderHandle;
use crate::error::Result;

pub struct SliderRegistry<K, T> {
    sliders: HashMap<K, SliderHandle<T>>,
}

impl<K, T> Default for SliderRegistry<K, T> {
    fn default() -> Self {
        Self {
            sliders: HashMap::new(),
        }
    }
}

impl<K: fmt::Debug, T> fmt::Debug for SliderRegistry<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderRegistry")
            .field("keys", &self.sliders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, T> SliderRegistry<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sliders.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.sliders.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.sliders.keys()
    }

    pub fn get(&self, key: &K) -> Option<&SliderHandle<T>> {
        self.sliders.get(key)
    }

    /// Register `handle`, returning the handle previously stored under `key`.
    /// The displaced controller keeps running until it is shut down or
    /// dropped.
    pub fn insert(
        &mut self,
        key: K,
        handle: SliderHandle<T>,
    ) -> Option<SliderHandle<T>> {
        self.sliders.insert(key, handle)
    }

    /// Get the handle for `key`, spawning one with `init` when absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, init: F) -> &SliderHandle<T>
    where
        F: FnOnce() -> SliderHandle<T>,
    {
        self.sliders.entry(key).or_insert_with(init)
    }

    /// Remove and shut down the slider under `key`.
    pub async fn remove(&mut self, key: &K) -> Option<Result<()>> {
        let handle = self.sliders.remove(key)?;
        debug!(?key, "removing slider");
        Some(handle.shutdown().await)
    }

    /// Shut down every registered slider. All are stopped even if one fails;
    /// the first failure is returned.
    pub async fn shutdown_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for (key, handle) in self.sliders.drain() {
            if let Err(err) = handle.shutdown().await {
                debug!(?key, %err, "slider shutdown failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
