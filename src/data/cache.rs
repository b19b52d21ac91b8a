//! Loaded-Data Cache
//! Holds the prepared datasets with a time-based expiry so repeated
//! pipeline runs skip re-reading the source within the window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::loader::{DataLoader, LoaderError};
use super::processor::{DataProcessor, PreparedData, ProcessorError};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

struct CacheEntry {
    data: Arc<PreparedData>,
    loaded_at: Instant,
}

/// Caches the loaded and prepared datasets with a time-based expiry.
pub struct DataCache {
    loader: DataLoader,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl DataCache {
    pub fn new(loader: DataLoader, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            entry: None,
        }
    }

    /// Return the cached datasets, reloading when the entry has expired
    /// or none exists yet.
    pub fn get(&mut self) -> Result<Arc<PreparedData>, CacheError> {
        if let Some(entry) = &self.entry {
            if entry.loaded_at.elapsed() < self.ttl {
                log::debug!("Data cache hit");
                return Ok(entry.data.clone());
            }
            log::debug!("Data cache expired, reloading");
        }
        self.reload()
    }

    /// Drop the cached entry; the next read reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Swap the loader (e.g. after the data directory changed) and drop
    /// the cached entry.
    pub fn set_loader(&mut self, loader: DataLoader) {
        self.loader = loader;
        self.entry = None;
    }

    fn reload(&mut self) -> Result<Arc<PreparedData>, CacheError> {
        let raw = self.loader.load()?;
        let data = Arc::new(DataProcessor::prepare(raw)?);
        log::info!(
            "Prepared {} rentals against {} vehicles",
            data.rentals.height(),
            data.vehicles.height()
        );
        self.entry = Some(CacheEntry {
            data: data.clone(),
            loaded_at: Instant::now(),
        });
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataOrigin;
    use std::path::PathBuf;

    fn sample_cache(ttl: Duration) -> DataCache {
        // nonexistent paths force the sample fallback
        let loader = DataLoader::from_paths(
            PathBuf::from("/nonexistent/vehicles.csv"),
            PathBuf::from("/nonexistent/rentals.csv"),
        );
        DataCache::new(loader, ttl)
    }

    #[test]
    fn second_read_within_ttl_returns_same_data() {
        let mut cache = sample_cache(Duration::from_secs(300));
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.origin, DataOrigin::Sample);
    }

    #[test]
    fn expired_entry_triggers_reload() {
        let mut cache = sample_cache(Duration::ZERO);
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalidate_forces_reload() {
        let mut cache = sample_cache(Duration::from_secs(300));
        let first = cache.get().unwrap();
        cache.invalidate();
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
