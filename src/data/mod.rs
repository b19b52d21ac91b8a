//! Data module - loading, derivation, joining, filtering, and caching

pub mod cache;
pub mod filter;
pub mod generator;
pub mod loader;
pub mod processor;
pub mod sample;

pub use cache::{CacheError, DataCache};
pub use filter::{FilterCriteria, FilteredData};
pub use loader::{DataLoader, DataOrigin, LoaderError, RawData};
pub use processor::{DataProcessor, PreparedData, ProcessorError};
