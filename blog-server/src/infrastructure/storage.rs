use blog_core::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
use std::path::Path;
use std::sync::Arc;

/// File storage under `data_dir` when given, otherwise a process-local map.
pub fn open_storage(data_dir: Option<&Path>) -> Result<Arc<dyn KeyValueStorage>, StorageError> {
    match data_dir {
        Some(dir) => {
            let storage = FileStorage::open(dir)?;
            tracing::info!("Using file storage at {}", storage.root().display());
            Ok(Arc::new(storage))
        }
        None => {
            tracing::warn!("DATA_DIR not set, comments and likes are kept in memory only");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
