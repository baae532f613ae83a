use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::store::SongStore;

/// Shared application state
///
/// The dataset is loaded exactly once before the server starts and is
/// immutable afterwards, so handlers read it concurrently without locks.
/// When the load failed the state holds no store and every data route
/// answers 503 until the process is restarted.
#[derive(Clone, Default)]
pub struct AppState {
    store: Option<Arc<SongStore>>,
}

impl AppState {
    /// Creates application state around an optional loaded dataset
    pub fn new(store: Option<SongStore>) -> Self {
        Self {
            store: store.map(Arc::new),
        }
    }

    /// The dataset, or `Unavailable` when it never loaded
    pub fn store(&self) -> AppResult<&SongStore> {
        self.store.as_deref().ok_or(AppError::Unavailable)
    }
}
