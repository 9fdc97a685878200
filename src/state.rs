use crate::store::{ImageStore, MemoryStore, PgStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

/// Handles to the persistence collaborator. Nothing else is shared between
/// requests.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn postgres(db: PgPool) -> Self {
        let store = Arc::new(PgStore::new(db));
        Self {
            users: store.clone() as Arc<dyn UserStore>,
            images: store as Arc<dyn ImageStore>,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone() as Arc<dyn UserStore>,
            images: store as Arc<dyn ImageStore>,
        }
    }
}
