use std::sync::Arc;

use axum::extract::FromRef;

use crate::store::{QuestionStore, SharedStore};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: impl QuestionStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
