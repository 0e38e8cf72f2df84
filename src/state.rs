use std::sync::Arc;

use crate::database::Store;
use crate::notifier::ChangeNotifier;

/// Shared per-request dependencies, built once in `main` and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn ChangeNotifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { store, notifier }
    }
}
