use crate::config::Config;
use crate::store::ItemStore;
use std::sync::Arc;

/// Shared application state
///
/// Built once per process and cloned into every request; the store client
/// is reused across invocations of a warm Lambda.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub config: Arc<Config>,
}
