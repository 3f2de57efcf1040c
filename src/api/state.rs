use std::sync::Arc;

use crate::adapter::{RequestQueue, RequestStore};
use crate::service::{AdmissionService, QueryService, Timeouts};

/// Shared state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: both services hold their adapters behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub admission: AdmissionService,
    pub query: QueryService,
}

impl AppState {
    /// Wire both services to the same store.
    pub fn new(
        store: Arc<dyn RequestStore>,
        queue: Arc<dyn RequestQueue>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            admission: AdmissionService::new(Arc::clone(&store), queue).with_timeouts(timeouts),
            query: QueryService::new(store).with_timeout(timeouts.store),
        }
    }
}
