//! Admission and status query services.

pub mod admission;
pub mod query;

use std::time::Duration;

pub use admission::{Admission, AdmissionService};
pub use query::QueryService;

/// Upper bounds on each external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Store write and store read.
    pub store: Duration,
    /// Queue publish.
    pub queue: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            store: Duration::from_secs(5),
            queue: Duration::from_secs(5),
        }
    }
}
