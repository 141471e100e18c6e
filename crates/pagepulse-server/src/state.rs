use std::sync::Arc;

use pagepulse_core::{report::ReportRunner, site::SiteMap};

/// Shared application state injected into the handler via
/// [`axum::extract::State`].
///
/// Everything here is immutable after startup, so sharing across request
/// tasks needs no synchronization.
pub struct AppState {
    /// The authenticated provider client, built once in `main`. Behind a
    /// trait object so tests can substitute a mock.
    pub reporter: Arc<dyn ReportRunner>,

    /// Hostname -> GA4 property id table.
    pub sites: SiteMap,
}

impl AppState {
    pub fn new(reporter: Arc<dyn ReportRunner>, sites: SiteMap) -> Self {
        Self { reporter, sites }
    }
}
