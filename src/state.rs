//! Shared application state injected into all HTTP handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{InteractiveService, MirrorService};
use crate::domain::collect_job::CollectJob;
use crate::infrastructure::persistence::SqliteMirrorRepository;

/// Services and channels available to every handler.
///
/// Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub mirror_service: Arc<MirrorService<SqliteMirrorRepository>>,
    pub interactive_service: Arc<InteractiveService>,
    /// Sender side of the background collection queue.
    pub job_sender: mpsc::Sender<CollectJob>,
}

impl AppState {
    pub fn new(
        mirror_service: Arc<MirrorService<SqliteMirrorRepository>>,
        interactive_service: Arc<InteractiveService>,
        job_sender: mpsc::Sender<CollectJob>,
    ) -> Self {
        Self {
            mirror_service,
            interactive_service,
            job_sender,
        }
    }
}
