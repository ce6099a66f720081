use std::sync::Arc;

use scoring::Scorer;

use crate::session::SessionStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) scorer: Arc<dyn Scorer>,
    pub(crate) sessions: SessionStore,
    pub(crate) page_title: String,
}
