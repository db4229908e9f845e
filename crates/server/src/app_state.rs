use std::sync::Arc;

use server_api::ApiContext;

use crate::views::ViewRenderer;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) renderer: Arc<dyn ViewRenderer>,
}
