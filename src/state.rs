use std::sync::Arc;

use crate::{repository::StateRepository, responder::ErrorResponder, service::StateService};

#[derive(Clone)]
pub struct AppState {
    pub states: StateService,
    pub responder: ErrorResponder,
}

impl AppState {
    pub fn new(repo: Arc<dyn StateRepository>) -> Self {
        Self {
            states: StateService::new(repo),
            responder: ErrorResponder::default(),
        }
    }
}
