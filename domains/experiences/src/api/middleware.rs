//! Experiences domain state and auth backend integration

use autspaces_auth::AuthBackend;
use axum::extract::FromRef;

use crate::service::ExperienceService;

/// Application state for the Experiences domain
#[derive(Clone)]
pub struct ExperiencesState {
    pub service: ExperienceService,
    pub auth: AuthBackend,
}

impl FromRef<ExperiencesState> for AuthBackend {
    fn from_ref(state: &ExperiencesState) -> Self {
        state.auth.clone()
    }
}
