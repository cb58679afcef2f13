//! Route definitions for Experiences domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{experiences, moderation, public};
use super::middleware::ExperiencesState;

/// Create routes for a member's own experiences
fn experience_routes() -> Router<ExperiencesState> {
    Router::new()
        .route(
            "/v1/experiences",
            get(experiences::list_experiences).post(experiences::share_experience),
        )
        .route(
            "/v1/experiences/{id}",
            get(experiences::get_experience)
                .put(experiences::edit_experience)
                .delete(experiences::delete_experience),
        )
        .route(
            "/v1/experiences/{id}/make-viewable",
            post(experiences::make_viewable),
        )
        .route(
            "/v1/experiences/{id}/make-non-viewable",
            post(experiences::make_non_viewable),
        )
        .route(
            "/v1/experiences/{id}/make-research",
            post(experiences::make_research),
        )
        .route(
            "/v1/experiences/{id}/make-non-research",
            post(experiences::make_non_research),
        )
}

/// Create the unauthenticated public listing routes
fn public_routes() -> Router<ExperiencesState> {
    Router::new().route(
        "/v1/public-experiences",
        get(public::list_public_experiences),
    )
}

/// Create moderator routes
fn moderation_routes() -> Router<ExperiencesState> {
    Router::new()
        .route(
            "/v1/moderation/experiences",
            get(moderation::list_moderation_queue),
        )
        .route(
            "/v1/moderation/experiences/{id}/approve",
            post(moderation::approve_experience),
        )
}

/// Create all Experiences domain API routes
pub fn routes() -> Router<ExperiencesState> {
    Router::new()
        .merge(experience_routes())
        .merge(public_routes())
        .merge(moderation_routes())
}
