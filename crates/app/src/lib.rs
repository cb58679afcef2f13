//! AutSPACEs application composition root
//!
//! Composes the domain routers into a single application.

use std::sync::Arc;

use autspaces_auth::{AuthBackend, AuthConfig};
use autspaces_common::Config;
use autspaces_experiences::{ExperienceService, ExperiencesState, PublicExperienceRepository};
use autspaces_memberdata::{MemberDataConfig, MemberDataStore, MemberDataStoreFactory};
use axum::Router;
use sqlx::PgPool;

/// Create the main application router, building the member-data store from `config`
pub fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let memberdata = MemberDataStoreFactory::create(MemberDataConfig {
        provider: config.memberdata_provider.clone(),
        base_url: config.openhumans_base_url.clone(),
    })?;

    Ok(create_app_with_store(config, pool, Arc::from(memberdata)))
}

/// Create the main application router around an existing member-data store
pub fn create_app_with_store(
    config: &Config,
    pool: PgPool,
    memberdata: Arc<dyn MemberDataStore>,
) -> Router {
    let auth_config = AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    };

    let listing = Arc::new(PublicExperienceRepository::new(pool.clone()));
    let experiences_state = ExperiencesState {
        service: ExperienceService::new(memberdata, listing),
        auth: AuthBackend::new(pool, auth_config),
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "AutSPACEs API v0.0.1-SNAPSHOT" }),
        )
        .merge(autspaces_experiences::routes().with_state(experiences_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
