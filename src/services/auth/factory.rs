/// Factory: build the `AuthGate` and its collaborators from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::verifier::TokenError;
use crate::services::auth::{AuthGate, JwtTokenVerifier, PgPrincipalLoader};

pub fn build_auth_gate(config: &Config, db: PgPool) -> Result<Arc<AuthGate>, TokenError> {
    let verifier = JwtTokenVerifier::new(
        &config.access_key,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )?;

    let loader = PgPrincipalLoader::new(db);

    Ok(Arc::new(AuthGate::new(
        Arc::new(verifier),
        Arc::new(loader),
        config.account_inactive_message.clone(),
    )))
}
