//! Authentication gate: bearer token -> verified identity -> member -> status policy.
//!
//! The gate decides, it does not mutate. Applying the outcome (inserting `AuthCtx`,
//! writing the 403) is the middleware's job (`middleware::auth::access`).
//!
//! Failure policy:
//! - no token / already authenticated: pass through untouched
//! - unreadable token, failed verification, lookup errors: log and pass through unauthenticated
//! - member status denied by policy: reject with 403 `{"error": "..."}`

use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::extractors::AuthCtx;
use crate::domain::{MemberStatus, Principal};
use crate::services::auth::principal::{LoadError, PrincipalLoader};
use crate::services::auth::verifier::{TokenError, TokenVerifier};

const BEARER_PREFIX: &str = "Bearer ";

/// Token from `Authorization: Bearer <token>`.
///
/// The prefix is matched exactly (case-sensitive). A header that is not visible ASCII,
/// has another scheme, or carries nothing after the prefix yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
}

/// Errors the gate recovers from locally by continuing unauthenticated.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("unreadable access token: {0}")]
    TokenMalformed(#[from] TokenError),
    #[error("access token carries no identity")]
    MissingIdentity,
    #[error("access token is not valid for '{identity}'")]
    VerificationFailed { identity: String },
    #[error("principal lookup failed: {0}")]
    Principal(#[from] LoadError),
}

impl GateError {
    /// Verification failures are expected traffic; anything else means a collaborator broke.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::TokenMalformed(_) | Self::Principal(_))
    }
}

#[derive(Debug)]
pub enum PassReason {
    TokenAbsent,
    AlreadyAuthenticated,
    Failed(GateError),
}

/// Short-circuit decision: the request ends here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    StatusDenied {
        login_id: String,
        status: MemberStatus,
        message: String,
    },
}

#[derive(Serialize)]
struct RejectionBody<'a> {
    error: &'a str,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::StatusDenied { message, .. } => (
                StatusCode::FORBIDDEN,
                Json(RejectionBody { error: &message }),
            )
                .into_response(),
        }
    }
}

#[derive(Debug)]
pub enum GateOutcome {
    /// Continue without touching the auth context.
    Pass(PassReason),
    /// Continue with this principal established in the auth context.
    Authenticated(Principal),
    /// Stop the chain.
    Rejected(Rejection),
}

/// What the gate reads from a request.
///
/// Borrowed out of the request up front so evaluation never holds the body across an await.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub bearer: Option<&'a str>,
    pub authenticated: bool,
}

impl<'a> GateRequest<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self {
            method: req.method(),
            path: req.uri().path(),
            bearer: bearer_token(req.headers()),
            authenticated: req.extensions().get::<AuthCtx>().is_some(),
        }
    }
}

#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
    loader: Arc<dyn PrincipalLoader>,
    denied_message: Arc<str>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("denied_message", &self.denied_message)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        loader: Arc<dyn PrincipalLoader>,
        denied_message: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            loader,
            denied_message: Arc::from(denied_message.into()),
        }
    }

    pub async fn evaluate(&self, req: GateRequest<'_>) -> GateOutcome {
        let Some(token) = req.bearer else {
            tracing::debug!(method = %req.method, path = req.path, "no bearer token; continuing unauthenticated");
            return GateOutcome::Pass(PassReason::TokenAbsent);
        };

        if req.authenticated {
            tracing::debug!(method = %req.method, path = req.path, "auth context already populated; skipping");
            return GateOutcome::Pass(PassReason::AlreadyAuthenticated);
        }

        let principal = match self.resolve(token).await {
            Ok(principal) => principal,
            Err(err) => {
                if err.is_collaborator_failure() {
                    tracing::error!(
                        method = %req.method,
                        path = req.path,
                        error = ?err,
                        "bearer token processing failed; continuing unauthenticated"
                    );
                } else {
                    tracing::warn!(
                        method = %req.method,
                        path = req.path,
                        error = %err,
                        "bearer token rejected; continuing unauthenticated"
                    );
                }
                return GateOutcome::Pass(PassReason::Failed(err));
            }
        };

        if !principal.allows_access() {
            tracing::warn!(
                method = %req.method,
                path = req.path,
                login_id = %principal.login_id,
                status = %principal.status,
                "access attempt by inactive member"
            );
            return GateOutcome::Rejected(Rejection::StatusDenied {
                login_id: principal.login_id,
                status: principal.status,
                message: self.denied_message.to_string(),
            });
        }

        tracing::info!(
            method = %req.method,
            path = req.path,
            login_id = %principal.login_id,
            authorities = ?principal.authorities,
            "bearer authentication succeeded"
        );
        GateOutcome::Authenticated(principal)
    }

    async fn resolve(&self, token: &str) -> Result<Principal, GateError> {
        let identity = self
            .verifier
            .extract_identity(token)?
            .ok_or(GateError::MissingIdentity)?;

        if !self.verifier.validate(token, &identity) {
            return Err(GateError::VerificationFailed { identity });
        }

        Ok(self.loader.load(&identity).await?)
    }
}
