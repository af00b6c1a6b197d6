//! Bearer authentication layer: runs the `AuthGate` and applies its outcome.
//!
//! - Authenticated: `AuthCtx` is inserted into request extensions (read by `AuthCtxExtractor`)
//! - Rejected: 403 `{"error": "..."}`, the inner service is not called
//! - Pass: the request continues unchanged (anonymous, or already authenticated)
//!
//! The gate never fails the request. Routes that need a member must ask for `AuthCtxExtractor`.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::{AuthCtx, RequestDetails};
use crate::services::auth::{GateOutcome, GateRequest};
use crate::state::AppState;

/// Put the auth gate in front of every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = {
        let input = GateRequest::from_request(&req);
        state.gate.evaluate(input).await
    };

    match outcome {
        GateOutcome::Rejected(rejection) => return rejection.into_response(),
        GateOutcome::Authenticated(principal) => {
            let details = RequestDetails::capture(&req);
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(AuthCtx::new(principal, details));
        }
        GateOutcome::Pass(_) => {}
    }

    tracing::debug!(
        authenticated = req.extensions().get::<AuthCtx>().is_some(),
        "auth gate finished"
    );

    next.run(req).await
}
