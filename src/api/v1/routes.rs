/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - auth gate は全 route の前に掛かる。member 必須なのは /me だけ
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, session::current_session, session::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/session", get(current_session))
        .route("/me", get(me));

    middleware::auth::access::apply(router, state)
}
