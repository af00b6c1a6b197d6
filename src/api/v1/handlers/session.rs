/*
 * Responsibility
 * - GET /session: 公開。gate が認証したかどうかを返す
 * - GET /me: 認証コンテキスト必須 (無ければ 401)
 */
use axum::{Extension, Json};

use crate::api::v1::dto::session::{MeResponse, SessionResponse};
use crate::api::v1::extractors::{AuthCtx, AuthCtxExtractor};

pub async fn current_session(ctx: Option<Extension<AuthCtx>>) -> Json<SessionResponse> {
    let res = match ctx {
        Some(Extension(ctx)) => SessionResponse::authenticated(&ctx),
        None => SessionResponse::anonymous(),
    };

    Json(res)
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse::from(ctx))
}
