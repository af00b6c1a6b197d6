/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - auth middleware が request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証と member 取得は services::auth の責務
 * - ここは「型（契約）」として固定化し、gate の内部から切り離す
 */
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Principal;

/// Context attached to an authenticated request.
///
/// - `principal` is the member resolved for this request (never cached across requests)
/// - `details` is audit metadata captured when the context was established
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal: Principal,
    pub details: RequestDetails,
}

impl AuthCtx {
    pub fn new(principal: Principal, details: RequestDetails) -> Self {
        Self { principal, details }
    }

    pub fn login_id(&self) -> &str {
        &self.principal.login_id
    }

    pub fn authorities(&self) -> &[String] {
        &self.principal.authorities
    }
}

/// Request metadata recorded for audit/log correlation.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetails {
    pub remote_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
    pub authenticated_at: DateTime<Utc>,
}

impl RequestDetails {
    /// `remote_addr` is only known when the server runs with connect info.
    pub fn capture<B>(req: &Request<B>) -> Self {
        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            remote_addr,
            request_id,
            authenticated_at: Utc::now(),
        }
    }
}
