/*
 * Responsibility
 * - /session と /me の response DTO
 */
use serde::Serialize;

use crate::api::v1::extractors::{AuthCtx, RequestDetails};
use crate::domain::MemberStatus;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub login_id: Option<String>,
    pub authorities: Vec<String>,
}

impl SessionResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            login_id: None,
            authorities: Vec::new(),
        }
    }

    pub fn authenticated(ctx: &AuthCtx) -> Self {
        Self {
            authenticated: true,
            login_id: Some(ctx.login_id().to_string()),
            authorities: ctx.authorities().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub member_id: i64,
    pub login_id: String,
    pub status: MemberStatus,
    pub authorities: Vec<String>,
    pub details: RequestDetails,
}

impl From<AuthCtx> for MeResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            member_id: ctx.principal.member_id,
            login_id: ctx.principal.login_id,
            status: ctx.principal.status,
            authorities: ctx.principal.authorities,
            details: ctx.details,
        }
    }
}
