//! Principal loader seam: resolves a token identity to a member.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::domain::{MemberStatus, Principal, UnknownStatus};
use crate::repos::{error::RepoError, member_repo, member_repo::MemberRow};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("member not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Status(#[from] UnknownStatus),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[async_trait]
pub trait PrincipalLoader: Send + Sync {
    async fn load(&self, identity: &str) -> Result<Principal, LoadError>;
}

/// Loads members from Postgres.
#[derive(Clone, Debug)]
pub struct PgPrincipalLoader {
    db: PgPool,
}

impl PgPrincipalLoader {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalLoader for PgPrincipalLoader {
    async fn load(&self, identity: &str) -> Result<Principal, LoadError> {
        let row = member_repo::find_by_login_id(&self.db, identity)
            .await?
            .ok_or_else(|| LoadError::NotFound(identity.to_string()))?;

        principal_from_row(row)
    }
}

/// Row -> `Principal`. An unknown stored status is a load error, never a default.
pub fn principal_from_row(row: MemberRow) -> Result<Principal, LoadError> {
    let status: MemberStatus = row.status.parse()?;

    Ok(Principal {
        member_id: row.member_id,
        login_id: row.login_id,
        status,
        authorities: vec![role_authority(&row.role)],
    })
}

/// `user` -> `ROLE_USER`
pub fn role_authority(role: &str) -> String {
    format!("ROLE_{}", role.trim().to_ascii_uppercase())
}
