/*
 * Responsibility
 * - Member の lifecycle status (閉じた集合) と status policy
 * - auth context に渡す認証済み主体 (Principal) の型
 *
 * Notes
 * - `allows_access` は wildcard arm を持たない。status を追加したらここで方針を決める
 */
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Dormant,
    Suspended,
    Banned,
    Deleted,
}

impl MemberStatus {
    pub const ALL: [MemberStatus; 5] = [
        Self::Active,
        Self::Dormant,
        Self::Suspended,
        Self::Banned,
        Self::Deleted,
    ];

    /// Status policy: whether a member in this status may authenticate.
    pub const fn allows_access(self) -> bool {
        match self {
            Self::Active => true,
            // dormant members keep basic access
            Self::Dormant => true,
            Self::Suspended => false,
            Self::Banned => false,
            Self::Deleted => false,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Dormant => "DORMANT",
            Self::Suspended => "SUSPENDED",
            Self::Banned => "BANNED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown member status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for MemberStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A member resolved from the store for the current request.
///
/// - `login_id` is the identity carried in the token `sub`
/// - `authorities` are coarse-grained grants (`ROLE_*`); mapping them to permissions is not done here
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub member_id: i64,
    pub login_id: String,
    pub status: MemberStatus,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn allows_access(&self) -> bool {
        self.status.allows_access()
    }
}
