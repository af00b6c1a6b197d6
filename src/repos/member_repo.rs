/*
 * Responsibility
 * - members テーブル向け SQLx 操作
 * - 認証 gate が必要とするカラム (id, loginId, role, status) だけを読む
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    #[sqlx(rename = "memberId")]
    pub member_id: i64,
    #[sqlx(rename = "loginId")]
    pub login_id: String,
    pub role: String,
    // 大文字の status 名で保存。解釈は loader 側
    pub status: String,
}

pub async fn find_by_login_id(db: &PgPool, login_id: &str) -> Result<Option<MemberRow>, RepoError> {
    let row = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT "memberId", "loginId", role, status
        FROM members
        WHERE "loginId" = $1
        "#,
    )
    .bind(login_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
