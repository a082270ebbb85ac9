use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Company;

pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
