use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Person;

pub async fn list(pool: &PgPool) -> Result<Vec<Person>, sqlx::Error> {
    sqlx::query_as::<_, Person>("SELECT * FROM persons ORDER BY last_name, first_name")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Person>, sqlx::Error> {
    sqlx::query_as::<_, Person>("SELECT * FROM persons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
