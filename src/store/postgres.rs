use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::audit::value::{Property, PropertyValue};
use crate::store::{Store, StoreError, Write, WriteKind};

/// `Store` backed by one Postgres transaction per batch.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn apply(&self, batch: Vec<Write>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for write in &batch {
            let mut query = build_statement(write)?;
            let result = query.build().execute(&mut *tx).await.map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    StoreError::DuplicateKey {
                        table: write.table,
                        key: write.key,
                    }
                }
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    StoreError::ForeignKey {
                        table: write.table,
                        key: write.key,
                    }
                }
                _ => StoreError::Database(e),
            })?;

            // Dropping `tx` on the early return rolls the batch back.
            if write.kind != WriteKind::Insert && result.rows_affected() == 0 {
                return Err(StoreError::RowNotFound {
                    table: write.table,
                    key: write.key,
                });
            }
        }

        tx.commit().await?;
        tracing::debug!(rows = batch.len(), "batch committed");
        Ok(())
    }
}

fn build_statement(write: &Write) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let table = write.table;
    let query = match write.kind {
        WriteKind::Insert => {
            let mut qb = QueryBuilder::new(format!("INSERT INTO \"{table}\" ("));
            for (i, column) in write.columns.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(format!("\"{}\"", column.name));
            }
            qb.push(") VALUES (");
            for (i, column) in write.columns.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(&mut qb, table, column)?;
            }
            qb.push(")");
            qb
        }
        WriteKind::Update => {
            let mut qb = QueryBuilder::new(format!("UPDATE \"{table}\" SET "));
            let assignments = write.columns.iter().filter(|c| c.name != "id");
            for (i, column) in assignments.enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(format!("\"{}\" = ", column.name));
                push_value(&mut qb, table, column)?;
            }
            qb.push(" WHERE \"id\" = ");
            qb.push_bind(write.key);
            qb
        }
        WriteKind::Delete => {
            let mut qb = QueryBuilder::new(format!("DELETE FROM \"{table}\" WHERE \"id\" = "));
            qb.push_bind(write.key);
            qb
        }
    };
    Ok(query)
}

fn push_value(
    qb: &mut QueryBuilder<'static, Postgres>,
    table: &'static str,
    column: &Property,
) -> Result<(), StoreError> {
    match &column.value {
        PropertyValue::Bool(v) => qb.push_bind(*v),
        PropertyValue::Int(v) => qb.push_bind(*v),
        PropertyValue::Float(v) => qb.push_bind(*v),
        PropertyValue::Text(v) | PropertyValue::Enum(v) => qb.push_bind(v.clone()),
        PropertyValue::Uuid(v) | PropertyValue::Reference(v) => qb.push_bind(*v),
        PropertyValue::Date(v) => qb.push_bind(*v),
        PropertyValue::Timestamp(v) => qb.push_bind(*v),
        PropertyValue::Collection(_) => {
            return Err(StoreError::UnsupportedColumn {
                table,
                column: column.name,
                kind: column.value.kind(),
            });
        }
    };
    Ok(())
}
