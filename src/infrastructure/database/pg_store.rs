//! PostgreSQL Store Implementation
//!
//! Transactions wrap a pooled SQLx transaction. Multi-row inserts are built
//! with `QueryBuilder::push_values`, one statement per batch, and generated
//! keys come back through `RETURNING id`.

use async_trait::async_trait;
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{info, trace};

use crate::domain::{EntityKind, Row, Store, StoreTransaction, Value};
use crate::shared::error::{ForumError, StorageError};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn ensure_live(&self) -> Result<(), ForumError> {
        if self.pool.is_closed() {
            return Err(ForumError::NoConnection);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    type Transaction = PgStoreTransaction;

    async fn begin(&self) -> Result<PgStoreTransaction, ForumError> {
        self.ensure_live()?;
        let tx = self.pool.begin().await?;
        Ok(PgStoreTransaction::new(tx))
    }

    async fn migrate(&self, kinds: &[EntityKind]) -> Result<(), ForumError> {
        self.ensure_live()?;
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;

        for kind in kinds {
            let exists = sqlx::query_scalar::<_, bool>("SELECT to_regclass($1::text) IS NOT NULL")
                .bind(kind.table())
                .fetch_one(&self.pool)
                .await?;
            if !exists {
                return Err(StorageError::MissingTable(*kind).into());
            }
        }

        info!(kinds = kinds.len(), "Database migrations complete");
        Ok(())
    }
}

/// Transaction context that wraps a SQLx transaction.
///
/// Dropping it without calling [`StoreTransaction::commit`] rolls back.
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgStoreTransaction {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    /// Insert rows of one kind in a single statement.
    async fn insert_rows(&mut self, rows: Vec<Row>) -> Result<Vec<i64>, StorageError> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let generated = first.has_generated_key();
        trace!(table = first.table(), rows = rows.len(), excluded = ?first.excluded, "Insert");

        let mut builder = insert_statement(rows);
        if generated {
            // Ids are matched to rows positionally: PostgreSQL returns them in
            // VALUES order for a single multi-row insert.
            let ids = builder
                .build_query_scalar::<i64>()
                .fetch_all(&mut *self.tx)
                .await
                .map_err(classify)?;
            Ok(ids)
        } else {
            builder
                .build()
                .execute(&mut *self.tx)
                .await
                .map_err(classify)?;
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn insert(&mut self, row: Row) -> Result<Option<i64>, StorageError> {
        let ids = self.insert_rows(vec![row]).await?;
        Ok(ids.into_iter().next())
    }

    async fn insert_batch(
        &mut self,
        rows: Vec<Row>,
        batch_size: usize,
    ) -> Result<Vec<i64>, StorageError> {
        let mut ids = Vec::with_capacity(rows.len());
        for batch in batches(rows, batch_size) {
            ids.extend(self.insert_rows(batch).await?);
        }
        Ok(ids)
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await.map_err(classify)
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await.map_err(StorageError::Database)
    }
}

/// Split `rows` into consecutive batches of at most `batch_size` rows.
fn batches(mut rows: Vec<Row>, batch_size: usize) -> Vec<Vec<Row>> {
    let batch_size = batch_size.max(1);
    let mut out = Vec::with_capacity(rows.len().div_ceil(batch_size));
    while !rows.is_empty() {
        let rest = rows.split_off(batch_size.min(rows.len()));
        out.push(rows);
        rows = rest;
    }
    out
}

/// Build one multi-row `INSERT` for rows of a single kind.
///
/// Column names come from the first row; every row binds its values in the
/// same order. Generated-key kinds get `RETURNING id`.
fn insert_statement(rows: Vec<Row>) -> QueryBuilder<'static, Postgres> {
    let (table, columns, generated) = match rows.first() {
        Some(first) => (
            first.table(),
            first.column_names().join(", "),
            first.has_generated_key(),
        ),
        None => ("", String::new(), false),
    };

    let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {table} ({columns}) "));
    builder.push_values(rows, |mut separated, row| {
        for (_, value) in row.columns {
            push_value(&mut separated, value);
        }
    });
    if generated {
        builder.push(" RETURNING id");
    }
    builder
}

/// Unique-key conflicts get their own variant, keeping the database error.
fn classify(e: sqlx::Error) -> StorageError {
    let constraint = match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err
            .constraint()
            .or(db_err.table())
            .unwrap_or("unknown")
            .to_string(),
        _ => return StorageError::Database(e),
    };
    StorageError::UniqueViolation {
        constraint,
        source: e,
    }
}

fn push_value<'args>(separated: &mut Separated<'_, 'args, Postgres, &'static str>, value: Value) {
    match value {
        Value::BigInt(v) => separated.push_bind(v),
        Value::NullableBigInt(v) => separated.push_bind(v),
        Value::Text(v) => separated.push_bind(v),
        Value::Timestamp(v) => separated.push_bind(v),
        Value::NullableTimestamp(v) => separated.push_bind(v),
    };
}
