use chrono::NaiveDate;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::types::BigDecimal;
use sqlx::{Column, PgPool, Postgres, Row as _, Transaction, TypeInfo};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::{RecordStore, Row, Statement, Value};
use crate::error::StoreError;

/// PostgreSQL-backed record store.
///
/// The pool holds a single connection for the session. While a transaction
/// is open every statement runs on it; dropping it unfinished rolls back.
pub struct Database {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl Database {
    /// Open the connection described by the configuration
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(config.database_url())
            .await?;
        info!("database connection established");

        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Close the connection gracefully at the end of the session
    pub async fn close(mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            warn!("closing with an open transaction, rolling back");
            tx.rollback().await?;
        }
        self.pool.close().await;
        info!("database connection closed");

        Ok(())
    }
}

impl RecordStore for Database {
    async fn execute(&mut self, statement: &Statement) -> Result<u64, StoreError> {
        debug!(sql = statement.sql(), args = statement.args().len(), "execute");
        let query = bind_all(statement);
        let result = match self.tx.as_mut() {
            Some(tx) => query.execute(&mut **tx).await?,
            None => query.execute(&self.pool).await?,
        };

        Ok(result.rows_affected())
    }

    async fn query(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        debug!(sql = statement.sql(), args = statement.args().len(), "query");
        let query = bind_all(statement);
        let rows = match self.tx.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await?,
            None => query.fetch_all(&self.pool).await?,
        };

        rows.iter().map(decode_row).collect()
    }

    async fn begin(&mut self) -> Result<(), StoreError> {
        // Nested calls keep the outer transaction
        if self.tx.is_none() {
            self.tx = Some(self.pool.begin().await?);
            debug!("transaction started");
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            debug!("transaction committed");
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            debug!("transaction rolled back");
        }
        Ok(())
    }
}

fn bind_all(statement: &Statement) -> Query<'_, Postgres, PgArguments> {
    statement
        .args()
        .iter()
        .fold(sqlx::query(statement.sql()), |query, value| match value {
            // Non-text columns cast the placeholder in SQL
            Value::Null => query.bind(None::<String>),
            Value::Text(text) => query.bind(text.clone()),
            Value::Integer(n) => query.bind(*n),
            Value::Decimal(n) => query.bind(*n),
            Value::Boolean(b) => query.bind(*b),
            Value::Date(d) => query.bind(*d),
        })
}

/// Convert a driver row into a [`Row`], keyed by the column type name
fn decode_row(row: &PgRow) -> Result<Row, StoreError> {
    let mut columns = Vec::with_capacity(row.len());

    for column in row.columns() {
        let name = column.name();
        let index = column.ordinal();
        let type_name = column.type_info().name();

        let value = match type_name {
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row.try_get::<Option<String>, _>(index)?.map(Value::Text),
            "INT2" => row.try_get::<Option<i16>, _>(index)?.map(|n| Value::Integer(n.into())),
            "INT4" => row.try_get::<Option<i32>, _>(index)?.map(|n| Value::Integer(n.into())),
            "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::Integer),
            "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(|n| Value::Decimal(n.into())),
            "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::Decimal),
            "NUMERIC" => match row.try_get::<Option<BigDecimal>, _>(index)? {
                Some(n) => Some(Value::Decimal(n.to_string().parse::<f64>().map_err(|_| {
                    StoreError::ColumnType {
                        column: name.to_owned(),
                        expected: "a number",
                    }
                })?)),
                None => None,
            },
            "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Boolean),
            "DATE" => row.try_get::<Option<NaiveDate>, _>(index)?.map(Value::Date),
            other => {
                return Err(StoreError::UnsupportedType {
                    column: name.to_owned(),
                    type_name: other.to_owned(),
                });
            }
        };

        columns.push((name.to_owned(), value.unwrap_or(Value::Null)));
    }

    Ok(Row::new(columns))
}
