//! sqlx-backed MySQL implementation of the gallery store

use crate::config::StoreConfig;
use crate::store::GalleryStore;
use crate::{Error, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use std::time::Duration;

/// Gallery2 MySQL adapter.
///
/// Composes queries from the configured table/field prefixes and casts every
/// selected column to CHAR so the trait's optional-string surface holds for
/// integer and text columns alike.
pub struct MySqlStore {
    pool: MySqlPool,
    table_prefix: String,
    field_prefix: String,
}

impl MySqlStore {
    /// Connect to the Gallery2 database.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        tracing::debug!(
            host = %config.host,
            database = %config.database,
            "Connecting to Gallery2 database"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            table_prefix: config.table_prefix.clone(),
            field_prefix: config.field_prefix.clone(),
        })
    }

    /// Close the connection pool. Called on every exit path of the binary.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn table(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix, name)
    }

    fn field(&self, name: &str) -> String {
        format!("{}{}", self.field_prefix, name)
    }
}

#[async_trait]
impl GalleryStore for MySqlStore {
    async fn fetch(&self, table: &str, id: i64, fields: &[&str]) -> Result<Vec<Option<String>>> {
        // Field and table names are compile-time constants from the entity
        // layer; only the id is bound.
        let select_list = fields
            .iter()
            .map(|f| format!("CAST({} AS CHAR)", self.field(f)))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            select_list,
            self.table(table),
            self.field("id")
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                Error::StoreMalformed(format!("no row for id {} in table {}", id, table))
            })?;

        let mut values = Vec::with_capacity(fields.len());
        for index in 0..fields.len() {
            values.push(row.try_get::<Option<String>, _>(index)?);
        }
        Ok(values)
    }

    async fn ids_for_table(&self, table: &str) -> Result<Vec<i64>> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY {}",
            self.field("id"),
            self.table(table),
            self.field("id")
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get::<i64, _>(0)?);
        }
        Ok(ids)
    }
}
