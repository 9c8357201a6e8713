//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) connection and schema definition.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "lumen";
const DATABASE: &str = "office";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        let service = Self { db };
        service.define_schema().await?;

        Ok(service)
    }

    /// Apply table and index definitions (idempotent)
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS order_status ON TABLE order COLUMNS status;
                DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS order_item_order ON TABLE order_item COLUMNS `order`;
                DEFINE TABLE IF NOT EXISTS product_stock SCHEMALESS;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;

        tracing::info!("Database schema applied");
        Ok(())
    }
}
