//! Product Stock Repository
//!
//! Product ids are normalized to their canonical string form before any
//! row access; the record key IS the normalized product id, which makes
//! partial upserts natural.

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ProductStock;
use crate::stock::reservation::normalize_product_id;
use crate::stock::traits::{StockPatch, StockRow, StockStore, StoreError};
use shared::util::now_millis;

const STOCK_TABLE: &str = "product_stock";

#[derive(Clone)]
pub struct StockRepository {
    base: BaseRepository,
}

impl StockRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<ProductStock>> {
        let rows: Vec<ProductStock> = self
            .base
            .db()
            .query("SELECT * FROM product_stock ORDER BY product_id")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_product_id(&self, product_id: &str) -> RepoResult<Option<ProductStock>> {
        let Some(product_id) = normalize_product_id(product_id) else {
            return Ok(None);
        };
        let row: Option<ProductStock> = self
            .base
            .db()
            .select((STOCK_TABLE, product_id.as_str()))
            .await?;
        Ok(row)
    }

    /// Partial upsert: absent patch fields are left untouched, the row is
    /// created when missing
    pub async fn upsert(&self, product_id: &str, patch: &StockPatch) -> RepoResult<ProductStock> {
        let Some(product_id) = normalize_product_id(product_id) else {
            return Err(RepoError::Validation("Empty product id".to_string()));
        };

        let mut data = serde_json::to_value(patch)
            .map_err(|e| RepoError::Database(format!("Failed to serialize patch: {e}")))?;
        if let Some(fields) = data.as_object_mut() {
            let now = now_millis();
            fields.insert("product_id".to_string(), product_id.clone().into());
            fields.insert("last_synced_at".to_string(), now.into());
            fields.insert("updated_at".to_string(), now.into());
        }

        let mut result = self
            .base
            .db()
            .query("UPSERT type::thing('product_stock', $pid) MERGE $data RETURN AFTER")
            .bind(("pid", product_id.clone()))
            .bind(("data", data))
            .await?;
        let rows: Vec<ProductStock> = result.take(0)?;

        rows.into_iter().next().ok_or_else(|| {
            RepoError::Database(format!("Upsert returned nothing for {}", product_id))
        })
    }
}

// =============================================================================
// StockStore seam
// =============================================================================

#[async_trait]
impl StockStore for StockRepository {
    async fn get_stock(&self, product_id: &str) -> Result<Option<StockRow>, StoreError> {
        let row = self
            .find_by_product_id(product_id)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(row.map(to_stock_row))
    }

    async fn list_all_stock(&self) -> Result<Vec<StockRow>, StoreError> {
        let rows = self
            .find_all()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(rows.into_iter().map(to_stock_row).collect())
    }

    async fn upsert_stock(&self, product_id: &str, patch: StockPatch) -> Result<(), StoreError> {
        self.upsert(product_id, &patch)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Write {
                product_id: product_id.to_string(),
                message: e.to_string(),
            })
    }
}

fn to_stock_row(row: ProductStock) -> StockRow {
    StockRow {
        product_id: row.product_id,
        current_quantity: row.current_quantity,
        display_quantity: row.display_quantity,
        reserved_quantity: row.reserved_quantity,
    }
}
