use crate::error::{DbError, Result};
use crate::models::{NewProductType, ProductType};
use crate::Database;

use tokio_rusqlite::rusqlite::params;
use tracing::debug;

impl Database {
    /// List all non-deleted product types.
    pub async fn list_product_types(&self) -> Result<Vec<ProductType>> {
        let types = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, name, tax, created_at FROM product_type \
                     WHERE deleted_at IS NULL",
                )?;

                let types = stmt
                    .query_map([], |row| {
                        Ok(ProductType {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            tax: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(types)
            })
            .await?;

        if types.is_empty() {
            return Err(DbError::EmptyList("product types"));
        }
        Ok(types)
    }

    /// Insert a new product type. Returns the new row id.
    pub async fn create_product_type(&self, product_type: NewProductType, now: i64) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "INSERT INTO product_type (name, tax, created_at) VALUES (?1, ?2, ?3)",
                )?
                .execute(params![&product_type.name, product_type.tax, now])?;

                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!(id, "created product type");
        Ok(id)
    }

    /// Soft-delete a product type.
    pub async fn delete_product_type(&self, id: i64, now: i64) -> Result<()> {
        let affected = self
            .conn
            .call(move |conn| {
                let affected = conn
                    .prepare_cached(
                        "UPDATE product_type SET deleted_at = ?2 \
                         WHERE id = ?1 AND deleted_at IS NULL",
                    )?
                    .execute(params![id, now])?;
                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::DeleteNoEffect("product type"));
        }

        debug!(id, "deleted product type");
        Ok(())
    }
}
