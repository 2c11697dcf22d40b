use crate::error::{DbError, Result};
use crate::models::{NewProduct, Product, ProductPatch, ProductWithType};
use crate::Database;

use tokio_rusqlite::rusqlite::types::Value as SqlValue;
use tokio_rusqlite::rusqlite::{params, params_from_iter, OptionalExtension};
use tracing::debug;

impl Database {
    /// List all non-deleted products joined with their type.
    pub async fn list_products(&self) -> Result<Vec<ProductWithType>> {
        let products = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT product.id, product.name, product.product_type_id, \
                            product.description, product.value, product.created_at, \
                            product_type.name AS product_type_name, product_type.tax AS tax \
                     FROM product \
                     JOIN product_type ON product.product_type_id = product_type.id \
                     WHERE product.deleted_at IS NULL",
                )?;

                let products = stmt
                    .query_map([], |row| {
                        Ok(ProductWithType {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            product_type_id: row.get(2)?,
                            description: row.get(3)?,
                            value: row.get(4)?,
                            created_at: row.get(5)?,
                            product_type_name: row.get(6)?,
                            tax: row.get(7)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(products)
            })
            .await?;

        if products.is_empty() {
            return Err(DbError::EmptyList("products"));
        }
        Ok(products)
    }

    /// Get a non-deleted product by id.
    pub async fn get_product(&self, id: i64) -> Result<Product> {
        let product = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "SELECT id, name, description, product_type_id, value, \
                            created_at, updated_at \
                     FROM product WHERE id = ?1 AND deleted_at IS NULL",
                )?
                .query_row(params![id], |row| {
                    Ok(Product {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        product_type_id: row.get(3)?,
                        value: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                })
                .optional()
            })
            .await?;

        product.ok_or(DbError::NotFound("product"))
    }

    /// Insert a new product. Returns the new row id.
    ///
    /// The referenced product type must exist (enforced by the foreign key).
    pub async fn create_product(&self, product: NewProduct, now: i64) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "INSERT INTO product (name, description, product_type_id, value, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?
                .execute(params![
                    &product.name,
                    &product.description,
                    product.product_type_id,
                    product.value,
                    now
                ])?;

                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!(id, "created product");
        Ok(id)
    }

    /// Partial update: only the supplied fields are written, plus updated_at.
    pub async fn update_product(&self, id: i64, patch: ProductPatch, now: i64) -> Result<()> {
        if patch.is_empty() {
            return Err(DbError::NothingToUpdate);
        }

        let affected = self
            .conn
            .call(move |conn| {
                let mut sets: Vec<&str> = Vec::new();
                let mut args: Vec<SqlValue> = Vec::new();

                if let Some(name) = patch.name {
                    sets.push("name = ?");
                    args.push(SqlValue::Text(name));
                }
                if let Some(description) = patch.description {
                    sets.push("description = ?");
                    args.push(SqlValue::Text(description));
                }
                if let Some(product_type_id) = patch.product_type_id {
                    sets.push("product_type_id = ?");
                    args.push(SqlValue::Integer(product_type_id));
                }
                if let Some(value) = patch.value {
                    sets.push("value = ?");
                    args.push(SqlValue::Real(value));
                }

                let sql = format!(
                    "UPDATE product SET {}, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
                    sets.join(", ")
                );
                args.push(SqlValue::Integer(now));
                args.push(SqlValue::Integer(id));

                let affected = conn.prepare(&sql)?.execute(params_from_iter(args))?;
                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::UpdateNoEffect);
        }

        debug!(id, "updated product");
        Ok(())
    }

    /// Soft-delete a product.
    pub async fn delete_product(&self, id: i64, now: i64) -> Result<()> {
        let affected = self
            .conn
            .call(move |conn| {
                let affected = conn
                    .prepare_cached(
                        "UPDATE product SET deleted_at = ?2 \
                         WHERE id = ?1 AND deleted_at IS NULL",
                    )?
                    .execute(params![id, now])?;
                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::DeleteNoEffect("product"));
        }

        debug!(id, "deleted product");
        Ok(())
    }
}
