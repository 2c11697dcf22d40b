use crate::error::{DbError, Result};
use crate::models::{NewPurchase, NewSale, Transaction, TransactionKind};
use crate::Database;

use tokio_rusqlite::rusqlite::params;
use tokio_rusqlite::rusqlite::types::Type;
use tracing::debug;

impl Database {
    /// Insert a purchase transaction. Returns the new row id.
    pub async fn create_purchase(&self, purchase: NewPurchase, now: i64) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "INSERT INTO transactions \
                     (transaction_type, supplier_name, value_without_tax, total_tax, \
                      product_id, amount, total_value, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?
                .execute(params![
                    TransactionKind::Purchase.as_str(),
                    &purchase.supplier_name,
                    purchase.value_without_tax,
                    purchase.total_tax,
                    purchase.product_id,
                    purchase.amount,
                    purchase.total_value,
                    now
                ])?;

                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!(id, "created purchase transaction");
        Ok(id)
    }

    /// Insert a sale transaction. Returns the new row id.
    pub async fn create_sale(&self, sale: NewSale, now: i64) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "INSERT INTO transactions \
                     (transaction_type, customer_name, product_id, amount, total_value, \
                      created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?
                .execute(params![
                    TransactionKind::Sale.as_str(),
                    &sale.customer_name,
                    sale.product_id,
                    sale.amount,
                    sale.total_value,
                    now
                ])?;

                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!(id, "created sale transaction");
        Ok(id)
    }

    /// List all transactions joined with their product name.
    ///
    /// The join is not filtered on product soft-deletion: transactions stay
    /// visible after their product is soft-deleted.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let transactions = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT transactions.id, transactions.transaction_type, \
                            transactions.supplier_name, transactions.customer_name, \
                            transactions.value_without_tax, transactions.total_tax, \
                            transactions.product_id, transactions.amount, \
                            transactions.total_value, transactions.created_at, \
                            product.name AS product_name \
                     FROM transactions \
                     JOIN product ON transactions.product_id = product.id",
                )?;

                let transactions = stmt
                    .query_map([], |row| {
                        let kind: String = row.get(1)?;
                        let transaction_type = TransactionKind::parse(&kind).ok_or_else(|| {
                            tokio_rusqlite::rusqlite::Error::FromSqlConversionFailure(
                                1,
                                Type::Text,
                                "unknown transaction type".into(),
                            )
                        })?;

                        Ok(Transaction {
                            id: row.get(0)?,
                            transaction_type,
                            supplier_name: row.get(2)?,
                            customer_name: row.get(3)?,
                            value_without_tax: row.get(4)?,
                            total_tax: row.get(5)?,
                            product_id: row.get(6)?,
                            amount: row.get(7)?,
                            total_value: row.get(8)?,
                            created_at: row.get(9)?,
                            product_name: row.get(10)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(transactions)
            })
            .await?;

        if transactions.is_empty() {
            return Err(DbError::EmptyList("transactions"));
        }
        Ok(transactions)
    }
}
