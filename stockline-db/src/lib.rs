mod error;
mod models;
mod product_types;
mod products;
mod transactions;
mod users;

pub use error::{DbError, Result};
pub use models::{
    AuthUser, NewProduct, NewProductType, NewPurchase, NewSale, NewUser, Product, ProductPatch,
    ProductType, ProductWithType, Transaction, TransactionKind, User, UserPatch,
};
pub use users::TEST_ACCOUNT_EMAIL;

use std::path::Path;
use tokio_rusqlite::Connection;
use tracing::info;

/// Database wrapper for all Stockline operations.
///
/// Statements run serially on the connection's worker thread; a single
/// statement is the only unit of atomicity, matching the one-statement-
/// per-operation model of the API. Concurrent updates to the same row are
/// last-write-wins.
#[derive(Clone)]
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).await?;
        let db = Self { conn };
        db.initialize().await?;
        Ok(db)
    }

    /// Create an in-memory database (useful for testing).
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        let db = Self { conn };
        db.initialize().await?;
        Ok(db)
    }

    /// Initialize the database schema.
    async fn initialize(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                // WAL for better concurrent read/write behavior
                conn.pragma_update(None, "journal_mode", "WAL")?;

                // Foreign key constraints must be enabled per-connection
                conn.pragma_update(None, "foreign_keys", "ON")?;

                conn.execute_batch(
                    r#"
                    CREATE TABLE IF NOT EXISTS users (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL UNIQUE,
                        password TEXT NOT NULL,
                        created_at INTEGER NOT NULL,
                        updated_at INTEGER,
                        deleted_at INTEGER
                    );

                    CREATE TABLE IF NOT EXISTS product_type (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        tax REAL NOT NULL CHECK (tax >= 0),
                        created_at INTEGER NOT NULL,
                        deleted_at INTEGER
                    );

                    CREATE TABLE IF NOT EXISTS product (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        description TEXT NOT NULL,
                        product_type_id INTEGER NOT NULL REFERENCES product_type(id),
                        value REAL NOT NULL CHECK (value >= 0),
                        created_at INTEGER NOT NULL,
                        updated_at INTEGER,
                        deleted_at INTEGER
                    );

                    CREATE TABLE IF NOT EXISTS transactions (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        transaction_type TEXT NOT NULL
                            CHECK (transaction_type IN ('Purchase', 'Sale')),
                        supplier_name TEXT,
                        customer_name TEXT,
                        value_without_tax REAL,
                        total_tax REAL,
                        product_id INTEGER NOT NULL REFERENCES product(id),
                        amount INTEGER NOT NULL,
                        total_value REAL NOT NULL CHECK (total_value >= 0),
                        created_at INTEGER NOT NULL
                    );

                    CREATE INDEX IF NOT EXISTS idx_product_type_fk
                        ON product(product_type_id);
                    CREATE INDEX IF NOT EXISTS idx_transactions_product
                        ON transactions(product_id);
                    "#,
                )?;
                Ok(())
            })
            .await?;

        info!("database initialized");
        Ok(())
    }
}
