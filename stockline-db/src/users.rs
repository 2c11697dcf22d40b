use crate::error::{DbError, Result};
use crate::models::{AuthUser, NewUser, User, UserPatch};
use crate::Database;

use tokio_rusqlite::rusqlite::types::Value as SqlValue;
use tokio_rusqlite::rusqlite::{params, params_from_iter, OptionalExtension};
use tracing::debug;

/// Hard deletes are gated on this fixture address; every other account
/// degrades to a soft delete. Inherited behavior, flagged in DESIGN.md.
pub const TEST_ACCOUNT_EMAIL: &str = "emailtest@test.com";

impl Database {
    /// List all non-deleted users. The password hash is not selected.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, name, email, created_at, updated_at FROM users \
                     WHERE deleted_at IS NULL",
                )?;

                let users = stmt
                    .query_map([], |row| {
                        Ok(User {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                            created_at: row.get(3)?,
                            updated_at: row.get(4)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(users)
            })
            .await?;

        if users.is_empty() {
            return Err(DbError::EmptyList("users"));
        }
        Ok(users)
    }

    /// Get a non-deleted user by id.
    pub async fn get_user(&self, id: i64) -> Result<User> {
        let user = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "SELECT id, name, email, created_at, updated_at FROM users \
                     WHERE id = ?1 AND deleted_at IS NULL",
                )?
                .query_row(params![id], |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                })
                .optional()
            })
            .await?;

        user.ok_or(DbError::NotFound("user"))
    }

    /// Get a non-deleted user by email.
    pub async fn get_user_by_email(&self, email: String) -> Result<User> {
        let user = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "SELECT id, name, email, created_at, updated_at FROM users \
                     WHERE email = ?1 AND deleted_at IS NULL",
                )?
                .query_row(params![&email], |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                })
                .optional()
            })
            .await?;

        user.ok_or(DbError::NotFound("user"))
    }

    /// Fetch the full user row for credential verification.
    ///
    /// Deliberately not filtered on deleted_at: the login query never was.
    pub async fn get_auth_user_by_email(&self, email: String) -> Result<Option<AuthUser>> {
        let user = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "SELECT id, name, email, password, deleted_at FROM users WHERE email = ?1",
                )?
                .query_row(params![&email], |row| {
                    Ok(AuthUser {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        password: row.get(3)?,
                        deleted_at: row.get(4)?,
                    })
                })
                .optional()
            })
            .await?;

        Ok(user)
    }

    /// Insert a new user. Returns the new row id.
    pub async fn create_user(&self, user: NewUser, now: i64) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.prepare_cached(
                    "INSERT INTO users (name, email, password, created_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                )?
                .execute(params![&user.name, &user.email, &user.password, now])?;

                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!(id, "created user");
        Ok(id)
    }

    /// Partial update: only the supplied fields are written, plus updated_at.
    pub async fn update_user(&self, id: i64, patch: UserPatch, now: i64) -> Result<()> {
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
                if let Some(email) = patch.email {
                    sets.push("email = ?");
                    args.push(SqlValue::Text(email));
                }
                if let Some(password) = patch.password {
                    sets.push("password = ?");
                    args.push(SqlValue::Text(password));
                }

                let sql = format!(
                    "UPDATE users SET {}, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
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

        debug!(id, "updated user");
        Ok(())
    }

    /// Soft-delete a user by setting deleted_at.
    ///
    /// With `permanently` set, the row is physically removed only when its
    /// email matches [`TEST_ACCOUNT_EMAIL`]; anything else silently falls
    /// back to a soft delete.
    pub async fn delete_user(&self, id: i64, permanently: bool, now: i64) -> Result<()> {
        let affected = self
            .conn
            .call(move |conn| {
                let hard = if permanently {
                    let email: Option<String> = conn
                        .prepare_cached(
                            "SELECT email FROM users WHERE id = ?1 AND deleted_at IS NULL",
                        )?
                        .query_row(params![id], |row| row.get(0))
                        .optional()?;
                    email.as_deref() == Some(TEST_ACCOUNT_EMAIL)
                } else {
                    false
                };

                let affected = if hard {
                    conn.prepare_cached("DELETE FROM users WHERE id = ?1")?
                        .execute(params![id])?
                } else {
                    conn.prepare_cached(
                        "UPDATE users SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
                    )?
                    .execute(params![id, now])?
                };

                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::DeleteNoEffect("user"));
        }

        debug!(id, permanently, "deleted user");
        Ok(())
    }
}
