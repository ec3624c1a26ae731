//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_scalar};
use thiserror::Error;

use crate::domain::users::records::UserUuid;

/// SQL used to set user context for row-level security.
pub const SET_USER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

const CURRENT_ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction without any user context.
    ///
    /// Used for catalog and promo code access, which are not owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction and set user context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting user context fails.
    pub async fn begin_user_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_USER_CONTEXT_SQL)
            .bind(user.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

#[derive(Debug, Error)]
pub enum RoleCheckError {
    #[error("failed to inspect database role")]
    Sql(#[from] sqlx::Error),

    #[error("database role bypasses row level security; connect with a restricted role")]
    BypassesRls,
}

/// Refuse to run against a role that would silently ignore row-level security.
///
/// # Errors
///
/// Returns an error when the role is a superuser or has `BYPASSRLS`.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), RoleCheckError> {
    let bypasses: Option<bool> = query_scalar(CURRENT_ROLE_BYPASSES_RLS_SQL)
        .fetch_optional(pool)
        .await?;

    if bypasses.unwrap_or(false) {
        return Err(RoleCheckError::BypassesRls);
    }

    Ok(())
}

/// Read a non-negative `INTEGER` column (quantity, stock, count) as `u32`.
pub(crate) fn try_get_u32(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let value: i32 = row.try_get(col)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert a `u32` into the `INTEGER` representation used by the schema.
pub(crate) fn try_i32_from_u32(value: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(format!("{col}: {e}").into()))
}
