//! User repository

use crate::domain::{ProvisionUserInput, Role, StringUuid, User, UserPatch};
use crate::error::{AppError, Result};
use crate::policy::RoleGuard;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Unguarded role lookup, used only to build the caller context.
    async fn find_role(&self, id: StringUuid) -> Result<Option<Role>>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>>;
    /// Insert the row for a new identity. Returns false if it already existed.
    async fn provision(&self, input: &ProvisionUserInput) -> Result<bool>;
    /// Apply a profile patch. The stored role is read under a row lock and
    /// the written role is decided by `guard`.
    async fn update_profile(&self, id: StringUuid, patch: &UserPatch, guard: RoleGuard)
        -> Result<User>;
    async fn set_role(&self, id: StringUuid, role: Role) -> Result<User>;
    /// Returns false if no row matched.
    async fn delete(&self, id: StringUuid) -> Result<bool>;
}

pub struct UserRepositoryImpl {
    pool: MySqlPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn is_duplicate_key(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("1062"))
}

const USER_COLUMNS: &str =
    "id, email, display_name, role, academic_programme, avatar_url, created_at, updated_at";

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_role(&self, id: StringUuid) -> Result<Option<Role>> {
        let row: Option<(Role,)> = sqlx::query_as("SELECT role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(role,)| role))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE role = ? ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn provision(&self, input: &ProvisionUserInput) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(input.id)
        .bind(&input.email)
        .bind(&input.display_name)
        .bind(Role::Viewer)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            // The primary key is the only unique key on `users`.
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_profile(
        &self,
        id: StringUuid,
        patch: &UserPatch,
        guard: RoleGuard,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let stored: Option<(Role,)> =
            sqlx::query_as("SELECT role FROM users WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (stored,) = stored.ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        let role = guard.resolve(stored, patch.role);

        sqlx::query(
            r#"
            UPDATE users
            SET display_name = COALESCE(?, display_name),
                academic_programme = COALESCE(?, academic_programme),
                avatar_url = COALESCE(?, avatar_url),
                role = ?,
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&patch.display_name)
        .bind(&patch.academic_programme)
        .bind(&patch.avatar_url)
        .bind(role)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn set_role(&self, id: StringUuid, role: Role) -> Result<User> {
        let result = sqlx::query("UPDATE users SET role = ?, updated_at = NOW() WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // MySQL reports zero affected rows when the value is unchanged too.
            if self.find_role(id).await?.is_none() {
                return Err(AppError::NotFound(format!("User {} not found", id)));
            }
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
