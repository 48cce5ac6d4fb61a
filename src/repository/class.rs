//! Class and class-assignment repository

use crate::domain::{Class, ClassAssignment, StringUuid, UpdateClassInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: &Class) -> Result<Class>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Class>>;
    async fn list(&self) -> Result<Vec<Class>>;
    async fn update(&self, id: StringUuid, input: &UpdateClassInput) -> Result<Class>;
    async fn delete(&self, id: StringUuid) -> Result<bool>;

    // Assignments
    /// Unguarded lookup, used only to build the caller context.
    async fn find_assigned_class_ids(&self, user_id: StringUuid) -> Result<Vec<StringUuid>>;
    async fn find_assignment(
        &self,
        user_id: StringUuid,
        class_id: StringUuid,
    ) -> Result<Option<ClassAssignment>>;
    async fn list_assignments(&self, class_id: Option<StringUuid>) -> Result<Vec<ClassAssignment>>;
    /// Idempotent: assigning twice leaves a single row.
    async fn assign(&self, user_id: StringUuid, class_id: StringUuid) -> Result<ClassAssignment>;
    async fn unassign(&self, user_id: StringUuid, class_id: StringUuid) -> Result<bool>;
}

pub struct ClassRepositoryImpl {
    pool: MySqlPool,
}

impl ClassRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRepository for ClassRepositoryImpl {
    async fn create(&self, class: &Class) -> Result<Class> {
        sqlx::query(
            r#"
            INSERT INTO classes (id, subject, grade, label, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(class.id)
        .bind(&class.subject)
        .bind(&class.grade)
        .bind(&class.label)
        .bind(&class.description)
        .execute(&self.pool)
        .await?;

        self.find_by_id(class.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create class")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            SELECT id, subject, grade, label, description, created_at, updated_at
            FROM classes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    async fn list(&self) -> Result<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>(
            r#"
            SELECT id, subject, grade, label, description, created_at, updated_at
            FROM classes
            ORDER BY grade, subject, label
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    async fn update(&self, id: StringUuid, input: &UpdateClassInput) -> Result<Class> {
        sqlx::query(
            r#"
            UPDATE classes
            SET subject = COALESCE(?, subject),
                grade = COALESCE(?, grade),
                label = COALESCE(?, label),
                description = COALESCE(?, description),
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&input.subject)
        .bind(&input.grade)
        .bind(&input.label)
        .bind(&input.description)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", id)))
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM classes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_assigned_class_ids(&self, user_id: StringUuid) -> Result<Vec<StringUuid>> {
        let rows: Vec<(StringUuid,)> =
            sqlx::query_as("SELECT class_id FROM class_assignments WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn find_assignment(
        &self,
        user_id: StringUuid,
        class_id: StringUuid,
    ) -> Result<Option<ClassAssignment>> {
        let assignment = sqlx::query_as::<_, ClassAssignment>(
            r#"
            SELECT id, user_id, class_id, assigned_at
            FROM class_assignments
            WHERE user_id = ? AND class_id = ?
            "#,
        )
        .bind(user_id)
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn list_assignments(&self, class_id: Option<StringUuid>) -> Result<Vec<ClassAssignment>> {
        let assignments = match class_id {
            Some(class_id) => {
                sqlx::query_as::<_, ClassAssignment>(
                    r#"
                    SELECT id, user_id, class_id, assigned_at
                    FROM class_assignments
                    WHERE class_id = ?
                    ORDER BY assigned_at
                    "#,
                )
                .bind(class_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ClassAssignment>(
                    r#"
                    SELECT id, user_id, class_id, assigned_at
                    FROM class_assignments
                    ORDER BY assigned_at
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(assignments)
    }

    async fn assign(&self, user_id: StringUuid, class_id: StringUuid) -> Result<ClassAssignment> {
        let assignment = ClassAssignment::new(user_id, class_id);

        // Keeps the original id and timestamp when the pair already exists.
        sqlx::query(
            r#"
            INSERT INTO class_assignments (id, user_id, class_id, assigned_at)
            VALUES (?, ?, ?, NOW())
            ON DUPLICATE KEY UPDATE user_id = user_id
            "#,
        )
        .bind(assignment.id)
        .bind(user_id)
        .bind(class_id)
        .execute(&self.pool)
        .await?;

        self.find_assignment(user_id, class_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to assign class")))
    }

    async fn unassign(&self, user_id: StringUuid, class_id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM class_assignments WHERE user_id = ? AND class_id = ?")
            .bind(user_id)
            .bind(class_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
