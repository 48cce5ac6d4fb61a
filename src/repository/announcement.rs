//! Announcement repository

use crate::domain::{Announcement, StringUuid, UpdateAnnouncementInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: &Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Announcement>>;
    /// Announcements of one class plus global ones, or everything when `class_id` is `None`.
    async fn list(&self, class_id: Option<StringUuid>) -> Result<Vec<Announcement>>;
    async fn update(&self, id: StringUuid, input: &UpdateAnnouncementInput) -> Result<Announcement>;
    async fn delete(&self, id: StringUuid) -> Result<bool>;
}

pub struct AnnouncementRepositoryImpl {
    pool: MySqlPool,
}

impl AnnouncementRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementRepository for AnnouncementRepositoryImpl {
    async fn create(&self, announcement: &Announcement) -> Result<Announcement> {
        sqlx::query(
            r#"
            INSERT INTO announcements (id, class_id, author_id, message, pinned, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(announcement.id)
        .bind(announcement.class_id)
        .bind(announcement.author_id)
        .bind(&announcement.message)
        .bind(announcement.pinned)
        .bind(announcement.expires_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(announcement.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create announcement")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Announcement>> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, class_id, author_id, message, pinned, expires_at, created_at, updated_at
            FROM announcements
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    async fn list(&self, class_id: Option<StringUuid>) -> Result<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, class_id, author_id, message, pinned, expires_at, created_at, updated_at
            FROM announcements
            WHERE ? IS NULL OR class_id = ? OR class_id IS NULL
            ORDER BY pinned DESC, created_at DESC
            "#,
        )
        .bind(class_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }

    async fn update(&self, id: StringUuid, input: &UpdateAnnouncementInput) -> Result<Announcement> {
        sqlx::query(
            r#"
            UPDATE announcements
            SET message = COALESCE(?, message),
                pinned = COALESCE(?, pinned),
                expires_at = CASE WHEN ? THEN ? ELSE expires_at END,
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&input.message)
        .bind(input.pinned)
        .bind(input.expires_at.is_some())
        .bind(input.expires_at.flatten())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement {} not found", id)))
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
