//! Syllabus entry repository

use crate::domain::{Class, Role, StringUuid, SyllabusEntry, TestMetadata, User};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::MySqlPool;

/// An entry together with the base rows the dashboard view joins it with
pub type DashboardSource = (SyllabusEntry, User, Class);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SyllabusRepository: Send + Sync {
    async fn create(&self, entry: &SyllabusEntry) -> Result<SyllabusEntry>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<SyllabusEntry>>;
    async fn list(&self, class_id: Option<StringUuid>) -> Result<Vec<SyllabusEntry>>;
    /// Persist every mutable column of `entry`.
    async fn update(&self, entry: &SyllabusEntry) -> Result<SyllabusEntry>;
    async fn delete(&self, id: StringUuid) -> Result<bool>;
    async fn list_dashboard(&self, class_id: Option<StringUuid>) -> Result<Vec<DashboardSource>>;
}

pub struct SyllabusRepositoryImpl {
    pool: MySqlPool,
}

impl SyllabusRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const ENTRY_COLUMNS: &str = "id, class_id, volunteer_id, date_taught, duration_minutes, topics, \
     notes, attachments, approved, test_metadata, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DashboardJoinRow {
    id: StringUuid,
    class_id: StringUuid,
    volunteer_id: StringUuid,
    date_taught: NaiveDate,
    duration_minutes: i32,
    #[sqlx(json)]
    topics: Vec<String>,
    notes: Option<String>,
    #[sqlx(json)]
    attachments: Vec<String>,
    approved: bool,
    #[sqlx(json)]
    test_metadata: Option<TestMetadata>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_email: String,
    user_display_name: Option<String>,
    user_role: Role,
    user_academic_programme: Option<String>,
    user_avatar_url: Option<String>,
    user_created_at: DateTime<Utc>,
    user_updated_at: DateTime<Utc>,
    class_subject: String,
    class_grade: String,
    class_label: String,
    class_description: Option<String>,
    class_created_at: DateTime<Utc>,
    class_updated_at: DateTime<Utc>,
}

impl DashboardJoinRow {
    fn into_source(row: Self) -> DashboardSource {
        let entry = SyllabusEntry {
            id: row.id,
            class_id: row.class_id,
            volunteer_id: row.volunteer_id,
            date_taught: row.date_taught,
            duration_minutes: row.duration_minutes,
            topics: row.topics,
            notes: row.notes,
            attachments: row.attachments,
            approved: row.approved,
            test_metadata: row.test_metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        let user = User {
            id: row.volunteer_id,
            email: row.user_email,
            display_name: row.user_display_name,
            role: row.user_role,
            academic_programme: row.user_academic_programme,
            avatar_url: row.user_avatar_url,
            created_at: row.user_created_at,
            updated_at: row.user_updated_at,
        };
        let class = Class {
            id: row.class_id,
            subject: row.class_subject,
            grade: row.class_grade,
            label: row.class_label,
            description: row.class_description,
            created_at: row.class_created_at,
            updated_at: row.class_updated_at,
        };
        (entry, user, class)
    }
}

#[async_trait]
impl SyllabusRepository for SyllabusRepositoryImpl {
    async fn create(&self, entry: &SyllabusEntry) -> Result<SyllabusEntry> {
        sqlx::query(
            r#"
            INSERT INTO syllabus_entries
                (id, class_id, volunteer_id, date_taught, duration_minutes, topics, notes,
                 attachments, approved, test_metadata, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(entry.id)
        .bind(entry.class_id)
        .bind(entry.volunteer_id)
        .bind(entry.date_taught)
        .bind(entry.duration_minutes)
        .bind(Json(&entry.topics))
        .bind(&entry.notes)
        .bind(Json(&entry.attachments))
        .bind(entry.approved)
        .bind(Json(&entry.test_metadata))
        .execute(&self.pool)
        .await?;

        self.find_by_id(entry.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create syllabus entry")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<SyllabusEntry>> {
        let entry = sqlx::query_as::<_, SyllabusEntry>(&format!(
            "SELECT {} FROM syllabus_entries WHERE id = ?",
            ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list(&self, class_id: Option<StringUuid>) -> Result<Vec<SyllabusEntry>> {
        let entries = match class_id {
            Some(class_id) => {
                sqlx::query_as::<_, SyllabusEntry>(&format!(
                    "SELECT {} FROM syllabus_entries WHERE class_id = ? ORDER BY date_taught DESC, created_at DESC",
                    ENTRY_COLUMNS
                ))
                .bind(class_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SyllabusEntry>(&format!(
                    "SELECT {} FROM syllabus_entries ORDER BY date_taught DESC, created_at DESC",
                    ENTRY_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(entries)
    }

    async fn update(&self, entry: &SyllabusEntry) -> Result<SyllabusEntry> {
        sqlx::query(
            r#"
            UPDATE syllabus_entries
            SET class_id = ?, volunteer_id = ?, date_taught = ?, duration_minutes = ?,
                topics = ?, notes = ?, attachments = ?, approved = ?, test_metadata = ?,
                updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(entry.class_id)
        .bind(entry.volunteer_id)
        .bind(entry.date_taught)
        .bind(entry.duration_minutes)
        .bind(Json(&entry.topics))
        .bind(&entry.notes)
        .bind(Json(&entry.attachments))
        .bind(entry.approved)
        .bind(Json(&entry.test_metadata))
        .bind(entry.id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(entry.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Syllabus entry {} not found", entry.id)))
    }

    async fn delete(&self, id: StringUuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM syllabus_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_dashboard(&self, class_id: Option<StringUuid>) -> Result<Vec<DashboardSource>> {
        let rows = sqlx::query_as::<_, DashboardJoinRow>(
            r#"
            SELECT s.id, s.class_id, s.volunteer_id, s.date_taught, s.duration_minutes,
                   s.topics, s.notes, s.attachments, s.approved, s.test_metadata,
                   s.created_at, s.updated_at,
                   u.email AS user_email, u.display_name AS user_display_name,
                   u.role AS user_role, u.academic_programme AS user_academic_programme,
                   u.avatar_url AS user_avatar_url, u.created_at AS user_created_at,
                   u.updated_at AS user_updated_at,
                   c.subject AS class_subject, c.grade AS class_grade, c.label AS class_label,
                   c.description AS class_description, c.created_at AS class_created_at,
                   c.updated_at AS class_updated_at
            FROM syllabus_entries s
            JOIN users u ON u.id = s.volunteer_id
            JOIN classes c ON c.id = s.class_id
            WHERE u.role IN ('volunteer', 'admin')
              AND (? IS NULL OR s.class_id = ?)
            ORDER BY s.date_taught DESC, s.created_at DESC
            "#,
        )
        .bind(class_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DashboardJoinRow::into_source).collect())
    }
}
