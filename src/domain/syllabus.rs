//! Syllabus entry domain model

use super::common::StringUuid;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Optional assessment recorded with a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TestMetadata {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 0))]
    pub max_score: Option<i32>,
    pub notes: Option<String>,
}

/// One taught session, logged by the volunteer who taught it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SyllabusEntry {
    pub id: StringUuid,
    pub class_id: StringUuid,
    pub volunteer_id: StringUuid,
    pub date_taught: NaiveDate,
    pub duration_minutes: i32,
    #[sqlx(json)]
    pub topics: Vec<String>,
    pub notes: Option<String>,
    /// Object-store references of uploaded material.
    #[sqlx(json)]
    pub attachments: Vec<String>,
    pub approved: bool,
    /// Stored as a JSON document; `null` when no test was given.
    #[sqlx(json)]
    pub test_metadata: Option<TestMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for SyllabusEntry {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            class_id: StringUuid::nil(),
            volunteer_id: StringUuid::nil(),
            date_taught: now.date_naive(),
            duration_minutes: 60,
            topics: Vec::new(),
            notes: None,
            attachments: Vec::new(),
            approved: false,
            test_metadata: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSyllabusEntryInput {
    pub class_id: StringUuid,
    pub volunteer_id: StringUuid,
    pub date_taught: NaiveDate,
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: i32,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub topics: Vec<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[validate(nested)]
    pub test_metadata: Option<TestMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSyllabusEntryInput {
    pub class_id: Option<StringUuid>,
    pub volunteer_id: Option<StringUuid>,
    pub date_taught: Option<NaiveDate>,
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i32>,
    #[validate(length(max = 50))]
    pub topics: Option<Vec<String>>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub approved: Option<bool>,
    #[validate(nested)]
    pub test_metadata: Option<TestMetadata>,
}

impl SyllabusEntry {
    /// Apply an update on top of this entry, producing the row that would be stored.
    pub fn merged_with(&self, input: &UpdateSyllabusEntryInput) -> SyllabusEntry {
        SyllabusEntry {
            id: self.id,
            class_id: input.class_id.unwrap_or(self.class_id),
            volunteer_id: input.volunteer_id.unwrap_or(self.volunteer_id),
            date_taught: input.date_taught.unwrap_or(self.date_taught),
            duration_minutes: input.duration_minutes.unwrap_or(self.duration_minutes),
            topics: input.topics.clone().unwrap_or_else(|| self.topics.clone()),
            notes: input.notes.clone().or_else(|| self.notes.clone()),
            attachments: input
                .attachments
                .clone()
                .unwrap_or_else(|| self.attachments.clone()),
            approved: input.approved.unwrap_or(self.approved),
            test_metadata: input
                .test_metadata
                .clone()
                .or_else(|| self.test_metadata.clone()),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}
