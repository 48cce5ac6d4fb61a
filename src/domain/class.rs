//! Class and class-assignment domain models

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A class taught by volunteers (admin-owned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: StringUuid,
    pub subject: String,
    pub grade: String,
    /// Human label shown in dashboards, e.g. "Grade 7 Maths (Tue)".
    pub label: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Class {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            subject: String::new(),
            grade: String::new(),
            label: String::new(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Relation granting a user visibility of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClassAssignment {
    pub id: StringUuid,
    pub user_id: StringUuid,
    pub class_id: StringUuid,
    pub assigned_at: DateTime<Utc>,
}

impl ClassAssignment {
    pub fn new(user_id: StringUuid, class_id: StringUuid) -> Self {
        Self {
            id: StringUuid::new_v4(),
            user_id,
            class_id,
            assigned_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClassInput {
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(length(min = 1, max = 50))]
    pub grade: String,
    #[validate(length(min = 1, max = 255))]
    pub label: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateClassInput {
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub grade: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub label: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
