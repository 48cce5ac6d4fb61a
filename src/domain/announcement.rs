//! Announcement domain model

use super::common::{nullable_field, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A message posted to one class, or to everybody when `class_id` is `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: StringUuid,
    pub class_id: Option<StringUuid>,
    pub author_id: StringUuid,
    pub message: String,
    pub pinned: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Announcement {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            class_id: None,
            author_id: StringUuid::nil(),
            message: String::new(),
            pinned: false,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Announcement {
    pub fn is_global(&self) -> bool {
        self.class_id.is_none()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementInput {
    pub class_id: Option<StringUuid>,
    pub author_id: StringUuid,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    #[serde(default)]
    pub pinned: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAnnouncementInput {
    #[validate(length(min = 1, max = 5000))]
    pub message: Option<String>,
    pub pinned: Option<bool>,
    /// Absent keeps the stored expiry; `null` clears it.
    #[serde(
        default,
        deserialize_with = "nullable_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Active announcements first by pin, then newest first.
pub fn sort_for_display(announcements: &mut [Announcement]) {
    announcements.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
