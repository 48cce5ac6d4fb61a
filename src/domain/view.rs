//! Read-only projections served by the derived views

use super::common::StringUuid;
use super::{Class, SyllabusEntry, User};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Row of the pending-volunteers listing: non-sensitive columns of a viewer account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingVolunteer {
    pub id: StringUuid,
    pub email: String,
    pub display_name: Option<String>,
    pub academic_programme: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PendingVolunteer {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            academic_programme: user.academic_programme.clone(),
            created_at: user.created_at,
        }
    }
}

/// Row of the volunteer dashboard: a syllabus entry joined with its volunteer and class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerDashboardRow {
    pub entry_id: StringUuid,
    pub date_taught: NaiveDate,
    pub duration_minutes: i32,
    pub topics: Vec<String>,
    pub approved: bool,
    pub volunteer_id: StringUuid,
    pub volunteer_name: Option<String>,
    pub volunteer_email: String,
    pub class_id: StringUuid,
    pub class_label: String,
    pub class_subject: String,
    pub class_grade: String,
}

impl VolunteerDashboardRow {
    pub fn join(entry: &SyllabusEntry, volunteer: &User, class: &Class) -> Self {
        Self {
            entry_id: entry.id,
            date_taught: entry.date_taught,
            duration_minutes: entry.duration_minutes,
            topics: entry.topics.clone(),
            approved: entry.approved,
            volunteer_id: volunteer.id,
            volunteer_name: volunteer.display_name.clone(),
            volunteer_email: volunteer.email.clone(),
            class_id: class.id,
            class_label: class.label.clone(),
            class_subject: class.subject.clone(),
            class_grade: class.grade.clone(),
        }
    }
}
