//! User domain model

use super::common::StringUuid;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Coarse-grained permission tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Volunteer,
    /// Accounts awaiting promotion.
    #[default]
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Volunteer, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Volunteer => "volunteer",
            Role::Viewer => "viewer",
        }
    }

    /// Roles whose syllabus entries appear on the volunteer dashboard.
    pub fn is_teaching(&self) -> bool {
        matches!(self, Role::Admin | Role::Volunteer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "volunteer" => Ok(Role::Volunteer),
            "viewer" => Ok(Role::Viewer),
            other => Err(AppError::InvalidRole(other.to_string())),
        }
    }
}

impl sqlx::Type<sqlx::MySql> for Role {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for Role {
    fn decode(value: sqlx::mysql::MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::MySql>>::decode(value)?;
        s.parse::<Role>().map_err(|e| e.to_string().into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// User entity. `id` is the identity asserted by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: StringUuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub academic_programme: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            email: String::new(),
            display_name: None,
            role: Role::Viewer,
            academic_programme: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload of the "identity created" lifecycle hook
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProvisionUserInput {
    pub id: StringUuid,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub display_name: Option<String>,
}

/// Self-service profile update as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,
    #[validate(length(max = 255))]
    pub academic_programme: Option<String>,
    /// Object-store URL of an uploaded avatar.
    #[validate(url)]
    pub avatar_url: Option<String>,
    /// Raw role string; parsed against the closed enum before anything is written.
    pub role: Option<String>,
}

/// Validated profile change handed to the repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub academic_programme: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn from_input(input: UpdateUserInput) -> Result<Self, AppError> {
        let role = input.role.as_deref().map(str::parse).transpose()?;
        Ok(Self {
            display_name: input.display_name,
            academic_programme: input.academic_programme,
            avatar_url: input.avatar_url,
            role,
        })
    }
}

/// Body of the "promote user" administrative operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoteUserInput {
    pub role: String,
}
