//! Identity lifecycle hooks: create and remove User rows

use crate::domain::{ProvisionUserInput, Role, StringUuid, User};
use crate::error::Result;
use crate::policy::{self, CallerContext, Operation};
use crate::repository::UserRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

pub struct ProvisioningService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> ProvisioningService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create the User row for a new identity with role `viewer`.
    ///
    /// Returns `false` when the row already existed; repeated or concurrent
    /// deliveries are no-ops.
    pub async fn identity_created(&self, input: ProvisionUserInput) -> Result<bool> {
        input.validate()?;

        let now = Utc::now();
        let row = User {
            id: input.id,
            email: input.email.clone(),
            display_name: input.display_name.clone(),
            role: Role::Viewer,
            academic_programme: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        policy::enforce(&CallerContext::anonymous(), Operation::Insert, &row)?;

        let created = self.repo.provision(&input).await?;
        if created {
            info!(user_id = %input.id, "Provisioned user");
        } else {
            debug!(user_id = %input.id, "User already provisioned");
        }
        Ok(created)
    }

    /// Remove the User row of a deleted identity. A missing row is a no-op.
    pub async fn identity_deleted(&self, id: StringUuid) -> Result<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!(user_id = %id, "Removed user for deleted identity");
        } else {
            debug!(user_id = %id, "Deleted identity had no user row");
        }
        Ok(deleted)
    }
}
