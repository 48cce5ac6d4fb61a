//! User business logic

use crate::domain::{PromoteUserInput, Role, StringUuid, UpdateUserInput, User, UserPatch};
use crate::error::{AppError, Result};
use crate::policy::{self, CallerContext, Operation, RoleGuard, Table};
use crate::repository::UserRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The caller's own row.
    pub async fn me(&self, ctx: &CallerContext) -> Result<User> {
        let id = ctx
            .identity
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User is not provisioned yet".to_string()))?;
        policy::enforce(ctx, Operation::Select, &user)?;
        Ok(user)
    }

    pub async fn get(&self, ctx: &CallerContext, id: StringUuid) -> Result<User> {
        let user = self.repo.find_by_id(id).await?;
        policy::visible_or_missing(ctx, user, "User")
    }

    /// Users visible to the caller: everybody for admins, otherwise only themselves.
    pub async fn list(
        &self,
        ctx: &CallerContext,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64)> {
        if ctx.is_admin() {
            let users = self.repo.list(offset, limit).await?;
            let total = self.repo.count().await?;
            return Ok((policy::filter_visible(ctx, users), total));
        }

        let own = match ctx.identity {
            Some(id) => self.repo.find_by_id(id).await?,
            None => None,
        };
        let users = policy::filter_visible(ctx, own.into_iter().collect());
        let total = users.len() as i64;
        let users = if offset > 0 { Vec::new() } else { users };
        Ok((users, total))
    }

    /// Self-service profile update. A non-admin's requested role is ignored.
    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: StringUuid,
        input: UpdateUserInput,
    ) -> Result<User> {
        input.validate()?;
        let patch = UserPatch::from_input(input)?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "User"))?;
        policy::enforce(ctx, Operation::Update, &existing)?;

        let guard = RoleGuard::for_caller(ctx);
        if guard == RoleGuard::Locked {
            if let Some(requested) = patch.role.filter(|role| *role != existing.role) {
                info!(
                    user_id = %id,
                    stored = %existing.role,
                    requested = %requested,
                    "Ignoring role change from non-admin caller"
                );
            }
        }

        self.repo.update_profile(id, &patch, guard).await
    }

    /// Set a user's role. Admin only.
    pub async fn promote(
        &self,
        ctx: &CallerContext,
        id: StringUuid,
        input: PromoteUserInput,
    ) -> Result<User> {
        policy::enforce_admin(ctx, Table::User, Operation::Update)?;
        let role: Role = input.role.parse()?;

        if self.repo.find_by_id(id).await?.is_none() {
            return Err(policy::missing_row(ctx, "User"));
        }

        let user = self.repo.set_role(id, role).await?;
        info!(user_id = %id, role = %role, "User role changed");
        Ok(user)
    }

    pub async fn delete(&self, ctx: &CallerContext, id: StringUuid) -> Result<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "User"))?;
        policy::enforce(ctx, Operation::Delete, &existing)?;

        self.repo.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
