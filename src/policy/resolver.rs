//! Identity resolver: caller identity to role and class assignments

use super::context::CallerContext;
use crate::domain::StringUuid;
use crate::error::Result;
use crate::repository::{ClassRepository, UserRepository};
use std::sync::Arc;

/// Builds the [`CallerContext`] for a request.
///
/// Reads go straight to the repositories without passing through any
/// predicate. This is the only place that looks up a caller's role, and it
/// runs once per request before any policy is evaluated.
pub struct IdentityResolver<U: UserRepository, C: ClassRepository> {
    user_repo: Arc<U>,
    class_repo: Arc<C>,
}

impl<U: UserRepository, C: ClassRepository> IdentityResolver<U, C> {
    pub fn new(user_repo: Arc<U>, class_repo: Arc<C>) -> Self {
        Self {
            user_repo,
            class_repo,
        }
    }

    pub async fn resolve(&self, identity: Option<StringUuid>) -> Result<CallerContext> {
        let Some(identity) = identity else {
            return Ok(CallerContext::anonymous());
        };

        let role = self.user_repo.find_role(identity).await?;
        if role.is_none() {
            // Authenticated, but not provisioned yet.
            return Ok(CallerContext::new(identity, None, []));
        }

        let classes = self.class_repo.find_assigned_class_ids(identity).await?;
        Ok(CallerContext::new(identity, role, classes))
    }
}
