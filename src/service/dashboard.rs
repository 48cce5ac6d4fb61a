//! Derived views: pending volunteers and the volunteer dashboard

use crate::domain::{PendingVolunteer, Role, StringUuid, VolunteerDashboardRow};
use crate::error::Result;
use crate::policy::{views, CallerContext};
use crate::repository::{SyllabusRepository, UserRepository};
use std::sync::Arc;

pub struct DashboardService<U: UserRepository, S: SyllabusRepository> {
    user_repo: Arc<U>,
    syllabus_repo: Arc<S>,
}

impl<U: UserRepository, S: SyllabusRepository> DashboardService<U, S> {
    pub fn new(user_repo: Arc<U>, syllabus_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            syllabus_repo,
        }
    }

    pub async fn pending_volunteers(&self, ctx: &CallerContext) -> Result<Vec<PendingVolunteer>> {
        // Skip the query for callers who will be refused anyway.
        let viewers = if ctx.is_admin() {
            self.user_repo.list_by_role(Role::Viewer).await?
        } else {
            Vec::new()
        };
        views::pending_volunteers(ctx, &viewers)
    }

    pub async fn volunteer_dashboard(
        &self,
        ctx: &CallerContext,
        class_id: Option<StringUuid>,
    ) -> Result<Vec<VolunteerDashboardRow>> {
        if !ctx.is_authenticated() {
            return Ok(Vec::new());
        }
        let rows = self.syllabus_repo.list_dashboard(class_id).await?;
        Ok(views::volunteer_dashboard(ctx, &rows))
    }
}
