//! Class and class-assignment business logic

use crate::domain::{Class, ClassAssignment, CreateClassInput, StringUuid, UpdateClassInput};
use crate::error::{AppError, Result};
use crate::policy::{self, CallerContext, Operation};
use crate::repository::{ClassRepository, UserRepository};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct ClassService<C: ClassRepository, U: UserRepository> {
    repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C: ClassRepository, U: UserRepository> ClassService<C, U> {
    pub fn new(repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self { repo, user_repo }
    }

    pub async fn list(&self, ctx: &CallerContext) -> Result<Vec<Class>> {
        let classes = self.repo.list().await?;
        Ok(policy::filter_visible(ctx, classes))
    }

    pub async fn get(&self, ctx: &CallerContext, id: StringUuid) -> Result<Class> {
        let class = self.repo.find_by_id(id).await?;
        policy::visible_or_missing(ctx, class, "Class")
    }

    pub async fn create(&self, ctx: &CallerContext, input: CreateClassInput) -> Result<Class> {
        input.validate()?;

        let now = Utc::now();
        let class = Class {
            id: StringUuid::new_v4(),
            subject: input.subject,
            grade: input.grade,
            label: input.label,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        policy::enforce(ctx, Operation::Insert, &class)?;

        let class = self.repo.create(&class).await?;
        info!(class_id = %class.id, label = %class.label, "Class created");
        Ok(class)
    }

    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: StringUuid,
        input: UpdateClassInput,
    ) -> Result<Class> {
        input.validate()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Class"))?;
        policy::enforce(ctx, Operation::Update, &existing)?;

        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, ctx: &CallerContext, id: StringUuid) -> Result<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Class"))?;
        policy::enforce(ctx, Operation::Delete, &existing)?;

        self.repo.delete(id).await?;
        info!(class_id = %id, "Class deleted");
        Ok(())
    }

    /// Assignments visible to the caller, across all classes.
    pub async fn list_assignments(&self, ctx: &CallerContext) -> Result<Vec<ClassAssignment>> {
        let assignments = self.repo.list_assignments(None).await?;
        Ok(policy::filter_visible(ctx, assignments))
    }

    /// Assignments of one class visible to the caller. The class itself must be visible.
    pub async fn class_assignments(
        &self,
        ctx: &CallerContext,
        class_id: StringUuid,
    ) -> Result<Vec<ClassAssignment>> {
        self.get(ctx, class_id).await?;
        let assignments = self.repo.list_assignments(Some(class_id)).await?;
        Ok(policy::filter_visible(ctx, assignments))
    }

    /// Assign a user to a class. Repeating the call leaves a single assignment.
    pub async fn assign(
        &self,
        ctx: &CallerContext,
        class_id: StringUuid,
        user_id: StringUuid,
    ) -> Result<ClassAssignment> {
        let assignment = ClassAssignment::new(user_id, class_id);
        policy::enforce(ctx, Operation::Insert, &assignment)?;

        if self.repo.find_by_id(class_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Class {} not found", class_id)));
        }
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let assignment = self.repo.assign(user_id, class_id).await?;
        info!(class_id = %class_id, user_id = %user_id, "User assigned to class");
        Ok(assignment)
    }

    pub async fn unassign(
        &self,
        ctx: &CallerContext,
        class_id: StringUuid,
        user_id: StringUuid,
    ) -> Result<()> {
        let existing = self
            .repo
            .find_assignment(user_id, class_id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Class assignment"))?;
        policy::enforce(ctx, Operation::Delete, &existing)?;

        self.repo.unassign(user_id, class_id).await?;
        info!(class_id = %class_id, user_id = %user_id, "User unassigned from class");
        Ok(())
    }
}
