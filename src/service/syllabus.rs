//! Syllabus entry business logic

use crate::domain::{CreateSyllabusEntryInput, StringUuid, SyllabusEntry, UpdateSyllabusEntryInput};
use crate::error::Result;
use crate::policy::{self, rules, CallerContext, Operation};
use crate::repository::SyllabusRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct SyllabusService<S: SyllabusRepository> {
    repo: Arc<S>,
}

impl<S: SyllabusRepository> SyllabusService<S> {
    pub fn new(repo: Arc<S>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        ctx: &CallerContext,
        class_id: Option<StringUuid>,
    ) -> Result<Vec<SyllabusEntry>> {
        let entries = self.repo.list(class_id).await?;
        Ok(policy::filter_visible(ctx, entries))
    }

    pub async fn get(&self, ctx: &CallerContext, id: StringUuid) -> Result<SyllabusEntry> {
        let entry = self.repo.find_by_id(id).await?;
        policy::visible_or_missing(ctx, entry, "Syllabus entry")
    }

    /// Log a taught session. New entries always start unapproved.
    pub async fn create(
        &self,
        ctx: &CallerContext,
        input: CreateSyllabusEntryInput,
    ) -> Result<SyllabusEntry> {
        input.validate()?;

        let now = Utc::now();
        let entry = SyllabusEntry {
            id: StringUuid::new_v4(),
            class_id: input.class_id,
            volunteer_id: input.volunteer_id,
            date_taught: input.date_taught,
            duration_minutes: input.duration_minutes,
            topics: input.topics,
            notes: input.notes,
            attachments: input.attachments,
            approved: false,
            test_metadata: input.test_metadata,
            created_at: now,
            updated_at: now,
        };
        policy::enforce(ctx, Operation::Insert, &entry)?;

        let entry = self.repo.create(&entry).await?;
        info!(entry_id = %entry.id, class_id = %entry.class_id, "Syllabus entry created");
        Ok(entry)
    }

    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: StringUuid,
        input: UpdateSyllabusEntryInput,
    ) -> Result<SyllabusEntry> {
        input.validate()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Syllabus entry"))?;
        policy::enforce(ctx, Operation::Update, &existing)?;

        let input = rules::guard_syllabus_update(ctx, input);
        let merged = existing.merged_with(&input);
        self.repo.update(&merged).await
    }

    pub async fn delete(&self, ctx: &CallerContext, id: StringUuid) -> Result<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Syllabus entry"))?;
        policy::enforce(ctx, Operation::Delete, &existing)?;

        self.repo.delete(id).await?;
        info!(entry_id = %id, "Syllabus entry deleted");
        Ok(())
    }
}
