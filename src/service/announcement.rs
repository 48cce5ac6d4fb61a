//! Announcement business logic

use crate::domain::{
    sort_for_display, Announcement, CreateAnnouncementInput, StringUuid, UpdateAnnouncementInput,
};
use crate::error::Result;
use crate::policy::{self, CallerContext, Operation};
use crate::repository::AnnouncementRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct AnnouncementService<A: AnnouncementRepository> {
    repo: Arc<A>,
}

impl<A: AnnouncementRepository> AnnouncementService<A> {
    pub fn new(repo: Arc<A>) -> Self {
        Self { repo }
    }

    /// Unexpired announcements visible to the caller, pinned first.
    pub async fn list_active(
        &self,
        ctx: &CallerContext,
        class_id: Option<StringUuid>,
    ) -> Result<Vec<Announcement>> {
        let now = Utc::now();
        let announcements = self
            .repo
            .list(class_id)
            .await?
            .into_iter()
            .filter(|a| !a.is_expired_at(now))
            .collect();

        let mut visible = policy::filter_visible(ctx, announcements);
        sort_for_display(&mut visible);
        Ok(visible)
    }

    pub async fn get(&self, ctx: &CallerContext, id: StringUuid) -> Result<Announcement> {
        let announcement = self.repo.find_by_id(id).await?;
        policy::visible_or_missing(ctx, announcement, "Announcement")
    }

    pub async fn create(
        &self,
        ctx: &CallerContext,
        input: CreateAnnouncementInput,
    ) -> Result<Announcement> {
        input.validate()?;

        let now = Utc::now();
        let announcement = Announcement {
            id: StringUuid::new_v4(),
            class_id: input.class_id,
            author_id: input.author_id,
            message: input.message,
            pinned: input.pinned,
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        };
        policy::enforce(ctx, Operation::Insert, &announcement)?;

        let announcement = self.repo.create(&announcement).await?;
        info!(announcement_id = %announcement.id, global = announcement.is_global(), "Announcement posted");
        Ok(announcement)
    }

    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: StringUuid,
        input: UpdateAnnouncementInput,
    ) -> Result<Announcement> {
        input.validate()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Announcement"))?;
        policy::enforce(ctx, Operation::Update, &existing)?;

        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, ctx: &CallerContext, id: StringUuid) -> Result<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| policy::missing_row(ctx, "Announcement"))?;
        policy::enforce(ctx, Operation::Delete, &existing)?;

        self.repo.delete(id).await?;
        info!(announcement_id = %id, "Announcement deleted");
        Ok(())
    }
}
