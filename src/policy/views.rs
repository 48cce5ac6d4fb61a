//! Permission propagation for the derived views.
//!
//! Views are evaluated with the querying caller's context, never with
//! elevated rights: each joined row must pass the SELECT predicate of every
//! base row it is built from.

use super::context::CallerContext;
use super::rules::Guarded;
use super::{enforce_admin, record_decision, Operation, PolicyResult, Table};
use crate::domain::{Class, PendingVolunteer, Role, SyllabusEntry, User, VolunteerDashboardRow};

/// Viewer accounts awaiting promotion. Admin-only.
pub fn pending_volunteers(ctx: &CallerContext, users: &[User]) -> PolicyResult<Vec<PendingVolunteer>> {
    enforce_admin(ctx, Table::PendingVolunteers, Operation::Select)?;

    Ok(users
        .iter()
        .filter(|user| user.role == Role::Viewer)
        .filter(|user| user.permits(ctx, Operation::Select))
        .map(PendingVolunteer::from)
        .collect())
}

/// Join syllabus entries with their volunteer and class, keeping only rows
/// whose three base rows are all visible to the caller.
pub fn volunteer_dashboard(
    ctx: &CallerContext,
    rows: &[(SyllabusEntry, User, Class)],
) -> Vec<VolunteerDashboardRow> {
    rows.iter()
        .filter(|(_, volunteer, _)| volunteer.role.is_teaching())
        .filter(|(entry, volunteer, class)| {
            let visible = entry.permits(ctx, Operation::Select)
                && volunteer.permits(ctx, Operation::Select)
                && class.permits(ctx, Operation::Select);
            record_decision(Table::VolunteerDashboard, Operation::Select, visible);
            visible
        })
        .map(|(entry, volunteer, class)| VolunteerDashboardRow::join(entry, volunteer, class))
        .collect()
}
