//! Row-level authorization policy engine.
//!
//! Services call into this module for every row they read or write. The
//! caller's role and class assignments arrive pre-resolved in a
//! [`CallerContext`]; evaluation itself never touches storage.

pub mod context;
pub mod resolver;
pub mod rules;
pub mod views;

pub use context::CallerContext;
pub use resolver::IdentityResolver;
pub use rules::{Guarded, RoleGuard};

use crate::error::AppError;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    User,
    Class,
    ClassAssignment,
    SyllabusEntry,
    Announcement,
    PendingVolunteers,
    VolunteerDashboard,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::User => "users",
            Table::Class => "classes",
            Table::ClassAssignment => "class_assignments",
            Table::SyllabusEntry => "syllabus_entries",
            Table::Announcement => "announcements",
            Table::PendingVolunteers => "pending_volunteers",
            Table::VolunteerDashboard => "volunteer_dashboard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

pub(crate) fn record_decision(table: Table, op: Operation, allowed: bool) {
    let outcome = if allowed { "allow" } else { "deny" };
    metrics::counter!(
        "portal_policy_decisions_total",
        "table" => table.as_str(),
        "operation" => op.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Check one row against the predicate for `op`.
pub fn enforce<R: Guarded>(ctx: &CallerContext, op: Operation, row: &R) -> PolicyResult<()> {
    let allowed = row.permits(ctx, op);
    record_decision(R::TABLE, op, allowed);
    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            table = R::TABLE.as_str(),
            operation = op.as_str(),
            identity = ?ctx.identity,
            role = ?ctx.role,
            "policy denied"
        );
        Err(AppError::Forbidden)
    }
}

/// Keep only the rows the caller may SELECT.
pub fn filter_visible<R: Guarded>(ctx: &CallerContext, rows: Vec<R>) -> Vec<R> {
    rows.into_iter()
        .filter(|row| {
            let allowed = row.permits(ctx, Operation::Select);
            record_decision(R::TABLE, Operation::Select, allowed);
            allowed
        })
        .collect()
}

/// Gate for operations with no row to evaluate yet.
pub fn enforce_admin(ctx: &CallerContext, table: Table, op: Operation) -> PolicyResult<()> {
    let allowed = ctx.is_admin();
    record_decision(table, op, allowed);
    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            table = table.as_str(),
            operation = op.as_str(),
            identity = ?ctx.identity,
            "admin required"
        );
        Err(AppError::Forbidden)
    }
}

/// Error for a row that does not exist or that the caller cannot see.
///
/// Only admins learn that a row is missing; anyone else gets the same
/// outcome as a denied read.
pub fn missing_row(ctx: &CallerContext, what: &str) -> AppError {
    if ctx.is_admin() {
        AppError::NotFound(format!("{} not found", what))
    } else {
        AppError::Forbidden
    }
}

/// Fetch-then-check helper: a missing row and an invisible row look alike.
pub fn visible_or_missing<R: Guarded>(
    ctx: &CallerContext,
    row: Option<R>,
    what: &str,
) -> PolicyResult<R> {
    match row {
        Some(row) => {
            let allowed = row.permits(ctx, Operation::Select);
            record_decision(R::TABLE, Operation::Select, allowed);
            if allowed {
                Ok(row)
            } else {
                Err(missing_row(ctx, what))
            }
        }
        None => Err(missing_row(ctx, what)),
    }
}
