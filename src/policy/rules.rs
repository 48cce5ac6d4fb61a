//! Per-table row predicates.
//!
//! Every predicate is a pure function of the caller context and the row.
//! Anything not granted here is denied.

use super::context::CallerContext;
use super::{Operation, Table};
use crate::domain::{
    Announcement, Class, ClassAssignment, Role, SyllabusEntry, UpdateSyllabusEntryInput, User,
};

/// A row type covered by the policy table
pub trait Guarded {
    const TABLE: Table;

    fn permits(&self, ctx: &CallerContext, op: Operation) -> bool;
}

impl Guarded for User {
    const TABLE: Table = Table::User;

    fn permits(&self, ctx: &CallerContext, op: Operation) -> bool {
        match op {
            Operation::Select => ctx.is(self.id) || ctx.is_admin(),
            // Rows are written by the provisioning hook.
            Operation::Insert => true,
            // Role changes are constrained separately by `RoleGuard`.
            Operation::Update => ctx.is(self.id),
            Operation::Delete => ctx.is_admin(),
        }
    }
}

impl Guarded for Class {
    const TABLE: Table = Table::Class;

    fn permits(&self, ctx: &CallerContext, op: Operation) -> bool {
        match op {
            Operation::Select => {
                ctx.is_authenticated() && (ctx.is_admin() || ctx.is_assigned(self.id))
            }
            Operation::Insert | Operation::Update | Operation::Delete => ctx.is_admin(),
        }
    }
}

impl Guarded for ClassAssignment {
    const TABLE: Table = Table::ClassAssignment;

    fn permits(&self, ctx: &CallerContext, op: Operation) -> bool {
        match op {
            Operation::Select => ctx.is(self.user_id) || ctx.is_admin(),
            Operation::Insert | Operation::Update | Operation::Delete => ctx.is_admin(),
        }
    }
}

impl Guarded for SyllabusEntry {
    const TABLE: Table = Table::SyllabusEntry;

    fn permits(&self, ctx: &CallerContext, op: Operation) -> bool {
        if ctx.is_admin() {
            return true;
        }
        match op {
            Operation::Select => ctx.is_authenticated() && ctx.is_assigned(self.class_id),
            Operation::Insert => ctx.is(self.volunteer_id) && ctx.is_assigned(self.class_id),
            Operation::Update => ctx.is(self.volunteer_id),
            Operation::Delete => false,
        }
    }
}

impl Guarded for Announcement {
    const TABLE: Table = Table::Announcement;

    fn permits(&self, ctx: &CallerContext, op: Operation) -> bool {
        if ctx.is_admin() {
            return true;
        }
        let in_scope = match self.class_id {
            None => true,
            Some(class_id) => ctx.is_assigned(class_id),
        };
        match op {
            Operation::Select => ctx.is_authenticated() && in_scope,
            Operation::Insert => ctx.is(self.author_id) && in_scope,
            Operation::Update => ctx.is(self.author_id),
            Operation::Delete => false,
        }
    }
}

/// What a profile update may do to the stored role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGuard {
    /// Keep whatever role is stored at write time.
    Locked,
    /// The requested role, if any, is written.
    Unlocked,
}

impl RoleGuard {
    pub fn for_caller(ctx: &CallerContext) -> Self {
        if ctx.is_admin() {
            RoleGuard::Unlocked
        } else {
            RoleGuard::Locked
        }
    }

    /// Role to persist given the role read under the row lock.
    pub fn resolve(self, stored: Role, requested: Option<Role>) -> Role {
        match (self, requested) {
            (RoleGuard::Unlocked, Some(role)) => role,
            _ => stored,
        }
    }
}

/// Full User UPDATE predicate over the old and new row.
pub fn user_update_allowed(ctx: &CallerContext, old: &User, new: &User) -> bool {
    old.permits(ctx, Operation::Update) && (new.role == old.role || ctx.is_admin())
}

/// Drop the admin-owned columns from a non-admin syllabus update.
pub fn guard_syllabus_update(
    ctx: &CallerContext,
    mut input: UpdateSyllabusEntryInput,
) -> UpdateSyllabusEntryInput {
    if !ctx.is_admin() {
        input.approved = None;
        input.class_id = None;
        input.volunteer_id = None;
    }
    input
}
