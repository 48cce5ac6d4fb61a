//! Per-request caller context

use crate::domain::{Role, StringUuid};
use std::collections::HashSet;

/// Everything a predicate may know about the caller.
///
/// Built once per request by [`super::IdentityResolver`] and passed down
/// explicitly; predicates never look anything up themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub identity: Option<StringUuid>,
    pub role: Option<Role>,
    pub assigned_classes: HashSet<StringUuid>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(
        identity: StringUuid,
        role: Option<Role>,
        assigned_classes: impl IntoIterator<Item = StringUuid>,
    ) -> Self {
        Self {
            identity: Some(identity),
            role,
            assigned_classes: assigned_classes.into_iter().collect(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// True when the caller is the identity `id`.
    pub fn is(&self, id: StringUuid) -> bool {
        self.identity == Some(id)
    }

    pub fn is_assigned(&self, class_id: StringUuid) -> bool {
        self.assigned_classes.contains(&class_id)
    }
}
