//! Visibility scoping
//!
//! The permission-derived predicate limiting which records an actor may see.
//! It is produced outside the query core and always AND-ed into queries.

use crate::core::constants::WORK_PACKAGES_TABLE;
use crate::data::filters::{MATCH_EVERYTHING, MATCH_NOTHING};

/// Trusted SQL predicate over `work_packages`
///
/// Constructors only embed integers; `from_trusted_sql` is for providers that
/// build their own predicate and must not contain user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityScope {
    sql: String,
}

impl VisibilityScope {
    /// Every record is visible
    pub fn all() -> Self {
        Self {
            sql: MATCH_EVERYTHING.to_string(),
        }
    }

    /// No record is visible
    pub fn none() -> Self {
        Self {
            sql: MATCH_NOTHING.to_string(),
        }
    }

    /// Records of the given projects
    pub fn projects(project_ids: &[i64]) -> Self {
        if project_ids.is_empty() {
            return Self::none();
        }
        let ids = project_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            sql: format!("{}.project_id IN ({})", WORK_PACKAGES_TABLE, ids),
        }
    }

    /// Records of projects the user is a member of
    pub fn member_of(user_id: i64) -> Self {
        Self {
            sql: format!(
                "{}.project_id IN (SELECT members.project_id FROM members WHERE members.user_id = {})",
                WORK_PACKAGES_TABLE, user_id
            ),
        }
    }

    pub fn from_trusted_sql(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Supplies the visibility scope of the current actor (external collaborator)
pub trait VisibilityScopeProvider: Send + Sync {
    fn visibility_scope(&self) -> VisibilityScope;
}

impl VisibilityScopeProvider for VisibilityScope {
    fn visibility_scope(&self) -> VisibilityScope {
        self.clone()
    }
}
