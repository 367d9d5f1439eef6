//! Result aggregation over the store
//!
//! A `ResultQuery` carries filters, an optional project and the actor's
//! visibility scope. The `Aggregator` compiles it and returns pages of
//! records or counts per group.

mod aggregator;
mod group;
mod query;
mod roles;
mod visibility;

pub use aggregator::{Aggregator, WhereClause};
pub use group::{GroupCount, GroupKey};
pub use query::{Page, Pagination, ResultQuery, SortKey};
pub use roles::members_with_roles;
pub use visibility::{VisibilityScope, VisibilityScopeProvider};

#[cfg(test)]
mod tests;
