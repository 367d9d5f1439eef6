//! Work-package query core
//!
//! Compiles declarative filter clauses into SQL predicates and runs them
//! against the tracker store, returning ordered pages or grouped counts.

pub mod core;
pub mod data;
pub mod utils;

pub use core::config::{FirstDayOfWeek, QueryConfig};
pub use data::error::{QueryError, ResolutionError};
pub use data::filters::{
    CompiledPredicate, CustomFieldFormat, DateInterval, FieldKind, FieldRef, FieldResolver,
    FilterOperator, FilterSpec, Join, PredicateCompiler, ResolvedField, WorkPackageFields,
    parse_filters,
};
pub use data::results::{
    Aggregator, GroupCount, GroupKey, Page, Pagination, ResultQuery, SortKey, VisibilityScope,
    VisibilityScopeProvider, WhereClause,
};
pub use data::sql::{Backend, SqlDialect};
pub use data::types::WorkPackageRow;
pub use utils::time::{Clock, FixedClock, SystemClock};
