//! Query filter system
//!
//! Compiles flat conjunctions of filter clauses into SQL predicates.
//!
//! ## Usage
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use workpack_query::data::filters::{parse_filters, PredicateCompiler, WorkPackageFields};
//! use workpack_query::data::sql::Backend;
//! use workpack_query::FirstDayOfWeek;
//!
//! let specs = parse_filters(r#"[{"field": "status_id", "operator": "o"}]"#).unwrap();
//! let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let compiler = PredicateCompiler::new(Backend::Sqlite.dialect(), today, FirstDayOfWeek::Monday);
//! let predicates = compiler.compile_all(&specs, &WorkPackageFields::default()).unwrap();
//! ```

mod compiler;
pub mod dates;
mod fields;
pub mod normalize;
mod parser;
mod types;

pub use compiler::{MATCH_EVERYTHING, MATCH_NOTHING, PredicateCompiler};
pub use dates::DateInterval;
pub use fields::{FieldResolver, WorkPackageFields, columns};
pub use normalize::RawValue;
pub use parser::parse_filters;
pub use types::{
    Arity, AttributeType, CompiledPredicate, CustomFieldFormat, FieldKind, FieldRef,
    FilterOperator, FilterSpec, Join, ResolvedField,
};
