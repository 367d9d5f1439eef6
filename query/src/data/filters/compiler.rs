//! Predicate compiler
//!
//! Turns one filter clause over a resolved field into a boolean SQL fragment.
//! Compilation never fails: operator/value combinations that make no sense
//! degrade to "no predicate", "matches nothing" or "matches everything".
//!
//! Every user value reaches SQL through `SqlDialect::quoted_literal`, or as a
//! number re-rendered from a permissive parse.

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::config::FirstDayOfWeek;
use crate::core::constants::{NULL_SENTINEL, STATUSES_TABLE};
use crate::data::error::ResolutionError;
use crate::data::sql::SqlDialect;
use crate::utils::time::{beginning_of_day, clamp_to_four_digit_year, end_of_day};

use super::dates::{self, DateInterval};
use super::fields::FieldResolver;
use super::normalize::{float_literal, to_f, to_i};
use super::types::{CompiledPredicate, FieldKind, FilterOperator, FilterSpec, Join, ResolvedField};

/// Matches no rows
pub const MATCH_NOTHING: &str = "0=1";

/// Matches every row
pub const MATCH_EVERYTHING: &str = "1=1";

/// Compiles filter clauses for one request
///
/// Holds the request's notion of "today" and the week start so compilation
/// is a pure function of its inputs.
#[derive(Clone, Copy)]
pub struct PredicateCompiler {
    dialect: &'static dyn SqlDialect,
    today: NaiveDate,
    first_day_of_week: FirstDayOfWeek,
}

impl PredicateCompiler {
    pub fn new(
        dialect: &'static dyn SqlDialect,
        today: NaiveDate,
        first_day_of_week: FirstDayOfWeek,
    ) -> Self {
        Self {
            dialect,
            today,
            first_day_of_week,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve and compile a set of clauses
    ///
    /// The first unresolvable field aborts compilation.
    pub fn compile_all(
        &self,
        specs: &[FilterSpec],
        resolver: &dyn FieldResolver,
    ) -> Result<Vec<CompiledPredicate>, ResolutionError> {
        specs
            .iter()
            .map(|spec| {
                let field = resolver.resolve(spec.field())?;
                Ok(self.compile(spec, &field))
            })
            .collect()
    }

    /// Compile one clause against its resolved field
    pub fn compile(&self, spec: &FilterSpec, field: &ResolvedField) -> CompiledPredicate {
        let col = field.qualified();
        let dynamic = spec.is_dynamic_field() || field.is_custom();

        let sql = match spec.operator() {
            FilterOperator::Equals => self.equals(&col, spec.values()),
            FilterOperator::NotEquals => self.not_equals(&col, spec.values()),
            FilterOperator::IsBlank => {
                if dynamic {
                    format!("({} IS NULL OR {} = '')", col, col)
                } else {
                    format!("{} IS NULL", col)
                }
            }
            FilterOperator::IsPresent => {
                if dynamic {
                    format!("({} IS NOT NULL AND {} <> '')", col, col)
                } else {
                    format!("{} IS NOT NULL", col)
                }
            }
            FilterOperator::GreaterOrEqual => {
                self.numeric_comparison(&col, ">=", spec.first_value(), dynamic)
            }
            FilterOperator::LessOrEqual => {
                self.numeric_comparison(&col, "<=", spec.first_value(), dynamic)
            }
            FilterOperator::ClosedStatus => self.status_flag(field, true),
            FilterOperator::OpenStatus => self.status_flag(field, false),
            FilterOperator::DateThisWeek => self.week_clause(&col, field),
            FilterOperator::TextContains => self.contains(&col, "LIKE", spec.first_value()),
            FilterOperator::TextNotContains => {
                self.contains(&col, "NOT LIKE", spec.first_value())
            }
            op @ (FilterOperator::DateOnOrAfterRelative
            | FilterOperator::DateOnOrBeforeRelative
            | FilterOperator::DateExactlyRelative
            | FilterOperator::DateOnOrAfterFuture
            | FilterOperator::DateOnOrBeforeFuture
            | FilterOperator::DateExactlyFuture
            | FilterOperator::DateToday) => {
                let n = to_i(spec.first_value());
                match dates::relative_offsets(op, n) {
                    Some((from, to)) => {
                        let interval = dates::resolve(self.today, from, to);
                        self.date_range_clause(&col, field, &interval)
                    }
                    None => String::new(),
                }
            }
        };

        let mut predicate = CompiledPredicate::new(sql);
        if !predicate.is_empty() {
            if let Some(join) = field.required_join() {
                predicate = predicate.with_join(join);
            }
            if matches!(
                spec.operator(),
                FilterOperator::ClosedStatus | FilterOperator::OpenStatus
            ) {
                predicate = predicate.with_join(Join::Status);
            }
        }

        tracing::trace!(
            field = %spec.field(),
            operator = %spec.operator(),
            sql = %predicate.sql(),
            "Compiled filter"
        );
        predicate
    }

    fn quoted_list(&self, values: &[String]) -> String {
        values
            .iter()
            .map(|v| self.dialect.quoted_literal(v))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn equals(&self, col: &str, values: &[String]) -> String {
        if values.is_empty() {
            // Empty allow-list produces no results
            return MATCH_NOTHING.to_string();
        }
        let in_list = format!("{} IN ({})", col, self.quoted_list(values));
        if values.iter().any(|v| v == NULL_SENTINEL) {
            format!("({} IS NULL OR {})", col, in_list)
        } else {
            in_list
        }
    }

    fn not_equals(&self, col: &str, values: &[String]) -> String {
        if values.is_empty() {
            // Empty deny-list excludes nothing
            return MATCH_EVERYTHING.to_string();
        }
        format!(
            "({} IS NULL OR {} NOT IN ({}))",
            col,
            col,
            self.quoted_list(values)
        )
    }

    fn numeric_comparison(&self, col: &str, op: &str, value: &str, dynamic: bool) -> String {
        let threshold = float_literal(to_f(value));
        if dynamic {
            format!(
                "({} <> '' AND {} {} {})",
                col,
                self.dialect.cast_decimal(col),
                op,
                threshold
            )
        } else {
            format!("{} {} {}", col, op, threshold)
        }
    }

    fn status_flag(&self, field: &ResolvedField, closed: bool) -> String {
        if field.kind != FieldKind::Status {
            return String::new();
        }
        let flag = if closed {
            self.dialect.quoted_true()
        } else {
            self.dialect.quoted_false()
        };
        format!("{}.is_closed = {}", STATUSES_TABLE, flag)
    }

    fn contains(&self, col: &str, like: &str, value: &str) -> String {
        let pattern = format!("%{}%", value.to_lowercase());
        format!(
            "LOWER({}) {} {}",
            col,
            like,
            self.dialect.quoted_literal(&pattern)
        )
    }

    /// Date or timestamp literal for a bound, kept within four-digit years
    fn date_bound(
        &self,
        field: &ResolvedField,
        date: NaiveDate,
        at: fn(NaiveDate) -> NaiveDateTime,
    ) -> String {
        let date = clamp_to_four_digit_year(date);
        if field.is_date_only() {
            self.dialect.quoted_literal(&date.to_string())
        } else {
            self.dialect.quoted_timestamp(at(date))
        }
    }

    /// Lower bound: after the end of the day before `from`.
    /// Upper bound: up to the end of `to`.
    fn date_range_clause(&self, col: &str, field: &ResolvedField, interval: &DateInterval) -> String {
        let mut clauses = Vec::with_capacity(2);
        if let Some(from) = interval.from {
            let day_before = from.pred_opt().unwrap_or(NaiveDate::MIN);
            clauses.push(format!("{} > {}", col, self.date_bound(field, day_before, end_of_day)));
        }
        if let Some(to) = interval.to {
            clauses.push(format!("{} <= {}", col, self.date_bound(field, to, end_of_day)));
        }
        clauses.join(" AND ")
    }

    fn week_clause(&self, col: &str, field: &ResolvedField) -> String {
        let week = dates::week_interval(self.today, self.first_day_of_week);
        let (Some(from), Some(to)) = (week.from, week.to) else {
            return String::new();
        };
        format!(
            "{} BETWEEN {} AND {}",
            col,
            self.date_bound(field, from, beginning_of_day),
            self.date_bound(field, to, beginning_of_day)
        )
    }
}
