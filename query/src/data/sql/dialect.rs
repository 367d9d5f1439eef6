//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

use chrono::NaiveDateTime;

use crate::core::constants::DECIMAL_CAST_TYPE;

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different rules for:
/// - Escaping string literals
/// - Boolean literals
/// - Casting text to numbers
/// - NULL ordering
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Escape the content of a string literal (without surrounding quotes)
    ///
    /// The default doubles single quotes, which is the ANSI rule used by
    /// SQLite and PostgreSQL with standard conforming strings.
    fn quote_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// Escape a value and wrap it in single quotes
    ///
    /// This is the only way a user-supplied value may enter compiled SQL.
    fn quoted_literal(&self, value: &str) -> String {
        format!("'{}'", self.quote_string(value))
    }

    /// Quote a timestamp as a literal comparable with stored date/time text
    ///
    /// Format: `YYYY-MM-DD HH:MM:SS.ffffff`
    fn quoted_timestamp(&self, ts: NaiveDateTime) -> String {
        self.quoted_literal(&ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
    }

    /// Boolean TRUE literal
    fn quoted_true(&self) -> &'static str;

    /// Boolean FALSE literal
    fn quoted_false(&self) -> &'static str;

    /// Cast a text column to a fixed-precision decimal
    ///
    /// - Default: `CAST(col AS DECIMAL(60,4))`
    fn cast_decimal(&self, col: &str) -> String {
        format!("CAST({} AS {})", col, DECIMAL_CAST_TYPE)
    }

    /// Cast a column to string type
    ///
    /// - SQLite: `CAST(col AS TEXT)`
    /// - PostgreSQL: `col::TEXT`
    /// - MySQL: `CAST(col AS CHAR)`
    fn cast_to_string(&self, col: &str) -> String;

    /// Generate LIMIT/OFFSET clause
    fn limit_offset(&self, limit: u32, offset: u32) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }

    /// Generate ORDER BY term with NULL handling
    ///
    /// - Most: `col DESC NULLS LAST`
    /// - SQLite/MySQL: emulated with a CASE prefix
    fn order_by_with_nulls(&self, col: &str, desc: bool, nulls_last: bool) -> String;
}

/// ORDER BY term emulating NULLS FIRST/LAST with a CASE prefix
pub(super) fn order_by_with_case(col: &str, desc: bool, nulls_last: bool) -> String {
    let dir = if desc { "DESC" } else { "ASC" };
    let (null_rank, value_rank) = if nulls_last { (1, 0) } else { (0, 1) };
    format!(
        "CASE WHEN {} IS NULL THEN {} ELSE {} END, {} {}",
        col, null_rank, value_rank, col, dir
    )
}
