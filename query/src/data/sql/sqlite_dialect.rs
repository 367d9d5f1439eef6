//! SQLite SQL dialect implementation

use super::SqlDialect;
use super::dialect::order_by_with_case;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quoted_true(&self) -> &'static str {
        // SQLite stores booleans as integers
        "1"
    }

    fn quoted_false(&self) -> &'static str {
        "0"
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("CAST({} AS TEXT)", col)
    }

    fn order_by_with_nulls(&self, col: &str, desc: bool, nulls_last: bool) -> String {
        // SQLite doesn't support NULLS FIRST/LAST, emulate with CASE
        order_by_with_case(col, desc, nulls_last)
    }
}
