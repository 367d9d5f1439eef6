//! MySQL SQL dialect implementation

use super::SqlDialect;
use super::dialect::order_by_with_case;

/// MySQL SQL dialect
///
/// MySQL treats backslash as an escape character inside string literals
/// (unless NO_BACKSLASH_ESCAPES is set), so backslashes are doubled too.
pub struct MysqlDialect;

impl SqlDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_string(&self, value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "''")
    }

    fn quoted_true(&self) -> &'static str {
        "1"
    }

    fn quoted_false(&self) -> &'static str {
        "0"
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("CAST({} AS CHAR)", col)
    }

    fn order_by_with_nulls(&self, col: &str, desc: bool, nulls_last: bool) -> String {
        order_by_with_case(col, desc, nulls_last)
    }
}
