//! PostgreSQL SQL dialect implementation

use super::SqlDialect;

/// PostgreSQL SQL dialect (standard conforming strings)
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quoted_true(&self) -> &'static str {
        "TRUE"
    }

    fn quoted_false(&self) -> &'static str {
        "FALSE"
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("{}::TEXT", col)
    }

    fn order_by_with_nulls(&self, col: &str, desc: bool, nulls_last: bool) -> String {
        let dir = if desc { "DESC" } else { "ASC" };
        let nulls = if nulls_last {
            "NULLS LAST"
        } else {
            "NULLS FIRST"
        };
        format!("{} {} {}", col, dir, nulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_string() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.quoted_literal(r"a'b\c"), r"'a''b\c'");
    }

    #[test]
    fn test_booleans() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.quoted_true(), "TRUE");
        assert_eq!(dialect.quoted_false(), "FALSE");
    }

    #[test]
    fn test_cast_to_string() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.cast_to_string("status_id"), "status_id::TEXT");
    }

    #[test]
    fn test_order_by_with_nulls() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.order_by_with_nulls("due_date", false, true),
            "due_date ASC NULLS LAST"
        );
    }
}
