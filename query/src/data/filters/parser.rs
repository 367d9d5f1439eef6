//! Filter parsing
//!
//! Parses JSON filter definitions into `FilterSpec`s with size validation.
//!
//! Wire form:
//!
//! ```json
//! [{"field": "status_id", "operator": "=", "values": ["1", 2]},
//!  {"field": "cf_4", "operator": "!*", "dynamic": true}]
//! ```

use serde::Deserialize;

use crate::core::constants::{MAX_FILTERS, MAX_FILTER_JSON_SIZE};
use crate::data::error::QueryError;

use super::normalize::RawValue;
use super::types::{FieldRef, FilterOperator, FilterSpec};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<WireValue> for RawValue {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Int(v) => RawValue::Int(v),
            WireValue::Float(v) => RawValue::Float(v),
            WireValue::Text(v) => RawValue::Text(v),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireFilter {
    field: FieldRef,
    operator: String,
    #[serde(default)]
    values: Vec<WireValue>,
    #[serde(default, alias = "is_dynamic_field")]
    dynamic: bool,
}

/// Parse filters from JSON
///
/// Clauses with an unknown operator code are skipped. Field names are not
/// checked here; unknown fields fail later at resolution.
pub fn parse_filters(json_str: &str) -> Result<Vec<FilterSpec>, QueryError> {
    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(QueryError::invalid_filter(
            "FILTER_JSON_TOO_LARGE",
            format!(
                "Filter JSON exceeds maximum size of {} bytes",
                MAX_FILTER_JSON_SIZE
            ),
        ));
    }

    let filters: Vec<WireFilter> = serde_json::from_str(json_str)
        .map_err(|e| QueryError::invalid_filter("INVALID_FILTER_JSON", e.to_string()))?;

    if filters.len() > MAX_FILTERS {
        return Err(QueryError::invalid_filter(
            "TOO_MANY_FILTERS",
            format!("Maximum {} filters allowed", MAX_FILTERS),
        ));
    }

    let specs = filters
        .into_iter()
        .filter_map(|filter| match FilterOperator::from_code(&filter.operator) {
            Some(operator) => {
                Some(FilterSpec::new(filter.field, operator, filter.values).dynamic(filter.dynamic))
            }
            None => {
                tracing::warn!(
                    field = %filter.field,
                    operator = %filter.operator,
                    "Ignoring filter with unknown operator"
                );
                None
            }
        })
        .collect();

    Ok(specs)
}
