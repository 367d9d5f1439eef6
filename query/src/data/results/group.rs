//! Group keys for grouped counts

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::filters::ResolvedField;

/// Value of the grouping dimension for one group
///
/// `Null` collects records without a value and sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Null,
    Int(i64),
    Text(String),
}

impl GroupKey {
    /// Decode a key read as text from the store
    ///
    /// Integer-typed dimensions decode to `Int` when the text parses; custom
    /// values that do not parse stay `Text` rather than merging into another key.
    pub fn decode(raw: Option<String>, field: &ResolvedField) -> Self {
        match raw {
            None => GroupKey::Null,
            Some(text) if field.is_integer() => match text.trim().parse::<i64>() {
                Ok(v) => GroupKey::Int(v),
                Err(_) => GroupKey::Text(text),
            },
            Some(text) => GroupKey::Text(text),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Null => write!(f, "null"),
            GroupKey::Int(v) => write!(f, "{}", v),
            GroupKey::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Record count per group key
pub type GroupCount = BTreeMap<GroupKey, u64>;
