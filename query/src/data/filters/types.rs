//! Filter type definitions
//!
//! Defines the filter clause model (field, operator, values) and the
//! compiled predicate handed to the result aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::constants::{CUSTOM_VALUES_TABLE, STATUSES_TABLE, WORK_PACKAGES_TABLE};

use super::normalize::{RawValue, normalize};

// =============================================================================
// Operators
// =============================================================================

/// Filter operators
///
/// Serialized with the short codes used by the filter wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!")]
    NotEquals,
    #[serde(rename = "!*")]
    IsBlank,
    #[serde(rename = "*")]
    IsPresent,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "c")]
    ClosedStatus,
    #[serde(rename = "o")]
    OpenStatus,
    #[serde(rename = ">t-")]
    DateOnOrAfterRelative,
    #[serde(rename = "<t-")]
    DateOnOrBeforeRelative,
    #[serde(rename = "t-")]
    DateExactlyRelative,
    #[serde(rename = ">t+")]
    DateOnOrAfterFuture,
    #[serde(rename = "<t+")]
    DateOnOrBeforeFuture,
    #[serde(rename = "t+")]
    DateExactlyFuture,
    #[serde(rename = "t")]
    DateToday,
    #[serde(rename = "w")]
    DateThisWeek,
    #[serde(rename = "~")]
    TextContains,
    #[serde(rename = "!~")]
    TextNotContains,
}

/// How many values an operator reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
    Many,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 18] = [
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::IsBlank,
        FilterOperator::IsPresent,
        FilterOperator::GreaterOrEqual,
        FilterOperator::LessOrEqual,
        FilterOperator::ClosedStatus,
        FilterOperator::OpenStatus,
        FilterOperator::DateOnOrAfterRelative,
        FilterOperator::DateOnOrBeforeRelative,
        FilterOperator::DateExactlyRelative,
        FilterOperator::DateOnOrAfterFuture,
        FilterOperator::DateOnOrBeforeFuture,
        FilterOperator::DateExactlyFuture,
        FilterOperator::DateToday,
        FilterOperator::DateThisWeek,
        FilterOperator::TextContains,
        FilterOperator::TextNotContains,
    ];

    /// Wire code of the operator
    pub fn code(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "=",
            FilterOperator::NotEquals => "!",
            FilterOperator::IsBlank => "!*",
            FilterOperator::IsPresent => "*",
            FilterOperator::GreaterOrEqual => ">=",
            FilterOperator::LessOrEqual => "<=",
            FilterOperator::ClosedStatus => "c",
            FilterOperator::OpenStatus => "o",
            FilterOperator::DateOnOrAfterRelative => ">t-",
            FilterOperator::DateOnOrBeforeRelative => "<t-",
            FilterOperator::DateExactlyRelative => "t-",
            FilterOperator::DateOnOrAfterFuture => ">t+",
            FilterOperator::DateOnOrBeforeFuture => "<t+",
            FilterOperator::DateExactlyFuture => "t+",
            FilterOperator::DateToday => "t",
            FilterOperator::DateThisWeek => "w",
            FilterOperator::TextContains => "~",
            FilterOperator::TextNotContains => "!~",
        }
    }

    /// Look up an operator by wire code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    pub fn arity(&self) -> Arity {
        match self {
            FilterOperator::Equals | FilterOperator::NotEquals => Arity::Many,
            FilterOperator::IsBlank
            | FilterOperator::IsPresent
            | FilterOperator::ClosedStatus
            | FilterOperator::OpenStatus
            | FilterOperator::DateToday
            | FilterOperator::DateThisWeek => Arity::None,
            FilterOperator::GreaterOrEqual
            | FilterOperator::LessOrEqual
            | FilterOperator::DateOnOrAfterRelative
            | FilterOperator::DateOnOrBeforeRelative
            | FilterOperator::DateExactlyRelative
            | FilterOperator::DateOnOrAfterFuture
            | FilterOperator::DateOnOrBeforeFuture
            | FilterOperator::DateExactlyFuture
            | FilterOperator::TextContains
            | FilterOperator::TextNotContains => Arity::One,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// =============================================================================
// Field references
// =============================================================================

/// Reference to a filterable field, resolved to a column by a `FieldResolver`
///
/// The wire key `cf_<id>` denotes a custom field; anything else is a plain
/// attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldRef {
    Attribute(String),
    Custom(i64),
}

impl FieldRef {
    pub fn attribute(name: impl Into<String>) -> Self {
        FieldRef::Attribute(name.into())
    }

    pub fn parse(key: &str) -> Self {
        match key.strip_prefix("cf_").and_then(|id| id.parse::<i64>().ok()) {
            Some(id) => FieldRef::Custom(id),
            None => FieldRef::Attribute(key.to_string()),
        }
    }

    pub fn key(&self) -> String {
        match self {
            FieldRef::Attribute(name) => name.clone(),
            FieldRef::Custom(id) => format!("cf_{}", id),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, FieldRef::Custom(_))
    }
}

impl From<String> for FieldRef {
    fn from(key: String) -> Self {
        FieldRef::parse(&key)
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        field.key()
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Logical type of a plain attribute column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Integer,
    Float,
    Text,
    Date,
    DateTime,
}

/// Declared format of a custom field (values are always stored as text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldFormat {
    String,
    Text,
    Int,
    Float,
    Date,
    Bool,
    List,
    User,
    Version,
}

impl CustomFieldFormat {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "string" => Some(Self::String),
            "text" => Some(Self::Text),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "date" => Some(Self::Date),
            "bool" => Some(Self::Bool),
            "list" => Some(Self::List),
            "user" => Some(Self::User),
            "version" => Some(Self::Version),
            _ => None,
        }
    }

    /// Formats whose stored text is an integer id or number
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int | Self::User | Self::Version)
    }
}

/// What kind of column a field resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Attribute(AttributeType),
    /// The status foreign key; enables the open/closed operators
    Status,
    Custom {
        id: i64,
        format: CustomFieldFormat,
    },
}

/// A field mapped to a concrete `table.column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub table: String,
    pub column: String,
    pub kind: FieldKind,
}

impl ResolvedField {
    pub fn attribute(column: &str, ty: AttributeType) -> Self {
        Self {
            table: WORK_PACKAGES_TABLE.to_string(),
            column: column.to_string(),
            kind: FieldKind::Attribute(ty),
        }
    }

    pub fn status() -> Self {
        Self {
            table: WORK_PACKAGES_TABLE.to_string(),
            column: "status_id".to_string(),
            kind: FieldKind::Status,
        }
    }

    pub fn custom(id: i64, format: CustomFieldFormat) -> Self {
        Self {
            table: Join::CustomValue(id).alias(),
            column: "value".to_string(),
            kind: FieldKind::Custom { id, format },
        }
    }

    /// `table.column`
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, FieldKind::Custom { .. })
    }

    /// Whether values are calendar days rather than timestamps
    pub fn is_date_only(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Attribute(AttributeType::Date)
                | FieldKind::Custom {
                    format: CustomFieldFormat::Date,
                    ..
                }
        )
    }

    /// Whether group keys of this field decode as integers
    pub fn is_integer(&self) -> bool {
        match self.kind {
            FieldKind::Attribute(ty) => ty == AttributeType::Integer,
            FieldKind::Status => true,
            FieldKind::Custom { format, .. } => format.is_integer(),
        }
    }

    /// Joins needed for the column to be addressable
    pub fn required_join(&self) -> Option<Join> {
        match self.kind {
            FieldKind::Custom { id, .. } => Some(Join::CustomValue(id)),
            FieldKind::Attribute(_) | FieldKind::Status => None,
        }
    }
}

// =============================================================================
// Filter clause
// =============================================================================

/// One filter clause; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    field: FieldRef,
    operator: FilterOperator,
    values: Vec<String>,
    is_dynamic_field: bool,
}

impl FilterSpec {
    /// Build a clause, normalizing every value to its canonical string form
    pub fn new<I, V>(field: FieldRef, operator: FilterOperator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        let is_dynamic_field = field.is_custom();
        Self {
            field,
            operator,
            values: values.into_iter().map(normalize).collect(),
            is_dynamic_field,
        }
    }

    /// Clause without values (blank/present, status, today, this week)
    pub fn unary(field: FieldRef, operator: FilterOperator) -> Self {
        Self::new(field, operator, Vec::<String>::new())
    }

    /// Mark the field as dynamic (blank stored as empty text)
    pub fn dynamic(mut self, is_dynamic_field: bool) -> Self {
        self.is_dynamic_field = is_dynamic_field || self.field.is_custom();
        self
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_dynamic_field(&self) -> bool {
        self.is_dynamic_field
    }

    /// First value, or the empty string when there is none
    pub fn first_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

// =============================================================================
// Compiled output
// =============================================================================

/// Extra join a predicate needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Join {
    /// Status row of the record (closed flag)
    Status,
    /// Left join of one custom field's value row, aliased `cv_<id>`
    CustomValue(i64),
}

impl Join {
    pub fn alias(&self) -> String {
        match self {
            Join::Status => STATUSES_TABLE.to_string(),
            Join::CustomValue(id) => format!("cv_{}", id),
        }
    }

    /// Left join keeps one row per record even when the joined row is missing
    pub fn to_sql(&self) -> String {
        match self {
            Join::Status => format!(
                "LEFT OUTER JOIN {s} ON {s}.id = {wp}.status_id",
                s = STATUSES_TABLE,
                wp = WORK_PACKAGES_TABLE
            ),
            Join::CustomValue(id) => format!(
                "LEFT OUTER JOIN {cv} {alias} ON {alias}.customized_id = {wp}.id AND {alias}.custom_field_id = {id}",
                cv = CUSTOM_VALUES_TABLE,
                alias = self.alias(),
                wp = WORK_PACKAGES_TABLE,
                id = id
            ),
        }
    }
}

/// Boolean SQL fragment plus the joins it requires
///
/// An empty fragment means "no constraint" and is skipped by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledPredicate {
    sql: String,
    joins: Vec<Join>,
}

impl CompiledPredicate {
    pub(crate) fn new(sql: String) -> Self {
        Self {
            sql,
            joins: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_join(mut self, join: Join) -> Self {
        if !self.joins.contains(&join) {
            self.joins.push(join);
        }
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}
