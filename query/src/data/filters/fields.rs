//! Field resolution
//!
//! Maps `FieldRef`s to concrete columns. Unknown fields are an error.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::data::error::{QueryError, ResolutionError};

use super::types::{AttributeType, CustomFieldFormat, FieldRef, ResolvedField};

/// Resolves field references to columns (external collaborator seam)
pub trait FieldResolver: Send + Sync {
    fn resolve(&self, field: &FieldRef) -> Result<ResolvedField, ResolutionError>;

    /// Resolve a field used as a sort key
    fn resolve_sortable(&self, field: &FieldRef) -> Result<ResolvedField, ResolutionError> {
        self.resolve(field)
    }
}

/// Column whitelists for work packages
pub mod columns {
    use super::AttributeType;

    pub const FILTERABLE: &[(&str, AttributeType)] = &[
        ("id", AttributeType::Integer),
        ("project_id", AttributeType::Integer),
        ("subject", AttributeType::Text),
        ("status_id", AttributeType::Integer),
        ("type_id", AttributeType::Integer),
        ("priority_id", AttributeType::Integer),
        ("assigned_to_id", AttributeType::Integer),
        ("responsible_id", AttributeType::Integer),
        ("done_ratio", AttributeType::Integer),
        ("estimated_hours", AttributeType::Float),
        ("start_date", AttributeType::Date),
        ("due_date", AttributeType::Date),
        ("created_at", AttributeType::DateTime),
        ("updated_at", AttributeType::DateTime),
    ];

    pub const SORTABLE: &[&str] = &[
        "id",
        "subject",
        "status_id",
        "priority_id",
        "assigned_to_id",
        "responsible_id",
        "done_ratio",
        "estimated_hours",
        "start_date",
        "due_date",
        "created_at",
        "updated_at",
        "root_id",
        "lft",
    ];

    pub fn attribute_type(name: &str) -> Option<AttributeType> {
        FILTERABLE
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, ty)| *ty)
    }
}

/// Default resolver for the work package table and its custom fields
#[derive(Debug, Clone, Default)]
pub struct WorkPackageFields {
    custom_fields: HashMap<i64, CustomFieldFormat>,
}

impl WorkPackageFields {
    pub fn new(custom_fields: impl IntoIterator<Item = (i64, CustomFieldFormat)>) -> Self {
        Self {
            custom_fields: custom_fields.into_iter().collect(),
        }
    }

    /// Load custom field definitions from the store
    ///
    /// Fields with an unrecognized format are skipped (and therefore fail to
    /// resolve) rather than guessed.
    pub async fn load(pool: &SqlitePool) -> Result<Self, QueryError> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, field_format FROM custom_fields ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        let mut custom_fields = HashMap::with_capacity(rows.len());
        for (id, format) in rows {
            match CustomFieldFormat::from_code(&format) {
                Some(format) => {
                    custom_fields.insert(id, format);
                }
                None => tracing::warn!(id, %format, "Unsupported custom field format"),
            }
        }

        tracing::debug!(count = custom_fields.len(), "Loaded custom field definitions");
        Ok(Self { custom_fields })
    }

    pub fn with_custom_field(mut self, id: i64, format: CustomFieldFormat) -> Self {
        self.custom_fields.insert(id, format);
        self
    }
}

impl FieldResolver for WorkPackageFields {
    fn resolve(&self, field: &FieldRef) -> Result<ResolvedField, ResolutionError> {
        match field {
            FieldRef::Custom(id) => self
                .custom_fields
                .get(id)
                .map(|format| ResolvedField::custom(*id, *format))
                .ok_or(ResolutionError::UnknownCustomField(*id)),
            FieldRef::Attribute(name) if name == "status_id" => Ok(ResolvedField::status()),
            FieldRef::Attribute(name) => columns::attribute_type(name)
                .map(|ty| ResolvedField::attribute(name, ty))
                .ok_or_else(|| ResolutionError::UnknownField(name.clone())),
        }
    }

    fn resolve_sortable(&self, field: &FieldRef) -> Result<ResolvedField, ResolutionError> {
        match field {
            FieldRef::Custom(_) => self.resolve(field),
            FieldRef::Attribute(name) if columns::SORTABLE.contains(&name.as_str()) => {
                let ty = columns::attribute_type(name).unwrap_or(AttributeType::Integer);
                Ok(ResolvedField::attribute(name, ty))
            }
            FieldRef::Attribute(name) => Err(ResolutionError::UnsortableField(name.clone())),
        }
    }
}
