//! Query description types
//!
//! A `ResultQuery` is built per request: filter clauses, an optional project
//! restriction, the actor's visibility scope and the sort order.

use serde::Serialize;

use crate::core::config::QueryConfig;
use crate::data::filters::{FieldRef, FilterSpec};

use super::visibility::{VisibilityScope, VisibilityScopeProvider};

/// One ORDER BY key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: FieldRef,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: FieldRef) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: FieldRef) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// Filters, scope and order of one result request
#[derive(Debug, Clone)]
pub struct ResultQuery {
    filters: Vec<FilterSpec>,
    project_id: Option<i64>,
    visibility: VisibilityScope,
    order: Vec<SortKey>,
}

impl ResultQuery {
    /// Visibility is mandatory; there is no constructor without it
    pub fn new(visibility: &dyn VisibilityScopeProvider) -> Self {
        Self {
            filters: Vec::new(),
            project_id: None,
            visibility: visibility.visibility_scope(),
            order: Vec::new(),
        }
    }

    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    pub fn filters(mut self, specs: impl IntoIterator<Item = FilterSpec>) -> Self {
        self.filters.extend(specs);
        self
    }

    pub fn project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn order_by(mut self, key: SortKey) -> Self {
        self.order.push(key);
        self
    }

    pub fn filter_specs(&self) -> &[FilterSpec] {
        &self.filters
    }

    pub fn project_id(&self) -> Option<i64> {
        self.project_id
    }

    pub fn visibility(&self) -> &VisibilityScope {
        &self.visibility
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.order
    }
}

/// Offset pagination request (pages are 1-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: Some(per_page),
        }
    }

    /// Effective `(page, per_page)` after applying defaults and clamping
    pub fn effective(&self, config: &QueryConfig) -> (u32, u32) {
        let page = self.page.max(1);
        let per_page = self
            .per_page
            .unwrap_or(config.default_per_page)
            .clamp(1, config.max_per_page.max(1));
        (page, per_page)
    }

    /// `(limit, offset)` for the SQL clause
    pub fn limit_offset(&self, config: &QueryConfig) -> (u32, u32) {
        let (page, per_page) = self.effective(config);
        (per_page, (page - 1).saturating_mul(per_page))
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }
}
