//! Result aggregation
//!
//! Executes compiled predicates against the store. The visibility scope is
//! AND-ed into every statement; there is no code path that omits it.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::config::QueryConfig;
use crate::core::constants::{ASSIGNED_TO_ROLE_FIELD, WORK_PACKAGES_TABLE};
use crate::data::error::QueryError;
use crate::data::filters::{
    AttributeType, CompiledPredicate, FieldRef, FieldResolver, FilterOperator, FilterSpec, Join,
    PredicateCompiler, ResolvedField,
};
use crate::data::sql::{Backend, SqlDialect};
use crate::data::types::{WORK_PACKAGE_COLUMNS, WorkPackageRow, WorkPackageTuple};
use crate::utils::time::{Clock, SystemClock};

use super::group::{GroupCount, GroupKey};
use super::query::{Page, Pagination, ResultQuery};
use super::roles::members_with_roles;

/// WHERE clause of a result query plus the joins it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub sql: String,
    pub joins: Vec<Join>,
}

impl WhereClause {
    fn add_join(&mut self, join: Join) {
        if !self.joins.contains(&join) {
            self.joins.push(join);
        }
    }

    /// `FROM work_packages` with every join rendered
    pub fn from_sql(&self) -> String {
        let mut sql = format!("FROM {}", WORK_PACKAGES_TABLE);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }
        sql
    }
}

/// Runs result queries over the work package store
pub struct Aggregator<R: FieldResolver> {
    pool: SqlitePool,
    resolver: R,
    clock: Arc<dyn Clock>,
    config: QueryConfig,
}

impl<R: FieldResolver> Aggregator<R> {
    pub fn new(pool: SqlitePool, resolver: R, config: QueryConfig) -> Self {
        Self {
            pool,
            resolver,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        Backend::Sqlite.dialect()
    }

    fn compiler(&self) -> PredicateCompiler {
        PredicateCompiler::new(
            self.dialect(),
            self.clock.today(),
            self.config.first_day_of_week,
        )
    }

    /// Build the WHERE clause: visibility, project restriction, then filters
    ///
    /// Fails on the first filter whose field cannot be resolved.
    pub async fn build_where(&self, query: &ResultQuery) -> Result<WhereClause, QueryError> {
        let compiler = self.compiler();
        let mut clause = WhereClause {
            sql: String::new(),
            joins: Vec::new(),
        };
        let mut parts = vec![query.visibility().sql().to_string()];

        if let Some(project_id) = query.project_id() {
            parts.push(format!("{}.project_id = {}", WORK_PACKAGES_TABLE, project_id));
        }

        for spec in query.filter_specs() {
            let predicate = if is_role_filter(spec) {
                self.role_predicate(&compiler, spec, query.project_id())
                    .await?
            } else {
                let field = self.resolver.resolve(spec.field())?;
                compiler.compile(spec, &field)
            };

            if predicate.is_empty() {
                continue;
            }
            for join in predicate.joins() {
                clause.add_join(*join);
            }
            parts.push(predicate.sql().to_string());
        }

        clause.sql = parts
            .iter()
            .map(|part| format!("({})", part))
            .collect::<Vec<_>>()
            .join(" AND ");

        tracing::debug!(
            filters = query.filter_specs().len(),
            joins = clause.joins.len(),
            project_id = ?query.project_id(),
            "Built result query"
        );
        Ok(clause)
    }

    /// Assigned-to-role: membership is looked up first, then matched on the assignee
    async fn role_predicate(
        &self,
        compiler: &PredicateCompiler,
        spec: &FilterSpec,
        project_id: Option<i64>,
    ) -> Result<CompiledPredicate, QueryError> {
        let operator = spec.operator();
        if !matches!(operator, FilterOperator::Equals | FilterOperator::NotEquals) {
            return Ok(CompiledPredicate::empty());
        }

        let user_ids = members_with_roles(&self.pool, spec.values(), project_id).await?;
        let assignee = FilterSpec::new(FieldRef::attribute("assigned_to_id"), operator, user_ids);
        let field = ResolvedField::attribute("assigned_to_id", AttributeType::Integer);
        Ok(compiler.compile(&assignee, &field))
    }

    /// Number of matching records
    pub async fn count(&self, query: &ResultQuery) -> Result<u64, QueryError> {
        let clause = self.build_where(query).await?;
        self.count_where(&clause).await
    }

    async fn count_where(&self, clause: &WhereClause) -> Result<u64, QueryError> {
        let sql = format!(
            "SELECT COUNT(DISTINCT {}.id) {} WHERE {}",
            WORK_PACKAGES_TABLE,
            clause.from_sql(),
            clause.sql
        );
        tracing::trace!(%sql, "Counting work packages");

        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// One page of matching records in a deterministic order
    pub async fn work_packages(
        &self,
        query: &ResultQuery,
        pagination: Pagination,
    ) -> Result<Page<WorkPackageRow>, QueryError> {
        let mut clause = self.build_where(query).await?;
        let order = self.order_clause(query, &mut clause)?;
        let total = self.count_where(&clause).await?;

        let (page, per_page) = pagination.effective(&self.config);
        let (limit, offset) = pagination.limit_offset(&self.config);

        let sql = format!(
            "SELECT {} {} WHERE {} ORDER BY {} {}",
            WORK_PACKAGE_COLUMNS,
            clause.from_sql(),
            clause.sql,
            order,
            self.dialect().limit_offset(limit, offset)
        );
        tracing::trace!(%sql, "Fetching work packages");

        let rows: Vec<WorkPackageTuple> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        tracing::debug!(page, per_page, total, returned = rows.len(), "Fetched result page");

        Ok(Page {
            items: rows.into_iter().map(WorkPackageRow::from).collect(),
            total,
            page,
            per_page,
        })
    }

    /// ORDER BY terms; `work_packages.id` always ends the list
    fn order_clause(
        &self,
        query: &ResultQuery,
        clause: &mut WhereClause,
    ) -> Result<String, QueryError> {
        let id_column = format!("{}.id", WORK_PACKAGES_TABLE);
        if query.sort_keys().is_empty() {
            return Ok(format!("{} DESC", id_column));
        }

        let mut terms = Vec::with_capacity(query.sort_keys().len() + 1);
        let mut has_id = false;
        for key in query.sort_keys() {
            let field = self.resolver.resolve_sortable(&key.field)?;
            if let Some(join) = field.required_join() {
                clause.add_join(join);
            }
            let column = field.qualified();
            if column == id_column {
                has_id = true;
                terms.push(format!(
                    "{} {}",
                    column,
                    if key.descending { "DESC" } else { "ASC" }
                ));
            } else {
                terms.push(
                    self.dialect()
                        .order_by_with_nulls(&column, key.descending, true),
                );
            }
        }
        if !has_id {
            terms.push(format!("{} ASC", id_column));
        }
        Ok(terms.join(", "))
    }

    /// Matching records counted per value of `dimension`
    ///
    /// Records without a value are counted under `GroupKey::Null`, so the
    /// counts always sum to `count(query)`.
    pub async fn count_by_group(
        &self,
        query: &ResultQuery,
        dimension: &FieldRef,
    ) -> Result<GroupCount, QueryError> {
        let field = self.resolver.resolve(dimension)?;
        let mut clause = self.build_where(query).await?;
        if let Some(join) = field.required_join() {
            clause.add_join(join);
        }

        let column = field.qualified();
        let sql = format!(
            "SELECT {} AS group_key, COUNT(DISTINCT {}.id) {} WHERE {} GROUP BY {}",
            self.dialect().cast_to_string(&column),
            WORK_PACKAGES_TABLE,
            clause.from_sql(),
            clause.sql,
            column
        );
        tracing::trace!(%sql, "Counting work packages by group");

        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let mut counts = GroupCount::new();
        for (raw, count) in rows {
            // Blank custom values group with missing ones
            let raw = raw.filter(|value| !(field.is_custom() && value.is_empty()));
            *counts.entry(GroupKey::decode(raw, &field)).or_insert(0) +=
                u64::try_from(count).unwrap_or(0);
        }

        tracing::debug!(dimension = %dimension, groups = counts.len(), "Counted by group");
        Ok(counts)
    }
}

fn is_role_filter(spec: &FilterSpec) -> bool {
    matches!(spec.field(), FieldRef::Attribute(name) if name == ASSIGNED_TO_ROLE_FIELD)
}
