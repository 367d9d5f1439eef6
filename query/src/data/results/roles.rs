//! Role membership lookup for the assigned-to-role filter

use sqlx::SqlitePool;

use crate::data::filters::normalize::to_i;

/// Users holding any of the given roles, optionally within one project
///
/// Role ids are filter values and read permissively; the ids are bound as
/// parameters. Returns user ids in ascending order without duplicates.
pub async fn members_with_roles(
    pool: &SqlitePool,
    role_ids: &[String],
    project_id: Option<i64>,
) -> Result<Vec<i64>, sqlx::Error> {
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; role_ids.len()].join(", ");
    let mut sql = format!(
        "SELECT DISTINCT members.user_id FROM members \
         JOIN member_roles ON member_roles.member_id = members.id \
         WHERE member_roles.role_id IN ({})",
        placeholders
    );
    if project_id.is_some() {
        sql.push_str(" AND members.project_id = ?");
    }
    sql.push_str(" ORDER BY members.user_id");

    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    for role_id in role_ids {
        query = query.bind(to_i(role_id));
    }
    if let Some(project_id) = project_id {
        query = query.bind(project_id);
    }

    let rows = query.fetch_all(pool).await?;
    tracing::trace!(roles = role_ids.len(), users = rows.len(), "Resolved role members");
    Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
}
