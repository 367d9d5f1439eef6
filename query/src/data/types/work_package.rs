use serde::{Deserialize, Serialize};

/// Columns selected for result pages, in select order
pub(crate) const WORK_PACKAGE_COLUMNS: &str = "work_packages.id, work_packages.project_id, \
     work_packages.subject, work_packages.status_id, work_packages.assigned_to_id, \
     work_packages.responsible_id, work_packages.start_date, work_packages.due_date, \
     work_packages.created_at, work_packages.updated_at, work_packages.root_id, work_packages.lft";

/// Tuple shape of `WORK_PACKAGE_COLUMNS`
pub(crate) type WorkPackageTuple = (
    i64,
    i64,
    String,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    Option<String>,
    String,
    String,
    Option<i64>,
    Option<i64>,
);

/// Work package row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPackageRow {
    pub id: i64,
    pub project_id: i64,
    pub subject: String,
    pub status_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    pub responsible_id: Option<i64>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub root_id: Option<i64>,
    pub lft: Option<i64>,
}

impl From<WorkPackageTuple> for WorkPackageRow {
    fn from(
        (
            id,
            project_id,
            subject,
            status_id,
            assigned_to_id,
            responsible_id,
            start_date,
            due_date,
            created_at,
            updated_at,
            root_id,
            lft,
        ): WorkPackageTuple,
    ) -> Self {
        Self {
            id,
            project_id,
            subject,
            status_id,
            assigned_to_id,
            responsible_id,
            start_date,
            due_date,
            created_at,
            updated_at,
            root_id,
            lft,
        }
    }
}
