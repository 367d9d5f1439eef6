//! SQLite schema definitions
//!
//! Tables read by the query core. Dates are stored as `YYYY-MM-DD` text and
//! timestamps as `YYYY-MM-DD HH:MM:SS` text, so range predicates compare
//! lexicographically.

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- 1. Projects and users
-- =============================================================================
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    parent_id INTEGER REFERENCES projects(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    login TEXT NOT NULL UNIQUE,
    firstname TEXT,
    lastname TEXT
);

-- =============================================================================
-- 2. Roles and memberships (assignee role filter, visibility)
-- =============================================================================
CREATE TABLE IF NOT EXISTS roles (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    UNIQUE (user_id, project_id)
);

CREATE INDEX IF NOT EXISTS idx_members_project ON members(project_id);

CREATE TABLE IF NOT EXISTS member_roles (
    id INTEGER PRIMARY KEY,
    member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_member_roles_role ON member_roles(role_id);

-- =============================================================================
-- 3. Statuses
-- =============================================================================
CREATE TABLE IF NOT EXISTS statuses (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    is_closed INTEGER NOT NULL DEFAULT 0,
    position INTEGER
);

-- =============================================================================
-- 4. Work packages
-- =============================================================================
CREATE TABLE IF NOT EXISTS work_packages (
    id INTEGER PRIMARY KEY,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    subject TEXT NOT NULL,
    status_id INTEGER REFERENCES statuses(id),
    type_id INTEGER,
    priority_id INTEGER,
    assigned_to_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    responsible_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    done_ratio INTEGER NOT NULL DEFAULT 0,
    estimated_hours REAL,
    start_date TEXT,
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    root_id INTEGER,
    lft INTEGER
);

CREATE INDEX IF NOT EXISTS idx_work_packages_project ON work_packages(project_id);
CREATE INDEX IF NOT EXISTS idx_work_packages_status ON work_packages(status_id);
CREATE INDEX IF NOT EXISTS idx_work_packages_assigned ON work_packages(assigned_to_id);

-- =============================================================================
-- 5. Custom fields (values stored as text, one row per record and field)
-- =============================================================================
CREATE TABLE IF NOT EXISTS custom_fields (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    field_format TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS custom_values (
    id INTEGER PRIMARY KEY,
    customized_id INTEGER NOT NULL REFERENCES work_packages(id) ON DELETE CASCADE,
    custom_field_id INTEGER NOT NULL REFERENCES custom_fields(id) ON DELETE CASCADE,
    value TEXT,
    UNIQUE (customized_id, custom_field_id)
);
"#;
