// =============================================================================
// Application Identity
// =============================================================================

/// Crate name in lowercase (for log filters and identifiers)
pub const APP_NAME_LOWER: &str = "workpack_query";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log filter (falls back to RUST_LOG)
pub const ENV_LOG: &str = "WORKPACK_LOG";

/// Environment variable for the first day of the week (`monday`/`sunday`/`1`/`7`)
pub const ENV_FIRST_DAY_OF_WEEK: &str = "WORKPACK_FIRST_DAY_OF_WEEK";

/// Environment variable for the default page size
pub const ENV_PER_PAGE: &str = "WORKPACK_PER_PAGE";

/// Environment variable for the maximum page size
pub const ENV_MAX_PER_PAGE: &str = "WORKPACK_MAX_PER_PAGE";

// =============================================================================
// Pagination
// =============================================================================

/// Default number of records per page
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Upper bound for records per page
pub const DEFAULT_MAX_PER_PAGE: u32 = 500;

/// Page sizes above this trigger a configuration warning
pub const LARGE_PAGE_WARN_THRESHOLD: u32 = 5_000;

// =============================================================================
// Filters
// =============================================================================

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filter clauses per query
pub const MAX_FILTERS: usize = 50;

/// Sentinel value meaning "unset" in equality filters
pub const NULL_SENTINEL: &str = "-1";

/// Precision used when casting custom field text to a number
pub const DECIMAL_CAST_TYPE: &str = "DECIMAL(60,4)";

// =============================================================================
// Store Tables
// =============================================================================

/// Main record table
pub const WORK_PACKAGES_TABLE: &str = "work_packages";

/// Status table holding the closed flag
pub const STATUSES_TABLE: &str = "statuses";

/// Side table holding custom field values as text
pub const CUSTOM_VALUES_TABLE: &str = "custom_values";

/// Filter key for the relation-derived assignee role filter
pub const ASSIGNED_TO_ROLE_FIELD: &str = "assigned_to_role";
