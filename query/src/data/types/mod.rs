//! Row types returned by the query core

mod work_package;

pub(crate) use work_package::{WORK_PACKAGE_COLUMNS, WorkPackageTuple};
pub use work_package::WorkPackageRow;
