pub mod entry;
pub mod project;

pub use entry::{FromCsv, TimesheetEntry};
pub use project::{Activity, PROJECTS, Project, column_for_alias};
