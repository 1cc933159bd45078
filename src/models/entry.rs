use crate::error::{AppError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;

// Google Sheets refuses cells longer than this.
pub const MAX_CELL_CHARS: usize = 50_000;

/// A single timesheet record handed over by the host.
///
/// `project` is the host alias of the activity (see
/// [`column_for_alias`](crate::models::project::column_for_alias)) and
/// `duration` is expressed in hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimesheetEntry {
    pub date: NaiveDate,
    pub project: String,
    pub duration: Decimal,
    #[serde(default)]
    pub description: String,
}

impl TimesheetEntry {
    /// Check that the entry can be written to a spreadsheet cell.
    pub fn validate(&self) -> Result<()> {
        if self.duration < Decimal::ZERO {
            return Err(AppError::Mapping(format!(
                "Entry '{}' on {} has a negative duration: {}",
                self.project, self.date, self.duration
            )));
        }

        if self.description.chars().count() > MAX_CELL_CHARS {
            return Err(AppError::Mapping(format!(
                "Description of entry '{}' on {} exceeds {} characters",
                self.project, self.date, MAX_CELL_CHARS
            )));
        }

        if self
            .description
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t')
        {
            return Err(AppError::Mapping(format!(
                "Description of entry '{}' on {} contains control characters",
                self.project, self.date
            )));
        }

        Ok(())
    }
}

pub trait FromCsv: Sized {
    /// Read records from CSV with a `date,project,duration,description` header.
    fn from_csv<R: Read>(reader: R) -> Result<Vec<Self>>;
}

impl FromCsv for TimesheetEntry {
    fn from_csv<R: Read>(reader: R) -> Result<Vec<Self>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        reader
            .deserialize()
            .enumerate()
            .map(|(idx, record)| {
                // Header is line 1
                record.map_err(|e| {
                    AppError::Config(format!("Failed to parse entry on line {}: {}", idx + 2, e))
                })
            })
            .collect()
    }
}
