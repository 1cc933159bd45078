use crate::backend::SheetLayout;
use crate::error::{AppError, Result};
use crate::models::{TimesheetEntry, column_for_alias};
use crate::sheets::CellRef;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// New values destined to the spreadsheet, before merging with what it holds.
#[derive(Debug, Default, PartialEq)]
pub struct EntriesCells {
    pub durations: BTreeMap<CellRef, Decimal>,
    pub descriptions: BTreeMap<CellRef, Vec<String>>,
}

impl EntriesCells {
    /// Every cell touched, each once.
    pub fn cells(&self) -> Vec<CellRef> {
        let mut cells: Vec<CellRef> = self
            .durations
            .keys()
            .chain(self.descriptions.keys())
            .cloned()
            .collect();
        cells.sort();
        cells.dedup();
        cells
    }
}

/// Each month lives on a sheet titled with its number.
pub fn month_sheet(date: NaiveDate) -> String {
    date.month().to_string()
}

/// Parse a dates column cell such as `01.01.2015`; trailing text is ignored.
pub fn parse_sheet_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_and_remainder(value.trim(), DATE_FORMAT)
        .ok()
        .map(|(date, _)| date)
}

/// Map a dates column (first row is row 1) to the row of each date.
pub fn dates_rows(column: &[String]) -> HashMap<NaiveDate, u32> {
    column
        .iter()
        .zip(1u32..)
        .filter_map(|(value, row)| parse_sheet_date(value).map(|date| (date, row)))
        .collect()
}

fn date_row(dates_rows: &HashMap<NaiveDate, u32>, date: NaiveDate) -> Result<u32> {
    dates_rows.get(&date).copied().ok_or_else(|| {
        AppError::Mapping(format!("Couldn't find {} date in spreadsheet", date))
    })
}

/// Resolve the hours column of an entry's project.
pub fn entry_column(entry: &TimesheetEntry) -> Result<&'static str> {
    column_for_alias(&entry.project).ok_or_else(|| {
        AppError::Mapping(format!(
            "Unknown project '{}' for entry on {}",
            entry.project, entry.date
        ))
    })
}

/// Sum durations and collect descriptions per target cell.
pub fn entries_to_cells(
    layout: &SheetLayout,
    dates_rows: &HashMap<NaiveDate, u32>,
    entries: &[TimesheetEntry],
) -> Result<EntriesCells> {
    let mut cells = EntriesCells::default();

    for entry in entries {
        let sheet = month_sheet(entry.date);
        let row = date_row(dates_rows, entry.date)?;
        let column = entry_column(entry)?;

        let cell = CellRef::new(sheet.clone(), column, row);
        let total = cells.durations.entry(cell.clone()).or_default();
        *total = add_durations(&cell, *total, entry.duration)?;

        if !entry.description.is_empty() {
            cells
                .descriptions
                .entry(CellRef::new(sheet, layout.description_column.clone(), row))
                .or_default()
                .push(entry.description.clone());
        }
    }

    Ok(cells)
}

fn add_durations(cell: &CellRef, a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| {
        AppError::Mapping(format!(
            "Total duration of cell {} cannot be represented ({} + {})",
            cell, a, b
        ))
    })
}

fn parse_duration(cell: &CellRef, value: &str) -> Result<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| {
            AppError::Mapping(format!(
                "Error in value of cell {}: value '{}' cannot be read as a number",
                cell, value
            ))
        })
}

/// Combine new cell values with the ones already in the spreadsheet.
///
/// Durations are added to the existing hours. Descriptions are appended to
/// the existing text, separated by `, `, unless already present; description
/// cells left unchanged are not returned.
pub fn merge_existing_with_new(
    existing: &HashMap<CellRef, String>,
    cells: &EntriesCells,
) -> Result<BTreeMap<CellRef, String>> {
    let mut merged = BTreeMap::new();

    for (cell, duration) in &cells.durations {
        let existing_value = existing.get(cell).map(String::as_str).unwrap_or_default();
        let total = add_durations(cell, parse_duration(cell, existing_value)?, *duration)?;
        merged.insert(cell.clone(), total.normalize().to_string());
    }

    for (cell, descriptions) in &cells.descriptions {
        let existing_description = existing.get(cell).map(String::as_str).unwrap_or_default();
        let mut description = existing_description.to_string();

        for (i, new) in descriptions.iter().enumerate() {
            if existing_description.contains(new.as_str()) || descriptions[..i].contains(new) {
                continue;
            }
            if !description.is_empty() {
                description.push_str(", ");
            }
            description.push_str(new);
        }

        if description != existing_description {
            merged.insert(cell.clone(), description);
        }
    }

    Ok(merged)
}
