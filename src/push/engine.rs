use super::merge::{
    EntriesCells, dates_rows, entries_to_cells, entry_column, merge_existing_with_new,
    month_sheet,
};
use crate::backend::SheetLayout;
use crate::error::{AppError, Result};
use crate::models::TimesheetEntry;
use crate::sheets::{CellRef, SheetOperations, SheetRange, ValueRender};
use chrono::NaiveDate;
use indicatif::ProgressStyle;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{Span, debug, info, instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Outcome of a push: how many entries went out and the cells written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushResult {
    pub entries: usize,
    pub cells: BTreeMap<CellRef, String>,
}

pub struct PushEngine<'a, SC> {
    layout: SheetLayout,
    sheets_client: &'a SC,
}

impl<'a, SC> PushEngine<'a, SC>
where
    SC: SheetOperations + Sync,
{
    pub fn new(layout: SheetLayout, sheets_client: &'a SC) -> Self {
        Self {
            layout,
            sheets_client,
        }
    }

    /// Add the entries to the spreadsheet.
    ///
    /// Nothing is written unless every entry maps to a cell, and all cells
    /// are written by a single batched update.
    #[instrument(name = "Push", skip_all, fields(entries = entries.len()))]
    pub async fn push(&self, entries: &[TimesheetEntry]) -> Result<PushResult> {
        if entries.is_empty() {
            debug!("Nothing to push");
            return Ok(PushResult::default());
        }

        for entry in entries {
            entry.validate()?;
            entry_column(entry)?;
        }

        let span = Span::current();
        span.pb_set_style(
            &ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| AppError::Other(e.into()))?,
        );
        span.pb_set_length(3);

        span.pb_set_message("Locating dates");
        let dates_rows = self.dates_rows(entries).await?;
        let new_cells = entries_to_cells(&self.layout, &dates_rows, entries)?;
        span.pb_inc(1);

        span.pb_set_message("Reading existing values");
        let existing = self.existing_values(&new_cells).await?;
        let merged = merge_existing_with_new(&existing, &new_cells)?;
        span.pb_inc(1);

        span.pb_set_message("Writing cells");
        if !merged.is_empty() {
            self.sheets_client.write_cells(&merged).await?;
        }
        span.pb_inc(1);

        info!(cells = merged.len(), "Entries pushed");

        Ok(PushResult {
            entries: entries.len(),
            cells: merged,
        })
    }

    /// Row of each date found on the month sheets the entries fall in.
    #[instrument(name = "Locating dates", skip_all)]
    async fn dates_rows(&self, entries: &[TimesheetEntry]) -> Result<HashMap<NaiveDate, u32>> {
        let sheets: BTreeSet<String> = entries.iter().map(|e| month_sheet(e.date)).collect();
        let ranges: Vec<SheetRange> = sheets
            .into_iter()
            .map(|sheet| SheetRange::column(sheet, self.layout.dates_column.clone()))
            .collect();

        let columns = self
            .sheets_client
            .read_ranges(&ranges, ValueRender::Formatted)
            .await?;

        let rows: HashMap<NaiveDate, u32> = columns
            .iter()
            .flat_map(|column| dates_rows(column))
            .collect();
        debug!(dates = rows.len(), "Dates located");

        Ok(rows)
    }

    #[instrument(name = "Reading existing values", skip_all)]
    async fn existing_values(&self, new_cells: &EntriesCells) -> Result<HashMap<CellRef, String>> {
        let cells = new_cells.cells();
        let ranges: Vec<SheetRange> = cells.iter().cloned().map(SheetRange::Cell).collect();

        let values = self
            .sheets_client
            .read_ranges(&ranges, ValueRender::Unformatted)
            .await?;

        Ok(cells
            .into_iter()
            .zip(values)
            .map(|(cell, column)| (cell, column.into_iter().next().unwrap_or_default()))
            .collect())
    }
}
