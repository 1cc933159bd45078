use super::{Authenticate, CellRef, SheetOperations, SheetRange, ValueRender};
use crate::backend::ConnectionDescriptor;
use crate::error::{AppError, Result};
use crate::push::merge::{DATE_FORMAT, month_sheet};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory spreadsheet recording every call made to it.
#[derive(Clone, Default)]
pub(crate) struct StubSpreadsheet {
    cells: Arc<Mutex<BTreeMap<CellRef, String>>>,
    reads: Arc<Mutex<Vec<Vec<SheetRange>>>>,
    writes: Arc<Mutex<Vec<BTreeMap<CellRef, String>>>>,
    fail_writes: bool,
}

impl StubSpreadsheet {
    /// Month sheets with the given dates at the given rows.
    pub(crate) fn with_dates(dates_column: &str, dates: &[(NaiveDate, u32)]) -> Self {
        let stub = Self::default();
        for (date, row) in dates {
            stub.set(
                &month_sheet(*date),
                dates_column,
                *row,
                &date.format(DATE_FORMAT).to_string(),
            );
        }
        stub
    }

    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub(crate) fn set(&self, sheet: &str, column: &str, row: u32, value: &str) {
        self.cells
            .lock()
            .unwrap()
            .insert(CellRef::new(sheet, column, row), value.to_string());
    }

    pub(crate) fn value(&self, sheet: &str, column: &str, row: u32) -> Option<String> {
        self.cells
            .lock()
            .unwrap()
            .get(&CellRef::new(sheet, column, row))
            .cloned()
    }

    pub(crate) fn reads(&self) -> Vec<Vec<SheetRange>> {
        self.reads.lock().unwrap().clone()
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    pub(crate) fn writes(&self) -> Vec<BTreeMap<CellRef, String>> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    fn read_range(cells: &BTreeMap<CellRef, String>, range: &SheetRange) -> Vec<String> {
        match range {
            SheetRange::Column { sheet, column } => {
                let in_column: BTreeMap<u32, &String> = cells
                    .iter()
                    .filter(|(cell, _)| &cell.sheet == sheet && &cell.column == column)
                    .map(|(cell, value)| (cell.row, value))
                    .collect();
                let last_row = in_column.keys().next_back().copied().unwrap_or(0);

                (1..=last_row)
                    .map(|row| in_column.get(&row).map(|v| v.to_string()).unwrap_or_default())
                    .collect()
            }
            // Like the API, an empty cell comes back without any row
            SheetRange::Cell(cell) => cells.get(cell).cloned().into_iter().collect(),
        }
    }
}

#[async_trait]
impl SheetOperations for StubSpreadsheet {
    async fn read_ranges(
        &self,
        ranges: &[SheetRange],
        _render: ValueRender,
    ) -> Result<Vec<Vec<String>>> {
        self.reads.lock().unwrap().push(ranges.to_vec());

        let cells = self.cells.lock().unwrap();
        Ok(ranges
            .iter()
            .map(|range| Self::read_range(&cells, range))
            .collect())
    }

    async fn write_cells(&self, cells: &BTreeMap<CellRef, String>) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::Remote("stub rejected the write".to_string()));
        }

        self.writes.lock().unwrap().push(cells.clone());
        self.cells
            .lock()
            .unwrap()
            .extend(cells.iter().map(|(cell, value)| (cell.clone(), value.clone())));
        Ok(())
    }
}

/// Hands out a shared [`StubSpreadsheet`] and counts authentications.
#[derive(Clone)]
pub(crate) struct StubAuthenticator {
    session: StubSpreadsheet,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl StubAuthenticator {
    pub(crate) fn new(session: StubSpreadsheet) -> Self {
        Self {
            session,
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    pub(crate) fn failing(session: StubSpreadsheet) -> Self {
        Self {
            fail: true,
            ..Self::new(session)
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticate for StubAuthenticator {
    type Session = StubSpreadsheet;

    async fn authenticate(&self, descriptor: &ConnectionDescriptor) -> Result<StubSpreadsheet> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(AppError::Auth(format!(
                "stub rejected credentials {:?}",
                descriptor.credentials_path
            )));
        }

        Ok(self.session.clone())
    }
}
