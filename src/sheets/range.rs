use serde_json::Value;
use std::fmt;

/// A single cell of a named sheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub sheet: String,
    pub column: String,
    pub row: u32,
}

impl CellRef {
    pub fn new(sheet: impl Into<String>, column: impl Into<String>, row: u32) -> Self {
        Self {
            sheet: sheet.into(),
            column: column.into(),
            row,
        }
    }
}

/// A1 notation, e.g. `'1'!E12`.
impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}",
            quote_sheet(&self.sheet),
            self.column,
            self.row
        )
    }
}

/// A range read from the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRange {
    /// A whole column of a sheet, e.g. `'1'!B:B`.
    Column { sheet: String, column: String },
    Cell(CellRef),
}

impl SheetRange {
    pub fn column(sheet: impl Into<String>, column: impl Into<String>) -> Self {
        SheetRange::Column {
            sheet: sheet.into(),
            column: column.into(),
        }
    }

    pub fn to_a1(&self) -> String {
        match self {
            SheetRange::Column { sheet, column } => {
                format!("{}!{}:{}", quote_sheet(sheet), column, column)
            }
            SheetRange::Cell(cell) => cell.to_string(),
        }
    }
}

/// How cell values are rendered when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRender {
    /// As displayed in the UI, e.g. dates as `01.01.2015`.
    Formatted,
    /// Raw numbers, so durations are not subject to locale formatting.
    Unformatted,
}

impl ValueRender {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ValueRender::Formatted => "FORMATTED_VALUE",
            ValueRender::Unformatted => "UNFORMATTED_VALUE",
        }
    }
}

// Sheet titles are always quoted, single quotes inside are doubled.
fn quote_sheet(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// Convert a cell returned by the API to its string form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string().to_uppercase(),
        other => other.to_string(),
    }
}
