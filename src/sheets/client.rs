use super::SheetOperations;
use super::auth::AuthType;
use super::range::{CellRef, SheetRange, ValueRender, value_to_string};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use google_sheets4::api::{BatchUpdateValuesRequest, Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// Read and write access to the user's spreadsheets
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub(super) fn new(auth: AuthType, spreadsheet_id: String) -> Result<Self> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Auth(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth),
            spreadsheet_id,
        })
    }

    pub fn spreadsheet_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}",
            self.spreadsheet_id
        )
    }
}

/// First cell of every row; rows the API returns empty become "".
fn first_column(value_range: ValueRange) -> Vec<String> {
    value_range
        .values
        .unwrap_or_default()
        .iter()
        .map(|row| row.first().map(value_to_string).unwrap_or_default())
        .collect()
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Reading ranges", skip_all, fields(count = ranges.len()))]
    async fn read_ranges(
        &self,
        ranges: &[SheetRange],
        render: ValueRender,
    ) -> Result<Vec<Vec<String>>> {
        let mut call = self
            .hub
            .spreadsheets()
            .values_batch_get(&self.spreadsheet_id)
            .major_dimension("ROWS")
            .value_render_option(render.as_api_str())
            .add_scope(AUTH_SCOPE);

        for range in ranges {
            call = call.add_ranges(&range.to_a1());
        }

        let (_, response) = call
            .doit()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to read ranges: {}", e)))?;

        // Value ranges come back in request order
        let value_ranges = response.value_ranges.unwrap_or_default();
        if value_ranges.len() != ranges.len() {
            return Err(AppError::Remote(format!(
                "Requested {} ranges, received {}",
                ranges.len(),
                value_ranges.len()
            )));
        }

        Ok(value_ranges.into_iter().map(first_column).collect())
    }

    #[instrument(name = "Writing cells", skip_all, fields(count = cells.len()))]
    async fn write_cells(&self, cells: &BTreeMap<CellRef, String>) -> Result<()> {
        let data = cells
            .iter()
            .map(|(cell, value)| ValueRange {
                major_dimension: Some("ROWS".to_string()),
                range: Some(cell.to_string()),
                values: Some(vec![vec![Value::String(value.clone())]]),
            })
            .collect();

        let request = BatchUpdateValuesRequest {
            data: Some(data),
            value_input_option: Some("USER_ENTERED".to_string()),
            ..Default::default()
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_batch_update(request, &self.spreadsheet_id)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to write cells: {}", e)))?;

        debug!(updated = ?response.total_updated_cells, "Cells written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_column() {
        let value_range = ValueRange {
            values: Some(vec![
                vec![json!("Date")],
                vec![],
                vec![json!("01.01.2015"), json!("ignored")],
                vec![json!(4.5)],
            ]),
            ..Default::default()
        };

        assert_eq!(
            first_column(value_range),
            vec!["Date", "", "01.01.2015", "4.5"]
        );
    }

    #[test]
    fn test_first_column_empty_range() {
        assert_eq!(first_column(ValueRange::default()), Vec::<String>::new());
    }
}
