use crate::error::{AppError, Result};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Protocol name under which the backend is registered.
pub const SCHEME: &str = "petzi";

const DEFAULT_DATES_COLUMN: &str = "B";
const DEFAULT_DESCRIPTION_COLUMN: &str = "BE";

/// Where a month sheet keeps its dates and the daily description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub dates_column: String,
    pub description_column: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            dates_column: DEFAULT_DATES_COLUMN.to_string(),
            description_column: DEFAULT_DESCRIPTION_COLUMN.to_string(),
        }
    }
}

/// Parameters of a `petzi:///<credentials.json>?sheet_id=<id>` connection URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub credentials_path: PathBuf,
    pub sheet_id: String,
    pub layout: SheetLayout,
}

impl ConnectionDescriptor {
    pub fn new(credentials_path: impl Into<PathBuf>, sheet_id: impl Into<String>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            sheet_id: sheet_id.into(),
            layout: SheetLayout::default(),
        }
    }

    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri)
            .map_err(|e| AppError::Config(format!("Invalid connection URI '{}': {}", uri, e)))?;

        if url.scheme() != SCHEME {
            return Err(AppError::Config(format!(
                "Unsupported scheme '{}', expected '{}'",
                url.scheme(),
                SCHEME
            )));
        }

        if let Some(host) = url.host_str().filter(|host| !host.is_empty()) {
            return Err(AppError::Config(format!(
                "Unexpected host '{}' in connection URI, use {}:///<path> for the credentials file",
                host, SCHEME
            )));
        }

        let path = urlencoding::decode(url.path())
            .map_err(|e| AppError::Config(format!("Malformed credentials path: {}", e)))?;
        if path.is_empty() || path.ends_with('/') {
            return Err(AppError::Config(
                "Connection URI is missing the credentials file path".to_string(),
            ));
        }

        let mut sheet_id = None;
        let mut layout = SheetLayout::default();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "sheet_id" => sheet_id = Some(value.into_owned()),
                "dates_column" => layout.dates_column = parse_column(&key, &value)?,
                "description_column" => layout.description_column = parse_column(&key, &value)?,
                other => debug!(option = other, "Ignoring unknown connection option"),
            }
        }

        let sheet_id = sheet_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            AppError::Config("Connection URI is missing the sheet_id parameter".to_string())
        })?;

        Ok(Self {
            credentials_path: PathBuf::from(path.into_owned()),
            sheet_id,
            layout,
        })
    }
}

fn parse_column(key: &str, value: &str) -> Result<String> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Config(format!(
            "Invalid column '{}' for {}, expected letters such as 'B' or 'BE'",
            value, key
        )));
    }

    Ok(value.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extracts_path_and_sheet_id() {
        let descriptor =
            ConnectionDescriptor::parse("petzi:///home/me/credentials.json?sheet_id=1AbC-d_9")
                .unwrap();

        assert_eq!(
            descriptor.credentials_path,
            PathBuf::from("/home/me/credentials.json")
        );
        assert_eq!(descriptor.sheet_id, "1AbC-d_9");
        assert_eq!(descriptor.layout, SheetLayout::default());
    }

    #[test]
    fn test_parse_decodes_path() {
        let descriptor =
            ConnectionDescriptor::parse("petzi:///home/me/My%20Drive/creds.json?sheet_id=X")
                .unwrap();

        assert_eq!(
            descriptor.credentials_path,
            PathBuf::from("/home/me/My Drive/creds.json")
        );
    }

    #[test]
    fn test_parse_layout_overrides() {
        let descriptor = ConnectionDescriptor::parse(
            "petzi:///creds.json?sheet_id=X&dates_column=a&description_column=Bf&foo=bar",
        )
        .unwrap();

        assert_eq!(
            descriptor.layout,
            SheetLayout {
                dates_column: "A".to_string(),
                description_column: "BF".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_missing_sheet_id() {
        for uri in [
            "petzi:///creds.json",
            "petzi:///creds.json?sheet_id=",
            "petzi:///creds.json?other=1",
        ] {
            let err = ConnectionDescriptor::parse(uri).unwrap_err();
            assert!(
                matches!(&err, AppError::Config(msg) if msg.contains("sheet_id")),
                "{}: got {:?}",
                uri,
                err
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_uris() {
        for uri in [
            "not a uri",
            "https:///creds.json?sheet_id=X",
            "petzi:///?sheet_id=X",
            "petzi://somehost/creds.json?sheet_id=X",
            "petzi:///creds.json?sheet_id=X&dates_column=B1",
        ] {
            let result = ConnectionDescriptor::parse(uri);
            assert!(
                matches!(result, Err(AppError::Config(_))),
                "{}: got {:?}",
                uri,
                result
            );
        }
    }
}
