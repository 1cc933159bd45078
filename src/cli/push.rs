use super::Target;
use std::fs::File;
use std::path::Path;
use taxi_petzi::models::{FromCsv, TimesheetEntry};
use taxi_petzi::{BackendRegistry, Result};
use tracing::info;

pub async fn execute(file: &Path, target: &Target) -> Result<()> {
    let uri = target.resolve()?;
    let entries = TimesheetEntry::from_csv(File::open(file)?)?;

    let registry = BackendRegistry::with_defaults();
    let mut backend = registry.open(&uri)?;

    for entry in entries {
        backend.push_entry(entry);
    }
    let result = backend.post_push_entries().await?;

    info!(
        entries = result.entries,
        cells = result.cells.len(),
        "Push completed"
    );

    Ok(())
}
