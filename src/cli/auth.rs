use super::Target;
use taxi_petzi::sheets::{Authenticate, GoogleAuthenticator, clear_sheets_tokens};
use taxi_petzi::{ConnectionDescriptor, Result};
use tracing::info;

pub async fn execute(reset: bool, target: &Target) -> Result<()> {
    if reset {
        clear_sheets_tokens()?;
    }

    let descriptor = ConnectionDescriptor::parse(&target.resolve()?)?;
    let client = GoogleAuthenticator::new().authenticate(&descriptor).await?;

    info!(url = %client.spreadsheet_url(), "Google Sheets authentication verified");

    Ok(())
}
