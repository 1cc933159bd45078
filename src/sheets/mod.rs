mod auth;
mod client;
pub mod range;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use auth::GoogleAuthenticator;
pub use client::SheetsClient;
pub use range::{CellRef, SheetRange, ValueRender};

// Re-export clear_tokens for CLI usage
pub use auth::{clear_tokens as clear_sheets_tokens, token_cache_path};

use crate::backend::ConnectionDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Remote spreadsheet operations needed to push entries.
#[async_trait]
pub trait SheetOperations {
    /// Read several ranges in one call.
    ///
    /// Returns, for each requested range and in request order, the value of
    /// the first cell of every row. Empty trailing rows may be omitted.
    async fn read_ranges(
        &self,
        ranges: &[SheetRange],
        render: ValueRender,
    ) -> Result<Vec<Vec<String>>>;

    /// Write all cells in one call, interpreting values as if typed by a user.
    async fn write_cells(&self, cells: &BTreeMap<CellRef, String>) -> Result<()>;
}

/// Produces an authenticated session for a spreadsheet.
#[async_trait]
pub trait Authenticate {
    type Session: SheetOperations + Send + Sync;

    async fn authenticate(&self, descriptor: &ConnectionDescriptor) -> Result<Self::Session>;
}
