//! Push timesheet entries to the Petzi Google Sheets spreadsheet.
//!
//! A host time-tracking tool opens a backend through the [`BackendRegistry`]
//! using a connection URI such as
//! `petzi:///home/me/credentials.json?sheet_id=1AbC`, buffers entries with
//! [`Backend::push_entry`] and sends them with [`Backend::post_push_entries`].

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod push;
pub mod registry;
pub mod sheets;

pub use backend::{Backend, ConnectionDescriptor, PetziBackend};
pub use error::{AppError, Result};
pub use registry::BackendRegistry;
