mod uri;

pub use uri::{ConnectionDescriptor, SCHEME, SheetLayout};

use crate::error::Result;
use crate::models::{PROJECTS, Project, TimesheetEntry};
use crate::push::{PushEngine, PushResult};
use crate::sheets::Authenticate;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// What the host tool drives when pushing a timesheet.
///
/// Entries are buffered with [`push_entry`](Backend::push_entry) and sent
/// together by [`post_push_entries`](Backend::post_push_entries).
#[async_trait]
pub trait Backend: Send {
    fn push_entry(&mut self, entry: TimesheetEntry);

    async fn post_push_entries(&mut self) -> Result<PushResult>;

    fn projects(&self) -> Vec<Project>;
}

pub struct PetziBackend<A: Authenticate> {
    descriptor: ConnectionDescriptor,
    authenticator: A,
    session: Option<A::Session>,
    entries_to_push: Vec<TimesheetEntry>,
}

impl<A> PetziBackend<A>
where
    A: Authenticate + Send + Sync,
{
    pub fn new(descriptor: ConnectionDescriptor, authenticator: A) -> Self {
        Self {
            descriptor,
            authenticator,
            session: None,
            entries_to_push: Vec::new(),
        }
    }

    pub fn from_uri(uri: &str, authenticator: A) -> Result<Self> {
        Ok(Self::new(ConnectionDescriptor::parse(uri)?, authenticator))
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Authenticate on first use, then reuse the session.
    async fn session(&mut self) -> Result<&A::Session> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.authenticator.authenticate(&self.descriptor).await?,
        };

        Ok(self.session.insert(session))
    }
}

#[async_trait]
impl<A> Backend for PetziBackend<A>
where
    A: Authenticate + Send + Sync,
{
    fn push_entry(&mut self, entry: TimesheetEntry) {
        self.entries_to_push.push(entry);
    }

    #[instrument(name = "Pushing to Petzi", skip_all, fields(sheet_id = %self.descriptor.sheet_id))]
    async fn post_push_entries(&mut self) -> Result<PushResult> {
        let entries = std::mem::take(&mut self.entries_to_push);
        if entries.is_empty() {
            debug!("No entries to push");
            return Ok(PushResult::default());
        }

        let layout = self.descriptor.layout.clone();
        let session = self.session().await?;

        PushEngine::new(layout, session).push(&entries).await
    }

    fn projects(&self) -> Vec<Project> {
        PROJECTS.to_vec()
    }
}
