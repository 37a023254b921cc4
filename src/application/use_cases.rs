//! Checklist open/save use cases
//!
//! The only async paths in the engine: obtaining document content from the
//! storage collaborator and flushing serialized edits back out. Everything
//! between those two edges is synchronous.

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::store::FindingStore;
use super::workspace::{DocumentId, Workspace};
use crate::domain::{ParseError, WriteError};
use crate::infrastructure::storage::{ReadOutcome, StorageProvider, WritableSink};

/// Result of attempting to open a checklist.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Opened(DocumentId),
    /// The user backed out of resource acquisition; not an error.
    Cancelled,
}

/// Errors opening a checklist document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to obtain checklist content: {reason}")]
    Storage { reason: String },
}

/// Read a checklist from storage and register it in a workspace.
pub struct OpenChecklistUseCase<S> {
    storage: S,
}

impl<S: StorageProvider> OpenChecklistUseCase<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[instrument(skip_all, fields(file_name = %file_name))]
    pub async fn execute(
        &self,
        workspace: &mut Workspace,
        file_name: &str,
        handle: &S::Handle,
    ) -> Result<LoadOutcome, LoadError> {
        match self.storage.read(handle).await {
            ReadOutcome::Loaded(content) => {
                let id = workspace.open(file_name, &content)?;
                Ok(LoadOutcome::Opened(id))
            }
            ReadOutcome::Cancelled => {
                debug!("checklist selection cancelled");
                Ok(LoadOutcome::Cancelled)
            }
            ReadOutcome::Failed(reason) => Err(LoadError::Storage { reason }),
        }
    }
}

/// Serialize a store's edits and flush them through the storage
/// collaborator.
pub struct SaveChecklistUseCase<S> {
    storage: S,
}

impl<S: StorageProvider> SaveChecklistUseCase<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Write the store's current state back to its document. The dirty flag
    /// clears only after the sink closes successfully; any failure leaves it
    /// set so the edits survive for a retry.
    #[instrument(skip_all)]
    pub async fn execute(
        &self,
        store: &mut FindingStore,
        handle: &S::Handle,
    ) -> Result<(), WriteError> {
        let text = store.serialize()?;
        let mut sink = self.storage.acquire_writable(handle).await?;
        sink.write(&text).await?;
        sink.close().await?;
        store.mark_clean();
        info!("checklist saved");
        Ok(())
    }
}
