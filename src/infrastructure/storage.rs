//! Storage collaborator boundary
//!
//! The engine never does file I/O itself; it reads and writes through these
//! traits. Front ends with pickers or drag-drop supply their own providers;
//! [`LocalFileStorage`] is the plain filesystem adapter.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::domain::WriteError;

/// Result of obtaining document content from a storage provider.
///
/// `Cancelled` is a user decision (dismissed picker, aborted drop), not a
/// failure, and must never be reported as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Loaded(String),
    Cancelled,
    Failed(String),
}

/// Writable destination for one serialized document.
#[async_trait]
pub trait WritableSink {
    async fn write(&mut self, text: &str) -> Result<(), WriteError>;

    /// Flush and release the sink. Write-back counts as successful only
    /// after this returns.
    async fn close(self) -> Result<(), WriteError>;
}

/// Provider of document content and writable sinks.
#[async_trait]
pub trait StorageProvider {
    /// Opaque storage-scoped document reference.
    type Handle: Send + Sync;
    type Sink: WritableSink + Send;

    async fn read(&self, handle: &Self::Handle) -> ReadOutcome;

    async fn acquire_writable(&self, handle: &Self::Handle) -> Result<Self::Sink, WriteError>;
}

/// Filesystem-backed storage. Local reads never produce
/// [`ReadOutcome::Cancelled`].
#[derive(Debug, Default)]
pub struct LocalFileStorage;

impl LocalFileStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageProvider for LocalFileStorage {
    type Handle = PathBuf;
    type Sink = LocalFileSink;

    async fn read(&self, handle: &PathBuf) -> ReadOutcome {
        match tokio::fs::read_to_string(handle).await {
            Ok(content) => ReadOutcome::Loaded(content),
            Err(e) => {
                warn!(path = %handle.display(), error = %e, "failed to read checklist file");
                ReadOutcome::Failed(e.to_string())
            }
        }
    }

    async fn acquire_writable(&self, handle: &PathBuf) -> Result<LocalFileSink, WriteError> {
        let file = tokio::fs::File::create(handle)
            .await
            .map_err(|e| WriteError::SinkUnavailable {
                reason: e.to_string(),
            })?;
        Ok(LocalFileSink { file })
    }
}

/// Sink writing to a local file.
#[derive(Debug)]
pub struct LocalFileSink {
    file: tokio::fs::File,
}

#[async_trait]
impl WritableSink for LocalFileSink {
    async fn write(&mut self, text: &str) -> Result<(), WriteError> {
        self.file
            .write_all(text.as_bytes())
            .await
            .map_err(|e| WriteError::SinkUnavailable {
                reason: e.to_string(),
            })
    }

    async fn close(mut self) -> Result<(), WriteError> {
        self.file
            .flush()
            .await
            .map_err(|e| WriteError::SinkUnavailable {
                reason: e.to_string(),
            })?;
        self.file
            .sync_all()
            .await
            .map_err(|e| WriteError::SinkUnavailable {
                reason: e.to_string(),
            })
    }
}
