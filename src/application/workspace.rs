//! Open-document workspace
//!
//! Explicit owning container for every open checklist, keyed by document
//! id. Callers hold a `&mut Workspace`; there is no ambient global registry.
//! Each document is fully independent: mutating one store can never observe
//! or alter another's findings, dirty flag, or document tree.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::store::FindingStore;
use crate::domain::ParseError;

/// Identifier of one open document within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One open checklist: its display name plus the finding store.
#[derive(Debug)]
pub struct OpenDocument {
    pub name: String,
    pub store: FindingStore,
}

/// All checklists open in one session, in opening order.
#[derive(Debug, Default)]
pub struct Workspace {
    documents: IndexMap<DocumentId, OpenDocument>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `content` and register it as a new open document. The display
    /// name is the file name with a trailing `.ckl` stripped
    /// (case-insensitive).
    pub fn open(&mut self, file_name: &str, content: &str) -> Result<DocumentId, ParseError> {
        let store = FindingStore::parse(content)?;
        let id = DocumentId::new();
        let name = display_name(file_name);
        info!(document = %id, name = %name, finding_count = store.findings().len(), "opened checklist");
        self.documents.insert(id, OpenDocument { name, store });
        Ok(id)
    }

    /// Drop an open document, discarding any unsaved edits it carried.
    pub fn close(&mut self, id: DocumentId) -> Option<OpenDocument> {
        let removed = self.documents.shift_remove(&id);
        if let Some(document) = &removed {
            info!(document = %id, name = %document.name, "closed checklist");
        }
        removed
    }

    pub fn get(&self, id: DocumentId) -> Option<&OpenDocument> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut OpenDocument> {
        self.documents.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &OpenDocument)> {
        self.documents.iter().map(|(id, document)| (*id, document))
    }

    /// Any open document carries unsaved edits (the close-session guard).
    pub fn has_unsaved_changes(&self) -> bool {
        self.documents
            .values()
            .any(|document| document.store.is_dirty())
    }
}

fn display_name(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    match lower.strip_suffix(".ckl") {
        Some(_) => file_name[..file_name.len() - ".ckl".len()].to_string(),
        None => file_name.to_string(),
    }
}
