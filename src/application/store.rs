//! Finding store for one open checklist document
//!
//! Owns the finding records and the retained document tree they reference.
//! All mutations go through store methods so the dirty flag stays accurate.

use indexmap::IndexMap;
use tracing::debug;

use super::query::{self, ViewState};
use crate::domain::{
    EditableField, Finding, FindingStatus, ParseError, StoreError, WriteError,
};
use crate::infrastructure::document::DocumentTree;
use crate::infrastructure::parser::ChecklistParser;
use crate::infrastructure::writer::ChecklistWriter;

/// Record set and document tree for one open checklist.
#[derive(Debug)]
pub struct FindingStore {
    findings: Vec<Finding>,
    tree: DocumentTree,
    dirty: bool,
}

impl FindingStore {
    /// Parse a raw checklist document into a fresh store. The store starts
    /// clean.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let parsed = ChecklistParser::parse(content)?;
        Ok(Self {
            findings: parsed.findings,
            tree: parsed.tree,
            dirty: false,
        })
    }

    /// All findings, in parse order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Unsaved edits exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Only call after a successful write-back.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Set a finding's status. `input` may be a display label ("Not a
    /// Finding"), a canonical token ("NotAFinding"), or anything else, which
    /// is carried verbatim.
    pub fn set_status(&mut self, finding_id: &str, input: &str) -> Result<(), StoreError> {
        let status = FindingStatus::resolve(input);
        let finding = self.find_mut(finding_id)?;
        finding.status = status.clone();
        self.dirty = true;
        debug!(finding_id, status = %status, "status changed");
        Ok(())
    }

    /// Set one of the two editable free-text fields.
    pub fn set_field(
        &mut self,
        finding_id: &str,
        field: EditableField,
        value: &str,
    ) -> Result<(), StoreError> {
        let finding = self.find_mut(finding_id)?;
        match field {
            EditableField::FindingDetails => finding.finding_details = value.to_string(),
            EditableField::Comments => finding.comments = value.to_string(),
        }
        self.dirty = true;
        Ok(())
    }

    /// Derive the ordered display subset for the given view state.
    pub fn view(&self, state: &ViewState) -> Vec<&Finding> {
        query::compute_view(&self.findings, state)
    }

    /// Status breakdown of the full record set, first-seen order.
    pub fn status_counts(&self) -> IndexMap<FindingStatus, usize> {
        query::status_counts(&self.findings)
    }

    /// Apply current field values onto the document tree and serialize the
    /// whole document. Performs no file I/O and does not touch the dirty
    /// flag; callers clear it via [`mark_clean`](Self::mark_clean) once the
    /// text has actually been persisted.
    pub fn serialize(&self) -> Result<String, WriteError> {
        ChecklistWriter::serialize(&self.findings, &self.tree)
    }

    fn find_mut(&mut self, finding_id: &str) -> Result<&mut Finding, StoreError> {
        self.findings
            .iter_mut()
            .find(|finding| finding.id == finding_id)
            .ok_or_else(|| StoreError::NotFound {
                id: finding_id.to_string(),
            })
    }
}
