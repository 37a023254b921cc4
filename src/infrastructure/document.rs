//! Retained document tree for lossless write-back
//!
//! The parser keeps every XML event of the original document as an owned
//! event list. Per-`VULN` slots record where the editable fields live so the
//! writer can substitute their text and re-emit everything else unchanged.

use quick_xml::events::Event;

use crate::domain::VulnRef;

/// Where an editable element's text can be written.
#[derive(Debug, Clone)]
pub(crate) enum FieldSlot {
    /// A normal element. `texts` holds the indices of its text/CDATA events
    /// (may be empty for `<TAG></TAG>`); `close_idx` is its end tag.
    Element { texts: Vec<usize>, close_idx: usize },
    /// A self-closed element such as `<COMMENTS/>`; writing a value expands
    /// it into an open/text/close triple.
    Empty { idx: usize },
}

/// Editable positions for one `VULN` entry.
#[derive(Debug, Clone, Default)]
pub(crate) struct VulnSlot {
    pub status: Option<FieldSlot>,
    pub finding_details: Option<FieldSlot>,
    pub comments: Option<FieldSlot>,
    /// Index of the `</VULN>` event; a missing `COMMENTS` element is
    /// inserted immediately before it.
    pub close_idx: usize,
}

/// The parsed document, retained event-for-event.
///
/// Owned by the [`FindingStore`](crate::application::store::FindingStore);
/// findings reference into it through [`VulnRef`].
#[derive(Debug, Clone)]
pub struct DocumentTree {
    pub(crate) events: Vec<Event<'static>>,
    pub(crate) slots: Vec<VulnSlot>,
}

impl DocumentTree {
    pub(crate) fn new(events: Vec<Event<'static>>, slots: Vec<VulnSlot>) -> Self {
        Self { events, slots }
    }

    /// Resolve a back-reference; `None` when the reference does not belong
    /// to this tree.
    pub(crate) fn slot(&self, vuln: VulnRef) -> Option<&VulnSlot> {
        self.slots.get(vuln.0)
    }

    /// Number of `VULN` entries the tree tracks.
    pub fn entry_count(&self) -> usize {
        self.slots.len()
    }
}
