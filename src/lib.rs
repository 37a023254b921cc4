//! cklview - Document model and query/edit engine for security checklists
//!
//! This crate is the core of a STIG checklist (`.ckl`) review tool: it
//! parses checklist documents losslessly, derives filtered/sorted/searched
//! views over the findings, tracks edits, and writes them back without
//! disturbing any content it does not model.
//!
//! # Modules
//!
//! - [`domain`] — Finding records, severity/status vocabulary, error types
//! - [`application`] — Finding stores, the view query engine, the workspace
//!   of open documents, and the async open/save use cases
//! - [`infrastructure`] — CKL parser/writer over quick-xml and the storage
//!   collaborator boundary
//! - [`config`] — Strongly-typed configuration with file and environment
//!   variable support
//! - [`logging`] — Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! raw text ─► ChecklistParser ─► FindingStore (findings + DocumentTree)
//!                                     │
//!                   view(ViewState) ──┤── compute_view ─► ordered subset
//!                                     │
//!         set_status / set_field ─────┤── dirty flag
//!                                     │
//!                ChecklistWriter ◄────┘── serialize ─► persisted text
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cklview::application::FindingStore;
//!
//! let raw = r#"<CHECKLIST>
//! <VULN>
//!   <STIG_DATA>
//!     <VULN_ATTRIBUTE>Vuln_Num</VULN_ATTRIBUTE>
//!     <ATTRIBUTE_DATA>V-1001</ATTRIBUTE_DATA>
//!   </STIG_DATA>
//!   <STATUS>Not_Reviewed</STATUS>
//! </VULN>
//! </CHECKLIST>"#;
//!
//! let mut store = FindingStore::parse(raw)?;
//! store.set_status("V-1001", "Not a Finding")?;
//! let saved = store.serialize()?;
//! assert!(saved.contains("<STATUS>NotAFinding</STATUS>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{FindingStore, ViewState, Workspace};
pub use config::Config;
pub use domain::{
    EditableField, Finding, FindingStatus, ParseError, Severity, SeverityCategory, StoreError,
    WriteError,
};
pub use logging::init_tracing;
