//! Pure domain model: findings, status vocabulary, and error taxonomy

pub mod errors;
pub mod finding;

pub use errors::{ParseError, StoreError, WriteError};
pub use finding::{
    EditableField, Finding, FindingStatus, Severity, SeverityCategory, VulnRef,
};
