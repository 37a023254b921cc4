//! Finding types for checklist review
//!
//! Core types for checklist findings: severity tiers, review status with its
//! canonical/display vocabulary, and the back-reference into the parsed
//! document tree.

use serde::{Serialize, Serializer};

/// Severity of a checklist finding, lowercased on parse.
///
/// `Other` carries any value outside the three known levels verbatim
/// (already lowercased), including the empty string when the source carried
/// no `Severity` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    High,
    Medium,
    Low,
    Other(String),
}

impl Severity {
    /// Parse a raw severity value, lowercasing it first.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            other => Severity::Other(other.to_string()),
        }
    }

    /// Derive the severity category (CAT tier) via the fixed mapping.
    ///
    /// high → CAT I, medium → CAT II, low → CAT III; anything else keeps its
    /// raw lowercased severity string as the category label.
    pub fn category(&self) -> SeverityCategory {
        match self {
            Severity::High => SeverityCategory::CatOne,
            Severity::Medium => SeverityCategory::CatTwo,
            Severity::Low => SeverityCategory::CatThree,
            Severity::Other(raw) => SeverityCategory::Other(raw.clone()),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Severity tier derived from [`Severity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeverityCategory {
    CatOne,
    CatTwo,
    CatThree,
    Other(String),
}

impl std::fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityCategory::CatOne => write!(f, "CAT I"),
            SeverityCategory::CatTwo => write!(f, "CAT II"),
            SeverityCategory::CatThree => write!(f, "CAT III"),
            SeverityCategory::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for SeverityCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Review status of a finding.
///
/// The four named variants are the canonical document tokens. `Other` is a
/// verbatim passthrough for anything else the document contained, notably
/// the `"Unknown"` sentinel produced when a `VULN` has no `STATUS` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FindingStatus {
    Open,
    NotReviewed,
    NotAFinding,
    NotApplicable,
    Other(String),
}

impl FindingStatus {
    pub const CANONICAL: [FindingStatus; 4] = [
        FindingStatus::Open,
        FindingStatus::NotReviewed,
        FindingStatus::NotAFinding,
        FindingStatus::NotApplicable,
    ];

    /// The canonical token as stored in the document.
    pub fn as_token(&self) -> &str {
        match self {
            FindingStatus::Open => "Open",
            FindingStatus::NotReviewed => "Not_Reviewed",
            FindingStatus::NotAFinding => "NotAFinding",
            FindingStatus::NotApplicable => "Not_Applicable",
            FindingStatus::Other(raw) => raw,
        }
    }

    /// The user-facing display label.
    pub fn display_label(&self) -> &str {
        match self {
            FindingStatus::Open => "Open",
            FindingStatus::NotReviewed => "Not Reviewed",
            FindingStatus::NotAFinding => "Not a Finding",
            FindingStatus::NotApplicable => "Not Applicable",
            FindingStatus::Other(raw) => raw,
        }
    }

    /// Exact match against the four canonical tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Open" => Some(FindingStatus::Open),
            "Not_Reviewed" => Some(FindingStatus::NotReviewed),
            "NotAFinding" => Some(FindingStatus::NotAFinding),
            "Not_Applicable" => Some(FindingStatus::NotApplicable),
            _ => None,
        }
    }

    /// Exact match against the four display labels.
    pub fn from_display_label(label: &str) -> Option<Self> {
        match label {
            "Open" => Some(FindingStatus::Open),
            "Not Reviewed" => Some(FindingStatus::NotReviewed),
            "Not a Finding" => Some(FindingStatus::NotAFinding),
            "Not Applicable" => Some(FindingStatus::NotApplicable),
            _ => None,
        }
    }

    /// Resolve user input into a status: display label first, then canonical
    /// token, else the input is carried verbatim.
    pub fn resolve(input: &str) -> Self {
        Self::from_display_label(input)
            .or_else(|| Self::from_token(input))
            .unwrap_or_else(|| FindingStatus::Other(input.to_string()))
    }

    /// Status as read from the document: canonical token or verbatim.
    pub fn from_document(raw: &str) -> Self {
        Self::from_token(raw).unwrap_or_else(|| FindingStatus::Other(raw.to_string()))
    }

    /// Whether this is one of the four canonical statuses.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, FindingStatus::Other(_))
    }
}

impl std::fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for FindingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

/// The two user-editable free-text fields of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    FindingDetails,
    Comments,
}

/// Opaque back-reference from a finding to its `VULN` node.
///
/// Only meaningful against the `DocumentTree` it was parsed with; the
/// finding never owns the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulnRef(pub(crate) usize);

/// One checklist entry (vulnerability/check).
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Business key, unique within a document, stable across edits.
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub status: FindingStatus,
    pub discussion: String,
    pub check_text: String,
    pub fix_text: String,
    pub cci_reference: String,
    /// Analyst notes, written back on save.
    pub finding_details: String,
    /// Analyst comments, written back on save.
    pub comments: String,
    #[serde(skip)]
    pub(crate) source_ref: VulnRef,
}

impl Finding {
    pub fn severity_category(&self) -> SeverityCategory {
        self.severity.category()
    }

    pub fn source_ref(&self) -> VulnRef {
        self.source_ref
    }
}
