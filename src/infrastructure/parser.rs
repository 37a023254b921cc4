//! Checklist (.ckl) document parser
//!
//! Streaming parse over quick-xml events. Two things come out of a parse:
//! the finding records and a [`DocumentTree`] retaining every event of the
//! original document, so a later save can reproduce untouched content
//! exactly.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::info;

use super::document::{DocumentTree, FieldSlot, VulnSlot};
use crate::domain::{Finding, FindingStatus, ParseError, Severity, VulnRef};

/// Result of parsing one checklist document.
#[derive(Debug)]
pub struct ParsedChecklist {
    pub findings: Vec<Finding>,
    pub tree: DocumentTree,
}

/// Editable or identifying child element of a `VULN` being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Status,
    FindingDetails,
    Comments,
    VulnNum,
}

/// Text currently being accumulated.
#[derive(Debug)]
enum Capture {
    /// `VULN_ATTRIBUTE` inside a `STIG_DATA` pair.
    StigAttribute(String),
    /// `ATTRIBUTE_DATA` inside a `STIG_DATA` pair.
    StigValue(String),
    /// A tracked child element of the `VULN` itself.
    Field {
        kind: FieldKind,
        value: String,
        texts: Vec<usize>,
    },
}

impl Capture {
    fn element_name(&self) -> &'static [u8] {
        match self {
            Capture::StigAttribute(_) => b"VULN_ATTRIBUTE",
            Capture::StigValue(_) => b"ATTRIBUTE_DATA",
            Capture::Field { kind, .. } => match kind {
                FieldKind::Status => b"STATUS",
                FieldKind::FindingDetails => b"FINDING_DETAILS",
                FieldKind::Comments => b"COMMENTS",
                FieldKind::VulnNum => b"VULN_NUM",
            },
        }
    }
}

/// In-flight state for the `VULN` entry being parsed.
#[derive(Debug, Default)]
struct VulnBuilder {
    id: String,
    fallback_id: Option<String>,
    severity: Option<Severity>,
    title: String,
    discussion: String,
    check_text: String,
    fix_text: String,
    cci_reference: String,
    status_raw: Option<String>,
    finding_details: Option<String>,
    comments: Option<String>,
    status_slot: Option<FieldSlot>,
    details_slot: Option<FieldSlot>,
    comments_slot: Option<FieldSlot>,
}

impl VulnBuilder {
    fn finish(self, close_idx: usize, ordinal: usize) -> (Finding, VulnSlot) {
        let id = if self.id.is_empty() {
            self.fallback_id.unwrap_or_default()
        } else {
            self.id
        };
        // A VULN without a STATUS element carries the "Unknown" sentinel,
        // which is not one of the four canonical tokens.
        let status = match self.status_raw {
            Some(raw) => FindingStatus::from_document(&raw),
            None => FindingStatus::Other("Unknown".to_string()),
        };
        let finding = Finding {
            id,
            severity: self.severity.unwrap_or_else(|| Severity::Other(String::new())),
            title: self.title,
            status,
            discussion: self.discussion,
            check_text: self.check_text,
            fix_text: self.fix_text,
            cci_reference: self.cci_reference,
            finding_details: self.finding_details.unwrap_or_default(),
            comments: self.comments.unwrap_or_default(),
            source_ref: VulnRef(ordinal),
        };
        let slot = VulnSlot {
            status: self.status_slot,
            finding_details: self.details_slot,
            comments: self.comments_slot,
            close_idx,
        };
        (finding, slot)
    }

    fn apply_attribute(&mut self, attribute: &str, value: String) {
        match attribute {
            "Vuln_Num" => self.id = value,
            "Severity" => self.severity = Some(Severity::parse(&value)),
            "Rule_Title" => self.title = value,
            "Vuln_Discuss" => self.discussion = value,
            "Check_Content" => self.check_text = value,
            "Fix_Text" => self.fix_text = value,
            "CCI_REF" => self.cci_reference = value,
            // Unknown attribute keys are ignored.
            _ => {}
        }
    }

    fn field_is_new(&self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Status => self.status_raw.is_none() && self.status_slot.is_none(),
            FieldKind::FindingDetails => {
                self.finding_details.is_none() && self.details_slot.is_none()
            }
            FieldKind::Comments => self.comments.is_none() && self.comments_slot.is_none(),
            FieldKind::VulnNum => self.fallback_id.is_none(),
        }
    }

    fn store_field(&mut self, kind: FieldKind, value: String, slot: FieldSlot) {
        match kind {
            FieldKind::Status => {
                self.status_raw = Some(value);
                self.status_slot = Some(slot);
            }
            FieldKind::FindingDetails => {
                self.finding_details = Some(value.trim().to_string());
                self.details_slot = Some(slot);
            }
            FieldKind::Comments => {
                self.comments = Some(value.trim().to_string());
                self.comments_slot = Some(slot);
            }
            FieldKind::VulnNum => self.fallback_id = Some(value),
        }
    }
}

fn field_kind(name: &[u8]) -> Option<FieldKind> {
    match name {
        b"STATUS" => Some(FieldKind::Status),
        b"FINDING_DETAILS" => Some(FieldKind::FindingDetails),
        b"COMMENTS" => Some(FieldKind::Comments),
        b"VULN_NUM" => Some(FieldKind::VulnNum),
        _ => None,
    }
}

/// Parser for checklist documents in the CKL XML schema.
pub struct ChecklistParser;

impl ChecklistParser {
    /// Parse a raw checklist document.
    ///
    /// Fails with [`ParseError::Malformed`] on any structural XML error; no
    /// partial finding set is produced in that case.
    pub fn parse(content: &str) -> Result<ParsedChecklist, ParseError> {
        let mut reader = Reader::from_str(content);

        let mut events: Vec<Event<'static>> = Vec::new();
        let mut slots: Vec<VulnSlot> = Vec::new();
        let mut findings: Vec<Finding> = Vec::new();

        let mut vuln: Option<VulnBuilder> = None;
        let mut capture: Option<Capture> = None;
        let mut in_stig_data = false;
        let mut stig_attribute: Option<String> = None;
        let mut stig_value: Option<String> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ParseError::Malformed(e.to_string()))?;
            if matches!(event, Event::Eof) {
                break;
            }
            events.push(event.into_owned());
            let idx = events.len() - 1;

            match &events[idx] {
                Event::Start(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    match vuln.as_mut() {
                        None => {
                            if name == b"VULN" {
                                vuln = Some(VulnBuilder::default());
                                in_stig_data = false;
                            }
                        }
                        Some(builder) => {
                            if capture.is_some() {
                                // Nested element inside a captured field; its
                                // text still accumulates below.
                            } else if name == b"STIG_DATA" {
                                in_stig_data = true;
                                stig_attribute = None;
                                stig_value = None;
                            } else if in_stig_data
                                && name == b"VULN_ATTRIBUTE"
                                && stig_attribute.is_none()
                            {
                                capture = Some(Capture::StigAttribute(String::new()));
                            } else if in_stig_data
                                && name == b"ATTRIBUTE_DATA"
                                && stig_value.is_none()
                            {
                                capture = Some(Capture::StigValue(String::new()));
                            } else if let Some(kind) = field_kind(name) {
                                // Only the first occurrence of each tracked
                                // element counts.
                                if builder.field_is_new(kind) {
                                    capture = Some(Capture::Field {
                                        kind,
                                        value: String::new(),
                                        texts: Vec::new(),
                                    });
                                }
                            }
                        }
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if let Some(builder) = vuln.as_mut() {
                        if capture.is_none() {
                            if in_stig_data && name == b"VULN_ATTRIBUTE" {
                                stig_attribute.get_or_insert_with(String::new);
                            } else if in_stig_data && name == b"ATTRIBUTE_DATA" {
                                stig_value.get_or_insert_with(String::new);
                            } else if let Some(kind) = field_kind(name) {
                                if builder.field_is_new(kind) {
                                    builder.store_field(
                                        kind,
                                        String::new(),
                                        FieldSlot::Empty { idx },
                                    );
                                }
                            }
                        }
                    } else if name == b"VULN" {
                        // Degenerate self-closed entry; still one finding.
                        let ordinal = slots.len();
                        let (finding, slot) = VulnBuilder::default().finish(idx, ordinal);
                        findings.push(finding);
                        slots.push(slot);
                    }
                }
                Event::Text(t) => {
                    if let Some(active) = capture.as_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| ParseError::Malformed(e.to_string()))?;
                        match active {
                            Capture::StigAttribute(value) | Capture::StigValue(value) => {
                                value.push_str(&text)
                            }
                            Capture::Field { value, texts, .. } => {
                                value.push_str(&text);
                                texts.push(idx);
                            }
                        }
                    }
                }
                Event::CData(t) => {
                    if let Some(active) = capture.as_mut() {
                        let text = reader
                            .decoder()
                            .decode(t)
                            .map_err(|e| ParseError::Malformed(e.to_string()))?;
                        match active {
                            Capture::StigAttribute(value) | Capture::StigValue(value) => {
                                value.push_str(&text)
                            }
                            Capture::Field { value, texts, .. } => {
                                value.push_str(&text);
                                texts.push(idx);
                            }
                        }
                    }
                }
                Event::End(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    let capture_done = capture
                        .as_ref()
                        .is_some_and(|active| active.element_name() == name);
                    if capture_done {
                        let Some(builder) = vuln.as_mut() else {
                            unreachable!("capture only starts inside a VULN");
                        };
                        match capture.take() {
                            Some(Capture::StigAttribute(value)) => stig_attribute = Some(value),
                            Some(Capture::StigValue(value)) => stig_value = Some(value),
                            Some(Capture::Field { kind, value, texts }) => {
                                builder.store_field(
                                    kind,
                                    value,
                                    FieldSlot::Element { texts, close_idx: idx },
                                );
                            }
                            None => {}
                        }
                    } else if capture.is_none() {
                        if name == b"STIG_DATA" && in_stig_data {
                            in_stig_data = false;
                            if let (Some(builder), Some(attribute), Some(value)) =
                                (vuln.as_mut(), stig_attribute.take(), stig_value.take())
                            {
                                builder.apply_attribute(&attribute, value);
                            }
                        } else if name == b"VULN" {
                            if let Some(builder) = vuln.take() {
                                let ordinal = slots.len();
                                let (finding, slot) = builder.finish(idx, ordinal);
                                findings.push(finding);
                                slots.push(slot);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        info!(finding_count = findings.len(), "parsed checklist document");
        Ok(ParsedChecklist {
            findings,
            tree: DocumentTree::new(events, slots),
        })
    }
}
