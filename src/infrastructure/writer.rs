//! Checklist write-back serialization
//!
//! Re-emits the retained event stream, substituting only the tracked
//! editable fields. Everything else in the document comes back out exactly
//! as parsed.

use std::collections::{HashMap, HashSet};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use super::document::{DocumentTree, FieldSlot};
use crate::domain::{Finding, WriteError};

/// Serializes finding edits back onto their source document.
pub struct ChecklistWriter;

/// Edit plan keyed by event index.
#[derive(Default)]
struct EditPlan {
    /// Replace the text/CDATA event at this index with new text.
    replace: HashMap<usize, String>,
    /// Drop the event at this index (surplus text nodes of an edited
    /// element).
    skip: HashSet<usize>,
    /// Write this text immediately before the event at this index (edited
    /// element that had no text node).
    text_before: HashMap<usize, String>,
    /// Expand the self-closed element at this index into open/text/close.
    expand_empty: HashMap<usize, String>,
    /// Insert a full `<COMMENTS>` element before the `</VULN>` at this
    /// index.
    insert_comments: HashMap<usize, String>,
}

impl EditPlan {
    fn apply_field(&mut self, slot: &FieldSlot, value: &str) {
        match slot {
            FieldSlot::Element { texts, close_idx } => {
                if let Some((&first, rest)) = texts.split_first() {
                    self.replace.insert(first, value.to_string());
                    self.skip.extend(rest.iter().copied());
                } else {
                    self.text_before.insert(*close_idx, value.to_string());
                }
            }
            FieldSlot::Empty { idx } => {
                self.expand_empty.insert(*idx, value.to_string());
            }
        }
    }
}

impl ChecklistWriter {
    /// Apply the findings' current `status`, `finding_details`, and
    /// `comments` onto the document tree and serialize the whole document.
    ///
    /// A finding whose back-reference does not resolve against `tree` fails
    /// the entire write with [`WriteError::MissingNode`]; nothing is
    /// silently skipped.
    pub fn serialize(findings: &[Finding], tree: &DocumentTree) -> Result<String, WriteError> {
        let mut plan = EditPlan::default();

        for finding in findings {
            let slot = tree
                .slot(finding.source_ref())
                .ok_or_else(|| WriteError::MissingNode {
                    id: finding.id.clone(),
                })?;

            if let Some(status) = &slot.status {
                plan.apply_field(status, finding.status.as_token());
            }
            if let Some(details) = &slot.finding_details {
                plan.apply_field(details, &finding.finding_details);
            }
            match &slot.comments {
                Some(comments) => plan.apply_field(comments, &finding.comments),
                // The source had no COMMENTS element; create one as the last
                // child of the VULN.
                None => {
                    plan.insert_comments
                        .insert(slot.close_idx, finding.comments.clone());
                }
            }
        }

        let mut writer = Writer::new(Vec::new());
        for (idx, event) in tree.events.iter().enumerate() {
            if plan.skip.contains(&idx) {
                continue;
            }
            if let Some(value) = plan.replace.get(&idx) {
                write_event(&mut writer, Event::Text(BytesText::new(value)))?;
                continue;
            }
            if let Some(value) = plan.expand_empty.get(&idx) {
                let Event::Empty(original) = event else {
                    return Err(WriteError::Serialize(
                        "expansion target is not a self-closed element".to_string(),
                    ));
                };
                write_event(&mut writer, Event::Start(original.clone()))?;
                write_event(&mut writer, Event::Text(BytesText::new(value)))?;
                write_event(
                    &mut writer,
                    Event::End(BytesEnd::new(
                        String::from_utf8_lossy(original.name().as_ref()).into_owned(),
                    )),
                )?;
                continue;
            }
            if let Some(value) = plan.text_before.get(&idx) {
                write_event(&mut writer, Event::Text(BytesText::new(value)))?;
            }
            if let Some(value) = plan.insert_comments.get(&idx) {
                // A self-closed VULN has to be expanded so the comments
                // land inside it.
                if let Event::Empty(original) = event {
                    write_event(&mut writer, Event::Start(original.clone()))?;
                    write_comments(&mut writer, value)?;
                    write_event(
                        &mut writer,
                        Event::End(BytesEnd::new(
                            String::from_utf8_lossy(original.name().as_ref()).into_owned(),
                        )),
                    )?;
                    continue;
                }
                write_comments(&mut writer, value)?;
            }
            write_event(&mut writer, event.clone())?;
        }

        debug!(
            finding_count = findings.len(),
            "serialized checklist document"
        );
        String::from_utf8(writer.into_inner())
            .map_err(|e| WriteError::Serialize(e.to_string()))
    }
}

fn write_comments(writer: &mut Writer<Vec<u8>>, value: &str) -> Result<(), WriteError> {
    write_event(writer, Event::Start(BytesStart::new("COMMENTS")))?;
    write_event(writer, Event::Text(BytesText::new(value)))?;
    write_event(writer, Event::End(BytesEnd::new("COMMENTS")))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), WriteError> {
    writer
        .write_event(event)
        .map_err(|e| WriteError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parser::ChecklistParser;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CHECKLIST>
  <!-- reviewed by team -->
  <VULN>
    <STIG_DATA>
      <VULN_ATTRIBUTE>Vuln_Num</VULN_ATTRIBUTE>
      <ATTRIBUTE_DATA>V-1001</ATTRIBUTE_DATA>
    </STIG_DATA>
    <STATUS>Not_Reviewed</STATUS>
    <FINDING_DETAILS></FINDING_DETAILS>
    <SEVERITY_OVERRIDE></SEVERITY_OVERRIDE>
  </VULN>
</CHECKLIST>"#;

    #[test]
    fn no_edit_round_trip_keeps_unmodeled_content() {
        let parsed = ChecklistParser::parse(SAMPLE).unwrap();
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<!-- reviewed by team -->"));
        assert!(output.contains("<SEVERITY_OVERRIDE></SEVERITY_OVERRIDE>"));
        assert!(output.contains("<STATUS>Not_Reviewed</STATUS>"));
        assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn status_edit_replaces_only_the_status_text() {
        let mut parsed = ChecklistParser::parse(SAMPLE).unwrap();
        parsed.findings[0].status = crate::domain::FindingStatus::Open;
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<STATUS>Open</STATUS>"));
        assert!(output.contains("<ATTRIBUTE_DATA>V-1001</ATTRIBUTE_DATA>"));
    }

    #[test]
    fn details_edit_fills_an_empty_element() {
        let mut parsed = ChecklistParser::parse(SAMPLE).unwrap();
        parsed.findings[0].finding_details = "port 23 listening".to_string();
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<FINDING_DETAILS>port 23 listening</FINDING_DETAILS>"));
    }

    #[test]
    fn missing_comments_element_is_created_before_vuln_close() {
        let mut parsed = ChecklistParser::parse(SAMPLE).unwrap();
        parsed.findings[0].comments = "x".to_string();
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<COMMENTS>x</COMMENTS>"));
        let comments_at = output.find("<COMMENTS>").unwrap();
        let vuln_close_at = output.find("</VULN>").unwrap();
        assert!(comments_at < vuln_close_at);
        // Siblings unchanged.
        assert!(output.contains("<SEVERITY_OVERRIDE></SEVERITY_OVERRIDE>"));
    }

    #[test]
    fn self_closed_editable_element_is_expanded() {
        let content = r#"<CHECKLIST><VULN>
  <STATUS>Open</STATUS>
  <FINDING_DETAILS/>
</VULN></CHECKLIST>"#;
        let mut parsed = ChecklistParser::parse(content).unwrap();
        parsed.findings[0].finding_details = "noted".to_string();
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<FINDING_DETAILS>noted</FINDING_DETAILS>"));
    }

    #[test]
    fn self_closed_vuln_gains_comments_inside_it() {
        let content = "<CHECKLIST><VULN/></CHECKLIST>";
        let parsed = ChecklistParser::parse(content).unwrap();
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<VULN><COMMENTS></COMMENTS></VULN>"));
    }

    #[test]
    fn edited_text_is_escaped() {
        let mut parsed = ChecklistParser::parse(SAMPLE).unwrap();
        parsed.findings[0].finding_details = "a < b & c".to_string();
        let output = ChecklistWriter::serialize(&parsed.findings, &parsed.tree).unwrap();

        assert!(output.contains("<FINDING_DETAILS>a &lt; b &amp; c</FINDING_DETAILS>"));
    }

    #[test]
    fn foreign_back_reference_is_missing_node() {
        let two_entries = r#"<CHECKLIST>
<VULN><STATUS>Open</STATUS></VULN>
<VULN><STATUS>Open</STATUS></VULN>
</CHECKLIST>"#;
        let one_entry = "<CHECKLIST><VULN><STATUS>Open</STATUS></VULN></CHECKLIST>";

        let big = ChecklistParser::parse(two_entries).unwrap();
        let small = ChecklistParser::parse(one_entry).unwrap();

        let err = ChecklistWriter::serialize(&big.findings, &small.tree).unwrap_err();
        assert!(matches!(err, WriteError::MissingNode { .. }));
    }
}
