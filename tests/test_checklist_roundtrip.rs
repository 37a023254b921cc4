//! Integration tests for the parse → edit → serialize round trip

mod common;

use common::fixtures::{VulnFixture, checklist};
use pretty_assertions::assert_eq;

use cklview::application::FindingStore;
use cklview::domain::{EditableField, FindingStatus, SeverityCategory};

#[test]
fn no_edit_round_trip_preserves_untouched_content() {
    let doc = checklist(&[
        VulnFixture::new("V-1001", "high", "Telnet service enabled").comments("seen before"),
        VulnFixture::new("V-1002", "medium", "FTP service enabled"),
    ]);
    let store = FindingStore::parse(&doc).unwrap();
    let output = store.serialize().unwrap();

    // Asset header, attribute pairs, and statuses come back untouched.
    assert!(output.contains("<HOST_NAME>web01.example.mil</HOST_NAME>"));
    assert!(output.contains("<ATTRIBUTE_DATA>Telnet service enabled</ATTRIBUTE_DATA>"));
    assert!(output.contains("<STATUS>Not_Reviewed</STATUS>"));
    assert!(output.contains("<COMMENTS>seen before</COMMENTS>"));
    assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));

    // Parsing the output again yields the same record set.
    let reparsed = FindingStore::parse(&output).unwrap();
    let original: Vec<_> = store.findings().iter().map(|f| f.id.clone()).collect();
    let roundtripped: Vec<_> = reparsed.findings().iter().map(|f| f.id.clone()).collect();
    assert_eq!(original, roundtripped);
}

#[test]
fn parse_maps_attributes_and_derives_categories() {
    let doc = checklist(&[
        VulnFixture::new("V-1001", "high", "Telnet service enabled"),
        VulnFixture::new("V-1002", "medium", "FTP service enabled"),
        VulnFixture::new("V-1003", "low", "Password max age"),
    ]);
    let store = FindingStore::parse(&doc).unwrap();
    let findings = store.findings();

    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0].severity_category(), SeverityCategory::CatOne);
    assert_eq!(findings[1].severity_category(), SeverityCategory::CatTwo);
    assert_eq!(findings[2].severity_category(), SeverityCategory::CatThree);
    assert_eq!(findings[0].discussion, "Discussion text.");
    assert_eq!(findings[0].cci_reference, "CCI-000366");
}

#[test]
fn edits_write_back_into_their_own_entries_only() {
    let doc = checklist(&[
        VulnFixture::new("V-1001", "high", "Telnet service enabled"),
        VulnFixture::new("V-1002", "medium", "FTP service enabled"),
    ]);
    let mut store = FindingStore::parse(&doc).unwrap();
    store.set_status("V-1001", "Open").unwrap();
    store
        .set_field("V-1001", EditableField::FindingDetails, "port 23 open")
        .unwrap();

    let output = store.serialize().unwrap();
    let first_vuln = &output[output.find("V-1001").unwrap()..output.find("V-1002").unwrap()];
    assert!(first_vuln.contains("<STATUS>Open</STATUS>"));
    assert!(first_vuln.contains("<FINDING_DETAILS>port 23 open</FINDING_DETAILS>"));

    let second_vuln = &output[output.find("V-1002").unwrap()..];
    assert!(second_vuln.contains("<STATUS>Not_Reviewed</STATUS>"));
}

#[test]
fn comments_element_is_inserted_when_absent() {
    let doc = checklist(&[VulnFixture::new("V-1001", "high", "Telnet service enabled")]);
    assert!(!doc.contains("<COMMENTS>"));

    let mut store = FindingStore::parse(&doc).unwrap();
    store
        .set_field("V-1001", EditableField::Comments, "x")
        .unwrap();
    let output = store.serialize().unwrap();

    assert!(output.contains("<COMMENTS>x</COMMENTS>"));
    // Inserted inside the VULN, with siblings unchanged.
    let vuln_close = output.find("</VULN>").unwrap();
    assert!(output.find("<COMMENTS>x</COMMENTS>").unwrap() < vuln_close);
    assert!(output.contains("<FINDING_DETAILS></FINDING_DETAILS>"));
    assert!(output.contains("<STATUS>Not_Reviewed</STATUS>"));
}

#[test]
fn status_canonicalization_round_trips_all_display_labels() {
    let labels = [
        ("Open", FindingStatus::Open, "Open"),
        ("Not Reviewed", FindingStatus::NotReviewed, "Not_Reviewed"),
        ("Not a Finding", FindingStatus::NotAFinding, "NotAFinding"),
        (
            "Not Applicable",
            FindingStatus::NotApplicable,
            "Not_Applicable",
        ),
    ];
    for (label, expected, token) in labels {
        let doc = checklist(&[VulnFixture::new("V-1001", "high", "Telnet service enabled")]);
        let mut store = FindingStore::parse(&doc).unwrap();
        store.set_status("V-1001", label).unwrap();

        let status = &store.findings()[0].status;
        assert_eq!(status, &expected);
        assert_eq!(status.display_label(), label);

        let output = store.serialize().unwrap();
        assert!(output.contains(&format!("<STATUS>{}</STATUS>", token)));
    }
}

#[test]
fn non_canonical_status_round_trips_verbatim() {
    let doc = checklist(&[
        VulnFixture::new("V-1001", "high", "Telnet service enabled").status("Deferred")
    ]);
    let store = FindingStore::parse(&doc).unwrap();
    assert_eq!(
        store.findings()[0].status,
        FindingStatus::Other("Deferred".to_string())
    );

    let output = store.serialize().unwrap();
    assert!(output.contains("<STATUS>Deferred</STATUS>"));
}

#[test]
fn findings_serialize_for_presentation_without_internals() {
    let doc = checklist(&[VulnFixture::new("V-1001", "high", "Telnet service enabled")]);
    let store = FindingStore::parse(&doc).unwrap();

    let json = serde_json::to_value(&store.findings()[0]).unwrap();
    assert_eq!(json["id"], "V-1001");
    assert_eq!(json["severity"], "high");
    assert_eq!(json["status"], "Not_Reviewed");
    // The document back-reference never leaves the engine.
    assert!(json.get("source_ref").is_none());
}

#[test]
fn malformed_document_produces_no_store() {
    let result = FindingStore::parse("<CHECKLIST><VULN><STATUS>Open</CHECKLIST>");
    assert!(result.is_err());
}
