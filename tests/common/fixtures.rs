//! Checklist document fixtures shared across integration tests

/// One `VULN` entry for [`checklist`].
pub struct VulnFixture {
    pub id: &'static str,
    pub severity: &'static str,
    pub title: &'static str,
    /// `None` omits the STATUS element entirely (the "Unknown" case).
    pub status: Option<&'static str>,
    pub finding_details: Option<&'static str>,
    /// `None` omits the COMMENTS element (pre-edit documents often lack
    /// it).
    pub comments: Option<&'static str>,
}

impl VulnFixture {
    pub fn new(id: &'static str, severity: &'static str, title: &'static str) -> Self {
        Self {
            id,
            severity,
            title,
            status: Some("Not_Reviewed"),
            finding_details: Some(""),
            comments: None,
        }
    }

    pub fn status(mut self, status: &'static str) -> Self {
        self.status = Some(status);
        self
    }

    pub fn no_status(mut self) -> Self {
        self.status = None;
        self
    }

    pub fn comments(mut self, comments: &'static str) -> Self {
        self.comments = Some(comments);
        self
    }
}

/// Build a checklist document in the CKL schema, including the asset
/// header block real checklists carry.
pub fn checklist(vulns: &[VulnFixture]) -> String {
    let mut doc = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CHECKLIST>
  <ASSET>
    <ROLE>Member Server</ROLE>
    <HOST_NAME>web01.example.mil</HOST_NAME>
    <HOST_IP>10.0.0.12</HOST_IP>
  </ASSET>
  <STIGS>
    <iSTIG>
"#,
    );
    for vuln in vulns {
        doc.push_str("      <VULN>\n");
        push_stig_data(&mut doc, "Vuln_Num", vuln.id);
        push_stig_data(&mut doc, "Severity", vuln.severity);
        push_stig_data(&mut doc, "Rule_Title", vuln.title);
        push_stig_data(&mut doc, "Vuln_Discuss", "Discussion text.");
        push_stig_data(&mut doc, "Check_Content", "Check procedure.");
        push_stig_data(&mut doc, "Fix_Text", "Fix procedure.");
        push_stig_data(&mut doc, "CCI_REF", "CCI-000366");
        if let Some(status) = vuln.status {
            doc.push_str(&format!("        <STATUS>{}</STATUS>\n", status));
        }
        if let Some(details) = vuln.finding_details {
            doc.push_str(&format!(
                "        <FINDING_DETAILS>{}</FINDING_DETAILS>\n",
                details
            ));
        }
        if let Some(comments) = vuln.comments {
            doc.push_str(&format!("        <COMMENTS>{}</COMMENTS>\n", comments));
        }
        doc.push_str("      </VULN>\n");
    }
    doc.push_str(
        r#"    </iSTIG>
  </STIGS>
</CHECKLIST>"#,
    );
    doc
}

fn push_stig_data(doc: &mut String, attribute: &str, value: &str) {
    doc.push_str(&format!(
        "        <STIG_DATA>\n          <VULN_ATTRIBUTE>{}</VULN_ATTRIBUTE>\n          <ATTRIBUTE_DATA>{}</ATTRIBUTE_DATA>\n        </STIG_DATA>\n",
        attribute, value
    ));
}
