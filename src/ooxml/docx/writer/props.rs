//! Core document properties, written to `/docProps/core.xml`.

use crate::ooxml::opc::constants::namespace as NS;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::partial_escape;
use serde::{Deserialize, Serialize};

/// Document core properties (metadata).
///
/// Unset properties are omitted from the part; a document with no property
/// set gets no core properties part at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    /// Document creator/author
    pub creator: Option<String>,
    /// Document keywords (comma-separated)
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    /// Document category
    pub category: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl CoreProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the document creator/author.
    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set who last modified the document.
    pub fn last_modified_by(mut self, name: &str) -> Self {
        self.last_modified_by = Some(name.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created = Some(at);
        self
    }

    pub fn modified(mut self, at: DateTime<Utc>) -> Self {
        self.modified = Some(at);
        self
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Generate core.xml content for this properties set.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<cp:coreProperties xmlns:cp=""#);
        xml.push_str(NS::OPC_CORE_PROPERTIES);
        xml.push_str(r#"" xmlns:dc=""#);
        xml.push_str(NS::DC);
        xml.push_str(r#"" xmlns:dcterms=""#);
        xml.push_str(NS::DC_TERMS);
        xml.push_str(r#"" xmlns:dcmitype=""#);
        xml.push_str(NS::DCMI_TYPE);
        xml.push_str(r#"" xmlns:xsi=""#);
        xml.push_str(NS::XSI);
        xml.push_str(r#"">"#);

        for (tag, value) in [
            ("dc:title", &self.title),
            ("dc:subject", &self.subject),
            ("dc:creator", &self.creator),
            ("cp:keywords", &self.keywords),
            ("dc:description", &self.description),
            ("cp:lastModifiedBy", &self.last_modified_by),
            ("cp:category", &self.category),
        ] {
            if let Some(value) = value {
                write_element(&mut xml, tag, &partial_escape(value.as_str()), "");
            }
        }

        for (tag, value) in [("dcterms:created", self.created), ("dcterms:modified", self.modified)]
        {
            if let Some(at) = value {
                write_element(
                    &mut xml,
                    tag,
                    &at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    r#" xsi:type="dcterms:W3CDTF""#,
                );
            }
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

fn write_element(xml: &mut String, tag: &str, content: &str, attrs: &str) {
    xml.push('<');
    xml.push_str(tag);
    xml.push_str(attrs);
    xml.push('>');
    xml.push_str(content);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty() {
        assert!(CoreProperties::new().is_empty());
        assert!(!CoreProperties::new().title("x").is_empty());
    }

    #[test]
    fn test_to_xml() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let xml = CoreProperties::new()
            .title("Q1 <Report>")
            .creator("Finance")
            .created(at)
            .to_xml();

        assert!(xml.contains("<dc:title>Q1 &lt;Report&gt;</dc:title>"));
        assert!(xml.contains("<dc:creator>Finance</dc:creator>"));
        assert!(xml.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T12:30:00Z</dcterms:created>"#
        ));
        assert!(!xml.contains("dcterms:modified"));
        // Title precedes creator
        assert!(xml.find("dc:title").unwrap() < xml.find("dc:creator").unwrap());
    }
}
