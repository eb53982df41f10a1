//! Package serialization for [`MutableDocument`].
//!
//! The document is validated, every populated story is rendered to its XML
//! part and the parts are assembled into an in-memory OPC package, which is
//! then written as a ZIP container. Structural relationships of the main part
//! are minted on a copy of its relationships, so serializing never changes
//! the document and repeated calls produce identical bytes.

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as CT, namespace as NS, relationship_type as RT};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{BlobPart, XmlPart};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::{RelationshipId, Relationships};
use log::debug;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use super::config::WriterOptions;
use super::doc::{DOCUMENT_PARTNAME, MutableDocument};
use super::section::HeaderFooter;
use super::story::{Block, Story};
use super::style::StyleRegistry;

const STYLES_PARTNAME: &str = "/word/styles.xml";
const CORE_PROPERTIES_PARTNAME: &str = "/docProps/core.xml";

/// Header or footer, for part naming and root elements.
#[derive(Clone, Copy)]
enum StoryPart {
    Header,
    Footer,
}

impl StoryPart {
    fn root(self) -> &'static str {
        match self {
            Self::Header => "w:hdr",
            Self::Footer => "w:ftr",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Header => CT::WML_HEADER,
            Self::Footer => CT::WML_FOOTER,
        }
    }

    fn reltype(self) -> &'static str {
        match self {
            Self::Header => RT::HEADER,
            Self::Footer => RT::FOOTER,
        }
    }
}

impl MutableDocument {
    /// Serialize the document to `.docx` bytes with default options.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with_options(&WriterOptions::default())
    }

    /// Serialize the document to `.docx` bytes.
    ///
    /// Fails with [`OoxmlError::UnknownStyle`] or
    /// [`OoxmlError::UnresolvedRelationship`] when content references a style
    /// or relationship that does not exist; nothing is produced in that case.
    ///
    /// [`OoxmlError::UnknownStyle`]: crate::ooxml::OoxmlError::UnknownStyle
    /// [`OoxmlError::UnresolvedRelationship`]: crate::ooxml::OoxmlError::UnresolvedRelationship
    pub fn to_bytes_with_options(&self, options: &WriterOptions) -> Result<Vec<u8>> {
        options.validate()?;
        self.validate()?;

        let package = self.build_package(options)?;
        let phys_writer = PhysPkgWriter::new(options.compression.method(), options.level());
        let bytes = PackageWriter::to_bytes(phys_writer, &package)?;
        debug!(
            "serialized document: {} parts, {} bytes",
            package.part_count(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Serialize the document into `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the document and write it to a file at `path`.
    ///
    /// The package is fully built before the file is created.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use longan::ooxml::docx::writer::MutableDocument;
    ///
    /// let mut doc = MutableDocument::new();
    /// doc.add_paragraph("Hello!", None)?;
    /// doc.save("output.docx")?;
    /// # Ok::<(), longan::ooxml::OoxmlError>(())
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn build_package(&self, options: &WriterOptions) -> Result<OpcPackage> {
        let mut package = OpcPackage::new();
        let mut main_rels = self.rels.clone();

        let styles_uri = PackURI::new(STYLES_PARTNAME)?;
        main_rels.relate_to(RT::STYLES, &styles_uri)?;
        package.add_part(Box::new(XmlPart::new(
            styles_uri,
            CT::WML_STYLES,
            self.styles.to_xml()?,
        )));

        let mut references = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            let header = add_story_part(
                &mut package,
                &mut main_rels,
                &self.styles,
                section.header.as_ref(),
                StoryPart::Header,
            )?;
            let footer = add_story_part(
                &mut package,
                &mut main_rels,
                &self.styles,
                section.footer.as_ref(),
                StoryPart::Footer,
            )?;
            references.push((header, footer));
        }

        let document_uri = PackURI::new(DOCUMENT_PARTNAME)?;
        let document_xml = self.document_xml(&references)?;
        debug!("{}: {} bytes", document_uri, document_xml.len());
        package.add_part(Box::new(XmlPart::with_rels(
            document_uri.clone(),
            CT::WML_DOCUMENT_MAIN,
            document_xml,
            main_rels,
        )));

        let embedded = self.embedded_media();
        for item in self.media.iter() {
            if !embedded.contains(item.partname()) {
                debug!("{}: no longer referenced, skipped", item.partname());
                continue;
            }
            package.add_part(Box::new(BlobPart::new(
                item.partname().clone(),
                item.format().mime_type(),
                Arc::clone(item.blob()),
            )));
        }

        package.relate_to(&document_uri, RT::OFFICE_DOCUMENT)?;

        if options.include_core_properties && !self.core_properties.is_empty() {
            let core_uri = PackURI::new(CORE_PROPERTIES_PARTNAME)?;
            package.add_part(Box::new(XmlPart::new(
                core_uri.clone(),
                CT::OPC_CORE_PROPERTIES,
                self.core_properties.to_xml(),
            )));
            package.relate_to(&core_uri, RT::CORE_PROPERTIES)?;
        }

        Ok(package)
    }

    /// Partnames of the media that some story still shows.
    fn embedded_media(&self) -> BTreeSet<&PackURI> {
        let mut pictures = Vec::new();
        for section in &self.sections {
            section.body.collect_pictures(&mut pictures);
            for hf in [section.header.as_ref(), section.footer.as_ref()]
                .into_iter()
                .flatten()
            {
                hf.story.collect_pictures(&mut pictures);
            }
        }
        pictures.into_iter().map(|image| &image.partname).collect()
    }

    fn document_xml(
        &self,
        references: &[(Option<RelationshipId>, Option<RelationshipId>)],
    ) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        open_root(&mut xml, "w:document");
        xml.push_str("<w:body>");

        let last = self.sections.len().saturating_sub(1);
        for (idx, (section, (header, footer))) in
            self.sections.iter().zip(references).enumerate()
        {
            section.body.write_xml(&mut xml, &self.styles)?;

            let mut sect_pr = String::with_capacity(256);
            section.write_properties(&mut sect_pr, header.as_ref(), footer.as_ref())?;
            if idx == last {
                // The final section's properties close the body
                xml.push_str(&sect_pr);
            } else {
                xml.push_str("<w:p><w:pPr>");
                xml.push_str(&sect_pr);
                xml.push_str("</w:pPr></w:p>");
            }
        }

        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }
}

/// Open a part root element declaring every namespace content may use.
fn open_root(xml: &mut String, tag: &str) {
    xml.push('<');
    xml.push_str(tag);
    for (prefix, uri) in [
        ("w", NS::WML_MAIN),
        ("r", NS::OFC_RELATIONSHIPS),
        ("wp", NS::DML_WORDPROCESSING_DRAWING),
        ("a", NS::DML_MAIN),
        ("pic", NS::DML_PICTURE),
    ] {
        xml.push_str(" xmlns:");
        xml.push_str(prefix);
        xml.push_str("=\"");
        xml.push_str(uri);
        xml.push('"');
    }
    xml.push('>');
}

/// Add the part for a header or footer story and relate the main part to it.
///
/// Returns `None` without adding anything when the story is absent or empty.
fn add_story_part(
    package: &mut OpcPackage,
    main_rels: &mut Relationships,
    styles: &StyleRegistry,
    story: Option<&HeaderFooter>,
    kind: StoryPart,
) -> Result<Option<RelationshipId>> {
    let Some(hf) = story.filter(|hf| !hf.story.is_empty()) else {
        return Ok(None);
    };

    let xml = story_xml(&hf.story, styles, kind.root())?;
    debug!("{}: {} bytes", hf.partname(), xml.len());
    let r_id = main_rels.relate_to(kind.reltype(), hf.partname())?;
    package.add_part(Box::new(XmlPart::with_rels(
        hf.partname().clone(),
        kind.content_type(),
        xml,
        hf.rels.clone(),
    )));
    Ok(Some(r_id))
}

fn story_xml(story: &Story, styles: &StyleRegistry, root: &str) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    open_root(&mut xml, root);
    story.write_xml(&mut xml, styles)?;
    if matches!(story.blocks().last(), Some(Block::Table(_))) {
        xml.push_str("<w:p/>");
    }
    xml.push_str("</");
    xml.push_str(root);
    xml.push('>');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::enums::{WdSectionStart, WdStyleType};
    use crate::ooxml::docx::writer::config::Compression;
    use crate::ooxml::docx::writer::field::FieldCode;
    use crate::ooxml::docx::writer::media::tests::png;
    use crate::ooxml::docx::writer::paragraph::MutableParagraph;
    use crate::ooxml::docx::writer::run::RunProperties;
    use crate::ooxml::docx::writer::section::{PageNumberFormat, SectionProperties};
    use crate::ooxml::error::OoxmlError;
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn archive(bytes: &[u8]) -> ZipArchive<Cursor<&[u8]>> {
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn members(bytes: &[u8]) -> Vec<String> {
        let mut names: Vec<String> = archive(bytes).file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    fn member(bytes: &[u8], name: &str) -> String {
        let mut zip = archive(bytes);
        let mut file = zip.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn assert_well_formed(name: &str, xml: &str) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => panic!("{name} is not well-formed: {e}"),
            }
        }
    }

    fn report() -> MutableDocument {
        let mut doc = MutableDocument::new();
        doc.core_properties_mut().title = Some("Quarterly report".to_string());
        doc.add_heading("Quarterly report", 0).unwrap();
        {
            let mut p = doc.add_paragraph("Revenue rose. See ", None).unwrap();
            p.insert_hyperlink("the dashboard", "https://example.org/q?a=1&b=2", None)
                .unwrap();
            p.add_run(" for details.", RunProperties::new().with_italic(true))
                .unwrap();
        }
        doc.add_paragraph("", None)
            .unwrap()
            .add_picture(png(320, 160), Some(3_000_000), None)
            .unwrap();
        {
            let mut body = doc.body(0).unwrap();
            let mut table = body.add_table(3, 3, Some("Table Grid")).unwrap();
            table.cell(0, 0).unwrap().set_text("Region").unwrap();
            table.merge_cells(0, 1, 2).unwrap();
            table.merge_cells_vertical(0, 1, 2).unwrap();
        }

        let landscape = doc.add_section(WdSectionStart::NewPage);
        doc.section_mut(landscape)
            .unwrap()
            .set_properties(SectionProperties::letter().landscape());
        doc.add_paragraph("Appendix", Some("Heading 1")).unwrap();

        {
            let mut footer = doc.footer(0).unwrap();
            let mut p = footer.add_paragraph("Page ", Some("Footer")).unwrap();
            p.insert_field(FieldCode::page_number().with_format(PageNumberFormat::Decimal))
                .unwrap();
            p.add_run(" of ", RunProperties::default()).unwrap();
            p.insert_field(FieldCode::total_pages()).unwrap();
        }
        doc.header(1)
            .unwrap()
            .add_paragraph("Appendix", Some("Header"))
            .unwrap()
            .add_picture(png(10, 10), None, None)
            .unwrap();
        // Created but left empty, so never written
        doc.header(0).unwrap();
        doc
    }

    #[test]
    fn test_minimal_manifest() {
        let bytes = MutableDocument::new().to_bytes().unwrap();
        assert_eq!(
            members(&bytes),
            [
                "[Content_Types].xml",
                "_rels/.rels",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/styles.xml",
            ]
        );
        let content_types = member(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"<Default Extension="rels""#));
        assert!(content_types.contains(r#"<Default Extension="xml""#));
        assert!(content_types.contains(r#"<Override PartName="/word/document.xml""#));
        assert!(content_types.contains(r#"<Override PartName="/word/styles.xml""#));
    }

    #[test]
    fn test_report_manifest_lists_populated_parts() {
        let bytes = report().to_bytes().unwrap();
        assert_eq!(
            members(&bytes),
            [
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/_rels/header1.xml.rels",
                "word/document.xml",
                "word/footer1.xml",
                "word/header1.xml",
                "word/media/image1.png",
                "word/media/image2.png",
                "word/styles.xml",
            ]
        );
        let content_types = member(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(content_types.contains(r#"<Override PartName="/word/header1.xml""#));
        assert!(!content_types.contains("header2"));
    }

    #[test]
    fn test_every_xml_part_is_well_formed() {
        let bytes = report().to_bytes().unwrap();
        for name in members(&bytes) {
            if name.ends_with(".xml") || name.ends_with(".rels") {
                assert_well_formed(&name, &member(&bytes, &name));
            }
        }
    }

    #[test]
    fn test_serialization_is_deterministic_and_pure() {
        let doc = report();
        let before = doc.rels().len();
        let first = doc.to_bytes().unwrap();
        let second = doc.to_bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(doc.rels().len(), before);
    }

    #[test]
    fn test_hyperlink_relationship() {
        let mut doc = MutableDocument::new();
        let r_id = doc
            .add_paragraph("", None)
            .unwrap()
            .insert_hyperlink("example", "https://example.org", None)
            .unwrap();
        let bytes = doc.to_bytes().unwrap();

        let rels = member(&bytes, "word/_rels/document.xml.rels");
        assert_eq!(rels.matches(RT::HYPERLINK).count(), 1);
        assert!(rels.contains(&format!(
            r#"<Relationship Id="{r_id}" Type="{}" Target="https://example.org" TargetMode="External"/>"#,
            RT::HYPERLINK
        )));
        // The styles relationship is minted after content ids
        assert!(rels.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));

        let document = member(&bytes, "word/document.xml");
        assert!(document.contains(&format!(r#"<w:hyperlink r:id="{r_id}""#)));
    }

    #[test]
    fn test_merged_away_picture_leaves_no_media() {
        let mut doc = MutableDocument::new();
        {
            let mut body = doc.body(0).unwrap();
            let mut table = body.add_table(1, 2, None).unwrap();
            table
                .cell(0, 1)
                .unwrap()
                .add_paragraph("", None)
                .unwrap()
                .add_picture(png(8, 8), None, None)
                .unwrap();
            table.merge_cells(0, 0, 1).unwrap();
        }
        let bytes = doc.to_bytes().unwrap();

        assert!(!members(&bytes).iter().any(|name| name.starts_with("word/media/")));
        assert!(!member(&bytes, "word/_rels/document.xml.rels").contains(RT::IMAGE));
        assert!(!member(&bytes, "[Content_Types].xml").contains("image/png"));
        assert!(!member(&bytes, "word/document.xml").contains("r:embed"));
    }

    #[test]
    fn test_page_field_bytes() {
        let mut doc = MutableDocument::new();
        doc.footer(0)
            .unwrap()
            .add_paragraph("", None)
            .unwrap()
            .insert_field(FieldCode::page_number())
            .unwrap();
        let footer = member(&doc.to_bytes().unwrap(), "word/footer1.xml");
        assert!(footer.contains(concat!(
            r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r>"#,
            r#"<w:r><w:instrText xml:space="preserve">PAGE</w:instrText></w:r>"#,
            r#"<w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#
        )));
    }

    #[test]
    fn test_section_breaks_and_references() {
        let bytes = report().to_bytes().unwrap();
        let document = member(&bytes, "word/document.xml");

        // First section closes inside a paragraph, the last closes the body
        assert!(document.contains(r#"<w:p><w:pPr><w:sectPr><w:footerReference w:type="default""#));
        assert!(document.ends_with("</w:sectPr></w:body></w:document>"));
        assert!(document.contains(r#"<w:sectPr><w:headerReference w:type="default""#));
        assert!(document.contains(r#"w:orient="landscape""#));
        assert_eq!(document.matches("<w:sectPr>").count(), 2);
    }

    #[test]
    fn test_unknown_style_aborts_serialization() {
        let mut doc = MutableDocument::new();
        let mut paragraph = MutableParagraph::new();
        paragraph.style = Some("Vanished".to_string());
        doc.sections[0].body.blocks.push(Block::Paragraph(paragraph));

        match doc.to_bytes() {
            Err(OoxmlError::UnknownStyle {
                name,
                kind,
                location,
            }) => {
                assert_eq!(name, "Vanished");
                assert_eq!(kind, Some(WdStyleType::Paragraph));
                assert_eq!(location.as_deref(), Some("body of section 0, block 0"));
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_core_properties_option() {
        let mut doc = MutableDocument::new();
        doc.core_properties_mut().creator = Some("Finance".to_string());

        let with = doc.to_bytes().unwrap();
        assert!(members(&with).contains(&"docProps/core.xml".to_string()));
        assert!(member(&with, "_rels/.rels").contains(RT::CORE_PROPERTIES));

        let options = WriterOptions::new().with_core_properties(false);
        let without = doc.to_bytes_with_options(&options).unwrap();
        assert!(!members(&without).contains(&"docProps/core.xml".to_string()));
    }

    #[test]
    fn test_stored_compression_and_invalid_level() {
        let doc = report();
        let options = WriterOptions::new().with_compression(Compression::Stored);
        let bytes = doc.to_bytes_with_options(&options).unwrap();
        let mut zip = archive(&bytes);
        for i in 0..zip.len() {
            let file = zip.by_index(i).unwrap();
            assert_eq!(file.compression(), zip::CompressionMethod::Stored);
        }

        let options = WriterOptions::new().with_compression_level(10);
        assert!(matches!(
            doc.to_bytes_with_options(&options),
            Err(OoxmlError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_write_to() {
        let doc = report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        doc.save(&path).unwrap();

        let saved = std::fs::read(&path).unwrap();
        assert_eq!(saved, doc.to_bytes().unwrap());
        assert!(member(&saved, "word/document.xml").contains("Appendix"));

        let mut sink = Vec::new();
        doc.write_to(&mut sink).unwrap();
        assert_eq!(sink, saved);
    }

    #[test]
    fn test_failed_save_creates_no_file() {
        let mut doc = MutableDocument::new();
        let mut paragraph = MutableParagraph::new();
        paragraph.style = Some("Vanished".to_string());
        doc.sections[0].body.blocks.push(Block::Paragraph(paragraph));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        assert!(doc.save(&path).is_err());
        assert!(!path.exists());
    }
}
