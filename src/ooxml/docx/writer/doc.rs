/// Document writer implementation for DOCX.
use crate::ooxml::docx::enums::{WdSectionStart, WdStyleType};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;

use super::media::MediaStore;
use super::paragraph::ParagraphMut;
use super::props::CoreProperties;
use super::section::{HeaderFooter, Section};
use super::story::{Block, StoryContext, StoryMut};
use super::style::{MutableStyle, StyleId, StyleRegistry};

/// Partname of the main document part.
pub(crate) const DOCUMENT_PARTNAME: &str = "/word/document.xml";

/// A mutable Word document for writing.
///
/// The document owns its sections, the style registry, the relationships of
/// the main document part, the embedded media and the core properties.
/// Content is reached through story handles ([`StoryMut`]) that validate
/// styles and register relationships as content is inserted.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::writer::{FieldCode, MutableDocument};
///
/// let mut doc = MutableDocument::new();
/// doc.add_heading("Quarterly report", 1)?;
/// doc.add_paragraph("Revenue grew in every region.", None)?;
///
/// let mut footer = doc.footer(0).unwrap();
/// let mut p = footer.add_paragraph("Page ", Some("Footer"))?;
/// p.insert_field(FieldCode::page_number())?;
///
/// let bytes = doc.to_bytes()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), longan::ooxml::OoxmlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MutableDocument {
    /// Never empty
    pub(crate) sections: Vec<Section>,
    pub(crate) styles: StyleRegistry,
    /// Relationships of the main document part
    pub(crate) rels: Relationships,
    pub(crate) media: MediaStore,
    pub(crate) core_properties: CoreProperties,
    /// Last header / footer part number handed out
    header_count: u32,
    footer_count: u32,
}

impl MutableDocument {
    /// Create a new document holding one empty section.
    pub fn new() -> Self {
        Self {
            sections: vec![Section::default()],
            styles: StyleRegistry::default(),
            rels: Relationships::new(PackURI::trusted(DOCUMENT_PARTNAME)),
            media: MediaStore::default(),
            core_properties: CoreProperties::default(),
            header_count: 0,
            footer_count: 0,
        }
    }

    /// Append a section and return its index.
    pub fn add_section(&mut self, start: WdSectionStart) -> usize {
        self.sections.push(Section::new(start));
        self.sections.len() - 1
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, idx: usize) -> Option<&Section> {
        self.sections.get(idx)
    }

    /// Page setup and start type of a section.
    pub fn section_mut(&mut self, idx: usize) -> Option<&mut Section> {
        self.sections.get_mut(idx)
    }

    /// The body of section `idx`.
    pub fn body(&mut self, idx: usize) -> Option<StoryMut<'_>> {
        let section = self.sections.get_mut(idx)?;
        Some(StoryMut::new(
            &mut section.body,
            StoryContext {
                styles: &self.styles,
                rels: &mut self.rels,
                media: &mut self.media,
            },
        ))
    }

    /// The default header of section `idx`, created on first access.
    ///
    /// A header left empty is not written to the package.
    pub fn header(&mut self, idx: usize) -> Option<StoryMut<'_>> {
        let section = self.sections.get_mut(idx)?;
        let counter = &mut self.header_count;
        let header = section.header.get_or_insert_with(|| {
            *counter += 1;
            HeaderFooter::new(PackURI::numbered("/word", "header", *counter, "xml"))
        });
        Some(StoryMut::new(
            &mut header.story,
            StoryContext {
                styles: &self.styles,
                rels: &mut header.rels,
                media: &mut self.media,
            },
        ))
    }

    /// The default footer of section `idx`, created on first access.
    pub fn footer(&mut self, idx: usize) -> Option<StoryMut<'_>> {
        let section = self.sections.get_mut(idx)?;
        let counter = &mut self.footer_count;
        let footer = section.footer.get_or_insert_with(|| {
            *counter += 1;
            HeaderFooter::new(PackURI::numbered("/word", "footer", *counter, "xml"))
        });
        Some(StoryMut::new(
            &mut footer.story,
            StoryContext {
                styles: &self.styles,
                rels: &mut footer.rels,
                media: &mut self.media,
            },
        ))
    }

    /// The body of the last section.
    fn last_body(&mut self) -> StoryMut<'_> {
        let section = match self.sections.last_mut() {
            Some(section) => section,
            None => unreachable!(),
        };
        StoryMut::new(
            &mut section.body,
            StoryContext {
                styles: &self.styles,
                rels: &mut self.rels,
                media: &mut self.media,
            },
        )
    }

    /// Add a paragraph to the end of the last section.
    pub fn add_paragraph(&mut self, text: &str, style: Option<&str>) -> Result<ParagraphMut<'_>> {
        self.last_body().into_paragraph(text, style)
    }

    /// Add a heading paragraph. Level 0 is the title.
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<ParagraphMut<'_>> {
        if level > 9 {
            return Err(OoxmlError::InvalidFormat(
                "Heading level must be 0-9".to_string(),
            ));
        }
        let style = if level == 0 {
            "Title".to_string()
        } else {
            format!("Heading {}", level)
        };
        self.add_paragraph(text, Some(&style))
    }

    /// Get the number of paragraphs in all section bodies.
    pub fn paragraph_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.body.paragraphs().count())
            .sum()
    }

    /// Get the number of tables in all section bodies.
    pub fn table_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.body.blocks())
            .filter(|b| matches!(b, Block::Table(_)))
            .count()
    }

    #[inline]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Register a style. See [`StyleRegistry::define`].
    pub fn define_style(
        &mut self,
        name: &str,
        kind: WdStyleType,
        style: MutableStyle,
    ) -> Result<StyleId> {
        self.styles.define(name, kind, style)
    }

    /// Remove a style that nothing references.
    ///
    /// Fails with [`OoxmlError::StyleInUse`] while content or another
    /// style's `basedOn` refers to it, and with [`OoxmlError::UnknownStyle`]
    /// when no such style exists.
    pub fn remove_style(&mut self, name: &str, kind: WdStyleType) -> Result<MutableStyle> {
        self.styles.resolve_kind(name, kind)?;

        let references =
            self.style_references(name, kind) + self.styles.based_on_references(name, kind);
        if references > 0 {
            return Err(OoxmlError::StyleInUse {
                name: name.to_string(),
                references,
            });
        }

        self.styles
            .remove(name, kind)
            .ok_or_else(|| OoxmlError::UnknownStyle {
                name: name.to_string(),
                kind: Some(kind),
                location: None,
            })
    }

    /// Count content references to a style across every story.
    fn style_references(&self, name: &str, kind: WdStyleType) -> usize {
        self.sections
            .iter()
            .map(|section| {
                let stories = [
                    Some(&section.body),
                    section.header.as_ref().map(|h| &h.story),
                    section.footer.as_ref().map(|f| &f.story),
                ];
                stories
                    .into_iter()
                    .flatten()
                    .map(|story| story.style_references(name, kind))
                    .sum::<usize>()
            })
            .sum()
    }

    #[inline]
    pub fn core_properties(&self) -> &CoreProperties {
        &self.core_properties
    }

    pub fn core_properties_mut(&mut self) -> &mut CoreProperties {
        &mut self.core_properties
    }

    pub fn set_core_properties(&mut self, properties: CoreProperties) {
        self.core_properties = properties;
    }

    #[inline]
    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Relationships of the main document part.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Check every style and relationship reference in every story.
    pub(crate) fn validate(&self) -> Result<()> {
        for (idx, section) in self.sections.iter().enumerate() {
            section
                .body
                .validate(&self.styles, &self.rels, &format!("body of section {idx}"))?;
            if let Some(ref header) = section.header {
                header.story.validate(
                    &self.styles,
                    &header.rels,
                    &format!("header of section {idx}"),
                )?;
            }
            if let Some(ref footer) = section.footer {
                footer.story.validate(
                    &self.styles,
                    &footer.rels,
                    &format!("footer of section {idx}"),
                )?;
            }
        }
        Ok(())
    }
}

impl Default for MutableDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::media::tests::png;

    #[test]
    fn test_create_empty_document() {
        let doc = MutableDocument::new();
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.paragraph_count(), 0);
        assert_eq!(doc.table_count(), 0);
        assert_eq!(doc.rels().source().as_str(), DOCUMENT_PARTNAME);
    }

    #[test]
    fn test_document_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<MutableDocument>();
    }

    #[test]
    fn test_add_paragraph_goes_to_last_section() {
        let mut doc = MutableDocument::new();
        doc.add_paragraph("first", None).unwrap();
        let idx = doc.add_section(WdSectionStart::Continuous);
        assert_eq!(idx, 1);
        doc.add_paragraph("second", None).unwrap();
        doc.body(0).unwrap().add_table(2, 2, Some("Table Grid")).unwrap();

        assert_eq!(doc.section(0).unwrap().body().len(), 2);
        assert_eq!(doc.section(1).unwrap().body().len(), 1);
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.table_count(), 1);
        assert!(doc.body(2).is_none());
    }

    #[test]
    fn test_headings() {
        let mut doc = MutableDocument::new();
        assert_eq!(doc.add_heading("T", 0).unwrap().style(), Some("Title"));
        for level in 1..=9u8 {
            let expected = format!("Heading {level}");
            assert_eq!(
                doc.add_heading("H", level).unwrap().style(),
                Some(expected.as_str())
            );
        }
        assert_eq!(
            doc.add_paragraph("item", Some("List Number 2"))
                .unwrap()
                .style(),
            Some("List Number 2")
        );
        assert!(matches!(
            doc.add_heading("H", 10),
            Err(OoxmlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_headers_and_footers_are_numbered_per_kind() {
        let mut doc = MutableDocument::new();
        doc.add_section(WdSectionStart::NewPage);
        doc.header(1).unwrap();
        doc.header(0).unwrap();
        doc.footer(1).unwrap();
        // Second access reuses the story
        doc.header(1).unwrap();

        let partname = |s: usize, header: bool| {
            let section = doc.section(s).unwrap();
            let hf = if header { section.header() } else { section.footer() };
            hf.map(|hf| hf.partname().as_str().to_string())
        };
        assert_eq!(partname(1, true).as_deref(), Some("/word/header1.xml"));
        assert_eq!(partname(0, true).as_deref(), Some("/word/header2.xml"));
        assert_eq!(partname(1, false).as_deref(), Some("/word/footer1.xml"));
        assert_eq!(partname(0, false), None);
    }

    #[test]
    fn test_header_relationships_are_part_local() {
        let mut doc = MutableDocument::new();
        {
            let mut header = doc.header(0).unwrap();
            let mut p = header.add_paragraph("", Some("Header")).unwrap();
            p.add_picture(png(4, 4), None, None).unwrap();
            p.insert_hyperlink("site", "https://example.org", None).unwrap();
        }
        let header = doc.section(0).unwrap().header().unwrap();
        assert_eq!(header.rels().len(), 2);
        assert!(doc.rels().is_empty());
        assert_eq!(doc.media().len(), 1);
        doc.validate().unwrap();
    }

    #[test]
    fn test_remove_style() {
        let mut doc = MutableDocument::new();
        let mut base = MutableStyle::new();
        base.set_bold(true);
        doc.define_style("Callout", WdStyleType::Paragraph, base).unwrap();
        let mut derived = MutableStyle::new();
        derived.set_based_on(Some("Callout".to_string()));
        doc.define_style("Callout Small", WdStyleType::Paragraph, derived)
            .unwrap();
        doc.add_paragraph("x", Some("Callout Small")).unwrap();

        // Referenced by the paragraph
        assert!(matches!(
            doc.remove_style("Callout Small", WdStyleType::Paragraph),
            Err(OoxmlError::StyleInUse { references: 1, .. })
        ));
        // Referenced through basedOn
        assert!(matches!(
            doc.remove_style("Callout", WdStyleType::Paragraph),
            Err(OoxmlError::StyleInUse { references: 1, .. })
        ));
        assert!(matches!(
            doc.remove_style("Callout", WdStyleType::Character),
            Err(OoxmlError::UnknownStyle { .. })
        ));

        // Unused built-ins may go
        let removed = doc
            .remove_style("List Bullet", WdStyleType::Paragraph)
            .unwrap();
        assert_eq!(removed.style_id(), "ListBullet");
        assert!(!doc.styles().contains("List Bullet", WdStyleType::Paragraph));
    }

    #[test]
    fn test_style_references_cover_headers_and_cells() {
        let mut doc = MutableDocument::new();
        doc.header(0)
            .unwrap()
            .add_paragraph("h", Some("Title"))
            .unwrap();
        {
            let mut body = doc.body(0).unwrap();
            let mut table = body.add_table(1, 1, None).unwrap();
            table
                .cell(0, 0)
                .unwrap()
                .add_paragraph("c", Some("Title"))
                .unwrap();
        }
        assert!(matches!(
            doc.remove_style("Title", WdStyleType::Paragraph),
            Err(OoxmlError::StyleInUse { references: 2, .. })
        ));
    }
}
