//! Sections: page setup, body content and the default header and footer.
use crate::ooxml::docx::enums::{WdOrientation, WdSectionStart};
use crate::ooxml::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::{RelationshipId, Relationships};
use std::fmt::Write as FmtWrite;

use super::story::Story;

/// Page number format for headers/footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumberFormat {
    /// Decimal numbers (1, 2, 3, ...)
    Decimal,
    /// Uppercase Roman numerals (I, II, III, ...)
    UpperRoman,
    /// Lowercase Roman numerals (i, ii, iii, ...)
    LowerRoman,
    /// Uppercase letters (A, B, C, ...)
    UpperLetter,
    /// Lowercase letters (a, b, c, ...)
    LowerLetter,
}

impl PageNumberFormat {
    /// Value of `w:pgNumType/@w:fmt`.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::UpperRoman => "upperRoman",
            Self::LowerRoman => "lowerRoman",
            Self::UpperLetter => "upperLetter",
            Self::LowerLetter => "lowerLetter",
        }
    }

    /// Argument of a field's `\*` format switch.
    pub(crate) fn switch(&self) -> &'static str {
        match self {
            Self::Decimal => "Arabic",
            Self::UpperRoman => "ROMAN",
            Self::LowerRoman => "roman",
            Self::UpperLetter => "ALPHABETIC",
            Self::LowerLetter => "alphabetic",
        }
    }
}

/// Section properties including page setup and margins.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperties {
    /// Page width in twips (twentieth of a point, 1440 = 1 inch)
    pub page_width: u32,
    /// Page height in twips
    pub page_height: u32,
    pub orientation: WdOrientation,
    /// Top margin in twips
    pub margin_top: u32,
    /// Bottom margin in twips
    pub margin_bottom: u32,
    /// Left margin in twips
    pub margin_left: u32,
    /// Right margin in twips
    pub margin_right: u32,
    /// Header distance from top in twips
    pub header_distance: u32,
    /// Footer distance from bottom in twips
    pub footer_distance: u32,
    /// Number format for the pages of this section
    pub page_number_format: Option<PageNumberFormat>,
    /// Restart page numbering at this value
    pub page_number_start: Option<u32>,
}

impl Default for SectionProperties {
    fn default() -> Self {
        // US Letter size: 8.5" x 11" = 12240 x 15840 twips
        Self {
            page_width: 12240,
            page_height: 15840,
            orientation: WdOrientation::Portrait,
            margin_top: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            margin_right: 1440,
            header_distance: 720,
            footer_distance: 720,
            page_number_format: None,
            page_number_start: None,
        }
    }
}

impl SectionProperties {
    /// Create A4 page size (210mm x 297mm).
    pub fn a4() -> Self {
        Self {
            page_width: 11906,
            page_height: 16838,
            ..Default::default()
        }
    }

    /// Create US Letter page size (8.5" x 11").
    pub fn letter() -> Self {
        Self::default()
    }

    /// Create Legal page size (8.5" x 14").
    pub fn legal() -> Self {
        Self {
            page_width: 12240,
            page_height: 20160,
            ..Default::default()
        }
    }

    /// Set page to landscape orientation, swapping width and height.
    pub fn landscape(mut self) -> Self {
        if self.orientation == WdOrientation::Portrait {
            self.orientation = WdOrientation::Landscape;
            std::mem::swap(&mut self.page_width, &mut self.page_height);
        }
        self
    }

    /// Set margins (all in inches).
    pub fn margins(mut self, top: f64, bottom: f64, left: f64, right: f64) -> Self {
        self.margin_top = (top * 1440.0) as u32;
        self.margin_bottom = (bottom * 1440.0) as u32;
        self.margin_left = (left * 1440.0) as u32;
        self.margin_right = (right * 1440.0) as u32;
        self
    }

    /// Number pages with `format`, optionally restarting at `start`.
    pub fn page_numbering(mut self, format: PageNumberFormat, start: Option<u32>) -> Self {
        self.page_number_format = Some(format);
        self.page_number_start = start;
        self
    }

    /// Width between the left and right margins, in twips.
    pub fn text_width(&self) -> u32 {
        self.page_width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }
}

/// A header or footer story with the relationships of its own part.
#[derive(Debug, Clone)]
pub struct HeaderFooter {
    pub(crate) story: Story,
    pub(crate) rels: Relationships,
}

impl HeaderFooter {
    pub(crate) fn new(partname: PackURI) -> Self {
        Self {
            story: Story::default(),
            rels: Relationships::new(partname),
        }
    }

    /// Partname of the part this story is written to.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        self.rels.source()
    }

    #[inline]
    pub fn story(&self) -> &Story {
        &self.story
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }
}

/// One section of a document.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub(crate) start: WdSectionStart,
    pub(crate) properties: SectionProperties,
    pub(crate) body: Story,
    pub(crate) header: Option<HeaderFooter>,
    pub(crate) footer: Option<HeaderFooter>,
}

impl Section {
    pub(crate) fn new(start: WdSectionStart) -> Self {
        Self {
            start,
            ..Default::default()
        }
    }

    /// How the section begins relative to the previous one.
    #[inline]
    pub fn start(&self) -> WdSectionStart {
        self.start
    }

    pub fn set_start(&mut self, start: WdSectionStart) {
        self.start = start;
    }

    #[inline]
    pub fn properties(&self) -> &SectionProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut SectionProperties {
        &mut self.properties
    }

    pub fn set_properties(&mut self, properties: SectionProperties) {
        self.properties = properties;
    }

    #[inline]
    pub fn body(&self) -> &Story {
        &self.body
    }

    /// The default header, if one was created.
    #[inline]
    pub fn header(&self) -> Option<&HeaderFooter> {
        self.header.as_ref()
    }

    /// The default footer, if one was created.
    #[inline]
    pub fn footer(&self) -> Option<&HeaderFooter> {
        self.footer.as_ref()
    }

    /// Append the `w:sectPr` element, referencing the header and footer parts
    /// through the given main-part relationship ids.
    pub(crate) fn write_properties(
        &self,
        xml: &mut String,
        header: Option<&RelationshipId>,
        footer: Option<&RelationshipId>,
    ) -> Result<()> {
        let props = &self.properties;
        xml.push_str("<w:sectPr>");

        if let Some(r_id) = header {
            write!(xml, r#"<w:headerReference w:type="default" r:id="{}"/>"#, r_id)?;
        }
        if let Some(r_id) = footer {
            write!(xml, r#"<w:footerReference w:type="default" r:id="{}"/>"#, r_id)?;
        }

        write!(xml, r#"<w:type w:val="{}"/>"#, self.start.to_xml())?;

        write!(
            xml,
            r#"<w:pgSz w:w="{}" w:h="{}""#,
            props.page_width, props.page_height
        )?;
        if props.orientation == WdOrientation::Landscape {
            write!(xml, r#" w:orient="{}""#, props.orientation.to_xml())?;
        }
        xml.push_str("/>");

        write!(
            xml,
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
            props.margin_top,
            props.margin_right,
            props.margin_bottom,
            props.margin_left,
            props.header_distance,
            props.footer_distance
        )?;

        if props.page_number_format.is_some() || props.page_number_start.is_some() {
            xml.push_str("<w:pgNumType");
            if let Some(format) = props.page_number_format {
                write!(xml, r#" w:fmt="{}""#, format.as_str())?;
            }
            if let Some(start) = props.page_number_start {
                write!(xml, r#" w:start="{}""#, start)?;
            }
            xml.push_str("/>");
        }

        xml.push_str("</w:sectPr>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(section: &Section, header: Option<&str>) -> String {
        let mut rels = Relationships::new(PackURI::new("/word/document.xml").unwrap());
        let r_id = header.map(|target| rels.add_internal("header", target).unwrap());
        let mut xml = String::new();
        section
            .write_properties(&mut xml, r_id.as_ref(), None)
            .unwrap();
        xml
    }

    #[test]
    fn test_default_section_properties() {
        assert_eq!(
            render(&Section::default(), None),
            concat!(
                r#"<w:sectPr><w:type w:val="nextPage"/><w:pgSz w:w="12240" w:h="15840"/>"#,
                r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" "#,
                r#"w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#
            )
        );
    }

    #[test]
    fn test_landscape_and_numbering() {
        let mut section = Section::new(WdSectionStart::Continuous);
        section.set_properties(
            SectionProperties::a4()
                .landscape()
                .landscape()
                .page_numbering(PageNumberFormat::LowerRoman, Some(1)),
        );
        assert_eq!(section.properties().page_width, 16838);

        let xml = render(&section, Some("header1.xml"));
        assert!(xml.starts_with(
            r#"<w:sectPr><w:headerReference w:type="default" r:id="rId1"/><w:type w:val="continuous"/>"#
        ));
        assert!(xml.contains(r#"<w:pgSz w:w="16838" w:h="11906" w:orient="landscape"/>"#));
        assert!(xml.ends_with(r#"<w:pgNumType w:fmt="lowerRoman" w:start="1"/></w:sectPr>"#));
    }

    #[test]
    fn test_margins_and_text_width() {
        let props = SectionProperties::letter().margins(1.0, 1.0, 0.5, 0.75);
        assert_eq!(props.margin_left, 720);
        assert_eq!(props.margin_right, 1080);
        assert_eq!(props.text_width(), 12240 - 720 - 1080);
    }

    #[test]
    fn test_format_switches() {
        assert_eq!(PageNumberFormat::Decimal.switch(), "Arabic");
        assert_eq!(PageNumberFormat::UpperLetter.as_str(), "upperLetter");
    }
}
