/// Paragraph types and implementation for DOCX documents.
use crate::ooxml::docx::enums::WdStyleType;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as RT;
use crate::ooxml::opc::rel::{RelationshipId, Relationships};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::ops::{Deref, DerefMut};

pub use super::super::format::{LineSpacing, ParagraphAlignment, ParagraphBorders};
use super::field::FieldCode;
use super::hyperlink::MutableHyperlink;
use super::image::InlineImage;
use super::media::MediaStore;
use super::run::{BreakType, MutableRun, RunContent, RunProperties};
use super::story::StoryContext;
use super::style::StyleRegistry;

/// Elements that can appear in a paragraph.
#[derive(Debug, Clone)]
pub enum Inline {
    Run(MutableRun),
    /// A computed field, written as three contiguous runs
    Field(FieldCode),
    Hyperlink(MutableHyperlink),
}

/// Paragraph properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ParagraphProperties {
    pub(crate) alignment: Option<ParagraphAlignment>,
    /// Twips
    pub(crate) space_before: Option<u32>,
    pub(crate) space_after: Option<u32>,
    pub(crate) line_spacing: Option<LineSpacing>,
    pub(crate) indent_left: Option<u32>,
    pub(crate) indent_right: Option<u32>,
    /// At most one of `first_line` and `hanging` is set
    pub(crate) first_line: Option<u32>,
    pub(crate) hanging: Option<u32>,
    pub(crate) borders: ParagraphBorders,
    pub(crate) keep_next: bool,
    pub(crate) page_break_before: bool,
}

impl ParagraphProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.alignment.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line_spacing.is_some()
            || self.indent_left.is_some()
            || self.indent_right.is_some()
            || self.first_line.is_some()
            || self.hanging.is_some()
            || !self.borders.is_empty()
            || self.keep_next
            || self.page_break_before
    }
}

/// A mutable paragraph in a document.
#[derive(Debug, Clone, Default)]
pub struct MutableParagraph {
    pub(crate) elements: Vec<Inline>,
    /// Paragraph style name
    pub(crate) style: Option<String>,
    pub(crate) properties: ParagraphProperties,
}

impl MutableParagraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_text(&mut self, text: &str, properties: RunProperties) -> &mut MutableRun {
        self.push_run(MutableRun::new(RunContent::Text(text.to_string()), properties))
    }

    pub(crate) fn push_break(&mut self, kind: BreakType) -> &mut MutableRun {
        self.push_run(MutableRun::new(
            RunContent::Break(kind),
            RunProperties::default(),
        ))
    }

    fn push_run(&mut self, run: MutableRun) -> &mut MutableRun {
        self.elements.push(Inline::Run(run));
        match self.elements.last_mut() {
            Some(Inline::Run(r)) => r,
            _ => unreachable!(),
        }
    }

    /// Name of the paragraph style, if any.
    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    #[inline]
    pub fn elements(&self) -> &[Inline] {
        &self.elements
    }

    /// Get the number of inline elements.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Concatenated text of runs and hyperlinks.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for element in &self.elements {
            match element {
                Inline::Run(run) => text.push_str(run.text()),
                Inline::Hyperlink(link) => text.push_str(link.run().text()),
                Inline::Field(_) => {},
            }
        }
        text
    }

    /// The hyperlink that owns relationship `r_id`.
    pub fn hyperlink_mut(&mut self, r_id: &RelationshipId) -> Option<&mut MutableHyperlink> {
        self.elements.iter_mut().find_map(|element| match element {
            Inline::Hyperlink(link) if link.r_id == *r_id => Some(link),
            _ => None,
        })
    }

    /// The picture embedded through relationship `r_id`.
    pub fn picture_mut(&mut self, r_id: &RelationshipId) -> Option<&mut InlineImage> {
        self.elements.iter_mut().find_map(|element| match element {
            Inline::Run(MutableRun {
                content: RunContent::Picture(image),
                ..
            }) if image.r_id == *r_id => Some(image),
            _ => None,
        })
    }

    /// Relationship ids held by the hyperlinks and pictures of the paragraph.
    pub(crate) fn relationship_ids(&self) -> impl Iterator<Item = &RelationshipId> {
        self.elements.iter().filter_map(|element| match element {
            Inline::Run(MutableRun {
                content: RunContent::Picture(image),
                ..
            }) => Some(&image.r_id),
            Inline::Hyperlink(link) => Some(&link.r_id),
            _ => None,
        })
    }

    pub(crate) fn pictures(&self) -> impl Iterator<Item = &InlineImage> {
        self.elements.iter().filter_map(|element| match element {
            Inline::Run(MutableRun {
                content: RunContent::Picture(image),
                ..
            }) => Some(image),
            _ => None,
        })
    }

    /// Set paragraph alignment.
    pub fn set_alignment(&mut self, alignment: ParagraphAlignment) {
        self.properties.alignment = Some(alignment);
    }

    /// Set spacing before this paragraph (in points).
    pub fn set_space_before(&mut self, points: f64) {
        self.properties.space_before = Some((points * 20.0) as u32);
    }

    /// Set spacing after this paragraph (in points).
    pub fn set_space_after(&mut self, points: f64) {
        self.properties.space_after = Some((points * 20.0) as u32);
    }

    pub fn set_line_spacing(&mut self, spacing: LineSpacing) {
        self.properties.line_spacing = Some(spacing);
    }

    /// Set left indentation (in inches).
    pub fn set_indent_left(&mut self, inches: f64) {
        self.properties.indent_left = Some((inches * 1440.0) as u32);
    }

    /// Set right indentation (in inches).
    pub fn set_indent_right(&mut self, inches: f64) {
        self.properties.indent_right = Some((inches * 1440.0) as u32);
    }

    /// Set first line indentation (in inches). Clears any hanging indent.
    pub fn set_indent_first_line(&mut self, inches: f64) {
        self.properties.first_line = Some((inches * 1440.0) as u32);
        self.properties.hanging = None;
    }

    /// Set a hanging indent (in inches). Clears any first line indent.
    pub fn set_indent_hanging(&mut self, inches: f64) {
        self.properties.hanging = Some((inches * 1440.0) as u32);
        self.properties.first_line = None;
    }

    pub fn set_borders(&mut self, borders: ParagraphBorders) {
        self.properties.borders = borders;
    }

    /// Keep this paragraph on the same page as the next one.
    pub fn set_keep_with_next(&mut self, keep: bool) {
        self.properties.keep_next = keep;
    }

    pub fn set_page_break_before(&mut self, page_break: bool) {
        self.properties.page_break_before = page_break;
    }

    pub(crate) fn validate(
        &self,
        styles: &StyleRegistry,
        rels: &Relationships,
        location: &str,
    ) -> Result<()> {
        let unknown = |name: &str, kind: WdStyleType, at: String| OoxmlError::UnknownStyle {
            name: name.to_string(),
            kind: Some(kind),
            location: Some(at),
        };
        let unresolved = |r_id: &RelationshipId| OoxmlError::UnresolvedRelationship {
            r_id: r_id.to_string(),
            part: rels.source().to_string(),
        };

        if let Some(ref name) = self.style
            && !styles.contains(name, WdStyleType::Paragraph)
        {
            return Err(unknown(name, WdStyleType::Paragraph, location.to_string()));
        }

        for (idx, element) in self.elements.iter().enumerate() {
            let (properties, r_id) = match element {
                Inline::Run(run) => match &run.content {
                    RunContent::Picture(image) => (&run.properties, Some(&image.r_id)),
                    _ => (&run.properties, None),
                },
                Inline::Field(field) => (field.properties(), None),
                Inline::Hyperlink(link) => (&link.run.properties, Some(&link.r_id)),
            };
            if let Some(name) = properties.style()
                && !styles.contains(name, WdStyleType::Character)
            {
                return Err(unknown(
                    name,
                    WdStyleType::Character,
                    format!("{location}, inline {idx}"),
                ));
            }
            if let Some(r_id) = r_id
                && !rels.contains(r_id.as_str())
            {
                return Err(unresolved(r_id));
            }
        }
        Ok(())
    }

    pub(crate) fn style_references(&self, name: &str, kind: WdStyleType) -> usize {
        match kind {
            WdStyleType::Paragraph => usize::from(self.style.as_deref() == Some(name)),
            WdStyleType::Character => self
                .elements
                .iter()
                .filter(|element| {
                    let properties = match element {
                        Inline::Run(run) => &run.properties,
                        Inline::Field(field) => field.properties(),
                        Inline::Hyperlink(link) => &link.run.properties,
                    };
                    properties.style() == Some(name)
                })
                .count(),
            WdStyleType::Table => 0,
        }
    }

    /// Append the `w:pPr` element, if the paragraph has any property.
    fn write_properties(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        let props = &self.properties;
        if self.style.is_none() && !props.has_properties() {
            return Ok(());
        }
        xml.push_str("<w:pPr>");

        if let Some(ref name) = self.style {
            let style = styles.resolve_kind(name, WdStyleType::Paragraph)?;
            write!(xml, r#"<w:pStyle w:val="{}"/>"#, escape(style.style_id()))?;
        }
        if props.keep_next {
            xml.push_str("<w:keepNext/>");
        }
        if props.page_break_before {
            xml.push_str("<w:pageBreakBefore/>");
        }
        props.borders.write_xml(xml);

        if props.space_before.is_some() || props.space_after.is_some() || props.line_spacing.is_some()
        {
            xml.push_str("<w:spacing");
            if let Some(before) = props.space_before {
                write!(xml, r#" w:before="{}""#, before)?;
            }
            if let Some(after) = props.space_after {
                write!(xml, r#" w:after="{}""#, after)?;
            }
            if let Some(spacing) = props.line_spacing {
                let (line, rule) = spacing.line_and_rule();
                write!(xml, r#" w:line="{}" w:lineRule="{}""#, line, rule)?;
            }
            xml.push_str("/>");
        }

        if props.indent_left.is_some()
            || props.indent_right.is_some()
            || props.first_line.is_some()
            || props.hanging.is_some()
        {
            xml.push_str("<w:ind");
            if let Some(left) = props.indent_left {
                write!(xml, r#" w:left="{}""#, left)?;
            }
            if let Some(right) = props.indent_right {
                write!(xml, r#" w:right="{}""#, right)?;
            }
            if let Some(first_line) = props.first_line {
                write!(xml, r#" w:firstLine="{}""#, first_line)?;
            }
            if let Some(hanging) = props.hanging {
                write!(xml, r#" w:hanging="{}""#, hanging)?;
            }
            xml.push_str("/>");
        }

        if let Some(alignment) = props.alignment {
            write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_str())?;
        }

        xml.push_str("</w:pPr>");
        Ok(())
    }

    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        xml.push_str("<w:p>");
        self.write_properties(xml, styles)?;
        for element in &self.elements {
            match element {
                Inline::Run(run) => run.write_xml(xml, styles)?,
                Inline::Field(field) => field.write_xml(xml, styles)?,
                Inline::Hyperlink(link) => link.write_xml(xml, styles)?,
            }
        }
        xml.push_str("</w:p>");
        Ok(())
    }
}

/// Mutable access to a paragraph inside a story.
///
/// Dereferences to [`MutableParagraph`] for formatting; the methods here
/// validate styles and register relationships in the enclosing part.
#[derive(Debug)]
pub struct ParagraphMut<'a> {
    paragraph: &'a mut MutableParagraph,
    ctx: StoryContext<'a>,
}

impl<'a> ParagraphMut<'a> {
    pub(crate) fn new(paragraph: &'a mut MutableParagraph, ctx: StoryContext<'a>) -> Self {
        Self { paragraph, ctx }
    }

    /// Set the paragraph style, failing with [`OoxmlError::UnknownStyle`]
    /// when no paragraph style has that name.
    pub fn set_style(&mut self, name: &str) -> Result<()> {
        self.ctx.check_style(Some(name), WdStyleType::Paragraph)?;
        self.paragraph.style = Some(name.to_string());
        Ok(())
    }

    /// Append a text run.
    pub fn add_run(&mut self, text: &str, properties: RunProperties) -> Result<&mut MutableRun> {
        self.ctx
            .check_style(properties.style(), WdStyleType::Character)?;
        Ok(self.paragraph.push_text(text, properties))
    }

    /// Append a run holding a line or page break.
    pub fn add_break(&mut self, kind: BreakType) -> &mut MutableRun {
        self.paragraph.push_break(kind)
    }

    /// Append a computed field.
    pub fn insert_field(&mut self, field: FieldCode) -> Result<()> {
        self.ctx
            .check_style(field.properties().style(), WdStyleType::Character)?;
        self.paragraph.elements.push(Inline::Field(field));
        Ok(())
    }

    /// Append a hyperlink to `url` displaying `text`.
    ///
    /// Mints one external relationship in the enclosing part and returns its
    /// id. The run uses the `Hyperlink` character style unless `style` names
    /// another.
    pub fn insert_hyperlink(
        &mut self,
        text: &str,
        url: &str,
        style: Option<&str>,
    ) -> Result<RelationshipId> {
        let style = style.unwrap_or("Hyperlink");
        self.ctx.check_style(Some(style), WdStyleType::Character)?;

        let r_id = self.ctx.rels.add_external(RT::HYPERLINK, url)?;
        let run = MutableRun::new(
            RunContent::Text(text.to_string()),
            RunProperties::new().with_style(style),
        );
        self.paragraph
            .elements
            .push(Inline::Hyperlink(MutableHyperlink {
                r_id: r_id.clone(),
                url: url.to_string(),
                run,
                tooltip: None,
            }));
        Ok(r_id)
    }

    /// Embed a picture in a new run.
    ///
    /// Sizes are in EMUs. Given only a width, the height follows the
    /// picture's aspect ratio; given neither, the native size at 96 DPI is
    /// used. Fails with [`OoxmlError::InvalidFormat`] for bytes that are not
    /// a recognized image format.
    pub fn add_picture(
        &mut self,
        data: Vec<u8>,
        width_emu: Option<i64>,
        height_emu: Option<i64>,
    ) -> Result<RelationshipId> {
        let prepared = MediaStore::prepare(&data, width_emu, height_emu)?;
        let partname = self.ctx.media.next_partname(prepared.format);
        let r_id = self.ctx.rels.relate_to(RT::IMAGE, &partname)?;
        let drawing_id = self
            .ctx
            .media
            .push(partname.clone(), prepared.format, data);

        let image = InlineImage {
            r_id: r_id.clone(),
            partname,
            width_emu: prepared.width_emu,
            height_emu: prepared.height_emu,
            drawing_id,
            description: String::new(),
        };
        self.paragraph.push_run(MutableRun::new(
            RunContent::Picture(image),
            RunProperties::default(),
        ));
        Ok(r_id)
    }
}

impl Deref for ParagraphMut<'_> {
    type Target = MutableParagraph;

    fn deref(&self) -> &MutableParagraph {
        self.paragraph
    }
}

impl DerefMut for ParagraphMut<'_> {
    fn deref_mut(&mut self) -> &mut MutableParagraph {
        self.paragraph
    }
}
