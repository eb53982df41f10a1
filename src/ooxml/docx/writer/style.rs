/// Style definitions and the per-document style registry.
///
/// Content refers to styles by name only. The registry maps each name to a
/// [`MutableStyle`] of one kind (paragraph, character or table), generates the
/// `w:styleId` written into the package and renders the styles part.
use crate::ooxml::docx::enums::WdStyleType;
use crate::ooxml::docx::format::{LineSpacing, ParagraphAlignment};
use crate::ooxml::error::{OoxmlError, Result};
use log::trace;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

use super::run::write_fonts;

/// The `w:styleId` generated for a registered style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleId(String);

impl StyleId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for StyleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A style definition.
///
/// Build the formatting with the setters, then hand the style to
/// [`StyleRegistry::define`] (or `MutableDocument::define_style`), which
/// assigns its name, kind and identifier.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::enums::WdStyleType;
/// use longan::ooxml::docx::writer::{MutableStyle, StyleRegistry};
///
/// let mut registry = StyleRegistry::default();
/// let mut style = MutableStyle::new();
/// style.set_based_on(Some("Normal".to_string()));
/// style.set_font_size(Some(36));
/// style.set_bold(true);
///
/// let id = registry.define("MyTitle", WdStyleType::Paragraph, style)?;
/// assert_eq!(id.as_str(), "MyTitle");
/// # Ok::<(), longan::ooxml::error::OoxmlError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MutableStyle {
    /// UI-visible name, unique per kind (e.g., "Heading 1")
    name: String,
    /// Identifier written as `w:styleId`, unique across the registry
    style_id: String,
    style_type: WdStyleType,
    /// Whether this is the default style for its type
    is_default: bool,
    /// Whether this is a user-defined style
    is_custom: bool,
    /// Name of the style this one inherits from (same kind)
    based_on: Option<String>,
    /// UI priority for display ordering (lower = higher priority)
    priority: Option<i32>,
    is_quick_style: bool,
    /// Font family for Latin text
    font_name: Option<String>,
    /// Font family for East Asian text
    east_asia_font: Option<String>,
    /// Font size in half-points (e.g., 24 = 12pt)
    font_size: Option<u32>,
    bold: bool,
    italic: bool,
    underline: bool,
    /// Font color (RGB hex, e.g., "FF0000")
    color: Option<String>,
    alignment: Option<ParagraphAlignment>,
    /// Space before paragraph in twips
    space_before: Option<u32>,
    /// Space after paragraph in twips
    space_after: Option<u32>,
    line_spacing: Option<LineSpacing>,
    /// Left indent in twips
    indent_left: Option<i32>,
    /// Right indent in twips
    indent_right: Option<i32>,
    /// First line indent in twips (negative for hanging)
    indent_first_line: Option<i32>,
    keep_next: bool,
    /// Single-line borders around and inside table cells
    table_borders: bool,
    /// Left and right cell margin in twips for table styles
    cell_margin: Option<u32>,
}

impl MutableStyle {
    /// Create an empty user-defined style.
    pub fn new() -> Self {
        Self {
            is_custom: true,
            ..Default::default()
        }
    }

    fn builtin(style_id: &str, name: &str, style_type: WdStyleType) -> Self {
        Self {
            name: name.to_string(),
            style_id: style_id.to_string(),
            style_type,
            ..Default::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    #[inline]
    pub fn style_type(&self) -> WdStyleType {
        self.style_type
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// Name of the style this one is based on.
    #[inline]
    pub fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }

    /// Set the name of the base style.
    ///
    /// The base must be registered with the same kind by the time this style
    /// is defined.
    pub fn set_based_on(&mut self, based_on: Option<String>) {
        self.based_on = based_on;
    }

    /// Set the UI priority (lower values appear first).
    pub fn set_priority(&mut self, priority: Option<i32>) {
        self.priority = priority;
    }

    /// Set whether to show in the quick style gallery.
    pub fn set_quick_style(&mut self, is_quick_style: bool) {
        self.is_quick_style = is_quick_style;
    }

    pub fn set_font_name(&mut self, font_name: Option<String>) {
        self.font_name = font_name;
    }

    pub fn set_east_asia_font(&mut self, font_name: Option<String>) {
        self.east_asia_font = font_name;
    }

    /// Set the font size in half-points (e.g., 24 = 12pt).
    pub fn set_font_size(&mut self, font_size: Option<u32>) {
        self.font_size = font_size;
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.italic = italic;
    }

    pub fn set_underline(&mut self, underline: bool) {
        self.underline = underline;
    }

    /// Set the font color (RGB hex format, e.g., "FF0000" for red).
    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    pub fn set_alignment(&mut self, alignment: Option<ParagraphAlignment>) {
        self.alignment = alignment;
    }

    /// Set space before paragraph in twips (1/1440 inch).
    pub fn set_space_before(&mut self, space_before: Option<u32>) {
        self.space_before = space_before;
    }

    /// Set space after paragraph in twips.
    pub fn set_space_after(&mut self, space_after: Option<u32>) {
        self.space_after = space_after;
    }

    pub fn set_line_spacing(&mut self, line_spacing: Option<LineSpacing>) {
        self.line_spacing = line_spacing;
    }

    /// Set left indent in twips.
    pub fn set_indent_left(&mut self, indent_left: Option<i32>) {
        self.indent_left = indent_left;
    }

    /// Set right indent in twips.
    pub fn set_indent_right(&mut self, indent_right: Option<i32>) {
        self.indent_right = indent_right;
    }

    /// Set first line indent in twips (negative for hanging indent).
    pub fn set_indent_first_line(&mut self, indent_first_line: Option<i32>) {
        self.indent_first_line = indent_first_line;
    }

    /// Keep paragraphs of this style on the same page as the next one.
    pub fn set_keep_next(&mut self, keep_next: bool) {
        self.keep_next = keep_next;
    }

    /// Draw single-line borders around and between cells (table styles).
    pub fn set_table_borders(&mut self, table_borders: bool) {
        self.table_borders = table_borders;
    }

    fn has_paragraph_properties(&self) -> bool {
        self.keep_next
            || self.alignment.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line_spacing.is_some()
            || self.indent_left.is_some()
            || self.indent_right.is_some()
            || self.indent_first_line.is_some()
    }

    fn has_run_properties(&self) -> bool {
        self.font_name.is_some()
            || self.east_asia_font.is_some()
            || self.font_size.is_some()
            || self.bold
            || self.italic
            || self.underline
            || self.color.is_some()
    }

    /// Append the `w:style` element. `based_on_id` is the resolved identifier
    /// of the base style.
    fn write_xml(&self, xml: &mut String, based_on_id: Option<&str>) -> Result<()> {
        write!(
            xml,
            r#"<w:style w:type="{}" w:styleId="{}""#,
            self.style_type.to_xml(),
            escape(self.style_id.as_str())
        )?;
        if self.is_default {
            xml.push_str(r#" w:default="1""#);
        }
        if self.is_custom {
            xml.push_str(r#" w:customStyle="1""#);
        }
        xml.push('>');

        write!(xml, r#"<w:name w:val="{}"/>"#, escape(self.name.as_str()))?;
        if let Some(based_on) = based_on_id {
            write!(xml, r#"<w:basedOn w:val="{}"/>"#, escape(based_on))?;
        }
        if let Some(priority) = self.priority {
            write!(xml, r#"<w:uiPriority w:val="{}"/>"#, priority)?;
        }
        if self.is_quick_style {
            xml.push_str("<w:qFormat/>");
        }

        if self.style_type == WdStyleType::Paragraph && self.has_paragraph_properties() {
            xml.push_str("<w:pPr>");
            if self.keep_next {
                xml.push_str("<w:keepNext/>");
            }
            if self.space_before.is_some()
                || self.space_after.is_some()
                || self.line_spacing.is_some()
            {
                xml.push_str("<w:spacing");
                if let Some(before) = self.space_before {
                    write!(xml, r#" w:before="{}""#, before)?;
                }
                if let Some(after) = self.space_after {
                    write!(xml, r#" w:after="{}""#, after)?;
                }
                if let Some(spacing) = self.line_spacing {
                    let (line, rule) = spacing.line_and_rule();
                    write!(xml, r#" w:line="{}" w:lineRule="{}""#, line, rule)?;
                }
                xml.push_str("/>");
            }
            if self.indent_left.is_some()
                || self.indent_right.is_some()
                || self.indent_first_line.is_some()
            {
                xml.push_str("<w:ind");
                if let Some(left) = self.indent_left {
                    write!(xml, r#" w:left="{}""#, left)?;
                }
                if let Some(right) = self.indent_right {
                    write!(xml, r#" w:right="{}""#, right)?;
                }
                if let Some(first_line) = self.indent_first_line {
                    if first_line >= 0 {
                        write!(xml, r#" w:firstLine="{}""#, first_line)?;
                    } else {
                        write!(xml, r#" w:hanging="{}""#, -first_line)?;
                    }
                }
                xml.push_str("/>");
            }
            if let Some(alignment) = self.alignment {
                write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_str())?;
            }
            xml.push_str("</w:pPr>");
        }

        if self.has_run_properties() {
            xml.push_str("<w:rPr>");
            write_fonts(xml, self.font_name.as_deref(), self.east_asia_font.as_deref())?;
            if self.bold {
                xml.push_str("<w:b/>");
            }
            if self.italic {
                xml.push_str("<w:i/>");
            }
            if let Some(ref color) = self.color {
                write!(xml, r#"<w:color w:val="{}"/>"#, escape(color.as_str()))?;
            }
            if let Some(size) = self.font_size {
                write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)?;
            }
            if self.underline {
                xml.push_str(r#"<w:u w:val="single"/>"#);
            }
            xml.push_str("</w:rPr>");
        }

        if self.style_type == WdStyleType::Table
            && (self.table_borders || self.cell_margin.is_some())
        {
            xml.push_str("<w:tblPr>");
            xml.push_str(r#"<w:tblInd w:w="0" w:type="dxa"/>"#);
            if self.table_borders {
                xml.push_str("<w:tblBorders>");
                for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
                    write!(
                        xml,
                        r#"<w:{edge} w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#
                    )?;
                }
                xml.push_str("</w:tblBorders>");
            }
            if let Some(margin) = self.cell_margin {
                write!(
                    xml,
                    concat!(
                        r#"<w:tblCellMar><w:top w:w="0" w:type="dxa"/>"#,
                        r#"<w:left w:w="{m}" w:type="dxa"/>"#,
                        r#"<w:bottom w:w="0" w:type="dxa"/>"#,
                        r#"<w:right w:w="{m}" w:type="dxa"/></w:tblCellMar>"#
                    ),
                    m = margin
                )?;
            }
            xml.push_str("</w:tblPr>");
        }

        xml.push_str("</w:style>");
        Ok(())
    }

    /// The default paragraph style.
    fn normal() -> Self {
        let mut style = Self::builtin("Normal", "Normal", WdStyleType::Paragraph);
        style.is_default = true;
        style.is_quick_style = true;
        style
    }

    fn heading(level: u8, size: u32, color: &str, space_before: u32) -> Self {
        let id = format!("Heading{level}");
        let name = format!("Heading {level}");
        let mut style = Self::builtin(&id, &name, WdStyleType::Paragraph);
        style.based_on = Some("Normal".to_string());
        style.font_name = Some("Calibri Light".to_string());
        style.font_size = Some(size);
        style.color = Some(color.to_string());
        style.space_before = Some(space_before);
        style.space_after = Some(0);
        style.keep_next = true;
        style.priority = Some(9);
        style.is_quick_style = true;
        style
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn title() -> Self {
        let mut style = Self::builtin("Title", "Title", WdStyleType::Paragraph);
        style.based_on = Some("Normal".to_string());
        style.font_name = Some("Calibri Light".to_string());
        style.font_size = Some(56);
        style.space_after = Some(0);
        style.priority = Some(10);
        style.is_quick_style = true;
        style
    }

    fn simple_paragraph(style_id: &str, name: &str, priority: i32) -> Self {
        let mut style = Self::builtin(style_id, name, WdStyleType::Paragraph);
        style.based_on = Some("Normal".to_string());
        style.priority = Some(priority);
        style
    }

    fn list_paragraph() -> Self {
        let mut style = Self::simple_paragraph("ListParagraph", "List Paragraph", 34);
        style.indent_left = Some(720);
        style.is_quick_style = true;
        style
    }

    /// A numbered or bulleted list style nested `level` deep, from 1.
    fn list(style_id: &str, name: &str, level: i32) -> Self {
        let mut style = Self::simple_paragraph(style_id, name, 99);
        style.indent_left = Some(360 * level);
        style.indent_first_line = Some(-360);
        style
    }

    fn default_paragraph_font() -> Self {
        let mut style = Self::builtin(
            "DefaultParagraphFont",
            "Default Paragraph Font",
            WdStyleType::Character,
        );
        style.is_default = true;
        style.priority = Some(1);
        style
    }

    fn hyperlink() -> Self {
        let mut style = Self::builtin("Hyperlink", "Hyperlink", WdStyleType::Character);
        style.based_on = Some("Default Paragraph Font".to_string());
        style.priority = Some(99);
        style.color = Some("0563C1".to_string());
        style.underline = true;
        style
    }

    fn normal_table() -> Self {
        let mut style = Self::builtin("TableNormal", "Normal Table", WdStyleType::Table);
        style.is_default = true;
        style.priority = Some(99);
        style.cell_margin = Some(108);
        style
    }

    fn table_grid() -> Self {
        let mut style = Self::builtin("TableGrid", "Table Grid", WdStyleType::Table);
        style.based_on = Some("Normal Table".to_string());
        style.priority = Some(39);
        style.table_borders = true;
        style.cell_margin = Some(108);
        style
    }
}

/// Registry of the styles available to a document.
///
/// Names are unique per kind; identifiers are unique across the registry.
/// `StyleRegistry::default()` holds the built-in styles a blank Word document
/// ships with.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    /// Styles in definition order
    styles: Vec<MutableStyle>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self {
            styles: vec![
                MutableStyle::normal(),
                MutableStyle::title(),
                MutableStyle::heading(1, 32, "2F5496", 240),
                MutableStyle::heading(2, 26, "2F5496", 40),
                MutableStyle::heading(3, 24, "1F3763", 40),
                MutableStyle::heading(4, 22, "2F5496", 40).italic(),
                MutableStyle::heading(5, 22, "2F5496", 40),
                MutableStyle::heading(6, 22, "1F3763", 40),
                MutableStyle::heading(7, 22, "1F3763", 40).italic(),
                MutableStyle::heading(8, 21, "272727", 40),
                MutableStyle::heading(9, 21, "272727", 40).italic(),
                MutableStyle::simple_paragraph("Header", "Header", 99),
                MutableStyle::simple_paragraph("Footer", "Footer", 99),
                MutableStyle::list_paragraph(),
                MutableStyle::list("ListNumber", "List Number", 1),
                MutableStyle::list("ListNumber2", "List Number 2", 2),
                MutableStyle::list("ListNumber3", "List Number 3", 3),
                MutableStyle::list("ListBullet", "List Bullet", 1),
                MutableStyle::list("ListBullet2", "List Bullet 2", 2),
                MutableStyle::list("ListBullet3", "List Bullet 3", 3),
                MutableStyle::default_paragraph_font(),
                MutableStyle::hyperlink(),
                MutableStyle::normal_table(),
                MutableStyle::table_grid(),
            ],
        }
    }
}

impl StyleRegistry {
    /// Create a registry holding no styles at all.
    pub fn empty() -> Self {
        Self { styles: Vec::new() }
    }

    /// Register `style` under `name` for `kind` and return its generated
    /// identifier.
    ///
    /// Fails with [`OoxmlError::DuplicateStyle`] when `name` already exists for
    /// `kind`, and with [`OoxmlError::UnknownStyle`] when the style's base is
    /// not registered with the same kind.
    pub fn define(
        &mut self,
        name: &str,
        kind: WdStyleType,
        mut style: MutableStyle,
    ) -> Result<StyleId> {
        if self.find(name, Some(kind)).is_some() {
            return Err(OoxmlError::DuplicateStyle {
                name: name.to_string(),
                kind,
            });
        }
        if let Some(base) = style.based_on.as_deref() {
            self.resolve_kind(base, kind)?;
        }

        let style_id = self.unique_id(name, kind);
        trace!("defined {} style '{}' as {}", kind, name, style_id);

        style.name = name.to_string();
        style.style_type = kind;
        style.style_id = style_id.clone();
        self.styles.push(style);
        Ok(StyleId(style_id))
    }

    fn unique_id(&self, name: &str, kind: WdStyleType) -> String {
        let mut base: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
        if base.is_empty() {
            base.push_str("Style");
        }
        if !self.id_taken(&base) {
            return base;
        }

        let suffix = match kind {
            WdStyleType::Paragraph => "",
            WdStyleType::Character => "Char",
            WdStyleType::Table => "Table",
        };
        let with_suffix = format!("{base}{suffix}");
        if !suffix.is_empty() && !self.id_taken(&with_suffix) {
            return with_suffix;
        }

        let mut counter = 1u32;
        loop {
            let candidate = format!("{with_suffix}{counter}");
            if !self.id_taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn id_taken(&self, style_id: &str) -> bool {
        self.styles.iter().any(|s| s.style_id == style_id)
    }

    fn find(&self, name: &str, kind: Option<WdStyleType>) -> Option<&MutableStyle> {
        self.styles
            .iter()
            .find(|s| s.name == name && kind.is_none_or(|k| s.style_type == k))
    }

    /// Look up a style of any kind by name; the first defined wins.
    pub fn resolve(&self, name: &str) -> Result<&MutableStyle> {
        self.find(name, None).ok_or_else(|| OoxmlError::UnknownStyle {
            name: name.to_string(),
            kind: None,
            location: None,
        })
    }

    /// Look up a style of one kind by name.
    pub fn resolve_kind(&self, name: &str, kind: WdStyleType) -> Result<&MutableStyle> {
        self.find(name, Some(kind))
            .ok_or_else(|| OoxmlError::UnknownStyle {
                name: name.to_string(),
                kind: Some(kind),
                location: None,
            })
    }

    #[inline]
    pub fn contains(&self, name: &str, kind: WdStyleType) -> bool {
        self.find(name, Some(kind)).is_some()
    }

    /// Iterate styles in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &MutableStyle> {
        self.styles.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Number of styles naming `name` of `kind` as their base.
    pub(crate) fn based_on_references(&self, name: &str, kind: WdStyleType) -> usize {
        self.styles
            .iter()
            .filter(|s| s.style_type == kind && s.based_on.as_deref() == Some(name))
            .count()
    }

    /// Remove a style without checking references.
    pub(crate) fn remove(&mut self, name: &str, kind: WdStyleType) -> Option<MutableStyle> {
        let idx = self
            .styles
            .iter()
            .position(|s| s.name == name && s.style_type == kind)?;
        Some(self.styles.remove(idx))
    }

    /// Render the styles part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.styles.len() * 384);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<w:docDefaults>");
        xml.push_str("<w:rPrDefault><w:rPr>");
        xml.push_str(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#);
        xml.push_str(r#"<w:sz w:val="22"/><w:szCs w:val="22"/>"#);
        xml.push_str("</w:rPr></w:rPrDefault>");
        xml.push_str("<w:pPrDefault/>");
        xml.push_str("</w:docDefaults>");

        for style in &self.styles {
            let based_on_id = match style.based_on.as_deref() {
                Some(base) => Some(self.resolve_kind(base, style.style_type)?.style_id()),
                None => None,
            };
            style.write_xml(&mut xml, based_on_id)?;
        }

        xml.push_str("</w:styles>");
        Ok(xml)
    }
}
