/// Run types and implementation for DOCX documents.
use crate::ooxml::docx::enums::WdStyleType;
use crate::ooxml::error::Result;
use memchr::memchr3_iter;
use quick_xml::escape::{escape, partial_escape};
use std::fmt::Write as FmtWrite;

pub use super::super::format::{TextDirection, UnderlineStyle};
use super::image::InlineImage;
use super::style::StyleRegistry;

/// Character formatting applied to a run.
///
/// Built by value and handed to `ParagraphMut::add_run`:
///
/// ```rust
/// use longan::ooxml::docx::writer::RunProperties;
///
/// let props = RunProperties::new()
///     .with_bold(true)
///     .with_size(28)
///     .with_east_asia_font("SimSun");
/// assert_eq!(props.size(), Some(28));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// Character style name
    pub(crate) style: Option<String>,
    pub(crate) bold: Option<bool>,
    pub(crate) italic: Option<bool>,
    pub(crate) underline: Option<UnderlineStyle>,
    /// Font size in half-points (e.g., 24 = 12pt)
    pub(crate) size: Option<u32>,
    /// Font for ASCII and high-ANSI text
    pub(crate) font: Option<String>,
    pub(crate) east_asia_font: Option<String>,
    /// RGB hex color (e.g., "FF0000")
    pub(crate) color: Option<String>,
    /// Highlight color name (e.g., "yellow")
    pub(crate) highlight: Option<String>,
    pub(crate) text_direction: Option<TextDirection>,
}

impl RunProperties {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the character style named `name`.
    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style = Some(name.into());
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_underline(mut self, style: UnderlineStyle) -> Self {
        self.underline = Some(style);
        self
    }

    /// Set font size in half-points.
    pub fn with_size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.font = Some(name.into());
        self
    }

    pub fn with_east_asia_font(mut self, name: impl Into<String>) -> Self {
        self.east_asia_font = Some(name.into());
        self
    }

    /// Set text color using hex RGB (e.g., "FF0000" for red).
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_highlight(mut self, color: impl Into<String>) -> Self {
        self.highlight = Some(color.into());
        self
    }

    pub fn with_text_direction(mut self, direction: TextDirection) -> Self {
        self.text_direction = Some(direction);
        self
    }

    /// Name of the character style, if any.
    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    #[inline]
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub(crate) fn has_properties(&self) -> bool {
        self.style.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
            || self.size.is_some()
            || self.font.is_some()
            || self.east_asia_font.is_some()
            || self.color.is_some()
            || self.highlight.is_some()
            || self.text_direction.is_some()
    }

    /// Append a `w:rPr` element, or nothing when no property is set.
    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        if !self.has_properties() {
            return Ok(());
        }
        xml.push_str("<w:rPr>");

        if let Some(ref name) = self.style {
            let style = styles.resolve_kind(name, WdStyleType::Character)?;
            write!(xml, r#"<w:rStyle w:val="{}"/>"#, escape(style.style_id()))?;
        }
        write_fonts(xml, self.font.as_deref(), self.east_asia_font.as_deref())?;
        if let Some(bold) = self.bold {
            xml.push_str(if bold { "<w:b/>" } else { r#"<w:b w:val="0"/>"# });
        }
        if let Some(italic) = self.italic {
            xml.push_str(if italic { "<w:i/>" } else { r#"<w:i w:val="0"/>"# });
        }
        if let Some(ref color) = self.color {
            write!(xml, r#"<w:color w:val="{}"/>"#, escape(color.as_str()))?;
        }
        if let Some(size) = self.size {
            write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)?;
        }
        if let Some(ref highlight) = self.highlight {
            write!(xml, r#"<w:highlight w:val="{}"/>"#, escape(highlight.as_str()))?;
        }
        if let Some(underline) = self.underline {
            write!(xml, r#"<w:u w:val="{}"/>"#, underline.as_str())?;
        }
        if let Some(direction) = self.text_direction {
            xml.push_str(direction.to_xml());
        }

        xml.push_str("</w:rPr>");
        Ok(())
    }
}

/// Append a `w:rFonts` element naming the Latin and East Asian fonts.
pub(crate) fn write_fonts(
    xml: &mut String,
    ascii: Option<&str>,
    east_asia: Option<&str>,
) -> Result<()> {
    if ascii.is_none() && east_asia.is_none() {
        return Ok(());
    }
    xml.push_str("<w:rFonts");
    if let Some(font) = ascii {
        let font = escape(font);
        write!(xml, r#" w:ascii="{font}" w:hAnsi="{font}""#)?;
    }
    if let Some(font) = east_asia {
        write!(xml, r#" w:eastAsia="{}""#, escape(font))?;
    }
    xml.push_str("/>");
    Ok(())
}

/// Kind of break a run can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakType {
    Line,
    Page,
}

/// Run content type.
#[derive(Debug, Clone)]
pub enum RunContent {
    /// Text; `\n` becomes a line break and `\t` a tab
    Text(String),
    Break(BreakType),
    Picture(InlineImage),
}

/// A mutable run.
///
/// Runs contain text and character formatting.
#[derive(Debug, Clone)]
pub struct MutableRun {
    pub(crate) content: RunContent,
    pub(crate) properties: RunProperties,
}

impl MutableRun {
    pub(crate) fn new(content: RunContent, properties: RunProperties) -> Self {
        Self {
            content,
            properties,
        }
    }

    /// Replace the content with text.
    pub fn set_text(&mut self, text: &str) {
        self.content = RunContent::Text(text.to_string());
    }

    /// The text of this run, empty for breaks and pictures.
    pub fn text(&self) -> &str {
        match &self.content {
            RunContent::Text(s) => s,
            _ => "",
        }
    }

    #[inline]
    pub fn content(&self) -> &RunContent {
        &self.content
    }

    #[inline]
    pub fn properties(&self) -> &RunProperties {
        &self.properties
    }

    /// Make the text bold.
    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.properties.bold = Some(bold);
        self
    }

    /// Make the text italic.
    pub fn italic(&mut self, italic: bool) -> &mut Self {
        self.properties.italic = Some(italic);
        self
    }

    pub fn underline(&mut self, style: UnderlineStyle) -> &mut Self {
        self.properties.underline = Some(style);
        self
    }

    /// Set font size in half-points (e.g., 24 = 12pt).
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.properties.size = Some(size);
        self
    }

    pub fn font_name(&mut self, name: &str) -> &mut Self {
        self.properties.font = Some(name.to_string());
        self
    }

    pub fn east_asia_font(&mut self, name: &str) -> &mut Self {
        self.properties.east_asia_font = Some(name.to_string());
        self
    }

    /// Set text color using hex RGB (e.g., "FF0000" for red).
    pub fn color(&mut self, color: &str) -> &mut Self {
        self.properties.color = Some(color.to_string());
        self
    }

    pub fn highlight(&mut self, color: &str) -> &mut Self {
        self.properties.highlight = Some(color.to_string());
        self
    }

    pub fn text_direction(&mut self, direction: TextDirection) -> &mut Self {
        self.properties.text_direction = Some(direction);
        self
    }

    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        xml.push_str("<w:r>");
        self.properties.write_xml(xml, styles)?;

        match &self.content {
            RunContent::Text(text) => write_text(xml, text),
            RunContent::Break(BreakType::Line) => xml.push_str("<w:br/>"),
            RunContent::Break(BreakType::Page) => xml.push_str(r#"<w:br w:type="page"/>"#),
            RunContent::Picture(image) => image.write_xml(xml)?,
        }

        xml.push_str("</w:r>");
        Ok(())
    }
}

/// Append run text, turning `\n` into `w:br` and `\t` into `w:tab`.
/// Carriage returns are dropped.
fn write_text(xml: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0;
    for pos in memchr3_iter(b'\n', b'\t', b'\r', bytes) {
        push_segment(xml, &text[start..pos]);
        match bytes[pos] {
            b'\n' => xml.push_str("<w:br/>"),
            b'\t' => xml.push_str("<w:tab/>"),
            _ => {},
        }
        start = pos + 1;
    }
    push_segment(xml, &text[start..]);
}

fn push_segment(xml: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    xml.push_str(r#"<w:t xml:space="preserve">"#);
    xml.push_str(&partial_escape(segment));
    xml.push_str("</w:t>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::error::OoxmlError;

    fn render(run: &MutableRun) -> String {
        let mut xml = String::new();
        run.write_xml(&mut xml, &StyleRegistry::default()).unwrap();
        xml
    }

    #[test]
    fn test_plain_text() {
        let run = MutableRun::new(RunContent::Text("a < b & c".into()), RunProperties::new());
        assert_eq!(
            render(&run),
            r#"<w:r><w:t xml:space="preserve">a &lt; b &amp; c</w:t></w:r>"#
        );
    }

    #[test]
    fn test_newline_and_tab_split() {
        let run = MutableRun::new(
            RunContent::Text("Cover\nline\ttwo\r\n".into()),
            RunProperties::new(),
        );
        assert_eq!(
            render(&run),
            concat!(
                r#"<w:r><w:t xml:space="preserve">Cover</w:t><w:br/>"#,
                r#"<w:t xml:space="preserve">line</w:t><w:tab/>"#,
                r#"<w:t xml:space="preserve">two</w:t><w:br/></w:r>"#
            )
        );
    }

    #[test]
    fn test_property_order() {
        let props = RunProperties::new()
            .with_style("Hyperlink")
            .with_underline(UnderlineStyle::Double)
            .with_highlight("yellow")
            .with_size(24)
            .with_color("FF0000")
            .with_italic(false)
            .with_bold(true)
            .with_font("Arial")
            .with_east_asia_font("宋体")
            .with_text_direction(TextDirection::RightToLeft);
        let run = MutableRun::new(RunContent::Text("x".into()), props);
        assert_eq!(
            render(&run),
            concat!(
                r#"<w:r><w:rPr><w:rStyle w:val="Hyperlink"/>"#,
                r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:eastAsia="宋体"/>"#,
                r#"<w:b/><w:i w:val="0"/><w:color w:val="FF0000"/>"#,
                r#"<w:sz w:val="24"/><w:szCs w:val="24"/><w:highlight w:val="yellow"/>"#,
                r#"<w:u w:val="double"/><w:rtl/></w:rPr>"#,
                r#"<w:t xml:space="preserve">x</w:t></w:r>"#
            )
        );
    }

    #[test]
    fn test_unknown_character_style() {
        let run = MutableRun::new(
            RunContent::Text("x".into()),
            RunProperties::new().with_style("Normal"),
        );
        let mut xml = String::new();
        let err = run
            .write_xml(&mut xml, &StyleRegistry::default())
            .unwrap_err();
        assert!(matches!(
            err,
            OoxmlError::UnknownStyle {
                kind: Some(WdStyleType::Character),
                ..
            }
        ));
    }

    #[test]
    fn test_breaks() {
        let page = MutableRun::new(RunContent::Break(BreakType::Page), RunProperties::new());
        assert_eq!(render(&page), r#"<w:r><w:br w:type="page"/></w:r>"#);
        assert_eq!(page.text(), "");
    }

    #[test]
    fn test_setters_chain() {
        let mut run = MutableRun::new(RunContent::Text("x".into()), RunProperties::new());
        run.bold(true).font_size(20).color("00FF00");
        assert_eq!(run.properties().size(), Some(20));
        assert!(render(&run).contains(r#"<w:color w:val="00FF00"/>"#));
    }
}
