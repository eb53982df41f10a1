/// Computed fields (page numbers, page counts, dates).
///
/// A field is written as three primitives, each in its own run: a begin
/// marker, the instruction text and an end marker. Word computes the value
/// when it lays the document out.
use crate::ooxml::error::Result;
use quick_xml::escape::partial_escape;

use super::run::RunProperties;
use super::section::PageNumberFormat;
use super::style::StyleRegistry;

/// The value a field computes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Current page number (`PAGE`)
    PageNumber,
    /// Pages in the document (`NUMPAGES`)
    TotalPages,
    /// Pages in the current section (`SECTIONPAGES`)
    SectionPages,
    /// Current date, with an optional date picture such as `yyyy-MM-dd`
    Date(Option<String>),
    /// Any other instruction, written verbatim
    Custom(String),
}

/// One of the three parts a field is written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPrimitive {
    Begin,
    Instruction(String),
    End,
}

impl FieldPrimitive {
    fn write_xml(&self, xml: &mut String) {
        match self {
            Self::Begin => xml.push_str(r#"<w:fldChar w:fldCharType="begin"/>"#),
            Self::Instruction(text) => {
                xml.push_str(r#"<w:instrText xml:space="preserve">"#);
                xml.push_str(&partial_escape(text.as_str()));
                xml.push_str("</w:instrText>");
            },
            Self::End => xml.push_str(r#"<w:fldChar w:fldCharType="end"/>"#),
        }
    }
}

/// Synthesize the begin / instruction / end triple for `kind`.
///
/// A number `format` appends a `\*` switch to the instruction.
pub fn build(kind: &FieldKind, format: Option<PageNumberFormat>) -> [FieldPrimitive; 3] {
    let mut instruction = match kind {
        FieldKind::PageNumber => "PAGE".to_string(),
        FieldKind::TotalPages => "NUMPAGES".to_string(),
        FieldKind::SectionPages => "SECTIONPAGES".to_string(),
        FieldKind::Date(None) => "DATE".to_string(),
        FieldKind::Date(Some(picture)) => format!("DATE \\@ {}", quote_argument(picture)),
        FieldKind::Custom(text) => text.clone(),
    };
    if let Some(format) = format {
        instruction.push_str(" \\* ");
        instruction.push_str(format.switch());
    }

    [
        FieldPrimitive::Begin,
        FieldPrimitive::Instruction(instruction),
        FieldPrimitive::End,
    ]
}

/// Quote a switch argument, escaping `"` and `\\` with a backslash.
fn quote_argument(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// A field placed in a paragraph.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::writer::{FieldCode, PageNumberFormat, RunProperties};
///
/// let field = FieldCode::page_number()
///     .with_format(PageNumberFormat::UpperRoman)
///     .with_properties(RunProperties::new().with_bold(true));
/// assert_eq!(field.instruction(), "PAGE \\* ROMAN");
/// ```
#[derive(Debug, Clone)]
pub struct FieldCode {
    kind: FieldKind,
    format: Option<PageNumberFormat>,
    properties: RunProperties,
}

impl FieldCode {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            format: None,
            properties: RunProperties::default(),
        }
    }

    #[inline]
    pub fn page_number() -> Self {
        Self::new(FieldKind::PageNumber)
    }

    #[inline]
    pub fn total_pages() -> Self {
        Self::new(FieldKind::TotalPages)
    }

    pub fn with_format(mut self, format: PageNumberFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Formatting carried by each of the field's runs.
    pub fn with_properties(mut self, properties: RunProperties) -> Self {
        self.properties = properties;
        self
    }

    #[inline]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[inline]
    pub fn properties(&self) -> &RunProperties {
        &self.properties
    }

    /// The three primitives this field is written as.
    pub fn primitives(&self) -> [FieldPrimitive; 3] {
        build(&self.kind, self.format)
    }

    /// The instruction text, including any format switch.
    pub fn instruction(&self) -> String {
        match build(&self.kind, self.format) {
            [_, FieldPrimitive::Instruction(text), _] => text,
            _ => String::new(),
        }
    }

    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        for primitive in self.primitives() {
            xml.push_str("<w:r>");
            self.properties.write_xml(xml, styles)?;
            primitive.write_xml(xml);
            xml.push_str("</w:r>");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(field: &FieldCode) -> String {
        let mut xml = String::new();
        field.write_xml(&mut xml, &StyleRegistry::default()).unwrap();
        xml
    }

    #[test]
    fn test_build_instructions() {
        let cases = [
            (FieldKind::PageNumber, None, "PAGE"),
            (FieldKind::TotalPages, None, "NUMPAGES"),
            (FieldKind::SectionPages, None, "SECTIONPAGES"),
            (FieldKind::Date(None), None, "DATE"),
            (
                FieldKind::Date(Some("yyyy-MM-dd".into())),
                None,
                "DATE \\@ \"yyyy-MM-dd\"",
            ),
            (
                FieldKind::PageNumber,
                Some(PageNumberFormat::LowerRoman),
                "PAGE \\* roman",
            ),
            (
                FieldKind::TotalPages,
                Some(PageNumberFormat::UpperLetter),
                "NUMPAGES \\* ALPHABETIC",
            ),
        ];
        for (kind, format, expected) in cases {
            let [begin, instruction, end] = build(&kind, format);
            assert_eq!(begin, FieldPrimitive::Begin);
            assert_eq!(instruction, FieldPrimitive::Instruction(expected.to_string()));
            assert_eq!(end, FieldPrimitive::End);
        }
    }

    #[test]
    fn test_date_picture_quotes_are_escaped() {
        let kind = FieldKind::Date(Some(r#"d "of" MMMM \ yyyy"#.into()));
        let [_, instruction, _] = build(&kind, None);
        assert_eq!(
            instruction,
            FieldPrimitive::Instruction(r#"DATE \@ "d \"of\" MMMM \\ yyyy""#.to_string())
        );

        let field = FieldCode::new(kind);
        assert!(render(&field).contains(
            r#"<w:instrText xml:space="preserve">DATE \@ "d \"of\" MMMM \\ yyyy"</w:instrText>"#
        ));
    }

    #[test]
    fn test_page_field_is_bit_exact() {
        assert_eq!(
            render(&FieldCode::page_number()),
            concat!(
                r#"<w:r><w:fldChar w:fldCharType="begin"/></w:r>"#,
                r#"<w:r><w:instrText xml:space="preserve">PAGE</w:instrText></w:r>"#,
                r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#
            )
        );
    }

    #[test]
    fn test_custom_instruction_is_not_trimmed() {
        let field = FieldCode::new(FieldKind::Custom(" AUTHOR  ".into()));
        assert!(render(&field).contains(
            r#"<w:instrText xml:space="preserve"> AUTHOR  </w:instrText>"#
        ));
    }

    #[test]
    fn test_properties_repeat_on_each_run() {
        let field = FieldCode::total_pages().with_properties(RunProperties::new().with_bold(true));
        let xml = render(&field);
        assert_eq!(xml.matches("<w:rPr><w:b/></w:rPr>").count(), 3);
    }
}
