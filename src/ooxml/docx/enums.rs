/// Enumerations for Word document elements.
///
/// These mirror the VBA enumerations of the same names and map to the
/// attribute values WordprocessingML uses for them.
use std::fmt;

/// Specifies the page layout orientation.
///
/// Corresponds to the VBA `WdOrientation` enumeration.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::enums::WdOrientation;
///
/// let orientation = WdOrientation::Landscape;
/// assert_eq!(orientation.to_xml(), "landscape");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WdOrientation {
    /// Portrait orientation.
    #[default]
    Portrait = 0,
    /// Landscape orientation.
    Landscape = 1,
}

impl WdOrientation {
    /// Convert the orientation to its XML attribute value.
    #[inline]
    pub const fn to_xml(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for WdOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => write!(f, "Portrait"),
            Self::Landscape => write!(f, "Landscape"),
        }
    }
}

/// Specifies how a section begins relative to the previous one.
///
/// Corresponds to the VBA `WdSectionStart` enumeration.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::enums::WdSectionStart;
///
/// let start_type = WdSectionStart::NewPage;
/// assert_eq!(start_type.to_xml(), "nextPage");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WdSectionStart {
    /// Continuous section break.
    Continuous = 0,
    /// New page section break.
    #[default]
    NewPage = 2,
    /// Section begins on the next even page.
    EvenPage = 3,
    /// Section begins on the next odd page.
    OddPage = 4,
}

impl WdSectionStart {
    /// Convert the section start type to its `w:type` attribute value.
    #[inline]
    pub const fn to_xml(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::NewPage => "nextPage",
            Self::EvenPage => "evenPage",
            Self::OddPage => "oddPage",
        }
    }
}

impl fmt::Display for WdSectionStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => write!(f, "Continuous"),
            Self::NewPage => write!(f, "New Page"),
            Self::EvenPage => write!(f, "Even Page"),
            Self::OddPage => write!(f, "Odd Page"),
        }
    }
}

/// Specifies the kind of content a style applies to.
///
/// Corresponds to the VBA `WdStyleType` enumeration. Style names are unique
/// per kind, so "Heading" may exist both as a paragraph and a character style.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::enums::WdStyleType;
///
/// let style_type = WdStyleType::Paragraph;
/// assert_eq!(style_type.to_xml(), "paragraph");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WdStyleType {
    /// Paragraph style.
    #[default]
    Paragraph = 1,
    /// Character style.
    Character = 2,
    /// Table style.
    Table = 3,
}

impl WdStyleType {
    /// Convert the style type to its `w:type` attribute value.
    #[inline]
    pub const fn to_xml(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Character => "character",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for WdStyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_xml())
    }
}
