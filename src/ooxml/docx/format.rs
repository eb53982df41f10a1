//! Shared formatting types for DOCX paragraphs, runs and tables.

/// Line spacing options for paragraphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSpacing {
    /// Single line spacing
    Single,
    /// 1.5 line spacing
    OneAndHalf,
    /// Double line spacing
    Double,
    /// Multiple line spacing (e.g., 1.15)
    Multiple(f64),
    /// Exact spacing in points
    Exact(f64),
    /// At least spacing in points
    AtLeast(f64),
}

impl LineSpacing {
    /// The `w:line` value (twips or 240ths of a line) and its `w:lineRule`.
    pub(crate) fn line_and_rule(&self) -> (u32, &'static str) {
        match *self {
            Self::Single => (240, "auto"),
            Self::OneAndHalf => (360, "auto"),
            Self::Double => (480, "auto"),
            Self::Multiple(factor) => ((factor * 240.0).round() as u32, "auto"),
            Self::Exact(points) => ((points * 20.0).round() as u32, "exact"),
            Self::AtLeast(points) => ((points * 20.0).round() as u32, "atLeast"),
        }
    }
}

/// Paragraph alignment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphAlignment {
    Left,
    Center,
    Right,
    Justify,
}

impl ParagraphAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

/// Horizontal placement of a table between the page margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAlignment {
    Left,
    Center,
    Right,
}

impl TableAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Underline styles for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    Single,
    Double,
    Thick,
    Dotted,
    Dashed,
    DotDash,
    DotDotDash,
    Wave,
}

impl UnderlineStyle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Thick => "thick",
            Self::Dotted => "dotted",
            Self::Dashed => "dash",
            Self::DotDash => "dotDash",
            Self::DotDotDash => "dotDotDash",
            Self::Wave => "wave",
        }
    }
}

/// Explicit direction override for the text of a run.
///
/// Left-to-right and right-to-left map to `w:rtl`; top-to-bottom renders the
/// run vertically inside horizontal East Asian text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
    TopToBottom,
}

impl TextDirection {
    pub(crate) fn to_xml(self) -> &'static str {
        match self {
            Self::LeftToRight => r#"<w:rtl w:val="0"/>"#,
            Self::RightToLeft => "<w:rtl/>",
            Self::TopToBottom => r#"<w:eastAsianLayout w:vert="1"/>"#,
        }
    }
}

/// Which edges of a paragraph carry a single-line border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphBorders {
    pub top: bool,
    pub left: bool,
    pub bottom: bool,
    pub right: bool,
}

impl ParagraphBorders {
    /// Borders on all four edges.
    pub const fn all() -> Self {
        Self {
            top: true,
            left: true,
            bottom: true,
            right: true,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.top || self.left || self.bottom || self.right)
    }

    /// Append a `w:pBdr` element, or nothing when no edge is set.
    pub(crate) fn write_xml(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        xml.push_str("<w:pBdr>");
        for (set, edge) in [
            (self.top, "top"),
            (self.left, "left"),
            (self.bottom, "bottom"),
            (self.right, "right"),
        ] {
            if set {
                xml.push_str("<w:");
                xml.push_str(edge);
                xml.push_str(r#" w:val="single" w:sz="4" w:space="1" w:color="auto"/>"#);
            }
        }
        xml.push_str("</w:pBdr>");
    }
}

/// Image format detection and properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Emf,
    Wmf,
}

impl ImageFormat {
    /// Detect image format from byte signature.
    pub fn detect_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }

        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        if data.starts_with(b"BM") {
            return Some(Self::Bmp);
        }

        // Little-endian and big-endian TIFF
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        // " EMF" signature in the header record
        if data.len() >= 44 && data[40..44] == [0x20, 0x45, 0x4D, 0x46] {
            return Some(Self::Emf);
        }

        // Placeable or standard WMF header
        if data[0..4] == [0xD7, 0xCD, 0xC6, 0x9A] || data[0..4] == [0x01, 0x00, 0x09, 0x00] {
            return Some(Self::Wmf);
        }

        None
    }

    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Emf => "emf",
            Self::Wmf => "wmf",
        }
    }

    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Emf => "image/x-emf",
            Self::Wmf => "image/x-wmf",
        }
    }

    /// Whether the `image` crate can report pixel dimensions for this format.
    pub(crate) fn is_raster(&self) -> bool {
        !matches!(self, Self::Emf | Self::Wmf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_spacing_values() {
        assert_eq!(LineSpacing::Single.line_and_rule(), (240, "auto"));
        assert_eq!(LineSpacing::Multiple(1.15).line_and_rule(), (276, "auto"));
        assert_eq!(LineSpacing::Exact(12.0).line_and_rule(), (240, "exact"));
        assert_eq!(LineSpacing::AtLeast(18.0).line_and_rule(), (360, "atLeast"));
    }

    #[test]
    fn test_paragraph_borders_xml() {
        let mut xml = String::new();
        ParagraphBorders::default().write_xml(&mut xml);
        assert!(xml.is_empty());

        let borders = ParagraphBorders {
            top: true,
            bottom: true,
            ..Default::default()
        };
        borders.write_xml(&mut xml);
        assert_eq!(
            xml,
            concat!(
                r#"<w:pBdr><w:top w:val="single" w:sz="4" w:space="1" w:color="auto"/>"#,
                r#"<w:bottom w:val="single" w:sz="4" w:space="1" w:color="auto"/></w:pBdr>"#
            )
        );
    }

    #[test]
    fn test_detect_image_formats() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(ImageFormat::detect_from_bytes(&png), Some(ImageFormat::Png));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F'];
        assert_eq!(ImageFormat::detect_from_bytes(&jpeg), Some(ImageFormat::Jpeg));

        assert_eq!(
            ImageFormat::detect_from_bytes(b"GIF89a\x01\x00"),
            Some(ImageFormat::Gif)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"not an image"), None);
        assert_eq!(ImageFormat::detect_from_bytes(b"BM"), None);
    }

    #[test]
    fn test_text_direction_xml() {
        assert_eq!(TextDirection::RightToLeft.to_xml(), "<w:rtl/>");
        assert_eq!(
            TextDirection::TopToBottom.to_xml(),
            r#"<w:eastAsianLayout w:vert="1"/>"#
        );
    }
}
