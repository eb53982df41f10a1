/// Inline pictures for DOCX documents.
use crate::ooxml::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::RelationshipId;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

pub use super::super::format::ImageFormat;

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// A picture placed inline in a run.
///
/// The bytes live in the document's media store; this element only carries
/// the relationship id that points at them from the enclosing part.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub(crate) r_id: RelationshipId,
    pub(crate) partname: PackURI,
    /// Width in EMUs (English Metric Units, 1 inch = 914400 EMUs)
    pub(crate) width_emu: i64,
    /// Height in EMUs
    pub(crate) height_emu: i64,
    /// Drawing object id, unique within the document
    pub(crate) drawing_id: u32,
    /// Alt text
    pub(crate) description: String,
}

impl InlineImage {
    #[inline]
    pub fn r_id(&self) -> &RelationshipId {
        &self.r_id
    }

    /// Partname of the media part holding the picture bytes.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Extent as `(width, height)` in EMUs.
    #[inline]
    pub fn extent(&self) -> (i64, i64) {
        (self.width_emu, self.height_emu)
    }

    /// Set the image description/alt text.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Convert pixels to EMUs (assuming 96 DPI).
    pub fn px_to_emu(px: u32) -> i64 {
        i64::from(px) * EMU_PER_INCH / 96
    }

    /// Convert points to EMUs.
    pub fn pt_to_emu(pt: f64) -> i64 {
        (pt * 12700.0) as i64
    }

    pub(crate) fn write_xml(&self, xml: &mut String) -> Result<()> {
        let (cx, cy) = (self.width_emu, self.height_emu);
        let id = self.drawing_id;
        let desc = escape(self.description.as_str());
        let name = self.partname.filename();

        write!(
            xml,
            concat!(
                r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
                r#"<wp:docPr id="{id}" name="Picture {id}" descr="{desc}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="{name}" descr="{desc}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
                r#"</a:graphicData></a:graphic></wp:inline></w:drawing>"#
            ),
            cx = cx,
            cy = cy,
            id = id,
            desc = desc,
            name = name,
            r_id = self.r_id,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as RT;
    use crate::ooxml::opc::rel::Relationships;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(InlineImage::px_to_emu(96), EMU_PER_INCH);
        assert_eq!(InlineImage::px_to_emu(1), 9525);
        assert_eq!(InlineImage::pt_to_emu(72.0), EMU_PER_INCH);
    }

    #[test]
    fn test_drawing_xml() {
        let partname = PackURI::new("/word/media/image1.png").unwrap();
        let mut rels = Relationships::new(PackURI::new("/word/document.xml").unwrap());
        let r_id = rels.relate_to(RT::IMAGE, &partname).unwrap();

        let mut image = InlineImage {
            r_id,
            partname,
            width_emu: 1_828_800,
            height_emu: 914_400,
            drawing_id: 3,
            description: String::new(),
        };
        image.set_description("Sales \"Q1\"");

        let mut xml = String::new();
        image.write_xml(&mut xml).unwrap();
        assert!(xml.contains(r#"<wp:extent cx="1828800" cy="914400"/>"#));
        assert!(xml.contains(r#"<wp:docPr id="3" name="Picture 3" descr="Sales &quot;Q1&quot;"/>"#));
        assert!(xml.contains(r#"<pic:cNvPr id="0" name="image1.png""#));
        assert!(xml.contains(r#"<a:blip r:embed="rId1"/>"#));
    }
}
