//! Package writer for OPC packages.
//!
//! Serializes an [`OpcPackage`] into ZIP bytes: `[Content_Types].xml` first,
//! then the package relationships, then every part in partname order, each
//! followed by its `.rels` sibling when it has relationships.

use crate::ooxml::opc::constants::{content_type as ct, namespace as NS};
use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use log::debug;
use quick_xml::escape::escape;
use std::collections::BTreeMap;
use std::fmt::Write as _;

pub struct PackageWriter;

impl PackageWriter {
    /// Serialize an OPC package to bytes through `phys_writer`.
    pub fn to_bytes(mut phys_writer: PhysPkgWriter, package: &OpcPackage) -> Result<Vec<u8>> {
        Self::write_content_types(&mut phys_writer, package)?;
        Self::write_pkg_rels(&mut phys_writer, package)?;
        Self::write_parts(&mut phys_writer, package)?;
        phys_writer.finish()
    }

    fn write_content_types(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let cti = ContentTypesItem::from_package(package);
        phys_writer.write(&PackURI::content_types(), cti.to_xml().as_bytes())
    }

    fn write_pkg_rels(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let rels_uri = PackURI::package().rels_uri();
        phys_writer.write(&rels_uri, package.rels().to_xml().as_bytes())
    }

    fn write_parts(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        for part in package.iter_parts() {
            let blob = part.blob();
            if part.compressible() {
                phys_writer.write(part.partname(), blob)?;
            } else {
                phys_writer.write_stored(part.partname(), blob)?;
            }
            debug!("wrote {} ({} bytes)", part.partname(), blob.len());

            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri();
                phys_writer.write(&rels_uri, part.rels().to_xml().as_bytes())?;
            }
        }

        Ok(())
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping.
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();
        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    /// Media parts map through a Default by extension, everything else gets
    /// an Override for its partname.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext();
        if Self::is_default_content_type(ext, content_type) {
            self.defaults
                .insert(ext.to_ascii_lowercase(), content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext.to_ascii_lowercase().as_str(), content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tif", ct::TIFF)
                | ("tiff", ct::TIFF)
                | ("emf", ct::X_EMF)
                | ("wmf", ct::X_WMF)
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(NS::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);
        xml.push('\n');

        for (ext, content_type) in &self.defaults {
            let _ = write!(
                xml,
                r#"  <Default Extension="{}" ContentType="{}"/>"#,
                escape(ext.as_str()),
                escape(content_type.as_str())
            );
            xml.push('\n');
        }

        for (partname, content_type) in &self.overrides {
            let _ = write!(
                xml,
                r#"  <Override PartName="{}" ContentType="{}"/>"#,
                escape(partname.as_str()),
                escape(content_type.as_str())
            );
            xml.push('\n');
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as RT;
    use crate::ooxml::opc::part::{BlobPart, XmlPart};
    use std::io::Cursor;
    use std::sync::Arc;

    fn sample_package() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        let doc = PackURI::new("/word/document.xml").unwrap();
        let mut doc_rels = crate::ooxml::opc::rel::Relationships::new(doc.clone());
        doc_rels
            .add_internal(RT::IMAGE, "media/image1.png")
            .unwrap();
        pkg.add_part(Box::new(XmlPart::with_rels(
            doc.clone(),
            ct::WML_DOCUMENT_MAIN,
            "<w:document/>".to_string(),
            doc_rels,
        )));
        pkg.add_part(Box::new(BlobPart::new(
            PackURI::new("/word/media/image1.png").unwrap(),
            ct::PNG,
            Arc::new(vec![0x89, b'P', b'N', b'G']),
        )));
        pkg.relate_to(&doc, RT::OFFICE_DOCUMENT).unwrap();
        pkg
    }

    #[test]
    fn test_content_types_xml() {
        let cti = ContentTypesItem::from_package(&sample_package());
        let xml = cti.to_xml();

        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#));
        assert!(xml.contains(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#));
        assert!(!xml.contains(r#"PartName="/word/media/image1.png""#));
    }

    #[test]
    fn test_member_order() {
        let bytes = PackageWriter::to_bytes(PhysPkgWriter::default(), &sample_package()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let ordered: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            ordered,
            [
                "[Content_Types].xml",
                "_rels/.rels",
                "word/document.xml",
                "word/_rels/document.xml.rels",
                "word/media/image1.png",
            ]
        );
    }
}
