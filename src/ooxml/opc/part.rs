use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
/// Open Packaging Convention (OPC) objects related to package parts.
///
/// Parts are the fundamental units of content in an OPC package, each with a
/// unique partname, a content type, and optional relationships of its own.
use std::sync::Arc;

/// Trait representing a part in an OPC package.
pub trait Part: Send {
    /// Get the partname of this part.
    fn partname(&self) -> &PackURI;

    /// Get the content type of this part.
    fn content_type(&self) -> &str;

    /// Get the binary content of this part.
    fn blob(&self) -> &[u8];

    /// Get the relationships for this part.
    fn rels(&self) -> &Relationships;

    /// Whether the content benefits from Deflate compression.
    ///
    /// Binary media is usually already compressed and is written stored.
    fn compressible(&self) -> bool {
        true
    }

    /// Get the target reference for a relationship ID.
    fn target_ref(&self, r_id: &str) -> Option<&str> {
        self.rels().get(r_id).map(|rel| rel.target_ref())
    }
}

/// A part holding opaque binary content, such as an embedded picture.
///
/// The blob is shared through an `Arc` so the same media bytes can back a
/// package every time a document is serialized without being copied.
#[derive(Debug)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Arc<Vec<u8>>,
    rels: Relationships,
}

impl BlobPart {
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Arc<Vec<u8>>) -> Self {
        let rels = Relationships::new(partname.clone());
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn compressible(&self) -> bool {
        false
    }
}

/// A part whose content is a serialized XML document.
///
/// The relationships handed to an `XmlPart` are written next to it as the
/// `_rels/<name>.rels` sibling when they are not empty.
#[derive(Debug)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml: String,
    rels: Relationships,
}

impl XmlPart {
    /// Create an XML part without relationships.
    pub fn new(partname: PackURI, content_type: impl Into<String>, xml: String) -> Self {
        let rels = Relationships::new(partname.clone());
        Self::with_rels(partname, content_type, xml, rels)
    }

    /// Create an XML part carrying its own relationships.
    pub fn with_rels(
        partname: PackURI,
        content_type: impl Into<String>,
        xml: String,
        rels: Relationships,
    ) -> Self {
        Self {
            partname,
            content_type: content_type.into(),
            xml,
            rels,
        }
    }

    /// The XML content as a string slice.
    pub fn xml_str(&self) -> &str {
        &self.xml
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        self.xml.as_bytes()
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }
}
