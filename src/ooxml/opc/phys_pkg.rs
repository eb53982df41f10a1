/// Physical package writer for OPC packages.
///
/// Writes package members into a ZIP archive held in memory. Every member is
/// stamped with the same fixed modification time so that writing the same
/// package twice produces byte-identical archives.
use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    compressed: SimpleFileOptions,
    stored: SimpleFileOptions,
}

impl PhysPkgWriter {
    /// Create a writer using `method` for compressible members.
    ///
    /// `level` is only meaningful for [`CompressionMethod::Deflated`].
    pub fn new(method: CompressionMethod, level: Option<i64>) -> Self {
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(zip::DateTime::default());
        let compressed = if method == CompressionMethod::Stored {
            stored
        } else {
            SimpleFileOptions::default()
                .compression_method(method)
                .compression_level(level)
                .last_modified_time(zip::DateTime::default())
        };

        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            compressed,
            stored,
        }
    }

    /// Write a member with the writer's compression method.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive
            .start_file(pack_uri.membername(), self.compressed)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Write a member without compression.
    pub fn write_stored(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive.start_file(pack_uri.membername(), self.stored)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new(CompressionMethod::Deflated, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_member(zip_data: &[u8], name: &str) -> Vec<u8> {
        let mut archive = zip::ZipArchive::new(Cursor::new(zip_data)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::default();
        let pack_uri = PackURI::new("/word/document.xml").unwrap();
        writer.write(&pack_uri, b"<w:document/>").unwrap();
        let zip_data = writer.finish().unwrap();

        assert_eq!(read_member(&zip_data, "word/document.xml"), b"<w:document/>");
    }

    #[test]
    fn test_member_order_and_methods() {
        let mut writer = PhysPkgWriter::default();
        let content_types = PackURI::content_types();
        let image = PackURI::new("/word/media/image1.png").unwrap();

        writer.write(&content_types, b"<Types/>").unwrap();
        writer.write_stored(&image, &[0x89, b'P', b'N', b'G']).unwrap();
        let zip_data = writer.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(zip_data.as_slice())).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");
        let png = archive.by_index(1).unwrap();
        assert_eq!(png.name(), "word/media/image1.png");
        assert_eq!(png.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_identical_input_gives_identical_bytes() {
        let build = || {
            let mut writer = PhysPkgWriter::new(CompressionMethod::Deflated, Some(9));
            writer
                .write(&PackURI::new("/a.xml").unwrap(), b"<a>repeat repeat repeat</a>")
                .unwrap();
            writer.finish().unwrap()
        };
        assert_eq!(build(), build());
    }
}
