//! Document-wide store of embedded media.
//!
//! Picture bytes are owned here once, named `/word/media/image{n}.{ext}` in
//! insertion order, and shared with the package through an `Arc` each time
//! the document is serialized.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use log::warn;
use std::io::Cursor;
use std::sync::Arc;

use super::image::{EMU_PER_INCH, ImageFormat, InlineImage};

/// One embedded media part.
#[derive(Debug, Clone)]
pub struct MediaItem {
    partname: PackURI,
    format: ImageFormat,
    blob: Arc<Vec<u8>>,
}

impl MediaItem {
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[inline]
    pub fn blob(&self) -> &Arc<Vec<u8>> {
        &self.blob
    }
}

/// A sniffed picture with its display extent, ready to be stored.
#[derive(Debug)]
pub(crate) struct PreparedPicture {
    pub(crate) format: ImageFormat,
    pub(crate) width_emu: i64,
    pub(crate) height_emu: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MediaStore {
    items: Vec<MediaItem>,
    /// Last drawing object id handed out
    drawings: u32,
}

impl MediaStore {
    /// Sniff the format of `data` and work out its display size.
    ///
    /// With only one dimension given the other follows the picture's aspect
    /// ratio; with none the native pixel size at 96 DPI is used. When the pixel
    /// size cannot be read the picture is laid out as a square.
    pub(crate) fn prepare(
        data: &[u8],
        width_emu: Option<i64>,
        height_emu: Option<i64>,
    ) -> Result<PreparedPicture> {
        let format = ImageFormat::detect_from_bytes(data)
            .ok_or_else(|| OoxmlError::InvalidFormat("Unknown image format".to_string()))?;
        if width_emu.is_some_and(|w| w <= 0) || height_emu.is_some_and(|h| h <= 0) {
            return Err(OoxmlError::InvalidFormat(
                "Picture extent must be positive".to_string(),
            ));
        }

        let (width_emu, height_emu) = match (width_emu, height_emu) {
            (Some(w), Some(h)) => (w, h),
            (w, h) => match pixel_size(data, format) {
                Some((px_w, px_h)) => match (w, h) {
                    (Some(w), None) => (w, w * i64::from(px_h) / i64::from(px_w)),
                    (None, Some(h)) => (h * i64::from(px_w) / i64::from(px_h), h),
                    _ => (InlineImage::px_to_emu(px_w), InlineImage::px_to_emu(px_h)),
                },
                None => {
                    warn!(
                        "cannot read pixel size of {} picture, using a square extent",
                        format.extension()
                    );
                    let side = w.or(h).unwrap_or(EMU_PER_INCH);
                    (side, side)
                },
            },
        };

        Ok(PreparedPicture {
            format,
            width_emu,
            height_emu,
        })
    }

    /// Partname the next stored picture of `format` will receive.
    pub(crate) fn next_partname(&self, format: ImageFormat) -> PackURI {
        let n = u32::try_from(self.items.len() + 1).unwrap_or(u32::MAX);
        PackURI::numbered("/word/media", "image", n, format.extension())
    }

    /// Store the bytes under `partname` and return a fresh drawing id.
    pub(crate) fn push(&mut self, partname: PackURI, format: ImageFormat, data: Vec<u8>) -> u32 {
        self.items.push(MediaItem {
            partname,
            format,
            blob: Arc::new(data),
        });
        self.drawings = self.drawings.saturating_add(1);
        self.drawings
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn pixel_size(data: &[u8], format: ImageFormat) -> Option<(u32, u32)> {
    if !format.is_raster() {
        return None;
    }
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok((0, _)) | Ok((_, 0)) => None,
        Ok(dims) => Some(dims),
        Err(_) => None,
    }
}
