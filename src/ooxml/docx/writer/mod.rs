//! Document writer for DOCX.
//!
//! [`MutableDocument`] owns every piece of content, the style registry and
//! the media store. Content is added through short-lived handles
//! ([`StoryMut`], [`ParagraphMut`], [`TableMut`], [`CellMut`]) that borrow
//! the story they edit together with the registry and the relationships of
//! the part the story is written to, so each relationship id lands in the
//! right part. Serialization validates every reference before any bytes are
//! produced.

pub mod config;
pub mod doc;
pub mod field;
pub mod hyperlink;
pub mod image;
pub mod media;
pub mod paragraph;
pub mod props;
pub mod run;
pub mod section;
pub mod serializer;
pub mod story;
pub mod style;
pub mod table;

// Re-export main document type
pub use doc::MutableDocument;

// Re-export story and block types
pub use paragraph::{Inline, MutableParagraph, ParagraphMut};
pub use story::{Block, Story, StoryMut};
pub use table::{
    CellMut, HorizontalMerge, MutableCell, MutableRow, MutableTable, TableMut, VerticalMerge,
};

// Re-export run-level types
pub use field::{FieldCode, FieldKind, FieldPrimitive};
pub use hyperlink::MutableHyperlink;
pub use self::image::InlineImage;
pub use media::{MediaItem, MediaStore};
pub use run::{BreakType, MutableRun, RunContent, RunProperties};

// Re-export section types
pub use crate::ooxml::docx::enums::WdSectionStart as SectionStart;
pub use section::{HeaderFooter, PageNumberFormat, Section, SectionProperties};

// Re-export style types
pub use style::{MutableStyle, StyleId, StyleRegistry};

// Re-export formatting types
pub use crate::ooxml::docx::format::{
    ImageFormat, LineSpacing, ParagraphAlignment, ParagraphBorders, TableAlignment,
    TextDirection, UnderlineStyle,
};

// Re-export packaging options and metadata
pub use config::{Compression, WriterOptions};
pub use props::CoreProperties;
