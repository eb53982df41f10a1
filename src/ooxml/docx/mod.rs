/// Word (.docx) document generation.
///
/// Documents are built in memory through the [`writer`] API and serialized
/// to a WordprocessingML package.
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::docx::writer::{MutableDocument, RunProperties};
///
/// let mut doc = MutableDocument::new();
/// doc.add_heading("Minutes", 1)?;
/// doc.add_paragraph("Present: ", None)?
///     .add_run("everyone", RunProperties::new().with_bold(true))?;
/// doc.save("minutes.docx")?;
/// # Ok::<(), longan::ooxml::OoxmlError>(())
/// ```
pub mod enums;
pub mod format;
pub mod writer;

pub use enums::{WdOrientation, WdSectionStart, WdStyleType};
pub use writer::MutableDocument;
