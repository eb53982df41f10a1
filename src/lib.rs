//! Longan - A Rust library for writing Microsoft Word documents
//!
//! This library assembles Word documents in memory and serializes them as
//! Office Open XML (.docx) packages.
//!
//! # Features
//!
//! - **Document model**: sections with page setup, paragraphs, runs, tables
//!   with merged cells, hyperlinks, inline pictures and page number fields
//! - **Headers and footers**: one default header and footer per section,
//!   each written to its own part with its own relationships
//! - **Styles**: a registry seeded with the built-in Word styles, with custom
//!   paragraph, character and table styles
//! - **Deterministic packaging**: identical documents produce identical bytes
//!
//! # Example - Writing a DOCX file
//!
//! ```no_run
//! use longan::ooxml::docx::writer::{FieldCode, MutableDocument, RunProperties};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = MutableDocument::new();
//! doc.add_heading("Release notes", 1)?;
//!
//! let mut para = doc.add_paragraph("Download from ", None)?;
//! para.insert_hyperlink("the project site", "https://example.org", None)?;
//! para.add_run(".", RunProperties::default())?;
//!
//! let mut footer = doc.footer(0).ok_or("missing section")?;
//! footer
//!     .add_paragraph("Page ", Some("Footer"))?
//!     .insert_field(FieldCode::page_number())?;
//!
//! doc.save("release-notes.docx")?;
//! # Ok(())
//! # }
//! ```

/// OOXML (Office Open XML) document writer
///
/// This module provides the packaging layer and the Word document model.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use ooxml::docx::writer::MutableDocument;
pub use ooxml::{OoxmlError, Result};
