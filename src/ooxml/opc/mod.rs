/// Open Packaging Conventions (OPC) write support.
///
/// This module provides the packaging layer underneath the document writer:
///
/// - Part names (`PackURI`) and per-part relationships
/// - Content type declarations
/// - ZIP-based physical packaging with deterministic member order
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, RelationshipId, Relationships};
