//! Office Open XML (OOXML) write support.
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): part names, relationships, content types and
//!    the ZIP container
//! 2. **Errors** (`error`): the error type shared by every layer above OPC
//! 3. **Format-Specific Modules**:
//!    - `docx`: Word documents
pub mod docx;
pub mod error;
pub mod opc;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
