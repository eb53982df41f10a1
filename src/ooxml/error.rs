/// Error types for OOXML operations.
use crate::ooxml::docx::enums::WdStyleType;
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// A style with this name already exists for the kind
    #[error("Duplicate {kind} style: '{name}'")]
    DuplicateStyle { name: String, kind: WdStyleType },

    /// Content references a style the registry does not define.
    ///
    /// `kind` is `None` when the lookup was not restricted to one kind;
    /// `location` names the offending element when raised while serializing.
    #[error(
        "Unknown {} style: '{name}'{}",
        kind.map_or("any", WdStyleType::to_xml),
        location.as_deref().map(|at| format!(" at {at}")).unwrap_or_default()
    )]
    UnknownStyle {
        name: String,
        kind: Option<WdStyleType>,
        location: Option<String>,
    },

    /// Style removal refused while content still references it
    #[error("Style '{name}' is still referenced {references} time(s)")]
    StyleInUse { name: String, references: usize },

    /// Out-of-bounds or overlapping cell merge
    #[error("Invalid merge: {0}")]
    InvalidMerge(String),

    /// A hyperlink or picture references an id missing from its part
    #[error("Unresolved relationship {r_id} in {part}")]
    UnresolvedRelationship { r_id: String, part: String },

    /// Generic packaging failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Writer configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for OoxmlError {
    fn from(err: std::fmt::Error) -> Self {
        OoxmlError::Serialization(err.to_string())
    }
}
