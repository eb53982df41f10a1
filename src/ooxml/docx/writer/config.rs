//! Configuration for package serialization.

use crate::ooxml::error::{OoxmlError, Result};
use serde::{Deserialize, Serialize};
use zip::CompressionMethod;

/// How XML parts are stored in the container. Media is always stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl Compression {
    pub(crate) fn method(self) -> CompressionMethod {
        match self {
            Self::Stored => CompressionMethod::Stored,
            Self::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Options controlling how a document is written to a package.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::writer::{Compression, WriterOptions};
///
/// // Create with defaults
/// let options = WriterOptions::default();
///
/// // Or customize
/// let options = WriterOptions::new()
///     .with_compression(Compression::Deflated)
///     .with_compression_level(9)
///     .with_core_properties(false);
///
/// // Or load from YAML
/// let options = WriterOptions::from_yaml_str("compression: stored\n").unwrap();
/// assert_eq!(options.compression, Compression::Stored);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub compression: Compression,
    /// Deflate level, 0 to 9
    pub compression_level: u8,
    /// Whether to write `/docProps/core.xml` when any core property is set
    pub include_core_properties: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            compression_level: 6,
            include_core_properties: true,
        }
    }
}

impl WriterOptions {
    /// Create a new `WriterOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the deflate level. Checked when the options are used.
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_core_properties(mut self, include: bool) -> Self {
        self.include_core_properties = include;
        self
    }

    /// Parse options from YAML. Missing keys take their default values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_saphyr::from_str(yaml)
            .map_err(|e| OoxmlError::Config(format!("Failed to parse writer options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Render the options as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| OoxmlError::Config(format!("Failed to serialize writer options: {}", e)))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(OoxmlError::Config(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }

    /// Level handed to the ZIP writer, if compression applies.
    pub(crate) fn level(&self) -> Option<i64> {
        match self.compression {
            Compression::Deflated => Some(i64::from(self.compression_level)),
            Compression::Stored => None,
        }
    }
}
