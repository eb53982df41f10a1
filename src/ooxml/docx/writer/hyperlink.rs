/// Hyperlink support for DOCX documents.
use crate::ooxml::error::Result;
use crate::ooxml::opc::rel::RelationshipId;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

use super::run::MutableRun;
use super::style::StyleRegistry;

/// An external hyperlink wrapping one run.
///
/// Each hyperlink owns its own relationship in the enclosing part, even when
/// several point at the same URL.
#[derive(Debug, Clone)]
pub struct MutableHyperlink {
    pub(crate) r_id: RelationshipId,
    pub(crate) url: String,
    pub(crate) run: MutableRun,
    pub(crate) tooltip: Option<String>,
}

impl MutableHyperlink {
    #[inline]
    pub fn r_id(&self) -> &RelationshipId {
        &self.r_id
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The run holding the display text.
    #[inline]
    pub fn run(&self) -> &MutableRun {
        &self.run
    }

    pub fn run_mut(&mut self) -> &mut MutableRun {
        &mut self.run
    }

    /// Set the tooltip text.
    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) -> &mut Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub(crate) fn write_xml(&self, xml: &mut String, styles: &StyleRegistry) -> Result<()> {
        write!(xml, r#"<w:hyperlink r:id="{}""#, self.r_id)?;
        if let Some(ref tooltip) = self.tooltip {
            write!(xml, r#" w:tooltip="{}""#, escape(tooltip.as_str()))?;
        }
        xml.push_str(r#" w:history="1">"#);
        self.run.write_xml(xml, styles)?;
        xml.push_str("</w:hyperlink>");
        Ok(())
    }
}
