//! Relationship-related objects for OPC packages.
//!
//! Every part that can hold relationships (the package itself, the main
//! document, each header and footer) owns one [`Relationships`] collection.
//! Identifiers are minted as `rId{n}` from a per-collection counter that only
//! ever moves forward, so an identifier handed out once stays unique and
//! stable for the lifetime of the collection.
use crate::ooxml::opc::constants::namespace as NS;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use log::trace;
use quick_xml::escape::escape;
use std::fmt::Write as _;

/// Identifier of a relationship within one part (e.g. `rId3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipId(String);

impl RelationshipId {
    fn from_number(n: u32) -> Self {
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(n);
        let mut id = String::with_capacity(3 + digits.len());
        id.push_str("rId");
        id.push_str(digits);
        Self(id)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelationshipId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RelationshipId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RelationshipId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single relationship from a source part to a target.
///
/// Internal relationships point at another part through a reference relative to
/// the source part's directory; external relationships carry an absolute URI
/// and are written with `TargetMode="External"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: RelationshipId,
    reltype: String,
    target_ref: String,
    is_external: bool,
}

impl Relationship {
    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &RelationshipId {
        &self.r_id
    }

    /// Get the relationship type URI.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Collection of relationships from a single source part.
///
/// Entries are kept in issue order. No deduplication is performed: two calls
/// for the same target produce two entries with distinct identifiers.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Partname of the part owning these relationships
    source: PackURI,

    /// Relationships in the order their ids were issued
    rels: Vec<Relationship>,

    /// Number of the most recently issued id (0 before the first)
    last_issued: u32,
}

impl Relationships {
    /// Create an empty collection for the part at `source`.
    pub fn new(source: PackURI) -> Self {
        Self {
            source,
            rels: Vec::new(),
            last_issued: 0,
        }
    }

    /// Partname of the part owning this collection.
    #[inline]
    pub fn source(&self) -> &PackURI {
        &self.source
    }

    /// Base URI against which internal target references are resolved.
    #[inline]
    pub fn base_uri(&self) -> &str {
        self.source.base_uri()
    }

    /// Register an external target and return its fresh identifier.
    pub fn add_external(&mut self, reltype: &str, target_uri: &str) -> Result<RelationshipId> {
        self.push(reltype, target_uri, true)
    }

    /// Register an internal target (a reference relative to this part's base
    /// URI) and return its fresh identifier.
    pub fn add_internal(&mut self, reltype: &str, target_ref: &str) -> Result<RelationshipId> {
        self.push(reltype, target_ref, false)
    }

    /// Register an internal relationship to `target`, computing the relative
    /// reference from this part's base URI.
    pub fn relate_to(&mut self, reltype: &str, target: &PackURI) -> Result<RelationshipId> {
        let target_ref = target.relative_ref(self.base_uri());
        self.push(reltype, &target_ref, false)
    }

    fn push(&mut self, reltype: &str, target: &str, is_external: bool) -> Result<RelationshipId> {
        let n = self
            .last_issued
            .checked_add(1)
            .ok_or_else(|| OpcError::RelationshipIdsExhausted(self.source.to_string()))?;
        self.last_issued = n;

        let r_id = RelationshipId::from_number(n);
        trace!(
            "{}: minted {} -> {}{}",
            self.source,
            r_id,
            target,
            if is_external { " (external)" } else { "" }
        );
        self.rels.push(Relationship {
            r_id: r_id.clone(),
            reltype: reltype.to_string(),
            target_ref: target.to_string(),
            is_external,
        });
        Ok(r_id)
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id.as_str() == r_id)
    }

    /// Check whether `r_id` was issued by this collection.
    #[inline]
    pub fn contains(&self, r_id: &str) -> bool {
        self.get(r_id).is_some()
    }

    /// Look up a relationship by ID, failing with
    /// [`OpcError::RelationshipNotFound`] when it is absent.
    pub fn require(&self, r_id: &str) -> Result<&Relationship> {
        self.get(r_id).ok_or_else(|| {
            OpcError::RelationshipNotFound(format!("{} in {}", r_id, self.source))
        })
    }

    /// Remove the relationship `r_id`. Its number is never issued again.
    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        let idx = self.rels.iter().position(|rel| rel.r_id.as_str() == r_id)?;
        trace!("{}: dropped {}", self.source, r_id);
        Some(self.rels.remove(idx))
    }

    /// Reverse lookup: the first relationship whose target equals `target`.
    pub fn find_by_target(&self, target: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.target_ref == target)
    }

    /// Iterate relationships in issue order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize relationships to the XML of a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Relationships xmlns=""#);
        xml.push_str(NS::OPC_RELATIONSHIPS);
        xml.push_str(r#"">"#);
        xml.push('\n');

        for rel in &self.rels {
            let target_mode = if rel.is_external {
                r#" TargetMode="External""#
            } else {
                ""
            };

            let _ = write!(
                xml,
                r#"  <Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                rel.r_id,
                escape(rel.reltype.as_str()),
                escape(rel.target_ref.as_str()),
                target_mode
            );
            xml.push('\n');
        }

        xml.push_str("</Relationships>");
        xml
    }
}
