/// In-memory OPC package assembled ahead of writing.
///
/// The package owns the package-level relationships (`/_rels/.rels`) and every
/// part keyed by partname. Parts are kept in a `BTreeMap` so iteration order,
/// and with it the written member order, is always the same.
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::rel::{RelationshipId, Relationships};
use std::collections::BTreeMap;

pub struct OpcPackage {
    /// Package-level relationships
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: BTreeMap<PackURI, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PackURI::package()),
            parts: BTreeMap::new(),
        }
    }

    /// Add a part to the package, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        let partname = part.partname().clone();
        self.parts.insert(partname, part);
    }

    /// Get a part by partname.
    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname)
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Iterate parts in partname order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    /// Get a reference to the package-level relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package to a part.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> Result<RelationshipId> {
        self.rels.relate_to(reltype, partname)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}
