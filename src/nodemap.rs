//! Correspondence between canonical nodes and the source nodes they came from.
//!
//! The map is filled during a lowering pass ([`map_and_convert`]). Context markers
//! are never keys. A handful of canonical nodes have no source node at all (the
//! binding a 3.x `except ... as name` clause produces from a bare identifier);
//! those land in a separate gap set so lookups can tell an expected absence from
//! a translator bug.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{GapReason, GastError, Result};
use crate::ir::{walk, Location, Node, NodeId, SourceNode};
use crate::translate::{translator_for, SourceTree};

/// Kind-name pairs `(source, canonical)` where a canonical node is recorded against
/// a source node of a different name.
pub const DERIVED_KINDS: &[(&str, &str)] = &[
    ("arg", "Name"),
    ("arguments", "Name"),
    ("Num", "Constant"),
    ("Str", "Constant"),
    ("Bytes", "Constant"),
    ("Ellipsis", "Constant"),
    ("Ellipsis", "Index"),
    ("Name", "Constant"),
    ("Call", "Starred"),
    ("Call", "keyword"),
    ("ClassDef", "Starred"),
    ("ClassDef", "keyword"),
    ("With", "withitem"),
    ("TryExcept", "Try"),
    ("TryFinally", "Try"),
    ("Raise", "Call"),
    ("Raise", "Attribute"),
];

pub fn is_derived(source: &str, canonical: &str) -> bool {
    DERIVED_KINDS.iter().any(|&(s, c)| s == source && c == canonical)
}

/// What a canonical node points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    pub id: NodeId,
    pub kind: &'static str,
    pub location: Location,
}

#[derive(Debug, Default)]
pub struct CorrespondenceMap {
    entries: FxHashMap<NodeId, SourceRef>,
    gaps: FxHashSet<NodeId>,
}

impl CorrespondenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// First record wins: a reshape records its derived nodes before the generic
    /// pass records the node it returns.
    pub(crate) fn record(&mut self, node: &Node, source: &SourceNode) {
        if node.kind().is_context_marker() || self.gaps.contains(&node.id()) {
            return;
        }
        self.entries.entry(node.id()).or_insert(SourceRef {
            id: source.id(),
            kind: source.name(),
            location: *source.location(),
        });
    }

    pub(crate) fn record_gap(&mut self, node: &Node) {
        self.gaps.insert(node.id());
    }

    pub fn get(&self, node: &Node) -> Option<&SourceRef> {
        self.entries.get(&node.id())
    }

    /// Like [`get`](Self::get), but explains a missing entry.
    pub fn lookup(&self, node: &Node) -> Result<&SourceRef> {
        self.entries.get(&node.id()).ok_or_else(|| {
            let reason = if node.kind().is_context_marker() {
                GapReason::ContextMarker
            } else if self.gaps.contains(&node.id()) {
                GapReason::DocumentedGap
            } else {
                GapReason::Unmapped
            };
            GastError::NoCorrespondence {
                id: node.id(),
                kind: node.name(),
                reason,
            }
        })
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.entries.contains_key(&node.id())
    }

    pub fn is_gap(&self, node: &Node) -> bool {
        self.gaps.contains(&node.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &SourceRef)> {
        self.entries.iter()
    }

    /// Checks every node reachable from `root`: markers must be absent, everything
    /// else mapped (or a documented gap) to a source node of the same kind name or
    /// of a [`DERIVED_KINDS`] partner.
    pub fn verify(&self, root: &Node) -> Result<()> {
        for node in walk(root) {
            if node.kind().is_context_marker() {
                if self.contains(node) {
                    return Err(GastError::InvalidTree(format!(
                        "context marker {} {} is mapped",
                        node.name(),
                        node.id()
                    )));
                }
                continue;
            }
            let source = match self.lookup(node) {
                Ok(source) => source,
                Err(GastError::NoCorrespondence { reason, .. }) if reason.is_expected() => continue,
                Err(e) => return Err(e),
            };
            if source.kind != node.name() && !is_derived(source.kind, node.name()) {
                return Err(GastError::InvalidTree(format!(
                    "{} {} is mapped to unrelated {} node",
                    node.name(),
                    node.id(),
                    source.kind
                )));
            }
        }
        Ok(())
    }
}

/// A canonical tree together with the source tree it was lowered from.
#[derive(Debug)]
pub struct MappedTree {
    pub canonical: Node,
    pub source: SourceTree,
    pub map: CorrespondenceMap,
}

impl MappedTree {
    /// The source node `node` was derived from.
    pub fn source_of(&self, node: &Node) -> Result<&SourceNode> {
        let target = self.map.lookup(node)?.id;
        walk(&self.source.root)
            .find(|candidate| candidate.id() == target)
            .ok_or_else(|| GastError::InvalidTree(format!("source node {} is not in the source tree", target)))
    }
}

/// Lowers `source`, recording the origin of every canonical node.
pub fn map_and_convert(source: SourceTree) -> Result<MappedTree> {
    let mut map = CorrespondenceMap::new();
    let canonical = translator_for(source.version).to_canonical_mapped(&source.root, &mut map)?;
    debug!(
        "Mapped {} canonical nodes ({} gaps) from schema {}",
        map.len(),
        map.gaps.len(),
        source.version
    );
    Ok(MappedTree { canonical, source, map })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Kind;
    use crate::translate::SchemaVersion;

    fn handler_tree() -> SourceTree {
        let json = serde_json::json!({
            "_type": "ExceptHandler",
            "type": { "_type": "Name", "id": "E", "ctx": { "_type": "Load" }, "lineno": 2, "col_offset": 7 },
            "name": "e",
            "body": [{ "_type": "Pass", "lineno": 3, "col_offset": 4 }],
            "lineno": 2,
            "col_offset": 0
        });
        SourceTree::from_json(&json, SchemaVersion::Python33).unwrap()
    }

    #[test]
    fn test_handler_binding_is_a_documented_gap() {
        let mapped = map_and_convert(handler_tree()).unwrap();
        let binding = mapped.canonical.node("name").unwrap();
        assert!(mapped.map.is_gap(binding));
        assert!(matches!(
            mapped.map.lookup(binding),
            Err(GastError::NoCorrespondence { reason: GapReason::DocumentedGap, .. })
        ));
        mapped.map.verify(&mapped.canonical).unwrap();
    }

    #[test]
    fn test_markers_are_never_keys() {
        let mapped = map_and_convert(handler_tree()).unwrap();
        let load = mapped.canonical.node("type").unwrap().node("ctx").unwrap();
        assert!(!mapped.map.contains(load));
        assert!(matches!(
            mapped.map.lookup(load),
            Err(GastError::NoCorrespondence { reason: GapReason::ContextMarker, .. })
        ));
    }

    #[test]
    fn test_source_of_returns_original_node() {
        let mapped = map_and_convert(handler_tree()).unwrap();
        let pass = mapped.canonical.list("body")[0].as_node().unwrap();
        let source = mapped.source_of(pass).unwrap();
        assert_eq!(source.name(), "Pass");
        assert_eq!(source.location(), &Location::new(3, 4));
        assert_eq!(mapped.source_of(&mapped.canonical).unwrap().name(), "ExceptHandler");
    }

    #[test]
    fn test_unmapped_node_is_reported() {
        let map = CorrespondenceMap::new();
        let stray = Node::empty(Kind::Pass);
        assert!(matches!(
            map.lookup(&stray),
            Err(GastError::NoCorrespondence { reason: GapReason::Unmapped, .. })
        ));
        assert!(map.verify(&stray).is_err());
    }
}
