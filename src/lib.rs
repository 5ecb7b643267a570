//! Version-independent Python syntax trees.
//!
//! Source trees in the 2.7, 3.3 and 3.8 `ast` schemas are lowered into one
//! canonical schema ([`ir::Kind`]) and raised back. Traversal, location and
//! debugging utilities work on the canonical schema only.

pub mod config;
pub mod error;
pub mod frontend;
pub mod ir;
pub mod logging;
pub mod nodemap;
pub mod translate;

pub use config::FrontendConfig;
pub use error::{GapReason, GastError, Result};
pub use frontend::{parse, parse_and_map, CommandFrontend, Frontend, Mode};
pub use ir::{
    construct, copy_location, dump, dump_with, fix_missing_locations, get_docstring, increment_line,
    literal_value, transform, visit, walk, Args, DumpOptions, Kind, Literal, Location, Node, NodeId, SourceNode,
    Transformed, Transformer, Value, Visitor,
};
pub use nodemap::{map_and_convert, CorrespondenceMap, MappedTree, SourceRef};
pub use translate::{translator_for, SchemaVersion, SourceTree, Translator};

/// Lowers a source tree to the canonical schema.
pub fn to_canonical(tree: &SourceTree) -> Result<Node> {
    translator_for(tree.version).to_canonical(&tree.root)
}

/// Raises a canonical tree into the `version` schema.
pub fn from_canonical(node: &Node, version: SchemaVersion) -> Result<SourceTree> {
    let root = translator_for(version).from_canonical(node)?;
    Ok(SourceTree { version, root })
}
