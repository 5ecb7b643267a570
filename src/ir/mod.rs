//! Node model and generic traversal layer.

pub mod dump;
pub mod expand;
pub mod json;
pub mod kinds;
pub mod literal;
pub mod location;
pub mod node;
pub mod schema;
pub mod visitor;
pub mod walk;

pub use dump::{dump, dump_with, DumpOptions};
pub use expand::{child_fields, children, children_mut};
pub use kinds::{Kind, CANONICAL};
pub use literal::{get_docstring, literal_value, Literal};
pub use location::{copy_location, fix_missing_locations, increment_line};
pub use node::{construct, Args, Location, Node, NodeId, SourceNode, Value};
pub use schema::{Attr, FieldDecl, KindDef, NodeKind, SchemaRegistry, Shape, SourceKind};
pub use visitor::{transform, visit, Transformed, Transformer, Visitor};
pub use walk::{postorder, preorder, walk, Walk};
