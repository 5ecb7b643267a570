//! Node-kind declarations and the registries that hold them.
//!
//! A [`KindDef`] names a syntactic construct, its ordered fields and its ordered
//! positional attributes. Declarations are `'static` tables; a [`SchemaRegistry`]
//! indexes one table by name and is frozen once built, so kinds cannot be added
//! after the registry is first used.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{GastError, Result};

/// What a field holds. Fixes the default value and whether the field is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A required child node.
    Node,
    /// An optional child node.
    OptNode,
    /// A sequence of child nodes.
    Nodes,
    /// A sequence of child nodes with `None` holes (`Dict.keys`, `kw_defaults`).
    OptNodes,
    /// A scalar: identifier, constant value, number.
    Scalar,
    /// A sequence of scalars (`Global.names`).
    Scalars,
    /// Integer flag defaulting to 0 (`is_async`, `simple`).
    Flag,
}

impl Shape {
    pub fn is_structural(self) -> bool {
        matches!(self, Shape::Node | Shape::OptNode | Shape::Nodes | Shape::OptNodes)
    }

    pub fn is_sequence(self) -> bool {
        matches!(self, Shape::Nodes | Shape::OptNodes | Shape::Scalars)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub shape: Shape,
}

impl FieldDecl {
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        FieldDecl { name, shape }
    }
}

/// Positional metadata slots. Never structural children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Lineno,
    ColOffset,
    EndLineno,
    EndColOffset,
}

impl Attr {
    pub const ALL: [Attr; 4] = [Attr::Lineno, Attr::ColOffset, Attr::EndLineno, Attr::EndColOffset];

    pub fn name(self) -> &'static str {
        match self {
            Attr::Lineno => "lineno",
            Attr::ColOffset => "col_offset",
            Attr::EndLineno => "end_lineno",
            Attr::EndColOffset => "end_col_offset",
        }
    }

    pub fn from_name(name: &str) -> Option<Attr> {
        Attr::ALL.into_iter().find(|attr| attr.name() == name)
    }

    /// Line-number attributes are the ones shifted by `increment_line`.
    pub fn is_line(self) -> bool {
        matches!(self, Attr::Lineno | Attr::EndLineno)
    }
}

/// No positional metadata.
pub const NO_ATTRS: &[Attr] = &[];
/// `lineno`, `col_offset`.
pub const START_ATTRS: &[Attr] = &[Attr::Lineno, Attr::ColOffset];
/// `lineno`, `col_offset`, `end_lineno`, `end_col_offset`.
pub const SPAN_ATTRS: &[Attr] = &[Attr::Lineno, Attr::ColOffset, Attr::EndLineno, Attr::EndColOffset];

/// Declaration of one node kind.
#[derive(Debug, PartialEq, Eq)]
pub struct KindDef {
    pub name: &'static str,
    pub fields: &'static [FieldDecl],
    pub attributes: &'static [Attr],
}

impl KindDef {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, attr: Attr) -> bool {
        self.attributes.contains(&attr)
    }
}

/// A node tag that resolves to a static declaration.
///
/// Canonical trees use the closed [`Kind`](super::kinds::Kind) enumeration; source
/// trees use [`SourceKind`], a handle into one version's registry.
pub trait NodeKind: Copy + Eq + fmt::Debug + 'static {
    fn def(self) -> &'static KindDef;

    fn name(self) -> &'static str {
        self.def().name
    }
}

/// Kind tag of a source-schema node.
#[derive(Clone, Copy)]
pub struct SourceKind(&'static KindDef);

impl SourceKind {
    pub fn new(def: &'static KindDef) -> Self {
        SourceKind(def)
    }
}

impl PartialEq for SourceKind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for SourceKind {}

impl fmt::Debug for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name)
    }
}

impl NodeKind for SourceKind {
    fn def(self) -> &'static KindDef {
        self.0
    }
}

/// Frozen name → declaration index for one schema.
#[derive(Debug)]
pub struct SchemaRegistry {
    name: &'static str,
    kinds: Vec<&'static KindDef>,
    index: FxHashMap<&'static str, usize>,
}

/// Collects declarations before the registry is frozen.
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: SchemaRegistry,
}

impl RegistryBuilder {
    /// Registers one kind. Kind names are unique within a registry.
    pub fn define(mut self, def: &'static KindDef) -> Result<Self> {
        let reg = &mut self.registry;
        if reg.index.contains_key(def.name) {
            return Err(GastError::DuplicateKind(def.name));
        }
        reg.index.insert(def.name, reg.kinds.len());
        reg.kinds.push(def);
        Ok(self)
    }

    pub fn define_all(self, defs: &'static [KindDef]) -> Result<Self> {
        defs.iter().try_fold(self, |builder, def| builder.define(def))
    }

    pub fn build(self) -> SchemaRegistry {
        tracing::debug!(
            "Schema registry '{}' frozen with {} kinds",
            self.registry.name,
            self.registry.kinds.len()
        );
        self.registry
    }
}

impl SchemaRegistry {
    pub fn builder(name: &'static str) -> RegistryBuilder {
        RegistryBuilder {
            registry: SchemaRegistry {
                name,
                kinds: Vec::new(),
                index: FxHashMap::default(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, kind: &str) -> Option<&'static KindDef> {
        self.index.get(kind).map(|&i| self.kinds[i])
    }

    /// Like [`get`](Self::get) but fails with `UnknownKind`.
    pub fn lookup(&self, kind: &str) -> Result<&'static KindDef> {
        self.get(kind).ok_or_else(|| GastError::UnknownKind {
            schema: self.name,
            kind: kind.to_string(),
        })
    }

    pub fn source_kind(&self, kind: &str) -> Option<SourceKind> {
        self.get(kind).map(SourceKind::new)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.index.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static KindDef> + '_ {
        self.kinds.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PAIR: KindDef = KindDef {
        name: "Pair",
        fields: &[FieldDecl::new("left", Shape::Node), FieldDecl::new("right", Shape::Node)],
        attributes: START_ATTRS,
    };

    static PAIR_AGAIN: KindDef = KindDef {
        name: "Pair",
        fields: &[],
        attributes: NO_ATTRS,
    };

    #[test]
    fn test_define_and_lookup() {
        let registry = SchemaRegistry::builder("test").define(&PAIR).unwrap().build();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("Pair").unwrap().field_index("right"), Some(1));
        assert!(matches!(
            registry.lookup("Triple"),
            Err(GastError::UnknownKind { kind, .. }) if kind == "Triple"
        ));
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let result = SchemaRegistry::builder("test")
            .define(&PAIR)
            .and_then(|b| b.define(&PAIR_AGAIN));
        assert!(matches!(result, Err(GastError::DuplicateKind("Pair"))));
    }

    #[test]
    fn test_attr_names_round_trip() {
        for attr in Attr::ALL {
            assert_eq!(Attr::from_name(attr.name()), Some(attr));
        }
        assert!(Attr::Lineno.is_line());
        assert!(!Attr::ColOffset.is_line());
    }
}
