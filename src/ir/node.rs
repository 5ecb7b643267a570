//! The generic node record shared by canonical and source-schema trees.
//!
//! A [`Node`] is a kind tag, one [`Value`] per declared field (in declaration order)
//! and a [`Location`]. Canonical trees are `Node<Kind>` (the default), source trees
//! are `Node<SourceKind>`. Children are owned; there is no sharing between trees.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{GastError, Result};

use super::kinds::Kind;
use super::schema::{Attr, FieldDecl, KindDef, NodeKind, Shape, SourceKind};

/// A source-schema tree node.
pub type SourceNode = Node<SourceKind>;

/// Process-unique identity of a node. Assigned at construction and by `clone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    fn fresh() -> Self {
        NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Positional metadata slots. Only the slots a kind declares are meaningful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub lineno: Option<i64>,
    pub col_offset: Option<i64>,
    pub end_lineno: Option<i64>,
    pub end_col_offset: Option<i64>,
}

impl Location {
    pub fn new(lineno: i64, col_offset: i64) -> Self {
        Location {
            lineno: Some(lineno),
            col_offset: Some(col_offset),
            ..Location::default()
        }
    }

    pub fn span(lineno: i64, col_offset: i64, end_lineno: i64, end_col_offset: i64) -> Self {
        Location {
            lineno: Some(lineno),
            col_offset: Some(col_offset),
            end_lineno: Some(end_lineno),
            end_col_offset: Some(end_col_offset),
        }
    }

    pub fn get(&self, attr: Attr) -> Option<i64> {
        match attr {
            Attr::Lineno => self.lineno,
            Attr::ColOffset => self.col_offset,
            Attr::EndLineno => self.end_lineno,
            Attr::EndColOffset => self.end_col_offset,
        }
    }

    pub fn set(&mut self, attr: Attr, value: Option<i64>) {
        let slot = match attr {
            Attr::Lineno => &mut self.lineno,
            Attr::ColOffset => &mut self.col_offset,
            Attr::EndLineno => &mut self.end_lineno,
            Attr::EndColOffset => &mut self.end_col_offset,
        };
        *slot = value;
    }
}

/// A field value: scalar, child node, sequence, or none.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<K: NodeKind = Kind> {
    None,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, as decimal digits with an optional sign.
    BigInt(String),
    Float(f64),
    Complex { real: f64, imag: f64 },
    Str(String),
    Bytes(Vec<u8>),
    Ellipsis,
    Node(Box<Node<K>>),
    List(Vec<Value<K>>),
}

impl<K: NodeKind> Default for Value<K> {
    fn default() -> Self {
        Value::None
    }
}

impl<K: NodeKind> Value<K> {
    /// Value a field takes when its node was built without arguments.
    pub fn default_for(shape: Shape) -> Self {
        match shape {
            Shape::Nodes | Shape::OptNodes | Shape::Scalars => Value::List(Vec::new()),
            Shape::Flag => Value::Int(0),
            Shape::Node | Shape::OptNode | Shape::Scalar => Value::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// None, an empty list, or a zero flag: nothing a schema would lose by dropping it.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::None => true,
            Value::List(items) => items.is_empty(),
            Value::Int(0) | Value::Bool(false) => true,
            _ => false,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Node(_) | Value::List(_))
    }

    pub fn as_node(&self) -> Option<&Node<K>> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node<K>> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Node<K>> {
        match self {
            Value::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<K>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Child nodes held directly or through a list, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<K>> {
        let (single, list) = match self {
            Value::Node(node) => (Some(node.as_ref()), &[][..]),
            Value::List(items) => (None, items.as_slice()),
            _ => (None, &[][..]),
        };
        single.into_iter().chain(list.iter().filter_map(Value::as_node))
    }

    /// Re-tags a scalar (or a list of scalars) for another schema.
    pub fn cast_scalar<K2: NodeKind>(&self) -> Result<Value<K2>> {
        Ok(match self {
            Value::None => Value::None,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::BigInt(digits) => Value::BigInt(digits.clone()),
            Value::Float(f) => Value::Float(*f),
            Value::Complex { real, imag } => Value::Complex { real: *real, imag: *imag },
            Value::Str(s) => Value::Str(s.clone()),
            Value::Bytes(b) => Value::Bytes(b.clone()),
            Value::Ellipsis => Value::Ellipsis,
            Value::List(items) => Value::List(
                items.iter().map(Value::cast_scalar).collect::<Result<Vec<_>>>()?,
            ),
            Value::Node(node) => {
                return Err(GastError::InvalidTree(format!(
                    "{} node found where a scalar was declared",
                    node.name()
                )))
            }
        })
    }
}

impl<K: NodeKind> From<Node<K>> for Value<K> {
    fn from(node: Node<K>) -> Self {
        Value::Node(Box::new(node))
    }
}

impl<K: NodeKind> From<Option<Node<K>>> for Value<K> {
    fn from(node: Option<Node<K>>) -> Self {
        node.map_or(Value::None, Value::from)
    }
}

impl<K: NodeKind> From<Vec<Node<K>>> for Value<K> {
    fn from(nodes: Vec<Node<K>>) -> Self {
        Value::List(nodes.into_iter().map(Value::from).collect())
    }
}

impl<K: NodeKind> From<&str> for Value<K> {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl<K: NodeKind> From<String> for Value<K> {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<K: NodeKind> From<i64> for Value<K> {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl<K: NodeKind> From<f64> for Value<K> {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<K: NodeKind> From<bool> for Value<K> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Arguments to [`construct`]: all fields in order, or a subset by name.
#[derive(Debug, Clone)]
pub enum Args<K: NodeKind = Kind> {
    Positional(Vec<Value<K>>),
    Keyword(Vec<(String, Value<K>)>),
}

/// Builds a node of `kind`, validating the arguments against its declaration.
pub fn construct<K: NodeKind>(kind: K, args: Args<K>) -> Result<Node<K>> {
    match args {
        Args::Positional(values) => Node::new(kind, values),
        Args::Keyword(pairs) => Node::with_fields(kind, pairs),
    }
}

/// A syntax-tree node.
#[derive(Debug)]
pub struct Node<K: NodeKind = Kind> {
    id: NodeId,
    kind: K,
    fields: Vec<Value<K>>,
    location: Location,
}

impl<K: NodeKind> Node<K> {
    /// Node with every field at its default.
    pub fn empty(kind: K) -> Self {
        Node {
            id: NodeId::fresh(),
            kind,
            fields: kind.def().fields.iter().map(|f| Value::default_for(f.shape)).collect(),
            location: Location::default(),
        }
    }

    /// Positional construction: either no values or exactly one per declared field.
    pub fn new(kind: K, values: Vec<Value<K>>) -> Result<Self> {
        let expected = kind.def().fields.len();
        if values.is_empty() {
            return Ok(Node::empty(kind));
        }
        if values.len() != expected {
            return Err(GastError::Arity {
                kind: kind.name(),
                given: values.len(),
                expected,
            });
        }
        Ok(Node {
            id: NodeId::fresh(),
            kind,
            fields: values,
            location: Location::default(),
        })
    }

    /// Keyword construction: named fields are set, the rest keep their defaults.
    pub fn with_fields<N, I>(kind: K, pairs: I) -> Result<Self>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value<K>)>,
    {
        let mut node = Node::empty(kind);
        for (name, value) in pairs {
            node.set(name.as_ref(), value)?;
        }
        Ok(node)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn def(&self) -> &'static KindDef {
        self.kind.def()
    }

    /// Declared fields paired with their values.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldDecl, &Value<K>)> {
        self.kind.def().fields.iter().zip(self.fields.iter())
    }

    pub fn values(&self) -> &[Value<K>] {
        &self.fields
    }

    pub fn values_mut(&mut self) -> &mut [Value<K>] {
        &mut self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = (&'static FieldDecl, &mut Value<K>)> {
        self.kind.def().fields.iter().zip(self.fields.iter_mut())
    }

    pub fn get(&self, name: &str) -> Option<&Value<K>> {
        self.def().field_index(name).map(|i| &self.fields[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value<K>> {
        let index = self.def().field_index(name)?;
        Some(&mut self.fields[index])
    }

    pub fn set(&mut self, name: &str, value: Value<K>) -> Result<()> {
        let kind = self.kind.name();
        let slot = self.get_mut(name).ok_or_else(|| GastError::UnknownField {
            kind,
            field: name.to_string(),
        })?;
        *slot = value;
        Ok(())
    }

    /// Moves a field's value out, leaving the shape default behind.
    pub fn take(&mut self, name: &str) -> Option<Value<K>> {
        let decl = self.def().field(name)?;
        let slot = self.get_mut(name)?;
        Some(std::mem::replace(slot, Value::default_for(decl.shape)))
    }

    pub fn node(&self, name: &str) -> Option<&Node<K>> {
        self.get(name).and_then(Value::as_node)
    }

    /// Items of a list field; empty when the field is absent or not a list.
    pub fn list(&self, name: &str) -> &[Value<K>] {
        self.get(name).and_then(Value::as_list).unwrap_or(&[])
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    /// Value of a declared attribute; undeclared attributes read as `None`.
    pub fn attr(&self, attr: Attr) -> Option<i64> {
        if self.def().declares(attr) {
            self.location.get(attr)
        } else {
            None
        }
    }

    /// Sets a declared attribute. Returns false when the kind does not declare it.
    pub fn set_attr(&mut self, attr: Attr, value: Option<i64>) -> bool {
        let declared = self.def().declares(attr);
        if declared {
            self.location.set(attr, value);
        }
        declared
    }

    /// Builder-style location setter, restricted to declared attributes.
    pub fn at(mut self, location: Location) -> Self {
        for &attr in self.def().attributes {
            self.location.set(attr, location.get(attr));
        }
        self
    }

    pub fn is(&self, kind: K) -> bool {
        self.kind == kind
    }
}

impl<K: NodeKind> Clone for Node<K> {
    /// Deep copy. The copy and all its descendants get fresh identities.
    fn clone(&self) -> Self {
        Node {
            id: NodeId::fresh(),
            kind: self.kind,
            fields: self.fields.clone(),
            location: self.location,
        }
    }
}

impl<K: NodeKind> PartialEq for Node<K> {
    /// Structural equality; identities are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.fields == other.fields && self.location == other.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: i64) -> Node {
        Node::new(Kind::Constant, vec![Value::Int(value), Value::None]).unwrap()
    }

    #[test]
    fn test_positional_arity() {
        assert!(Node::new(Kind::BinOp, vec![]).is_ok());
        let op = Node::empty(Kind::Add);
        let ok = Node::new(
            Kind::BinOp,
            vec![constant(1).into(), op.clone().into(), constant(2).into()],
        );
        assert!(ok.is_ok());
        let err = Node::new(Kind::BinOp, vec![constant(1).into(), op.into()]).unwrap_err();
        assert!(matches!(err, GastError::Arity { kind: "BinOp", given: 2, expected: 3 }));
    }

    #[test]
    fn test_keyword_construction() {
        let node = Node::with_fields(Kind::Constant, [("value", Value::Int(6))]).unwrap();
        assert_eq!(node.get("value"), Some(&Value::Int(6)));
        assert_eq!(node.get("kind"), Some(&Value::None));

        let err = Node::with_fields(Kind::Constant, [("n", Value::Int(6))]).unwrap_err();
        assert!(matches!(err, GastError::UnknownField { kind: "Constant", ref field } if field == "n"));
    }

    #[test]
    fn test_defaults_follow_shape() {
        let node = Node::empty(Kind::Arguments);
        assert_eq!(node.list("args").len(), 0);
        assert_eq!(node.get("vararg"), Some(&Value::None));
        assert_eq!(Node::empty(Kind::Comprehension).get("is_async"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_identity_is_not_equality() {
        let a = constant(1);
        let b = constant(1);
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());

        let c = a.clone();
        assert_eq!(a, c);
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_undeclared_attributes_are_ignored() {
        let mut load = Node::empty(Kind::Load);
        assert!(!load.set_attr(Attr::Lineno, Some(3)));
        assert_eq!(load.attr(Attr::Lineno), None);

        let mut c = constant(1);
        assert!(c.set_attr(Attr::Lineno, Some(3)));
        assert_eq!(c.attr(Attr::Lineno), Some(3));
    }

    #[test]
    fn test_set_reports_kind() {
        let mut node = constant(1);
        node.set("value", Value::Int(2)).unwrap();
        assert_eq!(node.get("value"), Some(&Value::Int(2)));
        let err = node.set("n", Value::Int(3)).unwrap_err();
        assert!(matches!(err, GastError::UnknownField { kind: "Constant", ref field } if field == "n"));
    }

    #[test]
    fn test_take_leaves_default() {
        let mut node = Node::empty(Kind::Call);
        node.set("args", vec![constant(1)].into()).unwrap();
        let taken = node.take("args").unwrap();
        assert_eq!(taken.as_list().map(<[_]>::len), Some(1));
        assert_eq!(node.list("args").len(), 0);
    }
}
