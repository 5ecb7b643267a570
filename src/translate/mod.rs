//! Version translators between source schemas and the canonical schema.
//!
//! Each supported source schema has one [`Translator`]. The shared engine maps
//! nodes by kind name and field name ([`Lowering::lower_by_name`],
//! [`Raising::raise_by_name`]); a translator only supplies the reshapes where its
//! schema disagrees with the canonical one. Both directions recurse through
//! [`Lowering::lower`] / [`Raising::raise`] so every child goes through the
//! version hooks first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::{debug, trace};

use crate::error::{GastError, Result};
use crate::ir::json;
use crate::ir::location::copy_location;
use crate::ir::schema::{KindDef, RegistryBuilder, Shape};
use crate::ir::{Kind, Node, NodeKind, SchemaRegistry, SourceKind, SourceNode, Value};
use crate::nodemap::CorrespondenceMap;

/// Builds a `&'static [KindDef]` table for a source schema.
macro_rules! source_kinds {
    ($( $name:ident { $($field:literal : $shape:ident),* $(,)? } $attrs:ident ; )*) => {
        &[$(
            $crate::ir::schema::KindDef {
                name: stringify!($name),
                fields: &[$($crate::ir::schema::FieldDecl::new($field, $crate::ir::schema::Shape::$shape)),*],
                attributes: $crate::ir::schema::$attrs,
            },
        )*]
    };
}

mod py2;
mod py33;
mod py38;

pub use py2::Py2Translator;
pub use py33::Py33Translator;
pub use py38::Py38Translator;

/// Kinds every supported schema declares identically.
static COMMON_KINDS: &[KindDef] = source_kinds! {
    Load {} NO_ATTRS;
    Store {} NO_ATTRS;
    Del {} NO_ATTRS;
    AugLoad {} NO_ATTRS;
    AugStore {} NO_ATTRS;
    Param {} NO_ATTRS;

    Slice { "lower": OptNode, "upper": OptNode, "step": OptNode } NO_ATTRS;
    ExtSlice { "dims": Nodes } NO_ATTRS;
    Index { "value": Node } NO_ATTRS;

    And {} NO_ATTRS;
    Or {} NO_ATTRS;
    Add {} NO_ATTRS;
    Sub {} NO_ATTRS;
    Mult {} NO_ATTRS;
    Div {} NO_ATTRS;
    Mod {} NO_ATTRS;
    Pow {} NO_ATTRS;
    LShift {} NO_ATTRS;
    RShift {} NO_ATTRS;
    BitOr {} NO_ATTRS;
    BitXor {} NO_ATTRS;
    BitAnd {} NO_ATTRS;
    FloorDiv {} NO_ATTRS;
    Invert {} NO_ATTRS;
    Not {} NO_ATTRS;
    UAdd {} NO_ATTRS;
    USub {} NO_ATTRS;
    Eq {} NO_ATTRS;
    NotEq {} NO_ATTRS;
    Lt {} NO_ATTRS;
    LtE {} NO_ATTRS;
    Gt {} NO_ATTRS;
    GtE {} NO_ATTRS;
    Is {} NO_ATTRS;
    IsNot {} NO_ATTRS;
    In {} NO_ATTRS;
    NotIn {} NO_ATTRS;

    keyword { "arg": Scalar, "value": Node } NO_ATTRS;
    alias { "name": Scalar, "asname": Scalar } NO_ATTRS;
};

fn build_registry(name: &'static str, own: &'static [KindDef]) -> SchemaRegistry {
    SchemaRegistry::builder(name)
        .define_all(COMMON_KINDS)
        .and_then(|builder| builder.define_all(own))
        .map(RegistryBuilder::build)
        .expect("source kind tables have duplicate names")
}

/// A supported source schema.
///
/// Deserialises through [`FromStr`], so config files accept the same spellings as
/// the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SchemaVersion {
    #[serde(rename = "2.7")]
    Python2,
    #[serde(rename = "3.3")]
    Python33,
    #[default]
    #[serde(rename = "3.8")]
    Python38,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::Python2, SchemaVersion::Python33, SchemaVersion::Python38];

    pub fn tag(self) -> &'static str {
        match self {
            SchemaVersion::Python2 => "2.7",
            SchemaVersion::Python33 => "3.3",
            SchemaVersion::Python38 => "3.8",
        }
    }

    pub fn registry(self) -> &'static SchemaRegistry {
        translator_for(self).registry()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SchemaVersion {
    type Err = GastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "2" | "2.7" => Ok(SchemaVersion::Python2),
            "3.3" => Ok(SchemaVersion::Python33),
            "3" | "3.8" => Ok(SchemaVersion::Python38),
            other => Err(GastError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = GastError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// A source-schema tree tagged with the schema it follows.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTree {
    pub version: SchemaVersion,
    pub root: SourceNode,
}

impl SourceTree {
    /// Decodes a JSON document. Its `"_version"` tag wins over `fallback`.
    pub fn from_json(document: &Json, fallback: SchemaVersion) -> Result<Self> {
        let version = match json::version_tag(document) {
            Some(tag) => tag.parse()?,
            None => fallback,
        };
        let root = json::source_from_json(version.registry(), document)?;
        Ok(SourceTree { version, root })
    }

    pub fn from_json_str(text: &str, fallback: SchemaVersion) -> Result<Self> {
        let document: Json = serde_json::from_str(text)?;
        Self::from_json(&document, fallback)
    }

    /// Encodes the tree with its `"_version"` tag.
    pub fn to_json(&self) -> Json {
        let mut document = json::to_json(&self.root);
        if let Json::Object(object) = &mut document {
            object.insert(json::VERSION_KEY.to_string(), Json::String(self.version.tag().to_string()));
        }
        document
    }
}

/// Translation strategy for one source schema.
pub trait Translator: Send + Sync {
    fn version(&self) -> SchemaVersion;

    fn registry(&self) -> &'static SchemaRegistry;

    /// Forward reshape for `node`, or `None` to map it by name.
    fn lower_node(&self, cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Option<Node>>;

    /// Reverse reshape for `node`, or `None` to map it by name.
    fn raise_node(&self, cx: &mut Raising<'_>, node: &Node) -> Result<Option<SourceNode>>;
}

impl dyn Translator {
    pub fn to_canonical(&self, source: &SourceNode) -> Result<Node> {
        debug!("Lowering {} tree from schema {}", source.name(), self.version());
        Lowering::new(self, None).lower(source)
    }

    /// Like [`to_canonical`](Self::to_canonical), recording every produced node in `map`.
    pub fn to_canonical_mapped(&self, source: &SourceNode, map: &mut CorrespondenceMap) -> Result<Node> {
        debug!("Lowering {} tree from schema {} with correspondence", source.name(), self.version());
        Lowering::new(self, Some(map)).lower(source)
    }

    pub fn from_canonical(&self, node: &Node) -> Result<SourceNode> {
        debug!("Raising {} tree to schema {}", node.name(), self.version());
        Raising { translator: self }.raise(node)
    }
}

static PY2: Py2Translator = Py2Translator;
static PY33: Py33Translator = Py33Translator;
static PY38: Py38Translator = Py38Translator;

pub fn translator_for(version: SchemaVersion) -> &'static dyn Translator {
    match version {
        SchemaVersion::Python2 => &PY2,
        SchemaVersion::Python33 => &PY33,
        SchemaVersion::Python38 => &PY38,
    }
}

fn unsupported(version: SchemaVersion, kind: &str, reason: impl Into<String>) -> GastError {
    GastError::UnsupportedConstruct {
        version: version.tag(),
        kind: kind.to_string(),
        reason: reason.into(),
    }
}

/// Forward (source → canonical) translation state.
pub struct Lowering<'a> {
    translator: &'a dyn Translator,
    map: Option<&'a mut CorrespondenceMap>,
}

impl<'a> Lowering<'a> {
    fn new(translator: &'a dyn Translator, map: Option<&'a mut CorrespondenceMap>) -> Self {
        Lowering { translator, map }
    }

    /// Translates `source` and records the result against it.
    pub fn lower(&mut self, source: &SourceNode) -> Result<Node> {
        trace!("lower {}", source.name());
        let translator = self.translator;
        let node = match translator.lower_node(self, source)? {
            Some(node) => node,
            None => self.lower_by_name(source)?,
        };
        self.record(&node, source);
        Ok(node)
    }

    /// Maps `source` onto the canonical kind of the same name.
    pub fn lower_by_name(&mut self, source: &SourceNode) -> Result<Node> {
        let kind = Kind::from_name(source.name())
            .ok_or_else(|| self.unsupported(source.name(), "no canonical counterpart"))?;
        let mut node = Node::empty(kind);
        self.lower_fields(&mut node, source, &[])?;
        copy_location(&mut node, source);
        Ok(node)
    }

    /// Copies every source field except `skip` onto the same-named canonical field.
    pub fn lower_fields(&mut self, node: &mut Node, source: &SourceNode, skip: &[&str]) -> Result<()> {
        for (decl, value) in source.fields() {
            if skip.contains(&decl.name) {
                continue;
            }
            if node.def().field(decl.name).is_some() {
                let value = self.lower_value(value)?;
                node.set(decl.name, value)?;
            } else if !value.is_empty() {
                return Err(self.unsupported(
                    source.name(),
                    format!("field '{}' has no canonical counterpart", decl.name),
                ));
            }
        }
        Ok(())
    }

    pub fn lower_value(&mut self, value: &Value<SourceKind>) -> Result<Value> {
        match value {
            Value::Node(child) => Ok(Value::from(self.lower(child)?)),
            Value::List(items) => items
                .iter()
                .map(|item| self.lower_value(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            scalar => scalar.cast_scalar(),
        }
    }

    /// The translated child in `field`, if present.
    pub fn lower_child(&mut self, source: &SourceNode, field: &str) -> Result<Option<Node>> {
        source.node(field).map(|child| self.lower(child)).transpose()
    }

    /// `arg(arg, annotation[, type_comment])` → `Name(arg, Param, annotation, type_comment)`.
    pub fn lower_arg(&mut self, source: &SourceNode) -> Result<Node> {
        let id = source.get("arg").map(Value::cast_scalar).transpose()?.unwrap_or_default();
        let annotation = self.lower_child(source, "annotation")?;
        let type_comment = source.get("type_comment").map(Value::cast_scalar).transpose()?.unwrap_or_default();
        let mut name = Node::new(
            Kind::Name,
            vec![id, Node::empty(Kind::Param).into(), annotation.into(), type_comment],
        )?;
        copy_location(&mut name, source);
        Ok(name)
    }

    /// A parameter spelled as a bare identifier (plus optional annotation slot) on `source`.
    pub fn identifier_param(
        &mut self,
        source: &SourceNode,
        field: &str,
        annotation_field: Option<&str>,
    ) -> Result<Option<Node>> {
        let Some(id) = source.str_field(field) else {
            return Ok(None);
        };
        let annotation = match annotation_field {
            Some(annotation_field) => self.lower_child(source, annotation_field)?,
            None => None,
        };
        let mut name = Node::new(
            Kind::Name,
            vec![id.into(), Node::empty(Kind::Param).into(), annotation.into(), Value::None],
        )?;
        copy_location(&mut name, source);
        self.derived(&name, source);
        Ok(Some(name))
    }

    /// Appends `starargs` / `kwargs` of a 2.x-style call as `Starred` and `keyword(None)`.
    pub fn lower_star_args(&mut self, node: &mut Node, source: &SourceNode, positional: &str) -> Result<()> {
        if let Some(star) = source.node("starargs") {
            let value = self.lower(star)?;
            let mut starred = Node::new(Kind::Starred, vec![value.into(), Node::empty(Kind::Load).into()])?;
            copy_location(&mut starred, star);
            self.derived(&starred, source);
            push(node, positional, starred);
        }
        if let Some(kwargs) = source.node("kwargs") {
            let value = self.lower(kwargs)?;
            let keyword = Node::new(Kind::Keyword, vec![Value::None, value.into()])?;
            self.derived(&keyword, source);
            push(node, "keywords", keyword);
        }
        Ok(())
    }

    /// 3.x handlers name the caught exception with an identifier; canonically it is a
    /// `Name(Store)` with no source node of its own.
    pub fn lower_handler(&mut self, source: &SourceNode) -> Result<Node> {
        let mut node = Node::empty(Kind::ExceptHandler);
        self.lower_fields(&mut node, source, &["name"])?;
        copy_location(&mut node, source);
        if let Some(id) = source.str_field("name") {
            let mut name = Node::new(
                Kind::Name,
                vec![id.into(), Node::empty(Kind::Store).into(), Value::None, Value::None],
            )?;
            copy_location(&mut name, source);
            self.gap(&name);
            node.set("name", name.into())?;
        }
        Ok(node)
    }

    /// `Num`, `Str`, `Bytes` and `Ellipsis` all become `Constant(value, None)`.
    pub fn lower_constant(&mut self, source: &SourceNode, field: Option<&str>) -> Result<Node> {
        let value = match field {
            Some(field) => source.get(field).map(Value::cast_scalar).transpose()?.unwrap_or_default(),
            None => Value::Ellipsis,
        };
        let mut node = Node::new(Kind::Constant, vec![value, Value::None])?;
        copy_location(&mut node, source);
        Ok(node)
    }

    /// `Name(True|False|None, Load)` of schemas without constant names.
    pub fn lower_name_constant(&mut self, source: &SourceNode) -> Result<Option<Node>> {
        let loads = source.node("ctx").is_some_and(|ctx| ctx.name() == "Load");
        let value = match source.str_field("id") {
            Some("True") if loads => Value::Bool(true),
            Some("False") if loads => Value::Bool(false),
            Some("None") if loads => Value::None,
            _ => return Ok(None),
        };
        let mut node = Node::new(Kind::Constant, vec![value, Value::None])?;
        copy_location(&mut node, source);
        Ok(Some(node))
    }

    /// Records a node a reshape synthesised from `source`.
    pub fn derived(&mut self, node: &Node, source: &SourceNode) {
        self.record(node, source);
    }

    /// Marks a node that has no source counterpart.
    pub fn gap(&mut self, node: &Node) {
        if let Some(map) = self.map.as_deref_mut() {
            map.record_gap(node);
        }
    }

    fn record(&mut self, node: &Node, source: &SourceNode) {
        if let Some(map) = self.map.as_deref_mut() {
            map.record(node, source);
        }
    }

    pub fn unsupported(&self, kind: &str, reason: impl Into<String>) -> GastError {
        unsupported(self.translator.version(), kind, reason)
    }
}

fn push<K: NodeKind>(node: &mut Node<K>, field: &str, child: Node<K>) {
    if let Some(Value::List(items)) = node.get_mut(field) {
        items.push(Value::from(child));
    }
}

/// True when `value` uses an optional slot the target shape makes mandatory, like the
/// `None` key of a `{**mapping}` entry in a schema whose `Dict.keys` is `Nodes`.
fn has_hole(canonical: Shape, target: Shape, value: &Value) -> bool {
    match (canonical, target) {
        (Shape::OptNodes, Shape::Nodes) => value.as_list().is_some_and(|items| items.iter().any(Value::is_none)),
        (Shape::OptNode, Shape::Node) => value.is_none(),
        _ => false,
    }
}

/// Reverse (canonical → source) translation state.
pub struct Raising<'a> {
    translator: &'a dyn Translator,
}

impl<'a> Raising<'a> {
    pub fn raise(&mut self, node: &Node) -> Result<SourceNode> {
        trace!("raise {}", node.name());
        let translator = self.translator;
        match translator.raise_node(self, node)? {
            Some(out) => Ok(out),
            None => self.raise_by_name(node),
        }
    }

    /// Maps `node` onto the source kind of the same name.
    pub fn raise_by_name(&mut self, node: &Node) -> Result<SourceNode> {
        let mut out = SourceNode::empty(self.kind(node.name())?);
        self.raise_fields(&mut out, node, &[])?;
        copy_location(&mut out, node);
        Ok(out)
    }

    /// The source kind called `name`, or `UnsupportedConstruct`.
    pub fn kind(&self, name: &str) -> Result<SourceKind> {
        self.translator
            .registry()
            .source_kind(name)
            .ok_or_else(|| self.unsupported(name, "no counterpart in this schema"))
    }

    /// An empty source node of kind `name`, positioned like `like`.
    pub fn make(&self, name: &str, like: &Node) -> Result<SourceNode> {
        let mut out = SourceNode::empty(self.kind(name)?);
        copy_location(&mut out, like);
        Ok(out)
    }

    /// Copies every canonical field except `skip`; non-empty fields the source kind
    /// lacks are unsupported.
    pub fn raise_fields(&mut self, out: &mut SourceNode, node: &Node, skip: &[&str]) -> Result<()> {
        for (decl, value) in node.fields() {
            if skip.contains(&decl.name) {
                continue;
            }
            if let Some(target) = out.def().field(decl.name) {
                if has_hole(decl.shape, target.shape, value) {
                    return Err(self.unsupported(
                        node.name(),
                        format!("field '{}' cannot be left empty in this schema", decl.name),
                    ));
                }
                let value = self.raise_value(value)?;
                out.set(decl.name, value)?;
            } else if !value.is_empty() {
                return Err(self.unsupported(
                    node.name(),
                    format!("field '{}' cannot be represented", decl.name),
                ));
            }
        }
        Ok(())
    }

    pub fn raise_value(&mut self, value: &Value) -> Result<Value<SourceKind>> {
        match value {
            Value::Node(child) => Ok(Value::from(self.raise(child)?)),
            Value::List(items) => items
                .iter()
                .map(|item| self.raise_value(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            scalar => scalar.cast_scalar(),
        }
    }

    pub fn raise_child(&mut self, node: &Node, field: &str) -> Result<Value<SourceKind>> {
        match node.node(field) {
            Some(child) => Ok(Value::from(self.raise(child)?)),
            None => Ok(Value::None),
        }
    }

    /// Canonical parameter → `arg`.
    pub fn raise_param(&mut self, param: &Node) -> Result<SourceNode> {
        if !param.is(Kind::Name) {
            return Err(self.unsupported(param.name(), "only plain names can be parameters"));
        }
        let mut arg = self.make("arg", param)?;
        arg.set("arg", param.get("id").map(Value::cast_scalar).transpose()?.unwrap_or_default())?;
        arg.set("annotation", self.raise_child(param, "annotation")?)?;
        let type_comment = param.get("type_comment").cloned().unwrap_or_default();
        if arg.def().field("type_comment").is_some() {
            arg.set("type_comment", type_comment.cast_scalar()?)?;
        } else if !type_comment.is_empty() {
            return Err(self.unsupported("arg", "field 'type_comment' cannot be represented"));
        }
        Ok(arg)
    }

    /// Each parameter of a canonical parameter list field, as `arg` nodes.
    pub fn raise_params(&mut self, node: &Node, field: &str) -> Result<Value<SourceKind>> {
        node.list(field)
            .iter()
            .filter_map(Value::as_node)
            .map(|param| self.raise_param(param).map(Value::from))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    /// The identifier of a canonical parameter, for schemas that spell `*args` as a
    /// bare name. The annotation goes to `annotation_field` when there is one.
    pub fn param_identifier(
        &mut self,
        out: &mut SourceNode,
        node: &Node,
        field: &str,
        annotation_field: Option<&str>,
    ) -> Result<()> {
        let Some(param) = node.node(field) else {
            return Ok(());
        };
        if !param.is(Kind::Name) {
            return Err(self.unsupported(param.name(), format!("'{}' must be a plain name", field)));
        }
        out.set(field, param.get("id").map(Value::cast_scalar).transpose()?.unwrap_or_default())?;
        let annotation = self.raise_child(param, "annotation")?;
        match annotation_field {
            Some(annotation_field) => out.set(annotation_field, annotation)?,
            None if annotation.is_none() => {}
            None => return Err(self.unsupported("arguments", format!("'{}' cannot be annotated", field))),
        }
        Ok(())
    }

    /// Moves a trailing `Starred` argument and a trailing `keyword(None)` back into
    /// `starargs` / `kwargs`.
    pub fn raise_star_args(&mut self, out: &mut SourceNode, node: &Node, positional: &str) -> Result<()> {
        let is_starred = |v: &Value| v.as_node().is_some_and(|n| n.is(Kind::Starred));
        let mut args: Vec<&Value> = node.list(positional).iter().collect();
        let star = match args.last() {
            Some(last) if is_starred(*last) => args.pop().and_then(Value::as_node),
            _ => None,
        };
        if args.iter().any(|v| is_starred(*v)) {
            return Err(self.unsupported("Starred", "only one trailing star argument can be represented"));
        }

        let is_splat = |v: &Value| {
            v.as_node()
                .is_some_and(|n| n.is(Kind::Keyword) && n.get("arg").map_or(true, Value::is_none))
        };
        let mut keywords: Vec<&Value> = node.list("keywords").iter().collect();
        let splat = match keywords.last() {
            Some(last) if is_splat(*last) => keywords.pop().and_then(Value::as_node),
            _ => None,
        };
        if keywords.iter().any(|v| is_splat(*v)) {
            return Err(self.unsupported("keyword", "only one trailing '**' argument can be represented"));
        }

        let args = args.into_iter().map(|v| self.raise_value(v)).collect::<Result<Vec<_>>>()?;
        out.set(positional, Value::List(args))?;
        let keywords = keywords.into_iter().map(|v| self.raise_value(v)).collect::<Result<Vec<_>>>()?;
        out.set("keywords", Value::List(keywords))?;
        if let Some(star) = star {
            out.set("starargs", self.raise_child(star, "value")?)?;
        }
        if let Some(splat) = splat {
            out.set("kwargs", self.raise_child(splat, "value")?)?;
        }
        Ok(())
    }

    /// Canonical handler name `Name(id, Store)` → identifier.
    pub fn raise_handler(&mut self, node: &Node) -> Result<SourceNode> {
        let mut out = self.make("ExceptHandler", node)?;
        self.raise_fields(&mut out, node, &["name"])?;
        if let Some(name) = node.node("name") {
            let id = match (name.kind(), name.str_field("id")) {
                (Kind::Name, Some(id)) => id,
                _ => return Err(self.unsupported(name.name(), "handler names must be plain names")),
            };
            out.set("name", id.into())?;
        }
        Ok(out)
    }

    /// `Constant` for schemas with `Num`/`Str`/`Bytes`: `bytes_kind` is the kind that
    /// holds byte strings and `ellipsis` says whether `Ellipsis` is an expression.
    pub fn raise_constant(&mut self, node: &Node, bytes_kind: &str, ellipsis: bool) -> Result<SourceNode> {
        let value = node.get("value").cloned().unwrap_or_default();
        let (kind, field) = match &value {
            Value::Int(_) | Value::BigInt(_) | Value::Float(_) | Value::Complex { .. } => ("Num", "n"),
            Value::Str(_) => ("Str", "s"),
            Value::Bytes(_) => (bytes_kind, "s"),
            Value::Ellipsis if ellipsis => {
                return self.make("Ellipsis", node);
            }
            Value::Ellipsis => return self.load_name("Ellipsis", node),
            Value::Bool(true) => return self.load_name("True", node),
            Value::Bool(false) => return self.load_name("False", node),
            Value::None => return self.load_name("None", node),
            Value::Node(_) | Value::List(_) => {
                return Err(self.unsupported("Constant", "container constants cannot be represented"));
            }
        };
        // `kind` only carries the `u` prefix, which these schemas do not spell out.
        let mut out = self.make(kind, node)?;
        out.set(field, value.cast_scalar()?)?;
        Ok(out)
    }

    fn load_name(&self, id: &str, like: &Node) -> Result<SourceNode> {
        let mut out = self.make("Name", like)?;
        out.set("id", id.into())?;
        out.set("ctx", SourceNode::empty(self.kind("Load")?).into())?;
        Ok(out)
    }

    pub fn unsupported(&self, kind: &str, reason: impl Into<String>) -> GastError {
        unsupported(self.translator.version(), kind, reason)
    }
}
