//! The 3.8 schema: constants, positional-only parameters, `arg` nodes everywhere.

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::ir::schema::KindDef;
use crate::ir::{Kind, Node, SchemaRegistry, SourceNode};

use super::{build_registry, Lowering, Raising, SchemaVersion, Translator};

static KINDS: &[KindDef] = source_kinds! {
    Module { "body": Nodes, "type_ignores": Nodes } NO_ATTRS;
    Interactive { "body": Nodes } NO_ATTRS;
    Expression { "body": Node } NO_ATTRS;
    FunctionType { "argtypes": Nodes, "returns": Node } NO_ATTRS;

    FunctionDef {
        "name": Scalar, "args": Node, "body": Nodes, "decorator_list": Nodes,
        "returns": OptNode, "type_comment": Scalar,
    } SPAN_ATTRS;
    AsyncFunctionDef {
        "name": Scalar, "args": Node, "body": Nodes, "decorator_list": Nodes,
        "returns": OptNode, "type_comment": Scalar,
    } SPAN_ATTRS;
    ClassDef { "name": Scalar, "bases": Nodes, "keywords": Nodes, "body": Nodes, "decorator_list": Nodes } SPAN_ATTRS;
    Return { "value": OptNode } SPAN_ATTRS;
    Delete { "targets": Nodes } SPAN_ATTRS;
    Assign { "targets": Nodes, "value": Node, "type_comment": Scalar } SPAN_ATTRS;
    AugAssign { "target": Node, "op": Node, "value": Node } SPAN_ATTRS;
    AnnAssign { "target": Node, "annotation": Node, "value": OptNode, "simple": Flag } SPAN_ATTRS;
    For { "target": Node, "iter": Node, "body": Nodes, "orelse": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    AsyncFor { "target": Node, "iter": Node, "body": Nodes, "orelse": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    While { "test": Node, "body": Nodes, "orelse": Nodes } SPAN_ATTRS;
    If { "test": Node, "body": Nodes, "orelse": Nodes } SPAN_ATTRS;
    With { "items": Nodes, "body": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    AsyncWith { "items": Nodes, "body": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    Raise { "exc": OptNode, "cause": OptNode } SPAN_ATTRS;
    Try { "body": Nodes, "handlers": Nodes, "orelse": Nodes, "finalbody": Nodes } SPAN_ATTRS;
    Assert { "test": Node, "msg": OptNode } SPAN_ATTRS;
    Import { "names": Nodes } SPAN_ATTRS;
    ImportFrom { "module": Scalar, "names": Nodes, "level": Scalar } SPAN_ATTRS;
    Global { "names": Scalars } SPAN_ATTRS;
    Nonlocal { "names": Scalars } SPAN_ATTRS;
    Expr { "value": Node } SPAN_ATTRS;
    Pass {} SPAN_ATTRS;
    Break {} SPAN_ATTRS;
    Continue {} SPAN_ATTRS;

    BoolOp { "op": Node, "values": Nodes } SPAN_ATTRS;
    NamedExpr { "target": Node, "value": Node } SPAN_ATTRS;
    BinOp { "left": Node, "op": Node, "right": Node } SPAN_ATTRS;
    UnaryOp { "op": Node, "operand": Node } SPAN_ATTRS;
    Lambda { "args": Node, "body": Node } SPAN_ATTRS;
    IfExp { "test": Node, "body": Node, "orelse": Node } SPAN_ATTRS;
    Dict { "keys": OptNodes, "values": Nodes } SPAN_ATTRS;
    Set { "elts": Nodes } SPAN_ATTRS;
    ListComp { "elt": Node, "generators": Nodes } SPAN_ATTRS;
    SetComp { "elt": Node, "generators": Nodes } SPAN_ATTRS;
    DictComp { "key": Node, "value": Node, "generators": Nodes } SPAN_ATTRS;
    GeneratorExp { "elt": Node, "generators": Nodes } SPAN_ATTRS;
    Await { "value": Node } SPAN_ATTRS;
    Yield { "value": OptNode } SPAN_ATTRS;
    YieldFrom { "value": Node } SPAN_ATTRS;
    Compare { "left": Node, "ops": Nodes, "comparators": Nodes } SPAN_ATTRS;
    Call { "func": Node, "args": Nodes, "keywords": Nodes } SPAN_ATTRS;
    FormattedValue { "value": Node, "conversion": Scalar, "format_spec": OptNode } SPAN_ATTRS;
    JoinedStr { "values": Nodes } SPAN_ATTRS;
    Constant { "value": Scalar, "kind": Scalar } SPAN_ATTRS;
    Attribute { "value": Node, "attr": Scalar, "ctx": Node } SPAN_ATTRS;
    Subscript { "value": Node, "slice": Node, "ctx": Node } SPAN_ATTRS;
    Starred { "value": Node, "ctx": Node } SPAN_ATTRS;
    Name { "id": Scalar, "ctx": Node } SPAN_ATTRS;
    List { "elts": Nodes, "ctx": Node } SPAN_ATTRS;
    Tuple { "elts": Nodes, "ctx": Node } SPAN_ATTRS;

    MatMult {} NO_ATTRS;

    comprehension { "target": Node, "iter": Node, "ifs": Nodes, "is_async": Flag } NO_ATTRS;
    ExceptHandler { "type": OptNode, "name": Scalar, "body": Nodes } SPAN_ATTRS;
    arguments {
        "posonlyargs": Nodes, "args": Nodes, "vararg": OptNode, "kwonlyargs": Nodes,
        "kw_defaults": OptNodes, "kwarg": OptNode, "defaults": Nodes,
    } NO_ATTRS;
    arg { "arg": Scalar, "annotation": OptNode, "type_comment": Scalar } SPAN_ATTRS;
    withitem { "context_expr": Node, "optional_vars": OptNode } NO_ATTRS;
    TypeIgnore { "lineno": Scalar, "tag": Scalar } NO_ATTRS;
};

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| build_registry("3.8", KINDS));

/// Translator for the 3.8 schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Py38Translator;

impl Translator for Py38Translator {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::Python38
    }

    fn registry(&self) -> &'static SchemaRegistry {
        &REGISTRY
    }

    fn lower_node(&self, cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Option<Node>> {
        match node.name() {
            "arg" => cx.lower_arg(node).map(Some),
            "ExceptHandler" => cx.lower_handler(node).map(Some),
            _ => Ok(None),
        }
    }

    fn raise_node(&self, cx: &mut Raising<'_>, node: &Node) -> Result<Option<SourceNode>> {
        match node.kind() {
            Kind::Arguments => {
                let mut out = cx.make("arguments", node)?;
                cx.raise_fields(&mut out, node, &["posonlyargs", "args", "vararg", "kwonlyargs", "kwarg"])?;
                for field in ["posonlyargs", "args", "kwonlyargs"] {
                    out.set(field, cx.raise_params(node, field)?)?;
                }
                for field in ["vararg", "kwarg"] {
                    if let Some(param) = node.node(field) {
                        out.set(field, cx.raise_param(param)?.into())?;
                    }
                }
                Ok(Some(out))
            }
            Kind::ExceptHandler => cx.raise_handler(node).map(Some),
            _ => Ok(None),
        }
    }
}
