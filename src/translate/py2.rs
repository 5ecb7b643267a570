//! The 2.7 schema.
//!
//! Besides the `Num`/`Str` constants and identifier `*args` shared with early 3.x,
//! this schema splits `try` into `TryExcept`/`TryFinally`, spells `with` with a
//! single context manager, and raises with a `(type, inst, tback)` triple.

use once_cell::sync::Lazy;

use crate::error::{GastError, Result};
use crate::ir::location::copy_location;
use crate::ir::schema::KindDef;
use crate::ir::{Attr, Kind, Node, SchemaRegistry, SourceKind, SourceNode, Value};

use super::{build_registry, Lowering, Raising, SchemaVersion, Translator};

static KINDS: &[KindDef] = source_kinds! {
    Module { "body": Nodes } NO_ATTRS;
    Interactive { "body": Nodes } NO_ATTRS;
    Expression { "body": Node } NO_ATTRS;

    FunctionDef { "name": Scalar, "args": Node, "body": Nodes, "decorator_list": Nodes } START_ATTRS;
    ClassDef { "name": Scalar, "bases": Nodes, "body": Nodes, "decorator_list": Nodes } START_ATTRS;
    Return { "value": OptNode } START_ATTRS;
    Delete { "targets": Nodes } START_ATTRS;
    Assign { "targets": Nodes, "value": Node } START_ATTRS;
    AugAssign { "target": Node, "op": Node, "value": Node } START_ATTRS;
    Print { "dest": OptNode, "values": Nodes, "nl": Scalar } START_ATTRS;
    For { "target": Node, "iter": Node, "body": Nodes, "orelse": Nodes } START_ATTRS;
    While { "test": Node, "body": Nodes, "orelse": Nodes } START_ATTRS;
    If { "test": Node, "body": Nodes, "orelse": Nodes } START_ATTRS;
    With { "context_expr": Node, "optional_vars": OptNode, "body": Nodes } START_ATTRS;
    Raise { "type": OptNode, "inst": OptNode, "tback": OptNode } START_ATTRS;
    TryExcept { "body": Nodes, "handlers": Nodes, "orelse": Nodes } START_ATTRS;
    TryFinally { "body": Nodes, "finalbody": Nodes } START_ATTRS;
    Assert { "test": Node, "msg": OptNode } START_ATTRS;
    Import { "names": Nodes } START_ATTRS;
    ImportFrom { "module": Scalar, "names": Nodes, "level": Scalar } START_ATTRS;
    Exec { "body": Node, "globals": OptNode, "locals": OptNode } START_ATTRS;
    Global { "names": Scalars } START_ATTRS;
    Expr { "value": Node } START_ATTRS;
    Pass {} START_ATTRS;
    Break {} START_ATTRS;
    Continue {} START_ATTRS;

    BoolOp { "op": Node, "values": Nodes } START_ATTRS;
    BinOp { "left": Node, "op": Node, "right": Node } START_ATTRS;
    UnaryOp { "op": Node, "operand": Node } START_ATTRS;
    Lambda { "args": Node, "body": Node } START_ATTRS;
    IfExp { "test": Node, "body": Node, "orelse": Node } START_ATTRS;
    Dict { "keys": Nodes, "values": Nodes } START_ATTRS;
    Set { "elts": Nodes } START_ATTRS;
    ListComp { "elt": Node, "generators": Nodes } START_ATTRS;
    SetComp { "elt": Node, "generators": Nodes } START_ATTRS;
    DictComp { "key": Node, "value": Node, "generators": Nodes } START_ATTRS;
    GeneratorExp { "elt": Node, "generators": Nodes } START_ATTRS;
    Yield { "value": OptNode } START_ATTRS;
    Compare { "left": Node, "ops": Nodes, "comparators": Nodes } START_ATTRS;
    Call { "func": Node, "args": Nodes, "keywords": Nodes, "starargs": OptNode, "kwargs": OptNode } START_ATTRS;
    Repr { "value": Node } START_ATTRS;
    Num { "n": Scalar } START_ATTRS;
    Str { "s": Scalar } START_ATTRS;
    Attribute { "value": Node, "attr": Scalar, "ctx": Node } START_ATTRS;
    Subscript { "value": Node, "slice": Node, "ctx": Node } START_ATTRS;
    Name { "id": Scalar, "ctx": Node } START_ATTRS;
    List { "elts": Nodes, "ctx": Node } START_ATTRS;
    Tuple { "elts": Nodes, "ctx": Node } START_ATTRS;

    Ellipsis {} NO_ATTRS;

    comprehension { "target": Node, "iter": Node, "ifs": Nodes } NO_ATTRS;
    ExceptHandler { "type": OptNode, "name": OptNode, "body": Nodes } START_ATTRS;
    arguments { "args": Nodes, "vararg": Scalar, "kwarg": Scalar, "defaults": Nodes } NO_ATTRS;
};

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| build_registry("2.7", KINDS));

/// Translator for the 2.7 schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Py2Translator;

impl Translator for Py2Translator {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::Python2
    }

    fn registry(&self) -> &'static SchemaRegistry {
        &REGISTRY
    }

    fn lower_node(&self, cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Option<Node>> {
        let lowered = match node.name() {
            "arguments" => {
                let mut out = Node::empty(Kind::Arguments);
                cx.lower_fields(&mut out, node, &["vararg", "kwarg"])?;
                let vararg = cx.identifier_param(node, "vararg", None)?;
                out.set("vararg", vararg.into())?;
                let kwarg = cx.identifier_param(node, "kwarg", None)?;
                out.set("kwarg", kwarg.into())?;
                out
            }
            "Call" => {
                let mut out = Node::empty(Kind::Call);
                cx.lower_fields(&mut out, node, &["starargs", "kwargs"])?;
                cx.lower_star_args(&mut out, node, "args")?;
                copy_location(&mut out, node);
                out
            }
            "With" => lower_with(cx, node)?,
            "TryExcept" => {
                let mut out = Node::empty(Kind::Try);
                cx.lower_fields(&mut out, node, &[])?;
                copy_location(&mut out, node);
                out
            }
            "TryFinally" => lower_try_finally(cx, node)?,
            "Raise" => lower_raise(cx, node)?,
            "Num" => cx.lower_constant(node, Some("n"))?,
            "Str" => cx.lower_constant(node, Some("s"))?,
            "Ellipsis" => {
                let constant = cx.lower_constant(node, None)?;
                cx.derived(&constant, node);
                Node::new(Kind::Index, vec![constant.into()])?
            }
            "Name" => return cx.lower_name_constant(node),
            _ => return Ok(None),
        };
        Ok(Some(lowered))
    }

    fn raise_node(&self, cx: &mut Raising<'_>, node: &Node) -> Result<Option<SourceNode>> {
        let raised = match node.kind() {
            Kind::Arguments => {
                let mut out = cx.make("arguments", node)?;
                cx.raise_fields(&mut out, node, &["vararg", "kwarg"])?;
                cx.param_identifier(&mut out, node, "vararg", None)?;
                cx.param_identifier(&mut out, node, "kwarg", None)?;
                out
            }
            Kind::Call => {
                let mut out = cx.make("Call", node)?;
                cx.raise_fields(&mut out, node, &["args", "keywords"])?;
                cx.raise_star_args(&mut out, node, "args")?;
                out
            }
            Kind::With => raise_with(cx, node)?,
            Kind::Try => raise_try(cx, node)?,
            Kind::Raise => raise_raise(cx, node)?,
            Kind::Constant => cx.raise_constant(node, "Str", false)?,
            Kind::Index if node.node("value").is_some_and(is_ellipsis) => cx.make("Ellipsis", node)?,
            _ => return Ok(None),
        };
        Ok(Some(raised))
    }
}

fn lower_with(cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Node> {
    let context_expr = cx.lower_child(node, "context_expr")?;
    let optional_vars = cx.lower_child(node, "optional_vars")?;
    let item = Node::new(Kind::Withitem, vec![context_expr.into(), optional_vars.into()])?;
    cx.derived(&item, node);

    let mut out = Node::empty(Kind::With);
    cx.lower_fields(&mut out, node, &["context_expr", "optional_vars"])?;
    out.set("items", vec![item].into())?;
    copy_location(&mut out, node);
    Ok(out)
}

/// `try/except/finally` parses as a `TryFinally` around a lone `TryExcept`; both
/// collapse into one `Try`.
fn lower_try_finally(cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Node> {
    let inner = match node.list("body") {
        [only] => only.as_node().filter(|n| n.name() == "TryExcept"),
        _ => None,
    };
    let mut out = match inner {
        Some(inner) => {
            let mut merged = cx.lower(inner)?;
            let finalbody = node.get("finalbody").map(|v| cx.lower_value(v)).transpose()?;
            merged.set("finalbody", finalbody.unwrap_or_default())?;
            merged
        }
        None => {
            let mut out = Node::empty(Kind::Try);
            cx.lower_fields(&mut out, node, &[])?;
            out
        }
    };
    copy_location(&mut out, node);
    Ok(out)
}

/// `raise E, inst, tb` → `raise E(inst).with_traceback(tb)`.
fn lower_raise(cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Node> {
    let mut exc = cx.lower_child(node, "type")?;
    if let Some(inst) = cx.lower_child(node, "inst")? {
        let raised = exc
            .take()
            .ok_or_else(|| cx.unsupported("Raise", "an instance without an exception type"))?;
        let call = call_at(raised, inst, node)?;
        cx.derived(&call, node);
        exc = Some(call);
    }
    if let Some(tback) = cx.lower_child(node, "tback")? {
        let raised = exc
            .take()
            .ok_or_else(|| cx.unsupported("Raise", "a traceback without an exception type"))?;
        let mut method = Node::new(
            Kind::Attribute,
            vec![raised.into(), "with_traceback".into(), Node::empty(Kind::Load).into()],
        )?;
        copy_location(&mut method, node);
        cx.derived(&method, node);
        let call = call_at(method, tback, node)?;
        cx.derived(&call, node);
        exc = Some(call);
    }
    let mut out = Node::new(Kind::Raise, vec![exc.into(), Value::None])?;
    copy_location(&mut out, node);
    Ok(out)
}

fn call_at(func: Node, arg: Node, at: &SourceNode) -> Result<Node> {
    let mut call = Node::new(Kind::Call, vec![func.into(), vec![arg].into(), Value::List(Vec::new())])?;
    copy_location(&mut call, at);
    Ok(call)
}

fn is_ellipsis(node: &Node) -> bool {
    node.is(Kind::Constant) && matches!(node.get("value"), Some(Value::Ellipsis))
}

fn raised_list(cx: &mut Raising<'_>, node: &Node, field: &str) -> Result<Value<SourceKind>> {
    node.list(field)
        .iter()
        .map(|v| cx.raise_value(v))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

/// One `With` per item, innermost last.
fn raise_with(cx: &mut Raising<'_>, node: &Node) -> Result<SourceNode> {
    if node.get("type_comment").is_some_and(|v| !v.is_empty()) {
        return Err(cx.unsupported("With", "field 'type_comment' cannot be represented"));
    }
    let mut body = raised_list(cx, node, "body")?;
    let mut outer: Option<SourceNode> = None;
    for item in node.list("items").iter().rev() {
        let item = item
            .as_node()
            .filter(|n| n.is(Kind::Withitem))
            .ok_or_else(|| GastError::InvalidTree("With items must be withitem nodes".to_string()))?;
        if let Some(inner) = outer.take() {
            body = Value::from(vec![inner]);
        }
        let mut with = cx.make("With", node)?;
        with.set("context_expr", cx.raise_child(item, "context_expr")?)?;
        with.set("optional_vars", cx.raise_child(item, "optional_vars")?)?;
        with.set("body", std::mem::take(&mut body))?;
        outer = Some(with);
    }
    outer.ok_or_else(|| GastError::InvalidTree("With without items".to_string()))
}

fn raise_try(cx: &mut Raising<'_>, node: &Node) -> Result<SourceNode> {
    let has_finally = !node.list("finalbody").is_empty();
    let has_except = !node.list("handlers").is_empty() || !node.list("orelse").is_empty();
    if !has_finally {
        let mut out = cx.make("TryExcept", node)?;
        cx.raise_fields(&mut out, node, &["finalbody"])?;
        return Ok(out);
    }
    let mut out = cx.make("TryFinally", node)?;
    if has_except {
        let mut inner = cx.make("TryExcept", node)?;
        cx.raise_fields(&mut inner, node, &["finalbody"])?;
        cx.raise_fields(&mut out, node, &["body", "handlers", "orelse"])?;
        out.set("body", vec![inner].into())?;
    } else {
        cx.raise_fields(&mut out, node, &[])?;
    }
    Ok(out)
}

/// `Call(func, [arg])` without keywords.
fn single_arg_call(node: &Node) -> Option<(&Node, &Node)> {
    if !node.is(Kind::Call) || !node.list("keywords").is_empty() {
        return None;
    }
    match node.list("args") {
        [arg] => {
            let arg = arg.as_node().filter(|n| !n.is(Kind::Starred))?;
            Some((node.node("func")?, arg))
        }
        _ => None,
    }
}

/// A call synthesised from `raise E, inst` sits exactly where its `raise` does.
fn positioned_at(call: &Node, raise: &Node) -> bool {
    call.attr(Attr::Lineno).is_some()
        && call.attr(Attr::Lineno) == raise.attr(Attr::Lineno)
        && call.attr(Attr::ColOffset) == raise.attr(Attr::ColOffset)
}

fn raise_raise(cx: &mut Raising<'_>, node: &Node) -> Result<SourceNode> {
    if node.get("cause").is_some_and(|v| !v.is_empty()) {
        return Err(cx.unsupported("Raise", "field 'cause' cannot be represented"));
    }
    let mut out = cx.make("Raise", node)?;
    let Some(mut exc) = node.node("exc") else {
        return Ok(out);
    };
    if let Some((method, tback)) = single_arg_call(exc) {
        let value = method
            .node("value")
            .filter(|_| method.is(Kind::Attribute) && method.str_field("attr") == Some("with_traceback"));
        if let Some(value) = value {
            out.set("tback", Value::from(cx.raise(tback)?))?;
            exc = value;
        }
    }
    match single_arg_call(exc) {
        Some((func, inst)) if positioned_at(exc, node) => {
            out.set("type", Value::from(cx.raise(func)?))?;
            out.set("inst", Value::from(cx.raise(inst)?))?;
        }
        _ => out.set("type", Value::from(cx.raise(exc)?))?,
    }
    Ok(out)
}
