//! The 3.3 schema: `Num`/`Str`/`Bytes`, identifier `*args` with separate
//! annotation slots, `starargs`/`kwargs` on calls and class definitions.

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::ir::location::copy_location;
use crate::ir::schema::KindDef;
use crate::ir::{Kind, Node, SchemaRegistry, SourceNode};

use super::{build_registry, Lowering, Raising, SchemaVersion, Translator};

static KINDS: &[KindDef] = source_kinds! {
    Module { "body": Nodes } NO_ATTRS;
    Interactive { "body": Nodes } NO_ATTRS;
    Expression { "body": Node } NO_ATTRS;

    FunctionDef { "name": Scalar, "args": Node, "body": Nodes, "decorator_list": Nodes, "returns": OptNode } START_ATTRS;
    ClassDef {
        "name": Scalar, "bases": Nodes, "keywords": Nodes, "starargs": OptNode, "kwargs": OptNode,
        "body": Nodes, "decorator_list": Nodes,
    } START_ATTRS;
    Return { "value": OptNode } START_ATTRS;
    Delete { "targets": Nodes } START_ATTRS;
    Assign { "targets": Nodes, "value": Node } START_ATTRS;
    AugAssign { "target": Node, "op": Node, "value": Node } START_ATTRS;
    For { "target": Node, "iter": Node, "body": Nodes, "orelse": Nodes } START_ATTRS;
    While { "test": Node, "body": Nodes, "orelse": Nodes } START_ATTRS;
    If { "test": Node, "body": Nodes, "orelse": Nodes } START_ATTRS;
    With { "items": Nodes, "body": Nodes } START_ATTRS;
    Raise { "exc": OptNode, "cause": OptNode } START_ATTRS;
    Try { "body": Nodes, "handlers": Nodes, "orelse": Nodes, "finalbody": Nodes } START_ATTRS;
    Assert { "test": Node, "msg": OptNode } START_ATTRS;
    Import { "names": Nodes } START_ATTRS;
    ImportFrom { "module": Scalar, "names": Nodes, "level": Scalar } START_ATTRS;
    Global { "names": Scalars } START_ATTRS;
    Nonlocal { "names": Scalars } START_ATTRS;
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
    YieldFrom { "value": Node } START_ATTRS;
    Compare { "left": Node, "ops": Nodes, "comparators": Nodes } START_ATTRS;
    Call { "func": Node, "args": Nodes, "keywords": Nodes, "starargs": OptNode, "kwargs": OptNode } START_ATTRS;
    Num { "n": Scalar } START_ATTRS;
    Str { "s": Scalar } START_ATTRS;
    Bytes { "s": Scalar } START_ATTRS;
    Ellipsis {} START_ATTRS;
    Attribute { "value": Node, "attr": Scalar, "ctx": Node } START_ATTRS;
    Subscript { "value": Node, "slice": Node, "ctx": Node } START_ATTRS;
    Starred { "value": Node, "ctx": Node } START_ATTRS;
    Name { "id": Scalar, "ctx": Node } START_ATTRS;
    List { "elts": Nodes, "ctx": Node } START_ATTRS;
    Tuple { "elts": Nodes, "ctx": Node } START_ATTRS;

    comprehension { "target": Node, "iter": Node, "ifs": Nodes } NO_ATTRS;
    ExceptHandler { "type": OptNode, "name": Scalar, "body": Nodes } START_ATTRS;
    arguments {
        "args": Nodes, "vararg": Scalar, "varargannotation": OptNode, "kwonlyargs": Nodes,
        "kwarg": Scalar, "kwargannotation": OptNode, "defaults": Nodes, "kw_defaults": OptNodes,
    } NO_ATTRS;
    arg { "arg": Scalar, "annotation": OptNode } NO_ATTRS;
    withitem { "context_expr": Node, "optional_vars": OptNode } NO_ATTRS;
};

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| build_registry("3.3", KINDS));

/// Translator for the 3.3 schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Py33Translator;

impl Translator for Py33Translator {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::Python33
    }

    fn registry(&self) -> &'static SchemaRegistry {
        &REGISTRY
    }

    fn lower_node(&self, cx: &mut Lowering<'_>, node: &SourceNode) -> Result<Option<Node>> {
        let lowered = match node.name() {
            "arg" => cx.lower_arg(node)?,
            "arguments" => {
                let mut out = Node::empty(Kind::Arguments);
                cx.lower_fields(&mut out, node, &["vararg", "varargannotation", "kwarg", "kwargannotation"])?;
                let vararg = cx.identifier_param(node, "vararg", Some("varargannotation"))?;
                out.set("vararg", vararg.into())?;
                let kwarg = cx.identifier_param(node, "kwarg", Some("kwargannotation"))?;
                out.set("kwarg", kwarg.into())?;
                out
            }
            "Call" | "ClassDef" => {
                let kind = if node.name() == "Call" { Kind::Call } else { Kind::ClassDef };
                let positional = if kind == Kind::Call { "args" } else { "bases" };
                let mut out = Node::empty(kind);
                cx.lower_fields(&mut out, node, &["starargs", "kwargs"])?;
                cx.lower_star_args(&mut out, node, positional)?;
                copy_location(&mut out, node);
                out
            }
            "Num" => cx.lower_constant(node, Some("n"))?,
            "Str" | "Bytes" => cx.lower_constant(node, Some("s"))?,
            "Ellipsis" => cx.lower_constant(node, None)?,
            "Name" => return cx.lower_name_constant(node),
            "ExceptHandler" => cx.lower_handler(node)?,
            _ => return Ok(None),
        };
        Ok(Some(lowered))
    }

    fn raise_node(&self, cx: &mut Raising<'_>, node: &Node) -> Result<Option<SourceNode>> {
        let raised = match node.kind() {
            Kind::Arguments => {
                let mut out = cx.make("arguments", node)?;
                cx.raise_fields(&mut out, node, &["args", "vararg", "kwonlyargs", "kwarg"])?;
                out.set("args", cx.raise_params(node, "args")?)?;
                out.set("kwonlyargs", cx.raise_params(node, "kwonlyargs")?)?;
                cx.param_identifier(&mut out, node, "vararg", Some("varargannotation"))?;
                cx.param_identifier(&mut out, node, "kwarg", Some("kwargannotation"))?;
                out
            }
            Kind::Call | Kind::ClassDef => {
                let positional = if node.is(Kind::Call) { "args" } else { "bases" };
                let mut out = cx.make(node.name(), node)?;
                cx.raise_fields(&mut out, node, &[positional, "keywords"])?;
                cx.raise_star_args(&mut out, node, positional)?;
                out
            }
            Kind::Constant => cx.raise_constant(node, "Bytes", true)?,
            Kind::ExceptHandler => cx.raise_handler(node)?,
            _ => return Ok(None),
        };
        Ok(Some(raised))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{dump, SourceKind, Value};
    use crate::nodemap::CorrespondenceMap;
    use crate::translate::translator_for;

    fn source(kind: &str, pairs: Vec<(&str, Value<SourceKind>)>) -> SourceNode {
        SourceNode::with_fields(REGISTRY.source_kind(kind).unwrap(), pairs).unwrap()
    }

    fn name(id: &str) -> SourceNode {
        source("Name", vec![("id", id.into()), ("ctx", source("Load", vec![]).into())])
    }

    #[test]
    fn test_vararg_annotations_fold_into_params() {
        let args = source(
            "arguments",
            vec![
                ("vararg", "args".into()),
                ("varargannotation", name("int").into()),
                ("kwarg", "kwargs".into()),
            ],
        );
        let translator = translator_for(SchemaVersion::Python33);
        let mut map = CorrespondenceMap::new();
        let canonical = translator.to_canonical_mapped(&args, &mut map).unwrap();

        let vararg = canonical.node("vararg").unwrap();
        assert_eq!(vararg.str_field("id"), Some("args"));
        assert_eq!(vararg.node("ctx").unwrap().kind(), Kind::Param);
        assert_eq!(vararg.node("annotation").unwrap().str_field("id"), Some("int"));
        assert!(canonical.node("kwarg").unwrap().get("annotation").unwrap().is_none());
        assert_eq!(map.lookup(vararg).unwrap().kind, "arguments");

        assert_eq!(translator.from_canonical(&canonical).unwrap(), args);
    }

    #[test]
    fn test_star_arguments_become_starred_and_keyword() {
        let call = source(
            "Call",
            vec![
                ("func", name("f").into()),
                ("args", vec![name("a")].into()),
                ("starargs", name("rest").into()),
                ("kwargs", name("options").into()),
            ],
        );
        let translator = translator_for(SchemaVersion::Python33);
        let canonical = translator.to_canonical(&call).unwrap();
        let options = crate::ir::DumpOptions {
            show_empty: false,
            ..Default::default()
        };
        assert_eq!(
            crate::ir::dump_with(&canonical, options),
            "Call(func=Name(id='f', ctx=Load()), args=[Name(id='a', ctx=Load()), \
             Starred(value=Name(id='rest', ctx=Load()), ctx=Load())], \
             keywords=[keyword(value=Name(id='options', ctx=Load()))])"
        );
        assert_eq!(translator.from_canonical(&canonical).unwrap(), call);
    }

    #[test]
    fn test_constants() {
        let translator = translator_for(SchemaVersion::Python33);
        for (kind, field, value) in [
            ("Num", "n", Value::Int(1)),
            ("Num", "n", Value::BigInt("1267650600228229401496703205376".into())),
            ("Str", "s", Value::Str("x".into())),
            ("Bytes", "s", Value::Bytes(b"x".to_vec())),
        ] {
            let node = source(kind, vec![(field, value)]);
            let canonical = translator.to_canonical(&node).unwrap();
            assert_eq!(canonical.kind(), Kind::Constant);
            assert_eq!(translator.from_canonical(&canonical).unwrap(), node);
        }
        let ellipsis = source("Ellipsis", vec![]);
        let canonical = translator.to_canonical(&ellipsis).unwrap();
        assert_eq!(dump(&canonical), "Constant(value=Ellipsis, kind=None)");
        assert_eq!(translator.from_canonical(&canonical).unwrap(), ellipsis);

        let none = name("None");
        let canonical = translator.to_canonical(&none).unwrap();
        assert_eq!(dump(&canonical), "Constant(value=None, kind=None)");
        assert_eq!(translator.from_canonical(&canonical).unwrap(), none);
    }

    #[test]
    fn test_positional_only_parameters_are_unsupported() {
        let mut args = Node::empty(Kind::Arguments);
        let mut param = Node::empty(Kind::Name);
        param.set("id", "a".into()).unwrap();
        param.set("ctx", Node::empty(Kind::Param).into()).unwrap();
        args.set("posonlyargs", vec![param].into()).unwrap();
        let err = translator_for(SchemaVersion::Python33).from_canonical(&args).unwrap_err();
        assert!(matches!(err, crate::GastError::UnsupportedConstruct { version: "3.3", .. }));
    }
}
