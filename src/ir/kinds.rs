//! The canonical schema.
//!
//! Every canonical node kind is a variant of [`Kind`]; its declaration lives in a
//! static [`KindDef`] generated from the table below. `Kind::def` is a closed match,
//! so a kind without a declaration does not compile.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use super::schema::{KindDef, NodeKind, SchemaRegistry};

macro_rules! canonical_kinds {
    ($( $kind:ident $name:literal { $($field:literal : $shape:ident),* $(,)? } $attrs:ident ; )*) => {
        /// Tag of a canonical node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Kind {
            $($kind,)*
        }

        #[allow(non_upper_case_globals)]
        mod defs {
            use crate::ir::schema::{FieldDecl, KindDef, Shape, NO_ATTRS, SPAN_ATTRS};

            $(
                pub static $kind: KindDef = KindDef {
                    name: $name,
                    fields: &[$(FieldDecl::new($field, Shape::$shape)),*],
                    attributes: $attrs,
                };
            )*

            pub static ALL: &[&KindDef] = &[$(&$kind,)*];
        }

        impl Kind {
            pub const ALL: &'static [Kind] = &[$(Kind::$kind,)*];
        }

        impl NodeKind for Kind {
            fn def(self) -> &'static KindDef {
                match self {
                    $(Kind::$kind => &defs::$kind,)*
                }
            }
        }
    };
}

canonical_kinds! {
    // mod
    Module "Module" { "body": Nodes, "type_ignores": Nodes } NO_ATTRS;
    Interactive "Interactive" { "body": Nodes } NO_ATTRS;
    Expression "Expression" { "body": Node } NO_ATTRS;
    FunctionType "FunctionType" { "argtypes": Nodes, "returns": Node } NO_ATTRS;

    // stmt
    FunctionDef "FunctionDef" {
        "name": Scalar, "args": Node, "body": Nodes, "decorator_list": Nodes,
        "returns": OptNode, "type_comment": Scalar,
    } SPAN_ATTRS;
    AsyncFunctionDef "AsyncFunctionDef" {
        "name": Scalar, "args": Node, "body": Nodes, "decorator_list": Nodes,
        "returns": OptNode, "type_comment": Scalar,
    } SPAN_ATTRS;
    ClassDef "ClassDef" {
        "name": Scalar, "bases": Nodes, "keywords": Nodes, "body": Nodes, "decorator_list": Nodes,
    } SPAN_ATTRS;
    Return "Return" { "value": OptNode } SPAN_ATTRS;
    Delete "Delete" { "targets": Nodes } SPAN_ATTRS;
    Assign "Assign" { "targets": Nodes, "value": Node, "type_comment": Scalar } SPAN_ATTRS;
    AugAssign "AugAssign" { "target": Node, "op": Node, "value": Node } SPAN_ATTRS;
    AnnAssign "AnnAssign" { "target": Node, "annotation": Node, "value": OptNode, "simple": Flag } SPAN_ATTRS;
    Print "Print" { "dest": OptNode, "values": Nodes, "nl": Scalar } SPAN_ATTRS;
    For "For" { "target": Node, "iter": Node, "body": Nodes, "orelse": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    AsyncFor "AsyncFor" { "target": Node, "iter": Node, "body": Nodes, "orelse": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    While "While" { "test": Node, "body": Nodes, "orelse": Nodes } SPAN_ATTRS;
    If "If" { "test": Node, "body": Nodes, "orelse": Nodes } SPAN_ATTRS;
    With "With" { "items": Nodes, "body": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    AsyncWith "AsyncWith" { "items": Nodes, "body": Nodes, "type_comment": Scalar } SPAN_ATTRS;
    Raise "Raise" { "exc": OptNode, "cause": OptNode } SPAN_ATTRS;
    Try "Try" { "body": Nodes, "handlers": Nodes, "orelse": Nodes, "finalbody": Nodes } SPAN_ATTRS;
    Assert "Assert" { "test": Node, "msg": OptNode } SPAN_ATTRS;
    Import "Import" { "names": Nodes } SPAN_ATTRS;
    ImportFrom "ImportFrom" { "module": Scalar, "names": Nodes, "level": Scalar } SPAN_ATTRS;
    Exec "Exec" { "body": Node, "globals": OptNode, "locals": OptNode } SPAN_ATTRS;
    Global "Global" { "names": Scalars } SPAN_ATTRS;
    Nonlocal "Nonlocal" { "names": Scalars } SPAN_ATTRS;
    Expr "Expr" { "value": Node } SPAN_ATTRS;
    Pass "Pass" {} SPAN_ATTRS;
    Break "Break" {} SPAN_ATTRS;
    Continue "Continue" {} SPAN_ATTRS;

    // expr
    BoolOp "BoolOp" { "op": Node, "values": Nodes } SPAN_ATTRS;
    NamedExpr "NamedExpr" { "target": Node, "value": Node } SPAN_ATTRS;
    BinOp "BinOp" { "left": Node, "op": Node, "right": Node } SPAN_ATTRS;
    UnaryOp "UnaryOp" { "op": Node, "operand": Node } SPAN_ATTRS;
    Lambda "Lambda" { "args": Node, "body": Node } SPAN_ATTRS;
    IfExp "IfExp" { "test": Node, "body": Node, "orelse": Node } SPAN_ATTRS;
    Dict "Dict" { "keys": OptNodes, "values": Nodes } SPAN_ATTRS;
    Set "Set" { "elts": Nodes } SPAN_ATTRS;
    ListComp "ListComp" { "elt": Node, "generators": Nodes } SPAN_ATTRS;
    SetComp "SetComp" { "elt": Node, "generators": Nodes } SPAN_ATTRS;
    DictComp "DictComp" { "key": Node, "value": Node, "generators": Nodes } SPAN_ATTRS;
    GeneratorExp "GeneratorExp" { "elt": Node, "generators": Nodes } SPAN_ATTRS;
    Await "Await" { "value": Node } SPAN_ATTRS;
    Yield "Yield" { "value": OptNode } SPAN_ATTRS;
    YieldFrom "YieldFrom" { "value": Node } SPAN_ATTRS;
    Compare "Compare" { "left": Node, "ops": Nodes, "comparators": Nodes } SPAN_ATTRS;
    Call "Call" { "func": Node, "args": Nodes, "keywords": Nodes } SPAN_ATTRS;
    Repr "Repr" { "value": Node } SPAN_ATTRS;
    FormattedValue "FormattedValue" { "value": Node, "conversion": Scalar, "format_spec": OptNode } SPAN_ATTRS;
    JoinedStr "JoinedStr" { "values": Nodes } SPAN_ATTRS;
    Constant "Constant" { "value": Scalar, "kind": Scalar } SPAN_ATTRS;
    Attribute "Attribute" { "value": Node, "attr": Scalar, "ctx": Node } SPAN_ATTRS;
    Subscript "Subscript" { "value": Node, "slice": Node, "ctx": Node } SPAN_ATTRS;
    Starred "Starred" { "value": Node, "ctx": Node } SPAN_ATTRS;
    Name "Name" { "id": Scalar, "ctx": Node, "annotation": OptNode, "type_comment": Scalar } SPAN_ATTRS;
    List "List" { "elts": Nodes, "ctx": Node } SPAN_ATTRS;
    Tuple "Tuple" { "elts": Nodes, "ctx": Node } SPAN_ATTRS;

    // expr_context
    Load "Load" {} NO_ATTRS;
    Store "Store" {} NO_ATTRS;
    Del "Del" {} NO_ATTRS;
    AugLoad "AugLoad" {} NO_ATTRS;
    AugStore "AugStore" {} NO_ATTRS;
    Param "Param" {} NO_ATTRS;

    // slice
    Slice "Slice" { "lower": OptNode, "upper": OptNode, "step": OptNode } NO_ATTRS;
    ExtSlice "ExtSlice" { "dims": Nodes } NO_ATTRS;
    Index "Index" { "value": Node } NO_ATTRS;

    // boolop
    And "And" {} NO_ATTRS;
    Or "Or" {} NO_ATTRS;

    // operator
    Add "Add" {} NO_ATTRS;
    Sub "Sub" {} NO_ATTRS;
    Mult "Mult" {} NO_ATTRS;
    MatMult "MatMult" {} NO_ATTRS;
    Div "Div" {} NO_ATTRS;
    Mod "Mod" {} NO_ATTRS;
    Pow "Pow" {} NO_ATTRS;
    LShift "LShift" {} NO_ATTRS;
    RShift "RShift" {} NO_ATTRS;
    BitOr "BitOr" {} NO_ATTRS;
    BitXor "BitXor" {} NO_ATTRS;
    BitAnd "BitAnd" {} NO_ATTRS;
    FloorDiv "FloorDiv" {} NO_ATTRS;

    // unaryop
    Invert "Invert" {} NO_ATTRS;
    Not "Not" {} NO_ATTRS;
    UAdd "UAdd" {} NO_ATTRS;
    USub "USub" {} NO_ATTRS;

    // cmpop
    Eq "Eq" {} NO_ATTRS;
    NotEq "NotEq" {} NO_ATTRS;
    Lt "Lt" {} NO_ATTRS;
    LtE "LtE" {} NO_ATTRS;
    Gt "Gt" {} NO_ATTRS;
    GtE "GtE" {} NO_ATTRS;
    Is "Is" {} NO_ATTRS;
    IsNot "IsNot" {} NO_ATTRS;
    In "In" {} NO_ATTRS;
    NotIn "NotIn" {} NO_ATTRS;

    Comprehension "comprehension" { "target": Node, "iter": Node, "ifs": Nodes, "is_async": Flag } NO_ATTRS;
    ExceptHandler "ExceptHandler" { "type": OptNode, "name": OptNode, "body": Nodes } SPAN_ATTRS;
    Arguments "arguments" {
        "args": Nodes, "posonlyargs": Nodes, "vararg": OptNode, "kwonlyargs": Nodes,
        "kw_defaults": OptNodes, "kwarg": OptNode, "defaults": Nodes,
    } NO_ATTRS;
    Keyword "keyword" { "arg": Scalar, "value": Node } NO_ATTRS;
    Alias "alias" { "name": Scalar, "asname": Scalar } NO_ATTRS;
    Withitem "withitem" { "context_expr": Node, "optional_vars": OptNode } NO_ATTRS;
    TypeIgnore "TypeIgnore" { "lineno": Scalar, "tag": Scalar } NO_ATTRS;
}

/// The canonical registry, frozen on first use.
pub static CANONICAL: Lazy<SchemaRegistry> = Lazy::new(|| {
    defs::ALL
        .iter()
        .try_fold(SchemaRegistry::builder("canonical"), |builder, def| builder.define(def))
        .map(|builder| builder.build())
        .expect("canonical kind table has duplicate names")
});

static BY_NAME: Lazy<FxHashMap<&'static str, Kind>> =
    Lazy::new(|| Kind::ALL.iter().map(|&kind| (kind.name(), kind)).collect());

impl Kind {
    pub fn from_name(name: &str) -> Option<Kind> {
        BY_NAME.get(name).copied()
    }

    /// Load/Store/Del/AugLoad/AugStore/Param: zero-field usage markers.
    pub fn is_context_marker(self) -> bool {
        matches!(
            self,
            Kind::Load | Kind::Store | Kind::Del | Kind::AugLoad | Kind::AugStore | Kind::Param
        )
    }
}
