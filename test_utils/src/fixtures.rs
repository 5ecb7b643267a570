//! Source trees as the reference parsers print them, one per schema and construct.
//!
//! Each document carries its `"_version"` tag.

use gast::{SchemaVersion, SourceTree};
use indoc::indoc;

/// `x + 1` parsed in eval mode by a 3.8 parser.
pub const X_PLUS_ONE_38: &str = indoc! {r#"
    {
      "_version": "3.8",
      "_type": "Expression",
      "body": {
        "_type": "BinOp",
        "left": {
          "_type": "Name", "id": "x", "ctx": {"_type": "Load"},
          "lineno": 1, "col_offset": 0, "end_lineno": 1, "end_col_offset": 1
        },
        "op": {"_type": "Add"},
        "right": {
          "_type": "Constant", "value": 1, "kind": null,
          "lineno": 1, "col_offset": 4, "end_lineno": 1, "end_col_offset": 5
        },
        "lineno": 1, "col_offset": 0, "end_lineno": 1, "end_col_offset": 5
      }
    }
"#};

/// `x + 1` parsed in eval mode by a 2.7 parser.
pub const X_PLUS_ONE_27: &str = indoc! {r#"
    {
      "_version": "2.7",
      "_type": "Expression",
      "body": {
        "_type": "BinOp",
        "left": {"_type": "Name", "id": "x", "ctx": {"_type": "Load"}, "lineno": 1, "col_offset": 0},
        "op": {"_type": "Add"},
        "right": {"_type": "Num", "n": 1, "lineno": 1, "col_offset": 4},
        "lineno": 1, "col_offset": 0
      }
    }
"#};

/// `def f(*args, **kwargs): pass` in the 2.7 schema.
pub const VARARGS_27: &str = indoc! {r#"
    {
      "_version": "2.7",
      "_type": "Module",
      "body": [{
        "_type": "FunctionDef",
        "name": "f",
        "args": {"_type": "arguments", "args": [], "vararg": "args", "kwarg": "kwargs", "defaults": []},
        "body": [{"_type": "Pass", "lineno": 1, "col_offset": 24}],
        "decorator_list": [],
        "lineno": 1, "col_offset": 0
      }]
    }
"#};

/// `def f(*args, **kwargs): pass` in the 3.3 schema.
pub const VARARGS_33: &str = indoc! {r#"
    {
      "_version": "3.3",
      "_type": "Module",
      "body": [{
        "_type": "FunctionDef",
        "name": "f",
        "args": {
          "_type": "arguments",
          "args": [],
          "vararg": "args", "varargannotation": null,
          "kwonlyargs": [],
          "kwarg": "kwargs", "kwargannotation": null,
          "defaults": [], "kw_defaults": []
        },
        "body": [{"_type": "Pass", "lineno": 1, "col_offset": 24}],
        "decorator_list": [],
        "returns": null,
        "lineno": 1, "col_offset": 0
      }]
    }
"#};

/// `def f(*args, **kwargs): pass` in the 3.8 schema.
pub const VARARGS_38: &str = indoc! {r#"
    {
      "_version": "3.8",
      "_type": "Module",
      "body": [{
        "_type": "FunctionDef",
        "name": "f",
        "args": {
          "_type": "arguments",
          "posonlyargs": [],
          "args": [],
          "vararg": {
            "_type": "arg", "arg": "args", "annotation": null, "type_comment": null,
            "lineno": 1, "col_offset": 7, "end_lineno": 1, "end_col_offset": 11
          },
          "kwonlyargs": [],
          "kw_defaults": [],
          "kwarg": {
            "_type": "arg", "arg": "kwargs", "annotation": null, "type_comment": null,
            "lineno": 1, "col_offset": 15, "end_lineno": 1, "end_col_offset": 21
          },
          "defaults": []
        },
        "body": [{"_type": "Pass", "lineno": 1, "col_offset": 24, "end_lineno": 1, "end_col_offset": 28}],
        "decorator_list": [],
        "returns": null,
        "type_comment": null,
        "lineno": 1, "col_offset": 0, "end_lineno": 1, "end_col_offset": 28
      }],
      "type_ignores": []
    }
"#};

/// ```text
/// def f(a: int, /, b=1, *rest, c, **kw):
///     """Return nothing."""
/// ```
pub const SIGNATURE_38: &str = indoc! {r#"
    {
      "_version": "3.8",
      "_type": "Module",
      "body": [{
        "_type": "FunctionDef",
        "name": "f",
        "args": {
          "_type": "arguments",
          "posonlyargs": [{
            "_type": "arg", "arg": "a",
            "annotation": {
              "_type": "Name", "id": "int", "ctx": {"_type": "Load"},
              "lineno": 1, "col_offset": 9, "end_lineno": 1, "end_col_offset": 12
            },
            "type_comment": null,
            "lineno": 1, "col_offset": 6, "end_lineno": 1, "end_col_offset": 12
          }],
          "args": [{
            "_type": "arg", "arg": "b", "annotation": null, "type_comment": null,
            "lineno": 1, "col_offset": 17, "end_lineno": 1, "end_col_offset": 18
          }],
          "vararg": {
            "_type": "arg", "arg": "rest", "annotation": null, "type_comment": null,
            "lineno": 1, "col_offset": 23, "end_lineno": 1, "end_col_offset": 27
          },
          "kwonlyargs": [{
            "_type": "arg", "arg": "c", "annotation": null, "type_comment": null,
            "lineno": 1, "col_offset": 29, "end_lineno": 1, "end_col_offset": 30
          }],
          "kw_defaults": [null],
          "kwarg": {
            "_type": "arg", "arg": "kw", "annotation": null, "type_comment": null,
            "lineno": 1, "col_offset": 34, "end_lineno": 1, "end_col_offset": 36
          },
          "defaults": [{
            "_type": "Constant", "value": 1, "kind": null,
            "lineno": 1, "col_offset": 19, "end_lineno": 1, "end_col_offset": 20
          }]
        },
        "body": [{
          "_type": "Expr",
          "value": {
            "_type": "Constant", "value": "Return nothing.", "kind": null,
            "lineno": 2, "col_offset": 4, "end_lineno": 2, "end_col_offset": 25
          },
          "lineno": 2, "col_offset": 4, "end_lineno": 2, "end_col_offset": 25
        }],
        "decorator_list": [],
        "returns": null,
        "type_comment": null,
        "lineno": 1, "col_offset": 0, "end_lineno": 2, "end_col_offset": 25
      }],
      "type_ignores": []
    }
"#};

/// ```text
/// try:
///     f()
/// except E as e:
///     pass
/// ```
pub const TRY_EXCEPT_AS_33: &str = indoc! {r#"
    {
      "_version": "3.3",
      "_type": "Module",
      "body": [{
        "_type": "Try",
        "body": [{
          "_type": "Expr",
          "value": {
            "_type": "Call",
            "func": {"_type": "Name", "id": "f", "ctx": {"_type": "Load"}, "lineno": 2, "col_offset": 4},
            "args": [], "keywords": [], "starargs": null, "kwargs": null,
            "lineno": 2, "col_offset": 4
          },
          "lineno": 2, "col_offset": 4
        }],
        "handlers": [{
          "_type": "ExceptHandler",
          "type": {"_type": "Name", "id": "E", "ctx": {"_type": "Load"}, "lineno": 3, "col_offset": 7},
          "name": "e",
          "body": [{"_type": "Pass", "lineno": 4, "col_offset": 4}],
          "lineno": 3, "col_offset": 0
        }],
        "orelse": [],
        "finalbody": [],
        "lineno": 1, "col_offset": 0
      }]
    }
"#};

/// ```text
/// try:
///     f()
/// except E, e:
///     pass
/// finally:
///     g()
/// ```
pub const TRY_EXCEPT_FINALLY_27: &str = indoc! {r#"
    {
      "_version": "2.7",
      "_type": "Module",
      "body": [{
        "_type": "TryFinally",
        "body": [{
          "_type": "TryExcept",
          "body": [{
            "_type": "Expr",
            "value": {
              "_type": "Call",
              "func": {"_type": "Name", "id": "f", "ctx": {"_type": "Load"}, "lineno": 2, "col_offset": 4},
              "args": [], "keywords": [], "starargs": null, "kwargs": null,
              "lineno": 2, "col_offset": 4
            },
            "lineno": 2, "col_offset": 4
          }],
          "handlers": [{
            "_type": "ExceptHandler",
            "type": {"_type": "Name", "id": "E", "ctx": {"_type": "Load"}, "lineno": 3, "col_offset": 7},
            "name": {"_type": "Name", "id": "e", "ctx": {"_type": "Store"}, "lineno": 3, "col_offset": 10},
            "body": [{"_type": "Pass", "lineno": 4, "col_offset": 4}],
            "lineno": 3, "col_offset": 0
          }],
          "orelse": [],
          "lineno": 1, "col_offset": 0
        }],
        "finalbody": [{
          "_type": "Expr",
          "value": {
            "_type": "Call",
            "func": {"_type": "Name", "id": "g", "ctx": {"_type": "Load"}, "lineno": 6, "col_offset": 4},
            "args": [], "keywords": [], "starargs": null, "kwargs": null,
            "lineno": 6, "col_offset": 4
          },
          "lineno": 6, "col_offset": 4
        }],
        "lineno": 1, "col_offset": 0
      }]
    }
"#};

/// `raise E, "boom", tb` in the 2.7 schema.
pub const RAISE_27: &str = indoc! {r#"
    {
      "_version": "2.7",
      "_type": "Module",
      "body": [{
        "_type": "Raise",
        "type": {"_type": "Name", "id": "E", "ctx": {"_type": "Load"}, "lineno": 1, "col_offset": 6},
        "inst": {"_type": "Str", "s": "boom", "lineno": 1, "col_offset": 9},
        "tback": {"_type": "Name", "id": "tb", "ctx": {"_type": "Load"}, "lineno": 1, "col_offset": 17},
        "lineno": 1, "col_offset": 0
      }]
    }
"#};

/// ```text
/// with open(p) as fh:
///     print fh
/// ```
pub const WITH_27: &str = indoc! {r#"
    {
      "_version": "2.7",
      "_type": "Module",
      "body": [{
        "_type": "With",
        "context_expr": {
          "_type": "Call",
          "func": {"_type": "Name", "id": "open", "ctx": {"_type": "Load"}, "lineno": 1, "col_offset": 5},
          "args": [{"_type": "Name", "id": "p", "ctx": {"_type": "Load"}, "lineno": 1, "col_offset": 10}],
          "keywords": [], "starargs": null, "kwargs": null,
          "lineno": 1, "col_offset": 5
        },
        "optional_vars": {"_type": "Name", "id": "fh", "ctx": {"_type": "Store"}, "lineno": 1, "col_offset": 16},
        "body": [{
          "_type": "Print",
          "dest": null,
          "values": [{"_type": "Name", "id": "fh", "ctx": {"_type": "Load"}, "lineno": 2, "col_offset": 10}],
          "nl": true,
          "lineno": 2, "col_offset": 4
        }],
        "lineno": 1, "col_offset": 0
      }]
    }
"#};

/// Every fixture, for sweeps over all of them.
pub const ALL: &[&str] = &[
    X_PLUS_ONE_38,
    X_PLUS_ONE_27,
    VARARGS_27,
    VARARGS_33,
    VARARGS_38,
    SIGNATURE_38,
    TRY_EXCEPT_AS_33,
    TRY_EXCEPT_FINALLY_27,
    RAISE_27,
    WITH_27,
];

/// Decodes a fixture. Fixtures are tagged, so the fallback version never applies.
pub fn load(json: &str) -> SourceTree {
    SourceTree::from_json_str(json, SchemaVersion::default()).expect("fixture decodes")
}
