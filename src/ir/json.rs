//! JSON interchange format for trees.
//!
//! A node is an object with `"_type"` plus one key per field and per set positional
//! attribute. Scalars use JSON natively, with tagged objects for the values JSON
//! lacks: `{"_bytes": [..]}`, `{"_complex": [re, im]}`, `{"_const": "Ellipsis"}`,
//! `{"_float": "inf" | "-inf" | "nan"}` and `{"_int": "<digits>"}` for integers wider
//! than 64 bits. Bare integer literals of any width decode exactly. A top-level `"_version"` key names the
//! source schema of the tree.

use serde_json::{json, Map, Number, Value as Json};
use tracing::debug;

use crate::error::{GastError, Result};

use super::kinds::Kind;
use super::node::{Node, SourceNode, Value};
use super::schema::{Attr, FieldDecl, NodeKind, SchemaRegistry, Shape, SourceKind};

const TYPE_KEY: &str = "_type";
pub const VERSION_KEY: &str = "_version";

pub fn to_json<K: NodeKind>(node: &Node<K>) -> Json {
    let mut object = Map::new();
    object.insert(TYPE_KEY.to_string(), Json::String(node.name().to_string()));
    for (decl, value) in node.fields() {
        object.insert(decl.name.to_string(), encode_value(value));
    }
    for &attr in node.def().attributes {
        if let Some(v) = node.attr(attr) {
            object.insert(attr.name().to_string(), Json::from(v));
        }
    }
    Json::Object(object)
}

fn encode_value<K: NodeKind>(value: &Value<K>) -> Json {
    match value {
        Value::None => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::BigInt(digits) => json!({ "_int": digits }),
        Value::Float(f) => encode_float(*f),
        Value::Complex { real, imag } => json!({ "_complex": [encode_float(*real), encode_float(*imag)] }),
        Value::Str(s) => Json::String(s.clone()),
        Value::Bytes(b) => json!({ "_bytes": b }),
        Value::Ellipsis => json!({ "_const": "Ellipsis" }),
        Value::Node(node) => to_json(node),
        Value::List(items) => Json::Array(items.iter().map(encode_value).collect()),
    }
}

fn encode_float(f: f64) -> Json {
    match Number::from_f64(f) {
        Some(n) => Json::Number(n),
        None if f.is_nan() => json!({ "_float": "nan" }),
        None if f > 0.0 => json!({ "_float": "inf" }),
        None => json!({ "_float": "-inf" }),
    }
}

/// Decodes a node, resolving kind names with `resolve`.
pub fn node_from_json<K, F>(json: &Json, resolve: &F) -> Result<Node<K>>
where
    K: NodeKind,
    F: Fn(&str) -> Result<K>,
{
    let object = json
        .as_object()
        .ok_or_else(|| GastError::InvalidTree(format!("expected a node object, found {}", json)))?;
    let type_name = object
        .get(TYPE_KEY)
        .and_then(Json::as_str)
        .ok_or_else(|| GastError::InvalidTree("node object without a \"_type\" string".to_string()))?;
    let kind = resolve(type_name)?;
    let mut node = Node::empty(kind);

    for (key, raw) in object {
        if key == TYPE_KEY || key == VERSION_KEY {
            continue;
        }
        if let Some(decl) = kind.def().field(key) {
            let value = decode_value(raw, resolve)?;
            check_shape(kind.name(), decl, &value)?;
            node.set(key, value)?;
        } else if let Some(attr) = Attr::from_name(key) {
            let v = match raw {
                Json::Null => None,
                other => Some(other.as_i64().ok_or_else(|| {
                    GastError::InvalidTree(format!("{}.{} must be an integer", kind.name(), key))
                })?),
            };
            // Attributes the kind does not declare are dropped.
            node.set_attr(attr, v);
        } else {
            return Err(GastError::UnknownField {
                kind: kind.name(),
                field: key.clone(),
            });
        }
    }
    Ok(node)
}

fn decode_value<K, F>(json: &Json, resolve: &F) -> Result<Value<K>>
where
    K: NodeKind,
    F: Fn(&str) -> Result<K>,
{
    Ok(match json {
        Json::Null => Value::None,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => decode_number(n)?,
        Json::String(s) => Value::Str(s.clone()),
        Json::Array(items) => Value::List(
            items
                .iter()
                .map(|item| decode_value(item, resolve))
                .collect::<Result<Vec<_>>>()?,
        ),
        Json::Object(object) if object.contains_key(TYPE_KEY) => Value::from(node_from_json(json, resolve)?),
        Json::Object(object) => decode_tagged(object)?,
    })
}

/// Integers keep their exact digits; `serde_json` is built with `arbitrary_precision`
/// so the literal text survives parsing.
fn decode_number<K: NodeKind>(n: &Number) -> Result<Value<K>> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    let text = n.to_string();
    if is_integer_literal(&text) {
        return Ok(Value::BigInt(text));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| GastError::InvalidTree(format!("number {} is neither an integer nor a float", text)))
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn decode_tagged<K: NodeKind>(object: &Map<String, Json>) -> Result<Value<K>> {
    if let Some(text) = object.get("_int").and_then(Json::as_str) {
        if !is_integer_literal(text) {
            return Err(GastError::InvalidTree(format!("\"_int\" must hold decimal digits, found {:?}", text)));
        }
        return Ok(match text.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(text.to_string()),
        });
    }
    if let Some(bytes) = object.get("_bytes").and_then(Json::as_array) {
        let bytes = bytes
            .iter()
            .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| GastError::InvalidTree("\"_bytes\" must hold byte values".to_string()))?;
        return Ok(Value::Bytes(bytes));
    }
    if let Some(parts) = object.get("_complex").and_then(Json::as_array) {
        if let [real, imag] = parts.as_slice() {
            return Ok(Value::Complex {
                real: decode_float(real)?,
                imag: decode_float(imag)?,
            });
        }
    }
    if object.get("_const").and_then(Json::as_str) == Some("Ellipsis") {
        return Ok(Value::Ellipsis);
    }
    if object.contains_key("_float") {
        return Ok(Value::Float(decode_float(&Json::Object(object.clone()))?));
    }
    Err(GastError::InvalidTree(format!(
        "unrecognised tagged value {}",
        Json::Object(object.clone())
    )))
}

fn decode_float(json: &Json) -> Result<f64> {
    if let Some(f) = json.as_f64() {
        return Ok(f);
    }
    match json.get("_float").and_then(Json::as_str) {
        Some("inf") => Ok(f64::INFINITY),
        Some("-inf") => Ok(f64::NEG_INFINITY),
        Some("nan") => Ok(f64::NAN),
        _ => Err(GastError::InvalidTree(format!("expected a float, found {}", json))),
    }
}

fn check_shape<K: NodeKind>(kind: &str, decl: &FieldDecl, value: &Value<K>) -> Result<()> {
    let is_node = |v: &Value<K>| matches!(v, Value::Node(_));
    let ok = match decl.shape {
        Shape::Node | Shape::OptNode => value.is_none() || is_node(value),
        Shape::Nodes => value.as_list().is_some_and(|items| items.iter().all(is_node)),
        Shape::OptNodes => value
            .as_list()
            .is_some_and(|items| items.iter().all(|v| v.is_none() || is_node(v))),
        Shape::Scalars => value.as_list().is_some_and(|items| items.iter().all(Value::is_scalar)),
        Shape::Scalar => !is_node(value),
        Shape::Flag => matches!(value, Value::Int(_) | Value::Bool(_)),
    };
    if ok {
        Ok(())
    } else {
        Err(GastError::InvalidTree(format!(
            "{}.{} does not hold a {:?} value",
            kind, decl.name, decl.shape
        )))
    }
}

pub fn canonical_from_json(json: &Json) -> Result<Node> {
    node_from_json(json, &|name: &str| {
        Kind::from_name(name).ok_or_else(|| GastError::UnknownKind {
            schema: "canonical",
            kind: name.to_string(),
        })
    })
}

/// Decodes a source tree against one version's registry.
pub fn source_from_json(registry: &SchemaRegistry, json: &Json) -> Result<SourceNode> {
    debug!("Decoding source tree against schema '{}'", registry.name());
    node_from_json(json, &|name: &str| registry.lookup(name).map(SourceKind::new))
}

/// The `"_version"` tag of a document, if present.
pub fn version_tag(json: &Json) -> Option<&str> {
    json.get(VERSION_KEY).and_then(Json::as_str)
}

pub fn to_string<K: NodeKind>(node: &Node<K>) -> Result<String> {
    Ok(serde_json::to_string(&to_json(node))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_decode_canonical_expression() {
        let text = indoc! {r#"
            {
              "_type": "Expression",
              "body": {
                "_type": "BinOp",
                "left": {"_type": "Name", "id": "x", "ctx": {"_type": "Load"},
                         "lineno": 1, "col_offset": 0, "end_lineno": 1, "end_col_offset": 1},
                "op": {"_type": "Add"},
                "right": {"_type": "Constant", "value": 1, "kind": null,
                          "lineno": 1, "col_offset": 4, "end_lineno": 1, "end_col_offset": 5},
                "lineno": 1, "col_offset": 0, "end_lineno": 1, "end_col_offset": 5
              }
            }
        "#};
        let json: Json = serde_json::from_str(text).unwrap();
        let tree = canonical_from_json(&json).unwrap();
        let binop = tree.node("body").unwrap();
        assert_eq!(binop.kind(), Kind::BinOp);
        assert_eq!(binop.node("left").unwrap().str_field("id"), Some("x"));
        assert_eq!(binop.node("right").unwrap().attr(Attr::ColOffset), Some(4));
        // Missing optional fields take their defaults.
        assert_eq!(binop.node("left").unwrap().get("annotation"), Some(&Value::None));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let json = json!({"_type": "Constant", "value": 1, "n": 1});
        assert!(matches!(
            canonical_from_json(&json),
            Err(GastError::UnknownField { kind: "Constant", ref field }) if field == "n"
        ));
    }

    #[test]
    fn test_undeclared_attributes_are_ignored() {
        let json = json!({"_type": "Add", "lineno": 3});
        let node = canonical_from_json(&json).unwrap();
        assert_eq!(node.attr(Attr::Lineno), None);
    }

    #[test]
    fn test_tagged_scalars() {
        let json = json!({"_type": "Tuple", "ctx": {"_type": "Load"}, "elts": [
            {"_type": "Constant", "value": {"_bytes": [104, 105]}},
            {"_type": "Constant", "value": {"_complex": [0.0, 2.0]}},
            {"_type": "Constant", "value": {"_const": "Ellipsis"}},
            {"_type": "Constant", "value": {"_float": "inf"}}
        ]});
        let tuple = canonical_from_json(&json).unwrap();
        let values: Vec<_> = tuple
            .list("elts")
            .iter()
            .filter_map(Value::as_node)
            .map(|c| c.get("value").cloned().unwrap())
            .collect();
        assert_eq!(
            values,
            [
                Value::Bytes(b"hi".to_vec()),
                Value::Complex { real: 0.0, imag: 2.0 },
                Value::Ellipsis,
                Value::Float(f64::INFINITY),
            ]
        );
        assert_eq!(canonical_from_json(&to_json(&tuple)).unwrap(), tuple);
    }

    #[test]
    fn test_wide_integers_stay_exact() {
        let text = r#"{"_type": "List", "ctx": {"_type": "Load"}, "elts": [
            {"_type": "Constant", "value": 18446744073709551615},
            {"_type": "Constant", "value": -1267650600228229401496703205376},
            {"_type": "Constant", "value": {"_int": "1267650600228229401496703205376"}},
            {"_type": "Constant", "value": {"_int": "42"}},
            {"_type": "Constant", "value": 1e30}
        ]}"#;
        let list = canonical_from_json(&serde_json::from_str(text).unwrap()).unwrap();
        let values: Vec<_> = list
            .list("elts")
            .iter()
            .filter_map(Value::as_node)
            .map(|c| c.get("value").cloned().unwrap())
            .collect();
        assert_eq!(
            values,
            [
                Value::BigInt("18446744073709551615".to_string()),
                Value::BigInt("-1267650600228229401496703205376".to_string()),
                Value::BigInt("1267650600228229401496703205376".to_string()),
                Value::Int(42),
                Value::Float(1e30),
            ]
        );

        let reencoded = to_string(&list).unwrap();
        assert!(reencoded.contains(r#"{"_int":"18446744073709551615"}"#));
        let back = canonical_from_json(&serde_json::from_str(&reencoded).unwrap()).unwrap();
        assert_eq!(back, list);

        let bad = json!({"_type": "Constant", "value": {"_int": "12x"}});
        assert!(matches!(canonical_from_json(&bad), Err(GastError::InvalidTree(_))));
    }

    #[test]
    fn test_shape_mismatch() {
        let json = json!({"_type": "Expr", "value": [1, 2]});
        assert!(matches!(canonical_from_json(&json), Err(GastError::InvalidTree(_))));
    }
}
