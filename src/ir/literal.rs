//! Literal folding and docstring extraction over canonical trees.

use crate::error::{GastError, Result};

use super::kinds::Kind;
use super::node::{Node, Value};

/// A folded literal display.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, as decimal digits.
    BigInt(String),
    Float(f64),
    Complex { real: f64, imag: f64 },
    Str(String),
    Bytes(Vec<u8>),
    Ellipsis,
    Tuple(Vec<Literal>),
    List(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

/// Folds a tree made only of constants, containers, signs and complex sums.
///
/// Accepts an `Expression` wrapper. Anything else fails with `NotALiteral`.
pub fn literal_value(node: &Node) -> Result<Literal> {
    match node.kind() {
        Kind::Expression => literal_value(child(node, "body")?),
        Kind::Constant => constant(node.get("value").unwrap_or(&Value::None), node),
        Kind::Name => match node.str_field("id") {
            Some("None") => Ok(Literal::None),
            Some("True") => Ok(Literal::Bool(true)),
            Some("False") => Ok(Literal::Bool(false)),
            _ => Err(GastError::NotALiteral(node.name())),
        },
        Kind::Tuple => Ok(Literal::Tuple(elements(node, "elts")?)),
        Kind::List => Ok(Literal::List(elements(node, "elts")?)),
        Kind::Set => Ok(Literal::Set(elements(node, "elts")?)),
        Kind::Dict => {
            let keys = node.list("keys");
            let values = node.list("values");
            if keys.len() != values.len() {
                return Err(GastError::InvalidTree("Dict keys and values differ in length".to_string()));
            }
            keys.iter()
                .zip(values)
                .map(|(k, v)| {
                    // A `None` key is a `**mapping` splat.
                    let k = k.as_node().ok_or(GastError::NotALiteral("Dict"))?;
                    let v = v.as_node().ok_or(GastError::NotALiteral("Dict"))?;
                    Ok((literal_value(k)?, literal_value(v)?))
                })
                .collect::<Result<Vec<_>>>()
                .map(Literal::Dict)
        }
        Kind::UnaryOp => {
            let operand = literal_value(child(node, "operand")?)?;
            match (child(node, "op")?.kind(), operand) {
                (Kind::UAdd, n @ (Literal::Int(_) | Literal::BigInt(_) | Literal::Float(_) | Literal::Complex { .. })) => {
                    Ok(n)
                }
                (Kind::USub, Literal::Int(i)) => Ok(i
                    .checked_neg()
                    .map_or_else(|| Literal::BigInt(format!("{}", -i128::from(i))), Literal::Int)),
                (Kind::USub, Literal::BigInt(digits)) => Ok(negate(&digits)),
                (Kind::USub, Literal::Float(f)) => Ok(Literal::Float(-f)),
                (Kind::USub, Literal::Complex { real, imag }) => Ok(Literal::Complex { real: -real, imag: -imag }),
                _ => Err(GastError::NotALiteral("UnaryOp")),
            }
        }
        Kind::BinOp => {
            let left = real_part(literal_value(child(node, "left")?)?)?;
            let imag = match literal_value(child(node, "right")?)? {
                Literal::Complex { real, imag } if real == 0.0 => imag,
                _ => return Err(GastError::NotALiteral("BinOp")),
            };
            match child(node, "op")?.kind() {
                Kind::Add => Ok(Literal::Complex { real: left, imag }),
                Kind::Sub => Ok(Literal::Complex { real: left, imag: -imag }),
                _ => Err(GastError::NotALiteral("BinOp")),
            }
        }
        _ => Err(GastError::NotALiteral(node.name())),
    }
}

fn child<'a>(node: &'a Node, field: &str) -> Result<&'a Node> {
    node.node(field)
        .ok_or_else(|| GastError::InvalidTree(format!("{} without {}", node.name(), field)))
}

fn elements(node: &Node, field: &str) -> Result<Vec<Literal>> {
    node.list(field)
        .iter()
        .map(|v| match v.as_node() {
            Some(n) => literal_value(n),
            None => Err(GastError::NotALiteral(node.name())),
        })
        .collect()
}

fn real_part(literal: Literal) -> Result<f64> {
    match literal {
        Literal::Int(i) => Ok(i as f64),
        Literal::BigInt(digits) => digits.parse().map_err(|_| GastError::NotALiteral("BinOp")),
        Literal::Float(f) => Ok(f),
        _ => Err(GastError::NotALiteral("BinOp")),
    }
}

fn negate(digits: &str) -> Literal {
    let negated = match digits.strip_prefix('-') {
        Some(magnitude) => magnitude.to_string(),
        None => format!("-{}", digits),
    };
    // -(i64::MIN) overflows, so its negation comes back as wide digits.
    match negated.parse::<i64>() {
        Ok(i) => Literal::Int(i),
        Err(_) => Literal::BigInt(negated),
    }
}

fn constant(value: &Value, node: &Node) -> Result<Literal> {
    Ok(match value {
        Value::None => Literal::None,
        Value::Bool(b) => Literal::Bool(*b),
        Value::Int(i) => Literal::Int(*i),
        Value::BigInt(digits) => Literal::BigInt(digits.clone()),
        Value::Float(f) => Literal::Float(*f),
        Value::Complex { real, imag } => Literal::Complex { real: *real, imag: *imag },
        Value::Str(s) => Literal::Str(s.clone()),
        Value::Bytes(b) => Literal::Bytes(b.clone()),
        Value::Ellipsis => Literal::Ellipsis,
        Value::Node(_) | Value::List(_) => return Err(GastError::NotALiteral(node.name())),
    })
}

/// Docstring of a module, class or function: the leading string expression statement.
///
/// With `clean`, indentation is normalised the way `inspect.cleandoc` does it.
pub fn get_docstring(node: &Node, clean: bool) -> Result<Option<String>> {
    if !matches!(
        node.kind(),
        Kind::Module | Kind::ClassDef | Kind::FunctionDef | Kind::AsyncFunctionDef
    ) {
        return Err(GastError::InvalidTree(format!("{} cannot have a docstring", node.name())));
    }
    let text = node
        .list("body")
        .first()
        .and_then(Value::as_node)
        .filter(|stmt| stmt.is(Kind::Expr))
        .and_then(|stmt| stmt.node("value"))
        .filter(|value| value.is(Kind::Constant))
        .and_then(|constant| constant.str_field("value"));
    Ok(text.map(|text| if clean { clean_doc(text) } else { text.to_string() }))
}

fn clean_doc(text: &str) -> String {
    let expanded = text.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start().to_string());
        } else {
            cleaned.push(line.get(margin..).unwrap_or("").trim_end().to_string());
        }
    }
    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}
