//! Structural debug serialization.
//!
//! Output mirrors Python's `ast.dump`: `Kind(field=value, ...)`, lists in brackets,
//! scalars in Python literal syntax.

use std::fmt::Write;

use super::node::{Node, Value};
use super::schema::NodeKind;

/// Controls what [`dump_with`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Print fields whose value is `None` or an empty list.
    pub show_empty: bool,
    /// Append the set positional attributes after the fields.
    pub include_attributes: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            show_empty: true,
            include_attributes: false,
        }
    }
}

/// Dumps `node` with every field shown and no attributes.
pub fn dump<K: NodeKind>(node: &Node<K>) -> String {
    dump_with(node, DumpOptions::default())
}

pub fn dump_with<K: NodeKind>(node: &Node<K>, options: DumpOptions) -> String {
    let mut out = String::new();
    write_node(&mut out, node, options);
    out
}

fn write_node<K: NodeKind>(out: &mut String, node: &Node<K>, options: DumpOptions) {
    out.push_str(node.name());
    out.push('(');
    let mut first = true;
    for (decl, value) in node.fields() {
        if !options.show_empty && matches!(value, Value::None) {
            continue;
        }
        if !options.show_empty && matches!(value, Value::List(items) if items.is_empty()) {
            continue;
        }
        if !first {
            out.push_str(", ");
        }
        first = false;
        out.push_str(decl.name);
        out.push('=');
        write_value(out, value, options);
    }
    if options.include_attributes {
        for &attr in node.def().attributes {
            if let Some(v) = node.attr(attr) {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                let _ = write!(out, "{}={}", attr.name(), v);
            }
        }
    }
    out.push(')');
}

fn write_value<K: NodeKind>(out: &mut String, value: &Value<K>, options: DumpOptions) {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::BigInt(digits) => out.push_str(digits),
        Value::Float(f) => out.push_str(&float_repr(*f)),
        Value::Complex { real, imag } => out.push_str(&complex_repr(*real, *imag)),
        Value::Str(s) => out.push_str(&str_repr(s)),
        Value::Bytes(b) => out.push_str(&bytes_repr(b)),
        Value::Ellipsis => out.push_str("Ellipsis"),
        Value::Node(node) => write_node(out, node, options),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, options);
            }
            out.push(']');
        }
    }
}

/// Python `repr` of a float.
pub(crate) fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // Debug picks the same notation thresholds as Python, only the exponent differs.
    let s = format!("{:?}", f);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

pub(crate) fn complex_repr(real: f64, imag: f64) -> String {
    let part = |f: f64| {
        let s = float_repr(f);
        s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
    };
    if real == 0.0 && real.is_sign_positive() {
        format!("{}j", part(imag))
    } else {
        let im = part(imag);
        let sign = if im.starts_with('-') { "" } else { "+" };
        format!("({}{}{}j)", part(real), sign, im)
    }
}

/// Python `repr` of a str: single quotes unless only double quotes avoid escaping.
pub(crate) fn str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

pub(crate) fn bytes_repr(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') { b'"' } else { b'\'' };
    let mut out = String::from("b");
    out.push(quote as char);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b == quote => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            b => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push(quote as char);
    out
}
