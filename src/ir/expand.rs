//! Structural expander: the single definition of "child node".
//!
//! Children are the node values of structural fields (see [`Shape::is_structural`]),
//! in field-declaration order, with sequences flattened and absent values skipped.
//! Scalar fields never contribute children even if they hold a node.

use super::node::{Node, Value};
use super::schema::NodeKind;

/// Direct children of `node`.
pub fn children<K: NodeKind>(node: &Node<K>) -> Vec<&Node<K>> {
    let mut out = Vec::new();
    for (decl, value) in node.fields() {
        if !decl.shape.is_structural() {
            continue;
        }
        out.extend(value.nodes());
    }
    out
}

/// Mutable access to the direct children of `node`, same order as [`children`].
pub fn children_mut<K: NodeKind>(node: &mut Node<K>) -> Vec<&mut Node<K>> {
    let mut out = Vec::new();
    for (decl, value) in node.fields_mut() {
        if !decl.shape.is_structural() {
            continue;
        }
        match value {
            Value::Node(child) => out.push(child.as_mut()),
            Value::List(items) => out.extend(items.iter_mut().filter_map(Value::as_node_mut)),
            _ => {}
        }
    }
    out
}

/// Field name / child pairs, for tools that need to know where a child sits.
pub fn child_fields<K: NodeKind>(node: &Node<K>) -> Vec<(&'static str, &Node<K>)> {
    node.fields()
        .filter(|(decl, _)| decl.shape.is_structural())
        .flat_map(|(decl, value)| value.nodes().map(move |child| (decl.name, child)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::kinds::Kind;

    fn name(id: &str) -> Node {
        Node::new(
            Kind::Name,
            vec![id.into(), Node::empty(Kind::Load).into(), Value::None, Value::None],
        )
        .unwrap()
    }

    #[test]
    fn test_binop_children_in_declaration_order() {
        let constant = Node::new(Kind::Constant, vec![Value::Int(1), Value::None]).unwrap();
        let binop = Node::new(
            Kind::BinOp,
            vec![name("x").into(), Node::empty(Kind::Add).into(), constant.into()],
        )
        .unwrap();
        let kinds: Vec<_> = children(&binop).iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, [Kind::Name, Kind::Add, Kind::Constant]);
    }

    #[test]
    fn test_absent_children_and_scalars_are_skipped() {
        // Name: id is scalar, annotation absent, type_comment scalar.
        let kinds: Vec<_> = children(&name("x")).iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, [Kind::Load]);

        let mut dict = Node::empty(Kind::Dict);
        dict.set("keys", Value::List(vec![Value::None, name("k").into()])).unwrap();
        dict.set("values", vec![name("a"), name("b")].into()).unwrap();
        assert_eq!(children(&dict).len(), 3);
    }

    #[test]
    fn test_every_kind_expands() {
        for &kind in Kind::ALL {
            assert!(children(&Node::empty(kind)).is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn test_children_mut_matches_children() {
        let mut call = Node::empty(Kind::Call);
        call.set("func", name("f").into()).unwrap();
        call.set("args", vec![name("a"), name("b")].into()).unwrap();
        let ids: Vec<_> = children(&call).iter().map(|n| n.id()).collect();
        let ids_mut: Vec<_> = children_mut(&mut call).iter().map(|n| n.id()).collect();
        assert_eq!(ids, ids_mut);
        assert_eq!(child_fields(&call)[2].0, "args");
    }
}
