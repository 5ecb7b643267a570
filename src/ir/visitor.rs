//! Visitor and transformer traits over the generic node.
//!
//! Both traits dispatch through a single entry point (`visit` / `transform`).
//! Implementors override it, match on `node.kind()` for the kinds they handle and
//! fall back to the generic method for everything else:
//!
//! ```ignore
//! impl Transformer for DoubleConstants {
//!     fn transform(&mut self, mut node: Node) -> Transformed {
//!         match node.kind() {
//!             Kind::Constant => { /* edit node */ Transformed::Node(node) }
//!             _ => Transformed::Node(self.generic_transform(node)),
//!         }
//!     }
//! }
//! ```
//!
//! Recursion is explicit: a handler that does not call the generic method leaves the
//! subtree below it untouched.

use super::expand::children;
use super::kinds::Kind;
use super::node::{Node, Value};
use super::schema::NodeKind;

/// Read-only traversal.
pub trait Visitor<K: NodeKind = Kind> {
    /// Entry point for one node. The default recurses into the children.
    fn visit(&mut self, node: &Node<K>) {
        self.generic_visit(node);
    }

    /// Visits every child in expander order.
    fn generic_visit(&mut self, node: &Node<K>) {
        for child in children(node) {
            self.visit(child);
        }
    }
}

/// What a transformer hands back for the node it was given.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed<K: NodeKind = Kind> {
    /// Put this node where the visited node was.
    Node(Node<K>),
    /// Drop the node: removed from a sequence, cleared in a single-node field.
    Remove,
    /// Splice several nodes in place of the visited one.
    Splice(Vec<Node<K>>),
}

impl<K: NodeKind> Transformed<K> {
    /// The single node result, if any.
    pub fn into_node(self) -> Option<Node<K>> {
        match self {
            Transformed::Node(node) => Some(node),
            Transformed::Remove => None,
            Transformed::Splice(mut nodes) if nodes.len() == 1 => nodes.pop(),
            Transformed::Splice(_) => None,
        }
    }
}

/// Rewriting traversal. Nodes are moved through the transformer, so the ones it
/// keeps retain their identity.
pub trait Transformer<K: NodeKind = Kind> {
    fn transform(&mut self, node: Node<K>) -> Transformed<K> {
        Transformed::Node(self.generic_transform(node))
    }

    /// Transforms every child in place and returns the (same) parent.
    fn generic_transform(&mut self, mut node: Node<K>) -> Node<K> {
        for (decl, slot) in node.fields_mut() {
            if !decl.shape.is_structural() {
                continue;
            }
            *slot = match std::mem::take(slot) {
                Value::Node(child) => match self.transform(*child) {
                    Transformed::Node(new) => Value::from(new),
                    Transformed::Remove => Value::None,
                    Transformed::Splice(nodes) => Value::from(nodes),
                },
                Value::List(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::Node(child) => match self.transform(*child) {
                                Transformed::Node(new) => out.push(Value::from(new)),
                                Transformed::Remove => {}
                                Transformed::Splice(nodes) => {
                                    out.extend(nodes.into_iter().map(Value::from))
                                }
                            },
                            other => out.push(other),
                        }
                    }
                    Value::List(out)
                }
                other => other,
            };
        }
        node
    }
}

/// Runs `visitor` over `root`.
pub fn visit<K: NodeKind, V: Visitor<K> + ?Sized>(visitor: &mut V, root: &Node<K>) {
    visitor.visit(root);
}

/// Runs `transformer` over `root` and returns what it made of the root.
pub fn transform<K: NodeKind, T: Transformer<K> + ?Sized>(
    transformer: &mut T,
    root: Node<K>,
) -> Transformed<K> {
    transformer.transform(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: i64) -> Node {
        Node::new(Kind::Constant, vec![Value::Int(value), Value::None]).unwrap()
    }

    fn expr_stmt(value: Node) -> Node {
        Node::new(Kind::Expr, vec![value.into()]).unwrap()
    }

    struct Collect(Vec<i64>);

    impl Visitor for Collect {
        fn visit(&mut self, node: &Node) {
            match node.kind() {
                Kind::Constant => self.0.extend(node.get("value").and_then(Value::as_int)),
                _ => self.generic_visit(node),
            }
        }
    }

    #[test]
    fn test_visitor_reaches_nested_constants() {
        let tree = Node::new(
            Kind::UnaryOp,
            vec![Node::empty(Kind::USub).into(), constant(6).into()],
        )
        .unwrap();
        let mut collect = Collect(Vec::new());
        visit(&mut collect, &tree);
        assert_eq!(collect.0, [6]);
    }

    struct Double;

    impl Transformer for Double {
        fn transform(&mut self, mut node: Node) -> Transformed {
            if node.is(Kind::Constant) {
                if let Some(Value::Int(v)) = node.get_mut("value") {
                    *v *= 2;
                }
                return Transformed::Node(node);
            }
            Transformed::Node(self.generic_transform(node))
        }
    }

    #[test]
    fn test_transformer_keeps_identity() {
        let c = constant(6);
        let id = c.id();
        let tree = Node::new(Kind::UnaryOp, vec![Node::empty(Kind::USub).into(), c.into()]).unwrap();
        let tree = transform(&mut Double, tree).into_node().unwrap();
        let operand = tree.node("operand").unwrap();
        assert_eq!(operand.id(), id);
        assert_eq!(operand.get("value"), Some(&Value::Int(12)));
    }

    /// Drops `pass`, duplicates expression statements.
    struct Reshape;

    impl Transformer for Reshape {
        fn transform(&mut self, node: Node) -> Transformed {
            match node.kind() {
                Kind::Pass => Transformed::Remove,
                Kind::Expr => Transformed::Splice(vec![node.clone(), node]),
                _ => Transformed::Node(self.generic_transform(node)),
            }
        }
    }

    #[test]
    fn test_remove_and_splice_in_sequences() {
        let module = Node::new(
            Kind::Module,
            vec![
                vec![Node::empty(Kind::Pass), expr_stmt(constant(1)), Node::empty(Kind::Pass)].into(),
                Value::List(vec![]),
            ],
        )
        .unwrap();
        let module = transform(&mut Reshape, module).into_node().unwrap();
        let body: Vec<_> = module.list("body").iter().filter_map(Value::as_node).map(|n| n.kind()).collect();
        assert_eq!(body, [Kind::Expr, Kind::Expr]);
    }

    #[test]
    fn test_remove_clears_single_field() {
        let ret = Node::new(Kind::Return, vec![Node::empty(Kind::Pass).into()]).unwrap();
        let ret = transform(&mut Reshape, ret).into_node().unwrap();
        assert_eq!(ret.get("value"), Some(&Value::None));
    }

    struct Shallow;

    impl Transformer for Shallow {
        fn transform(&mut self, node: Node) -> Transformed {
            if node.is(Kind::Expr) {
                // No recursion: the constant below stays as it is.
                return Transformed::Node(node);
            }
            Double.transform(node)
        }
    }

    #[test]
    fn test_handler_controls_recursion() {
        let stmt = expr_stmt(constant(3));
        let stmt = transform(&mut Shallow, stmt).into_node().unwrap();
        assert_eq!(stmt.node("value").unwrap().get("value"), Some(&Value::Int(3)));
    }
}
