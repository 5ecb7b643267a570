//! Breadth-first walk over a tree, built on the expander.

use std::collections::VecDeque;

use super::expand::children;
use super::node::Node;
use super::schema::NodeKind;

/// Lazy breadth-first iterator. The root comes first.
#[derive(Debug)]
pub struct Walk<'a, K: NodeKind> {
    queue: VecDeque<&'a Node<K>>,
}

impl<'a, K: NodeKind> Iterator for Walk<'a, K> {
    type Item = &'a Node<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(children(node));
        Some(node)
    }
}

/// Every node reachable from `root`. Each call starts a fresh traversal.
pub fn walk<K: NodeKind>(root: &Node<K>) -> Walk<'_, K> {
    Walk {
        queue: VecDeque::from([root]),
    }
}

/// Depth-first pre-order, parents before children.
pub fn preorder<K: NodeKind>(root: &Node<K>) -> Vec<&Node<K>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(children(node).into_iter().rev());
    }
    out
}

/// Depth-first post-order, children before parents.
pub fn postorder<K: NodeKind>(root: &Node<K>) -> Vec<&Node<K>> {
    fn go<'a, K: NodeKind>(node: &'a Node<K>, out: &mut Vec<&'a Node<K>>) {
        for child in children(node) {
            go(child, out);
        }
        out.push(node);
    }
    let mut out = Vec::new();
    go(root, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::kinds::Kind;
    use crate::ir::node::Value;

    fn tree() -> Node {
        let x = Node::new(
            Kind::Name,
            vec!["x".into(), Node::empty(Kind::Load).into(), Value::None, Value::None],
        )
        .unwrap();
        let one = Node::new(Kind::Constant, vec![Value::Int(1), Value::None]).unwrap();
        let binop = Node::new(
            Kind::BinOp,
            vec![x.into(), Node::empty(Kind::Add).into(), one.into()],
        )
        .unwrap();
        Node::new(Kind::Expression, vec![binop.into()]).unwrap()
    }

    #[test]
    fn test_walk_is_breadth_first() {
        let tree = tree();
        let kinds: Vec<_> = walk(&tree).map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            [Kind::Expression, Kind::BinOp, Kind::Name, Kind::Add, Kind::Constant, Kind::Load]
        );
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = tree();
        assert_eq!(walk(&tree).count(), 6);
        assert_eq!(walk(&tree).count(), 6);
    }

    #[test]
    fn test_depth_first_orders() {
        let tree = tree();
        let pre: Vec<_> = preorder(&tree).iter().map(|n| n.kind()).collect();
        assert_eq!(
            pre,
            [Kind::Expression, Kind::BinOp, Kind::Name, Kind::Load, Kind::Add, Kind::Constant]
        );
        let post: Vec<_> = postorder(&tree).iter().map(|n| n.kind()).collect();
        assert_eq!(
            post,
            [Kind::Load, Kind::Name, Kind::Add, Kind::Constant, Kind::BinOp, Kind::Expression]
        );
    }
}
