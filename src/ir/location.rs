//! Positional metadata bookkeeping across subtrees.

use tracing::trace;

use crate::error::{GastError, Result};

use super::expand::children_mut;
use super::node::{Location, Node};
use super::schema::NodeKind;

/// Copies every attribute declared by both nodes and set on `src` onto `dst`.
pub fn copy_location<K1: NodeKind, K2: NodeKind>(dst: &mut Node<K1>, src: &Node<K2>) {
    for &attr in dst.def().attributes {
        if let Some(value) = src.attr(attr) {
            dst.location_mut().set(attr, Some(value));
        }
    }
}

/// Fills unset attributes from the nearest ancestor that has them.
///
/// The root must have all of its declared attributes; a root that declares none
/// (a module) seeds its descendants with line 1, column 0. The check happens
/// before anything is written.
pub fn fix_missing_locations<K: NodeKind>(root: &mut Node<K>) -> Result<()> {
    if let Some(&attr) = root.def().attributes.iter().find(|&&attr| root.attr(attr).is_none()) {
        return Err(GastError::MissingLocation {
            kind: root.name(),
            attr: attr.name(),
        });
    }
    fix(root, Location::span(1, 0, 1, 0));
    Ok(())
}

fn fix<K: NodeKind>(node: &mut Node<K>, mut inherited: Location) {
    for &attr in node.def().attributes {
        match node.location().get(attr) {
            Some(own) => inherited.set(attr, Some(own)),
            None => {
                trace!("{} inherits {}={:?}", node.name(), attr.name(), inherited.get(attr));
                node.location_mut().set(attr, inherited.get(attr));
            }
        }
    }
    for child in children_mut(node) {
        fix(child, inherited);
    }
}

/// Shifts every set line-number attribute in the tree by `delta`.
pub fn increment_line<K: NodeKind>(root: &mut Node<K>, delta: i64) {
    for &attr in root.def().attributes {
        if attr.is_line() {
            if let Some(line) = root.location().get(attr) {
                root.location_mut().set(attr, Some(line + delta));
            }
        }
    }
    for child in children_mut(root) {
        increment_line(child, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::kinds::Kind;
    use crate::ir::schema::Attr;
    use crate::ir::node::Value;

    fn constant(value: i64) -> Node {
        Node::new(Kind::Constant, vec![Value::Int(value), Value::None]).unwrap()
    }

    #[test]
    fn test_copy_location() {
        let src = constant(1).at(Location::new(1, 2));
        let mut dst = constant(2);
        copy_location(&mut dst, &src);
        assert_eq!(dst.attr(Attr::Lineno), Some(1));
        assert_eq!(dst.attr(Attr::ColOffset), Some(2));
        assert_eq!(dst.attr(Attr::EndLineno), None);
    }

    #[test]
    fn test_fix_missing_locations_inherits() {
        let tree = Node::new(Kind::UnaryOp, vec![Node::empty(Kind::USub).into(), constant(6).into()]).unwrap();
        let mut tree = tree.at(Location::span(1, 2, 1, 4));
        fix_missing_locations(&mut tree).unwrap();
        let operand = tree.node("operand").unwrap();
        assert_eq!(operand.location(), tree.location());
        assert_eq!(tree.node("op").unwrap().location(), &Location::default());
    }

    #[test]
    fn test_fix_missing_locations_requires_root_location() {
        let mut tree = Node::new(Kind::UnaryOp, vec![Node::empty(Kind::USub).into(), constant(6).into()])
            .unwrap()
            .at(Location::new(1, 2));
        let err = fix_missing_locations(&mut tree).unwrap_err();
        assert!(matches!(err, GastError::MissingLocation { kind: "UnaryOp", attr: "end_lineno" }));
        assert_eq!(tree.node("operand").unwrap().attr(Attr::Lineno), None);
    }

    #[test]
    fn test_module_root_seeds_line_one() {
        let stmt = Node::new(Kind::Expr, vec![constant(1).into()]).unwrap();
        let mut module = Node::new(Kind::Module, vec![vec![stmt].into(), Value::List(vec![])]).unwrap();
        fix_missing_locations(&mut module).unwrap();
        let stmt = module.list("body")[0].as_node().unwrap();
        assert_eq!(stmt.location(), &Location::span(1, 0, 1, 0));
    }

    #[test]
    fn test_increment_line() {
        let mut tree = constant(1).at(Location::span(1, 0, 2, 3));
        increment_line(&mut tree, 1);
        assert_eq!(tree.location(), &Location::span(2, 0, 3, 3));
    }
}
