use gast::nodemap::DERIVED_KINDS;
use gast::{map_and_convert, walk, GapReason, GastError, Kind, Location, MappedTree, Node};
use test_utils::fixtures::{self, load};

fn mapped(json: &str) -> MappedTree {
    map_and_convert(load(json)).unwrap()
}

fn first_stmt(tree: &Node) -> &Node {
    tree.list("body")[0].as_node().unwrap()
}

fn reason(tree: &MappedTree, node: &Node) -> GapReason {
    match tree.map.lookup(node) {
        Err(GastError::NoCorrespondence { reason, .. }) => reason,
        other => panic!("expected no correspondence, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_fixture_is_fully_mapped() {
        for json in fixtures::ALL {
            let tree = mapped(json);
            tree.map.verify(&tree.canonical).unwrap();
            for (_, source) in tree.map.iter() {
                assert!(!source.kind.is_empty());
            }
        }
    }

    #[test]
    fn test_same_kind_maps_to_itself() {
        let tree = mapped(fixtures::X_PLUS_ONE_38);
        let binop = tree.canonical.node("body").unwrap();
        let left = binop.node("left").unwrap();
        let source = tree.map.lookup(left).unwrap();
        assert_eq!(source.kind, "Name");
        assert_eq!(source.location, Location::span(1, 0, 1, 1));
        assert_eq!(tree.source_of(binop).unwrap().name(), "BinOp");
    }

    #[test]
    fn test_markers_are_never_keys() {
        let tree = mapped(fixtures::X_PLUS_ONE_38);
        let markers: Vec<&Node> = walk(&tree.canonical)
            .filter(|n| n.kind().is_context_marker())
            .collect();
        // Only the Load of `x`; operators are ordinary nodes.
        assert_eq!(markers.len(), 1);
        for marker in markers {
            assert!(!tree.map.contains(marker));
            assert_eq!(reason(&tree, marker), GapReason::ContextMarker);
        }
    }

    #[test]
    fn test_python2_constant_maps_to_num() {
        let tree = mapped(fixtures::X_PLUS_ONE_27);
        let right = tree.canonical.node("body").unwrap().node("right").unwrap();
        assert_eq!(tree.map.lookup(right).unwrap().kind, "Num");
        assert_eq!(tree.map.lookup(right).unwrap().location, Location::new(1, 4));
    }

    #[test]
    fn test_handler_name_is_a_documented_gap() {
        let tree = mapped(fixtures::TRY_EXCEPT_AS_33);
        let handler = first_stmt(&tree.canonical).list("handlers")[0].as_node().unwrap();
        assert_eq!(tree.map.lookup(handler).unwrap().kind, "ExceptHandler");
        let name = handler.node("name").unwrap();
        assert!(tree.map.is_gap(name));
        assert_eq!(reason(&tree, name), GapReason::DocumentedGap);
        assert!(reason(&tree, name).is_expected());
    }

    #[test]
    fn test_python2_handler_name_is_mapped() {
        let tree = mapped(fixtures::TRY_EXCEPT_FINALLY_27);
        let try_stmt = first_stmt(&tree.canonical);
        // The merged Try keeps the entry of the TryExcept it was built from.
        assert_eq!(tree.map.lookup(try_stmt).unwrap().kind, "TryExcept");
        let handler = try_stmt.list("handlers")[0].as_node().unwrap();
        let name = handler.node("name").unwrap();
        assert_eq!(tree.source_of(name).unwrap().name(), "Name");
        assert_eq!(tree.map.lookup(name).unwrap().location, Location::new(3, 10));
    }

    #[test]
    fn test_parameters_map_to_args() {
        let tree = mapped(fixtures::SIGNATURE_38);
        let arguments = first_stmt(&tree.canonical).node("args").unwrap();
        assert!(tree.map.contains(arguments));

        let a = arguments.list("posonlyargs")[0].as_node().unwrap();
        let source = tree.source_of(a).unwrap();
        assert_eq!(source.name(), "arg");
        assert_eq!(source.str_field("arg"), Some("a"));
        let annotation = a.node("annotation").unwrap();
        assert_eq!(tree.map.lookup(annotation).unwrap().kind, "Name");
        assert_eq!(tree.map.lookup(annotation).unwrap().location, Location::span(1, 9, 1, 12));

        let c = arguments.list("kwonlyargs")[0].as_node().unwrap();
        assert_eq!(tree.source_of(c).unwrap().str_field("arg"), Some("c"));
        let kw = arguments.node("kwarg").unwrap();
        assert_eq!(tree.source_of(kw).unwrap().str_field("arg"), Some("kw"));
    }

    #[test]
    fn test_identifier_parameters_map_to_arguments() {
        let tree = mapped(fixtures::VARARGS_33);
        let arguments = first_stmt(&tree.canonical).node("args").unwrap();
        for field in ["vararg", "kwarg"] {
            let param = arguments.node(field).unwrap();
            assert_eq!(tree.map.lookup(param).unwrap().kind, "arguments");
            assert!(DERIVED_KINDS.contains(&("arguments", "Name")));
        }
    }

    #[test]
    fn test_raise_reshape_maps_to_raise() {
        let tree = mapped(fixtures::RAISE_27);
        let raise = first_stmt(&tree.canonical);
        let exc = raise.node("exc").unwrap();
        assert_eq!(tree.map.lookup(exc).unwrap().kind, "Raise");
        let method = exc.node("func").unwrap();
        assert!(method.is(Kind::Attribute));
        assert_eq!(tree.map.lookup(method).unwrap().kind, "Raise");
        let tback = exc.list("args")[0].as_node().unwrap();
        assert_eq!(tree.source_of(tback).unwrap().str_field("id"), Some("tb"));
    }

    #[test]
    fn test_with_item_maps_to_with() {
        let tree = mapped(fixtures::WITH_27);
        let with = first_stmt(&tree.canonical);
        let item = with.list("items")[0].as_node().unwrap();
        assert_eq!(tree.map.lookup(item).unwrap().kind, "With");
        assert_eq!(tree.map.lookup(with).unwrap().kind, "With");
    }

    #[test]
    fn test_new_nodes_are_unmapped() {
        let tree = mapped(fixtures::X_PLUS_ONE_38);
        let copy = tree.canonical.node("body").unwrap().clone();
        assert_eq!(reason(&tree, &copy), GapReason::Unmapped);
        assert!(!reason(&tree, &copy).is_expected());
        assert!(tree.map.verify(&copy).is_err());
    }
}
