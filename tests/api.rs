use gast::ir::json::canonical_from_json;
use gast::{
    dump, dump_with, fix_missing_locations, from_canonical, get_docstring, increment_line, literal_value, parse,
    parse_and_map, to_canonical, transform, visit, walk, DumpOptions, GastError, Kind, Literal, Location, Mode,
    Node, SchemaVersion, Transformed, Transformer, Value, Visitor,
};
use serde_json::json;
use test_utils::fixtures::{self, load};
use test_utils::frontend::FixtureFrontend;

const X_PLUS_ONE: &str =
    "Expression(body=BinOp(left=Name(id='x', ctx=Load(), annotation=None, type_comment=None), op=Add(), right=Constant(value=1, kind=None)))";

struct Rename<'a> {
    from: &'a str,
    to: &'a str,
}

impl Transformer for Rename<'_> {
    fn transform(&mut self, mut node: Node) -> Transformed {
        if node.is(Kind::Name) && node.str_field("id") == Some(self.from) {
            node.set("id", self.to.into()).unwrap();
        }
        Transformed::Node(self.generic_transform(node))
    }
}

#[derive(Default)]
struct CountConstants(usize);

impl Visitor for CountConstants {
    fn visit(&mut self, node: &Node) {
        if node.is(Kind::Constant) {
            self.0 += 1;
        }
        self.generic_visit(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binop_dump() {
        let frontend = FixtureFrontend::standard(SchemaVersion::Python38);
        let tree = parse(&frontend, "x + 1", Mode::Eval).unwrap();
        assert_eq!(dump(&tree), X_PLUS_ONE);
        assert_eq!(walk(&tree).count(), 6);
    }

    #[test]
    fn test_python2_parse_looks_the_same() {
        let frontend = FixtureFrontend::standard(SchemaVersion::Python2);
        let tree = parse(&frontend, "x + 1", Mode::Eval).unwrap();
        assert_eq!(dump(&tree), X_PLUS_ONE);
    }

    #[test]
    fn test_unknown_text_is_a_frontend_error() {
        let frontend = FixtureFrontend::standard(SchemaVersion::Python38);
        let err = parse(&frontend, "x + 2", Mode::Eval).unwrap_err();
        assert!(matches!(err, GastError::Frontend { .. }));
        // Same text, other mode.
        assert!(parse(&frontend, "x + 1", Mode::Exec).is_err());
    }

    #[test]
    fn test_dump_attributes() {
        let tree = to_canonical(&load(fixtures::X_PLUS_ONE_38)).unwrap();
        let binop = tree.node("body").unwrap();
        let options = DumpOptions {
            show_empty: false,
            include_attributes: true,
        };
        assert_eq!(
            dump_with(binop.node("right").unwrap(), options),
            "Constant(value=1, lineno=1, col_offset=4, end_lineno=1, end_col_offset=5)"
        );
    }

    #[test]
    fn test_docstring() {
        let module = to_canonical(&load(fixtures::SIGNATURE_38)).unwrap();
        assert_eq!(get_docstring(&module, true).unwrap(), None);
        let function = module.list("body")[0].as_node().unwrap();
        assert_eq!(get_docstring(function, true).unwrap().as_deref(), Some("Return nothing."));

        let binop = to_canonical(&load(fixtures::X_PLUS_ONE_38)).unwrap();
        assert!(matches!(
            get_docstring(binop.node("body").unwrap(), false),
            Err(GastError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_literal_folding() {
        let tree = canonical_from_json(&json!({
            "_type": "Tuple",
            "elts": [
                {"_type": "Constant", "value": 1, "kind": null},
                {
                    "_type": "UnaryOp",
                    "op": {"_type": "USub"},
                    "operand": {"_type": "Constant", "value": 2.5, "kind": null}
                },
                {"_type": "Constant", "value": "a", "kind": null}
            ],
            "ctx": {"_type": "Load"}
        }))
        .unwrap();
        assert_eq!(
            literal_value(&tree).unwrap(),
            Literal::Tuple(vec![Literal::Int(1), Literal::Float(-2.5), Literal::Str("a".to_string())])
        );

        let expression = to_canonical(&load(fixtures::X_PLUS_ONE_38)).unwrap();
        assert!(matches!(literal_value(&expression), Err(GastError::NotALiteral("Name"))));
    }

    #[test]
    fn test_rename_then_raise() {
        let tree = to_canonical(&load(fixtures::X_PLUS_ONE_38)).unwrap();
        let renamed = transform(&mut Rename { from: "x", to: "y" }, tree)
            .into_node()
            .unwrap();
        let source = from_canonical(&renamed, SchemaVersion::Python38).unwrap();
        let left = source.root.node("body").unwrap().node("left").unwrap();
        assert_eq!(left.str_field("id"), Some("y"));
        assert_eq!(*left.location(), Location::span(1, 0, 1, 1));
    }

    #[test]
    fn test_visitor_counts_constants() {
        let tree = to_canonical(&load(fixtures::SIGNATURE_38)).unwrap();
        let mut counter = CountConstants::default();
        visit(&mut counter, &tree);
        // The default of `b` and the docstring.
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn test_location_helpers_on_lowered_tree() {
        let mut tree = to_canonical(&load(fixtures::X_PLUS_ONE_27)).unwrap();
        // 2.7 trees carry no end positions; the fix fills them from the parent.
        let right = tree.node("body").unwrap().node("right").unwrap();
        assert_eq!(right.location().end_lineno, None);

        let body = tree.get_mut("body").and_then(Value::as_node_mut).unwrap();
        body.location_mut().end_lineno = Some(1);
        body.location_mut().end_col_offset = Some(5);
        fix_missing_locations(&mut tree).unwrap();
        let right = tree.node("body").unwrap().node("right").unwrap();
        assert_eq!(*right.location(), Location::span(1, 4, 1, 5));

        increment_line(&mut tree, 9);
        let right = tree.node("body").unwrap().node("right").unwrap();
        assert_eq!(*right.location(), Location::span(10, 4, 10, 5));
    }

    #[test]
    fn test_parse_and_map_keeps_source() {
        let frontend = FixtureFrontend::standard(SchemaVersion::Python2);
        let mapped = parse_and_map(&frontend, "x + 1", Mode::Eval).unwrap();
        assert_eq!(mapped.source.version, SchemaVersion::Python2);
        let constant = mapped.canonical.node("body").unwrap().node("right").unwrap();
        assert_eq!(mapped.source_of(constant).unwrap().name(), "Num");
    }
}
