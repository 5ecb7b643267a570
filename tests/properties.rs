use gast::ir::{children, postorder, preorder, Attr, NodeKind, CANONICAL};
use gast::{
    construct, fix_missing_locations, from_canonical, increment_line, to_canonical, walk, Args, GastError, Kind,
    Node, SchemaVersion, SourceTree, Value,
};
use quickcheck::{QuickCheck, TestResult};
use test_utils::ir::generator::{PyExpr, PyModule, PyParams};
use tracing::debug;

/// Raises `tree` into `version`, through JSON and back down.
fn through(tree: &Node, version: SchemaVersion) -> gast::Result<Node> {
    let source = from_canonical(tree, version)?;
    let text = serde_json::to_string(&source.to_json())?;
    to_canonical(&SourceTree::from_json_str(&text, version)?)
}

/// A tree the schema can spell comes back unchanged; any other is rejected as
/// unsupported rather than mistranslated.
fn expect_round_trip(tree: &Node, version: SchemaVersion, fits: bool) -> TestResult {
    match (through(tree, version), fits) {
        (Ok(back), true) if back == *tree => TestResult::passed(),
        (Ok(back), true) => {
            debug!("{} changed {} into {}", version, gast::dump(tree), gast::dump(&back));
            TestResult::failed()
        }
        (Err(e), true) => TestResult::error(format!("{}: {}", version, e)),
        (Err(GastError::UnsupportedConstruct { version: tag, .. }), false) if tag == version.tag() => {
            TestResult::passed()
        }
        (other, false) => {
            let other = other.map(|n| gast::dump(&n));
            TestResult::error(format!("{} should reject the tree, got {:?}", version, other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_expressions_survive_every_version() {
        fn prop(expr: PyExpr) -> TestResult {
            let tree = expr.to_module();
            for version in SchemaVersion::ALL {
                let result = expect_round_trip(&tree, version, expr.fits(version));
                if result.is_failure() {
                    return result;
                }
            }
            TestResult::passed()
        }

        QuickCheck::new()
            .tests(300)
            .max_tests(3000)
            .quickcheck(prop as fn(PyExpr) -> TestResult);
    }

    #[test]
    fn test_property_statements_survive_every_version() {
        fn prop(module: PyModule) -> TestResult {
            let tree = module.to_node();
            for version in SchemaVersion::ALL {
                let fits = module.fits(version);
                if fits && version == SchemaVersion::Python2 && module.has_multi_item_with() {
                    // 2.7 nests one `with` per context manager.
                    let back = match through(&tree, version) {
                        Ok(back) => back,
                        Err(e) => return TestResult::error(format!("{}: {}", version, e)),
                    };
                    let withs = walk(&back).filter(|n| n.is(Kind::With)).count();
                    if withs != module.with_items() || back == tree {
                        return TestResult::failed();
                    }
                    continue;
                }
                let result = expect_round_trip(&tree, version, fits);
                if result.is_failure() {
                    return result;
                }
            }
            TestResult::passed()
        }

        QuickCheck::new()
            .tests(300)
            .max_tests(3000)
            .quickcheck(prop as fn(PyModule) -> TestResult);
    }

    #[test]
    fn test_property_parameters_survive_every_version() {
        fn prop(params: PyParams) -> TestResult {
            for version in SchemaVersion::ALL {
                let params = match version {
                    SchemaVersion::Python2 => params.clone().for_python2(),
                    _ => params.clone(),
                };
                let arguments = params.to_node();
                let back = match from_canonical(&arguments, version).and_then(|s| to_canonical(&s)) {
                    Ok(back) => back,
                    Err(e) => return TestResult::error(format!("{}: {}", version, e)),
                };
                if back != arguments {
                    return TestResult::failed();
                }
            }
            TestResult::passed()
        }

        QuickCheck::new()
            .tests(300)
            .max_tests(3000)
            .quickcheck(prop as fn(PyParams) -> TestResult);
    }

    #[test]
    fn test_property_python2_rejects_keyword_only() {
        fn prop(params: PyParams) -> TestResult {
            if params.kwonly.is_empty() {
                return TestResult::discard();
            }
            let result = from_canonical(&params.to_node(), SchemaVersion::Python2);
            TestResult::from_bool(matches!(result, Err(GastError::UnsupportedConstruct { .. })))
        }

        QuickCheck::new()
            .tests(100)
            .max_tests(2000)
            .quickcheck(prop as fn(PyParams) -> TestResult);
    }

    #[test]
    fn test_property_positional_arity() {
        fn prop(index: usize, extra: u8) -> TestResult {
            let kind = Kind::ALL[index % Kind::ALL.len()];
            let arity = kind.def().fields.len();
            let too_many = arity + 1 + usize::from(extra % 4);
            let mut counts = vec![too_many];
            if arity >= 2 {
                counts.push(1 + usize::from(extra) % (arity - 1));
            }
            for given in counts {
                match construct(kind, Args::Positional(vec![Value::None; given])) {
                    Err(GastError::Arity { expected, given: g, .. }) if expected == arity && g == given => {}
                    _ => return TestResult::failed(),
                }
            }
            TestResult::passed()
        }

        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(usize, u8) -> TestResult);
    }

    #[test]
    fn test_every_kind_accepts_its_arity() {
        assert_eq!(CANONICAL.len(), Kind::ALL.len());
        for &kind in Kind::ALL {
            let empty = construct(kind, Args::Positional(Vec::new())).unwrap();
            let values: Vec<Value> = empty.fields().map(|(_, v)| v.clone()).collect();
            let full = construct(kind, Args::Positional(values)).unwrap();
            assert_eq!(full, empty);
        }
    }

    #[test]
    fn test_property_fix_missing_locations() {
        fn prop(expr: PyExpr) -> TestResult {
            let mut once = expr.to_module();
            fix_missing_locations(&mut once).unwrap();
            for node in walk(&once) {
                for &attr in node.def().attributes {
                    if node.attr(attr).is_none() {
                        return TestResult::failed();
                    }
                }
            }
            let mut twice = once.clone();
            fix_missing_locations(&mut twice).unwrap();
            TestResult::from_bool(twice == once)
        }

        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(PyExpr) -> TestResult);
    }

    #[test]
    fn test_property_increment_line_inverts() {
        fn prop(expr: PyExpr, delta: i16) -> TestResult {
            let tree = expr.to_module();
            let mut moved = tree.clone();
            increment_line(&mut moved, i64::from(delta));
            let stmt = moved.list("body")[0].as_node().unwrap();
            if stmt.attr(Attr::Lineno) != Some(1 + i64::from(delta)) {
                return TestResult::failed();
            }
            increment_line(&mut moved, -i64::from(delta));
            TestResult::from_bool(moved == tree)
        }

        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(PyExpr, i16) -> TestResult);
    }

    #[test]
    fn test_property_traversals_agree() {
        fn prop(expr: PyExpr) -> TestResult {
            let tree = expr.to_module();
            let mut bfs: Vec<u64> = walk(&tree).map(|n| n.id().as_u64()).collect();
            let mut pre: Vec<u64> = preorder(&tree).iter().map(|n| n.id().as_u64()).collect();
            let mut post: Vec<u64> = postorder(&tree).iter().map(|n| n.id().as_u64()).collect();
            if bfs.first() != pre.first() || post.last() != pre.first() {
                return TestResult::failed();
            }
            let edges: usize = walk(&tree).map(|n| children(n).len()).sum();
            if edges + 1 != bfs.len() {
                return TestResult::failed();
            }
            bfs.sort_unstable();
            pre.sort_unstable();
            post.sort_unstable();
            TestResult::from_bool(bfs == pre && pre == post)
        }

        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(PyExpr) -> TestResult);
    }
}
