//! Random canonical trees for property-based testing.
//!
//! `PyExpr` covers expressions and `PyModule` covers statements, including the
//! constructs whose spelling differs between schemas. Each generated value says
//! which schemas can spell it ([`PyExpr::fits`], [`PyModule::fits`]): those must
//! round-trip unchanged, the others must be rejected.
//! `PyParams` generates parameter lists, with or without the 3.x-only parts.
//!
//! Generation is depth-limited; leaves are names and scalar constants. Compound
//! statements only hold simple ones, which keeps clear of the one shape 2.7 cannot
//! tell apart (`try/finally` around a lone `try/except`).

use std::fmt;

use gast::{Kind, Location, Node, SchemaVersion, Value};
use quickcheck::{Arbitrary, Gen};

/// Maximum recursion depth for generation to prevent excessive tree depth.
const MAX_DEPTH: usize = 6;

/// Names the forward translators would read as constants, plus keywords.
const RESERVED: &[&str] = &[
    "True", "False", "None", "and", "or", "not", "in", "is", "if", "else", "for", "def", "lambda",
    "print", "exec", "async", "await", "Ellipsis",
];

const BIN_OPS: &[Kind] = &[
    Kind::Add, Kind::Sub, Kind::Mult, Kind::Div, Kind::Mod, Kind::Pow, Kind::LShift, Kind::RShift,
    Kind::BitOr, Kind::BitXor, Kind::BitAnd, Kind::FloorDiv,
];
const UNARY_OPS: &[Kind] = &[Kind::Invert, Kind::Not, Kind::UAdd, Kind::USub];
const BOOL_OPS: &[Kind] = &[Kind::And, Kind::Or];
const CMP_OPS: &[Kind] = &[
    Kind::Eq, Kind::NotEq, Kind::Lt, Kind::LtE, Kind::Gt, Kind::GtE, Kind::Is, Kind::IsNot, Kind::In, Kind::NotIn,
];

/// An expression made of kinds shared by the 2.7, 3.3 and 3.8 schemas.
#[derive(Clone, Debug)]
pub enum PyExpr {
    Name(String),
    Int(i64),
    /// Decimal digits of an integer wider than 64 bits.
    BigInt(String),
    Float(f64),
    Str(String),
    Bool(bool),
    NoneLit,
    BinOp(Box<PyExpr>, Kind, Box<PyExpr>),
    UnaryOp(Kind, Box<PyExpr>),
    BoolOp(Kind, Vec<PyExpr>),
    Compare(Box<PyExpr>, Vec<(Kind, PyExpr)>),
    /// `func(args, *star, keywords, **splat)`.
    Call {
        func: Box<PyExpr>,
        args: Vec<PyExpr>,
        star: Option<Box<PyExpr>>,
        keywords: Vec<(String, PyExpr)>,
        splat: Option<Box<PyExpr>>,
    },
    Attribute(Box<PyExpr>, String),
    Subscript(Box<PyExpr>, Box<PyExpr>),
    Tuple(Vec<PyExpr>),
    List(Vec<PyExpr>),
    /// A `None` key is a `**mapping` entry.
    Dict(Vec<(Option<PyExpr>, PyExpr)>),
    IfExp(Box<PyExpr>, Box<PyExpr>, Box<PyExpr>),
}

/// Generates a random number in the range [min, max] inclusive.
fn gen_range(g: &mut Gen, min: u32, max: u32) -> u32 {
    min + (u32::arbitrary(g) % (max - min + 1))
}

fn pick(g: &mut Gen, choices: &[Kind]) -> Kind {
    *g.choose(choices).unwrap()
}

/// Generates an identifier that no translator reads specially.
fn gen_identifier(g: &mut Gen) -> String {
    let starters: Vec<char> = "abcdefghijklmnopqrstuvwxyz_".chars().collect();
    let continuers: Vec<char> = "abcdefghijklmnopqrstuvwxyz0123456789_".chars().collect();
    loop {
        let len = gen_range(g, 1, 8);
        let mut name = String::new();
        name.push(*g.choose(&starters).unwrap());
        for _ in 1..len {
            name.push(*g.choose(&continuers).unwrap());
        }
        if !RESERVED.contains(&name.as_str()) {
            return name;
        }
    }
}

/// At least 20 digits, so always past `i64::MAX`.
fn gen_big_int(g: &mut Gen) -> String {
    format!("{}{:019}", gen_range(g, 1, 99_999), u64::arbitrary(g) % 10_000_000_000_000_000_000)
}

fn gen_leaf(g: &mut Gen) -> PyExpr {
    const CHOICES: &[&str] = &["name", "int", "bigint", "float", "str", "bool", "none"];
    match *g.choose(CHOICES).unwrap() {
        "name" => PyExpr::Name(gen_identifier(g)),
        "int" => PyExpr::Int(i64::from(i32::arbitrary(g))),
        "bigint" => PyExpr::BigInt(gen_big_int(g)),
        "float" => PyExpr::Float(f64::from(i16::arbitrary(g)) / 4.0),
        "str" => PyExpr::Str(String::arbitrary(g)),
        "bool" => PyExpr::Bool(bool::arbitrary(g)),
        _ => PyExpr::NoneLit,
    }
}

fn gen_many(g: &mut Gen, depth: usize, min: u32, max: u32) -> Vec<PyExpr> {
    (0..gen_range(g, min, max)).map(|_| gen_expr(g, depth)).collect()
}

/// `Some` about one time in `one_in`.
fn gen_maybe(g: &mut Gen, one_in: u32, depth: usize) -> Option<PyExpr> {
    (gen_range(g, 1, one_in) == 1).then(|| gen_expr(g, depth))
}

fn gen_keywords(g: &mut Gen, depth: usize) -> Vec<(String, PyExpr)> {
    (0..gen_range(g, 0, 2)).map(|_| (gen_identifier(g), gen_expr(g, depth))).collect()
}

fn gen_expr(g: &mut Gen, depth: usize) -> PyExpr {
    if depth == 0 || gen_range(g, 0, 3) == 0 {
        return gen_leaf(g);
    }
    let d = depth - 1;
    const CHOICES: &[&str] = &[
        "binop", "unaryop", "boolop", "compare", "call", "attribute", "subscript", "tuple", "list", "dict", "ifexp",
    ];
    match *g.choose(CHOICES).unwrap() {
        "binop" => PyExpr::BinOp(Box::new(gen_expr(g, d)), pick(g, BIN_OPS), Box::new(gen_expr(g, d))),
        "unaryop" => PyExpr::UnaryOp(pick(g, UNARY_OPS), Box::new(gen_expr(g, d))),
        "boolop" => PyExpr::BoolOp(pick(g, BOOL_OPS), gen_many(g, d, 2, 3)),
        "compare" => {
            let left = gen_expr(g, d);
            let rest = (0..gen_range(g, 1, 2)).map(|_| (pick(g, CMP_OPS), gen_expr(g, d))).collect();
            PyExpr::Compare(Box::new(left), rest)
        }
        "call" => PyExpr::Call {
            func: Box::new(gen_expr(g, d)),
            args: gen_many(g, d, 0, 2),
            star: gen_maybe(g, 4, d).map(Box::new),
            keywords: gen_keywords(g, d),
            splat: gen_maybe(g, 4, d).map(Box::new),
        },
        "attribute" => PyExpr::Attribute(Box::new(gen_expr(g, d)), gen_identifier(g)),
        "subscript" => PyExpr::Subscript(Box::new(gen_expr(g, d)), Box::new(gen_expr(g, d))),
        "tuple" => PyExpr::Tuple(gen_many(g, d, 0, 3)),
        "list" => PyExpr::List(gen_many(g, d, 0, 3)),
        "dict" => PyExpr::Dict(
            (0..gen_range(g, 0, 3))
                .map(|_| {
                    let key = (gen_range(g, 1, 5) > 1).then(|| gen_expr(g, d));
                    (key, gen_expr(g, d))
                })
                .collect(),
        ),
        _ => PyExpr::IfExp(Box::new(gen_expr(g, d)), Box::new(gen_expr(g, d)), Box::new(gen_expr(g, d))),
    }
}

impl Arbitrary for PyExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_expr(g, g.size().min(MAX_DEPTH))
    }
}

fn node(kind: Kind, values: Vec<Value>) -> Node {
    Node::new(kind, values).expect("generator builds nodes with the declared arity")
}

fn load() -> Value {
    Node::empty(Kind::Load).into()
}

/// Positions handed out while building: statements start lines, expressions take
/// consecutive columns on the current line.
struct Cursor {
    line: i64,
    col: i64,
}

impl Cursor {
    fn new() -> Self {
        Cursor { line: 0, col: 0 }
    }

    fn next_line(&mut self) -> Location {
        self.line += 1;
        self.col = 0;
        Location::new(self.line, 0)
    }

    fn next_col(&mut self) -> Location {
        let at = Location::new(self.line.max(1), self.col);
        self.col += 1;
        at
    }
}

fn name_node(id: &str, ctx: Kind) -> Node {
    node(Kind::Name, vec![id.into(), Node::empty(ctx).into(), Value::None, Value::None])
}

impl PyExpr {
    /// Canonical tree; expression nodes get consecutive column offsets on line 1.
    pub fn to_node(&self) -> Node {
        self.build(&mut Cursor::new())
    }

    /// `Module([Expr(self)])`.
    pub fn to_module(&self) -> Node {
        PyModule(vec![PyStmt::Expr(self.clone())]).to_node()
    }

    /// Whether the `version` schema can spell this expression. Only 3.8 has
    /// `**mapping` entries in dict displays.
    pub fn fits(&self, version: SchemaVersion) -> bool {
        let own = match self {
            PyExpr::Dict(entries) => version == SchemaVersion::Python38 || entries.iter().all(|(k, _)| k.is_some()),
            _ => true,
        };
        own && self.children().into_iter().all(|child| child.fits(version))
    }

    fn children(&self) -> Vec<&PyExpr> {
        match self {
            PyExpr::Name(_)
            | PyExpr::Int(_)
            | PyExpr::BigInt(_)
            | PyExpr::Float(_)
            | PyExpr::Str(_)
            | PyExpr::Bool(_)
            | PyExpr::NoneLit => Vec::new(),
            PyExpr::BinOp(left, _, right) => vec![left.as_ref(), right.as_ref()],
            PyExpr::UnaryOp(_, operand) => vec![operand.as_ref()],
            PyExpr::BoolOp(_, values) | PyExpr::Tuple(values) | PyExpr::List(values) => values.iter().collect(),
            PyExpr::Compare(left, rest) => std::iter::once(left.as_ref()).chain(rest.iter().map(|(_, e)| e)).collect(),
            PyExpr::Call {
                func,
                args,
                star,
                keywords,
                splat,
            } => std::iter::once(func.as_ref())
                .chain(args)
                .chain(star.as_deref())
                .chain(keywords.iter().map(|(_, e)| e))
                .chain(splat.as_deref())
                .collect(),
            PyExpr::Attribute(value, _) => vec![value.as_ref()],
            PyExpr::Subscript(value, index) => vec![value.as_ref(), index.as_ref()],
            PyExpr::Dict(entries) => entries
                .iter()
                .flat_map(|(k, v)| k.iter().chain(std::iter::once(v)))
                .collect(),
            PyExpr::IfExp(test, body, orelse) => vec![test.as_ref(), body.as_ref(), orelse.as_ref()],
        }
    }

    fn build(&self, cur: &mut Cursor) -> Node {
        let at = cur.next_col();
        let built = match self {
            PyExpr::Name(id) => name_node(id, Kind::Load),
            PyExpr::Int(i) => return constant_at(Value::Int(*i), at),
            PyExpr::BigInt(digits) => return constant_at(Value::BigInt(digits.clone()), at),
            PyExpr::Float(f) => return constant_at(Value::Float(*f), at),
            PyExpr::Str(s) => return constant_at(Value::Str(s.clone()), at),
            PyExpr::Bool(b) => return constant_at(Value::Bool(*b), at),
            PyExpr::NoneLit => return constant_at(Value::None, at),
            PyExpr::BinOp(left, op, right) => node(
                Kind::BinOp,
                vec![left.build(cur).into(), Node::empty(*op).into(), right.build(cur).into()],
            ),
            PyExpr::UnaryOp(op, operand) => node(Kind::UnaryOp, vec![Node::empty(*op).into(), operand.build(cur).into()]),
            PyExpr::BoolOp(op, values) => node(Kind::BoolOp, vec![Node::empty(*op).into(), build_all(values, cur)]),
            PyExpr::Compare(left, rest) => {
                let left = left.build(cur);
                let ops: Vec<Node> = rest.iter().map(|(op, _)| Node::empty(*op)).collect();
                let comparators: Vec<Node> = rest.iter().map(|(_, e)| e.build(cur)).collect();
                node(Kind::Compare, vec![left.into(), ops.into(), comparators.into()])
            }
            PyExpr::Call {
                func,
                args,
                star,
                keywords,
                splat,
            } => {
                let func = func.build(cur);
                let (args, keywords) = build_arguments(args, star.as_deref(), keywords, splat.as_deref(), cur);
                node(Kind::Call, vec![func.into(), args.into(), keywords.into()])
            }
            PyExpr::Attribute(value, attr) => {
                node(Kind::Attribute, vec![value.build(cur).into(), attr.as_str().into(), load()])
            }
            PyExpr::Subscript(value, index) => {
                let value = value.build(cur);
                let index = node(Kind::Index, vec![index.build(cur).into()]);
                node(Kind::Subscript, vec![value.into(), index.into(), load()])
            }
            PyExpr::Tuple(elts) => node(Kind::Tuple, vec![build_all(elts, cur), load()]),
            PyExpr::List(elts) => node(Kind::List, vec![build_all(elts, cur), load()]),
            PyExpr::Dict(entries) => {
                let mut keys: Vec<Value> = Vec::new();
                let mut values: Vec<Node> = Vec::new();
                for (key, value) in entries {
                    keys.push(key.as_ref().map(|k| k.build(cur)).into());
                    values.push(value.build(cur));
                }
                node(Kind::Dict, vec![Value::List(keys), values.into()])
            }
            PyExpr::IfExp(test, body, orelse) => node(
                Kind::IfExp,
                vec![test.build(cur).into(), body.build(cur).into(), orelse.build(cur).into()],
            ),
        };
        built.at(at)
    }
}

fn constant_at(value: Value, at: Location) -> Node {
    node(Kind::Constant, vec![value, Value::None]).at(at)
}

fn build_all(exprs: &[PyExpr], cur: &mut Cursor) -> Value {
    Value::from(exprs.iter().map(|e| e.build(cur)).collect::<Vec<_>>())
}

fn build_opt(expr: &Option<PyExpr>, cur: &mut Cursor) -> Value {
    expr.as_ref().map(|e| e.build(cur)).into()
}

/// Positional and keyword arguments of a call or class definition. A star argument
/// comes last among the positionals and a `**` splat last among the keywords; the
/// `Starred` wrapper sits where its value does, as when lowered from `starargs`.
fn build_arguments(
    args: &[PyExpr],
    star: Option<&PyExpr>,
    keywords: &[(String, PyExpr)],
    splat: Option<&PyExpr>,
    cur: &mut Cursor,
) -> (Vec<Node>, Vec<Node>) {
    let mut positional: Vec<Node> = args.iter().map(|a| a.build(cur)).collect();
    if let Some(star) = star {
        let value = star.build(cur);
        let at = *value.location();
        positional.push(node(Kind::Starred, vec![value.into(), load()]).at(at));
    }
    let mut named: Vec<Node> = Vec::new();
    for (arg, value) in keywords {
        named.push(node(Kind::Keyword, vec![arg.as_str().into(), value.build(cur).into()]));
    }
    if let Some(splat) = splat {
        named.push(node(Kind::Keyword, vec![Value::None, splat.build(cur).into()]));
    }
    (positional, named)
}

impl fmt::Display for PyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", gast::dump(&self.to_node()))
    }
}

/// One `except` clause. A name is only bound when a type is given.
#[derive(Clone, Debug)]
pub struct PyHandler {
    pub kind: Option<PyExpr>,
    pub name: Option<String>,
    pub body: Vec<PyStmt>,
}

impl PyHandler {
    fn build(&self, cur: &mut Cursor) -> Node {
        let at = cur.next_line();
        let kind = build_opt(&self.kind, cur);
        // 3.x spells the name as an identifier on the handler, so it takes the handler's position.
        let name: Value = self.name.as_deref().map(|id| name_node(id, Kind::Store).at(at)).into();
        node(Kind::ExceptHandler, vec![kind, name, build_body(&self.body, cur)]).at(at)
    }
}

/// A statement. Compound statements hold simple ones only.
#[derive(Clone, Debug)]
pub enum PyStmt {
    Expr(PyExpr),
    Pass,
    Assign(String, PyExpr),
    /// `raise exc from cause`.
    Raise(Option<PyExpr>, Option<PyExpr>),
    /// 2.7 `print >>dest, values` with its trailing-newline flag.
    Print(Option<PyExpr>, Vec<PyExpr>, bool),
    /// Context managers with optional `as` targets.
    With(Vec<(PyExpr, Option<String>)>, Vec<PyStmt>),
    Try {
        body: Vec<PyStmt>,
        handlers: Vec<PyHandler>,
        orelse: Vec<PyStmt>,
        finalbody: Vec<PyStmt>,
    },
    ClassDef {
        name: String,
        bases: Vec<PyExpr>,
        star: Option<PyExpr>,
        keywords: Vec<(String, PyExpr)>,
        splat: Option<PyExpr>,
        body: Vec<PyStmt>,
    },
}

impl PyStmt {
    /// Whether the `version` schema can spell this statement and everything in it.
    pub fn fits(&self, version: SchemaVersion) -> bool {
        let python2 = version == SchemaVersion::Python2;
        let own = match self {
            PyStmt::Print(..) => python2,
            PyStmt::Raise(_, cause) => cause.is_none() || !python2,
            PyStmt::ClassDef {
                star, keywords, splat, ..
            } => !python2 || (star.is_none() && keywords.is_empty() && splat.is_none()),
            _ => true,
        };
        own && self.exprs().into_iter().all(|e| e.fits(version))
            && self.bodies().into_iter().all(|s| s.fits(version))
    }

    /// Context managers across every `with`, nested ones included.
    pub fn with_items(&self) -> usize {
        let own = match self {
            PyStmt::With(items, _) => items.len(),
            _ => 0,
        };
        own + self.bodies().into_iter().map(PyStmt::with_items).sum::<usize>()
    }

    /// Whether some `with` has more than one context manager.
    pub fn has_multi_item_with(&self) -> bool {
        matches!(self, PyStmt::With(items, _) if items.len() > 1)
            || self.bodies().into_iter().any(PyStmt::has_multi_item_with)
    }

    fn exprs(&self) -> Vec<&PyExpr> {
        match self {
            PyStmt::Pass => Vec::new(),
            PyStmt::Expr(e) | PyStmt::Assign(_, e) => vec![e],
            PyStmt::Raise(exc, cause) => exc.iter().chain(cause.iter()).collect(),
            PyStmt::Print(dest, values, _) => dest.iter().chain(values).collect(),
            PyStmt::With(items, _) => items.iter().map(|(e, _)| e).collect(),
            PyStmt::Try { handlers, .. } => handlers.iter().filter_map(|h| h.kind.as_ref()).collect(),
            PyStmt::ClassDef {
                bases,
                star,
                keywords,
                splat,
                ..
            } => bases
                .iter()
                .chain(star.iter())
                .chain(keywords.iter().map(|(_, e)| e))
                .chain(splat.iter())
                .collect(),
        }
    }

    fn bodies(&self) -> Vec<&PyStmt> {
        match self {
            PyStmt::With(_, body) | PyStmt::ClassDef { body, .. } => body.iter().collect(),
            PyStmt::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => body
                .iter()
                .chain(handlers.iter().flat_map(|h| h.body.iter()))
                .chain(orelse)
                .chain(finalbody)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn build(&self, cur: &mut Cursor) -> Node {
        let at = cur.next_line();
        let built = match self {
            PyStmt::Expr(e) => node(Kind::Expr, vec![e.build(cur).into()]),
            PyStmt::Pass => Node::empty(Kind::Pass),
            PyStmt::Assign(target, value) => {
                let target = name_node(target, Kind::Store).at(cur.next_col());
                node(Kind::Assign, vec![vec![target].into(), value.build(cur).into(), Value::None])
            }
            PyStmt::Raise(exc, cause) => {
                let exc = build_opt(exc, cur);
                node(Kind::Raise, vec![exc, build_opt(cause, cur)])
            }
            PyStmt::Print(dest, values, nl) => {
                let dest = build_opt(dest, cur);
                node(Kind::Print, vec![dest, build_all(values, cur), Value::Bool(*nl)])
            }
            PyStmt::With(items, body) => {
                let mut built_items: Vec<Node> = Vec::new();
                for (context, target) in items {
                    let context = context.build(cur);
                    let target: Value = match target {
                        Some(id) => name_node(id, Kind::Store).at(cur.next_col()).into(),
                        None => Value::None,
                    };
                    built_items.push(node(Kind::Withitem, vec![context.into(), target]));
                }
                node(Kind::With, vec![built_items.into(), build_body(body, cur), Value::None])
            }
            PyStmt::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                let body = build_body(body, cur);
                let handlers: Vec<Node> = handlers.iter().map(|h| h.build(cur)).collect();
                let orelse = build_body(orelse, cur);
                node(Kind::Try, vec![body, handlers.into(), orelse, build_body(finalbody, cur)])
            }
            PyStmt::ClassDef {
                name,
                bases,
                star,
                keywords,
                splat,
                body,
            } => {
                let (bases, keywords) = build_arguments(bases, star.as_ref(), keywords, splat.as_ref(), cur);
                node(
                    Kind::ClassDef,
                    vec![
                        name.as_str().into(),
                        bases.into(),
                        keywords.into(),
                        build_body(body, cur),
                        Value::List(Vec::new()),
                    ],
                )
            }
        };
        built.at(at)
    }
}

fn build_body(stmts: &[PyStmt], cur: &mut Cursor) -> Value {
    Value::from(stmts.iter().map(|s| s.build(cur)).collect::<Vec<_>>())
}

/// Expression depth inside generated statements.
const STMT_EXPR_DEPTH: usize = 2;

fn gen_simple(g: &mut Gen) -> PyStmt {
    const CHOICES: &[&str] = &["expr", "pass", "assign", "raise", "print"];
    let d = STMT_EXPR_DEPTH;
    match *g.choose(CHOICES).unwrap() {
        "expr" => PyStmt::Expr(gen_expr(g, d)),
        "pass" => PyStmt::Pass,
        "assign" => PyStmt::Assign(gen_identifier(g), gen_expr(g, d)),
        "raise" => {
            let exc = (gen_range(g, 0, 3) > 0).then(|| gen_expr(g, d));
            let cause = if exc.is_some() { gen_maybe(g, 4, d) } else { None };
            PyStmt::Raise(exc, cause)
        }
        _ => {
            let dest = gen_maybe(g, 4, d);
            PyStmt::Print(dest, gen_many(g, d, 0, 2), bool::arbitrary(g))
        }
    }
}

fn gen_body(g: &mut Gen, min: u32) -> Vec<PyStmt> {
    (0..gen_range(g, min, 2)).map(|_| gen_simple(g)).collect()
}

fn gen_stmt(g: &mut Gen) -> PyStmt {
    const CHOICES: &[&str] = &["simple", "with", "try", "class"];
    let d = STMT_EXPR_DEPTH;
    match *g.choose(CHOICES).unwrap() {
        "simple" => gen_simple(g),
        "with" => {
            let items = (0..gen_range(g, 1, 2))
                .map(|_| {
                    let context = gen_expr(g, d);
                    (context, bool::arbitrary(g).then(|| gen_identifier(g)))
                })
                .collect();
            PyStmt::With(items, gen_body(g, 1))
        }
        "try" => {
            let count = gen_range(g, 0, 2) as usize;
            let handlers: Vec<PyHandler> = (0..count)
                .map(|i| {
                    // Only the last clause may be a bare `except:`.
                    let kind = (i + 1 < count || gen_range(g, 0, 3) > 0).then(|| gen_expr(g, d));
                    let name = if kind.is_some() && bool::arbitrary(g) { Some(gen_identifier(g)) } else { None };
                    PyHandler {
                        kind,
                        name,
                        body: gen_body(g, 1),
                    }
                })
                .collect();
            let orelse = if handlers.is_empty() { Vec::new() } else { gen_body(g, 0) };
            let finalbody = gen_body(g, if handlers.is_empty() { 1 } else { 0 });
            PyStmt::Try {
                body: gen_body(g, 1),
                handlers,
                orelse,
                finalbody,
            }
        }
        _ => PyStmt::ClassDef {
            name: gen_identifier(g),
            bases: gen_many(g, d, 0, 2),
            star: gen_maybe(g, 4, d),
            keywords: if gen_range(g, 0, 3) == 0 { gen_keywords(g, d) } else { Vec::new() },
            splat: gen_maybe(g, 4, d),
            body: gen_body(g, 1),
        },
    }
}

/// A module of one to three statements.
#[derive(Clone, Debug)]
pub struct PyModule(pub Vec<PyStmt>);

impl PyModule {
    /// Canonical `Module`; each statement and handler starts a new line.
    pub fn to_node(&self) -> Node {
        let mut cur = Cursor::new();
        let body = build_body(&self.0, &mut cur);
        node(Kind::Module, vec![body, Value::List(Vec::new())])
    }

    pub fn fits(&self, version: SchemaVersion) -> bool {
        self.0.iter().all(|s| s.fits(version))
    }

    pub fn with_items(&self) -> usize {
        self.0.iter().map(PyStmt::with_items).sum()
    }

    pub fn has_multi_item_with(&self) -> bool {
        self.0.iter().any(PyStmt::has_multi_item_with)
    }
}

impl Arbitrary for PyModule {
    fn arbitrary(g: &mut Gen) -> Self {
        PyModule((0..gen_range(g, 1, 3)).map(|_| gen_stmt(g)).collect())
    }
}

impl fmt::Display for PyModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", gast::dump(&self.to_node()))
    }
}

/// A parameter list. `kwonly` and `annotated` only make sense for 3.x schemas.
#[derive(Clone, Debug)]
pub struct PyParams {
    pub args: Vec<String>,
    pub defaults: usize,
    pub vararg: Option<String>,
    pub kwonly: Vec<String>,
    pub kwarg: Option<String>,
    pub annotated: bool,
}

impl PyParams {
    /// Drops everything 2.7 cannot spell.
    pub fn for_python2(mut self) -> Self {
        self.kwonly.clear();
        self.annotated = false;
        self
    }

    fn param(&self, id: &str) -> Node {
        let annotation: Value = if self.annotated {
            node(Kind::Name, vec!["int".into(), load(), Value::None, Value::None]).into()
        } else {
            Value::None
        };
        node(Kind::Name, vec![id.into(), Node::empty(Kind::Param).into(), annotation, Value::None])
    }

    /// Canonical `arguments` node.
    pub fn to_node(&self) -> Node {
        let args: Vec<Node> = self.args.iter().map(|id| self.param(id)).collect();
        let kwonly: Vec<Node> = self.kwonly.iter().map(|id| self.param(id)).collect();
        let kw_defaults = Value::List(self.kwonly.iter().map(|_| Value::None).collect());
        let defaults: Vec<Node> = (0..self.defaults.min(self.args.len()))
            .map(|i| node(Kind::Constant, vec![Value::Int(i as i64), Value::None]))
            .collect();
        let mut arguments = Node::empty(Kind::Arguments);
        arguments.set("args", args.into()).expect("arguments.args");
        arguments.set("vararg", self.vararg.as_deref().map(|id| self.param(id)).into()).expect("arguments.vararg");
        arguments.set("kwonlyargs", kwonly.into()).expect("arguments.kwonlyargs");
        arguments.set("kw_defaults", kw_defaults).expect("arguments.kw_defaults");
        arguments.set("kwarg", self.kwarg.as_deref().map(|id| self.param(id)).into()).expect("arguments.kwarg");
        arguments.set("defaults", defaults.into()).expect("arguments.defaults");
        arguments
    }
}

impl Arbitrary for PyParams {
    fn arbitrary(g: &mut Gen) -> Self {
        let args: Vec<String> = (0..gen_range(g, 0, 3)).map(|_| gen_identifier(g)).collect();
        let defaults = gen_range(g, 0, args.len() as u32) as usize;
        PyParams {
            args,
            defaults,
            vararg: bool::arbitrary(g).then(|| gen_identifier(g)),
            kwonly: (0..gen_range(g, 0, 2)).map(|_| gen_identifier(g)).collect(),
            kwarg: bool::arbitrary(g).then(|| gen_identifier(g)),
            annotated: bool::arbitrary(g),
        }
    }
}
