//! Error types shared by the registry, translators, traversal utilities and frontends.

use thiserror::Error;

use crate::ir::node::NodeId;

/// Result type for every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, GastError>;

/// Why a canonical node has no entry in a correspondence map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapReason {
    /// Load/Store/Del/... markers never have a source counterpart.
    ContextMarker,
    /// Binding synthesised from an identifier (the except-handler `name`).
    DocumentedGap,
    /// Nothing explains the absence: the translator failed to record the node.
    Unmapped,
}

impl GapReason {
    /// Expected absences are the ones a coverage checker must tolerate.
    pub fn is_expected(self) -> bool {
        !matches!(self, GapReason::Unmapped)
    }
}

#[derive(Error, Debug)]
pub enum GastError {
    #[error("bad argument count for {kind}: got {given}, expecting 0 or {expected}")]
    Arity {
        kind: &'static str,
        given: usize,
        expected: usize,
    },

    #[error("invalid keyword argument for {kind}: {field}")]
    UnknownField { kind: &'static str, field: String },

    #[error("unknown node kind {kind} in schema {schema}")]
    UnknownKind { schema: &'static str, kind: String },

    #[error("node kind {0} defined twice")]
    DuplicateKind(&'static str),

    #[error("{kind} is not supported by the {version} schema: {reason}")]
    UnsupportedConstruct {
        version: &'static str,
        kind: String,
        reason: String,
    },

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(String),

    #[error("{kind} root is missing positional attribute {attr}")]
    MissingLocation {
        kind: &'static str,
        attr: &'static str,
    },

    #[error("no source node recorded for {kind} node {id} ({reason:?})")]
    NoCorrespondence {
        id: NodeId,
        kind: &'static str,
        reason: GapReason,
    },

    #[error("malformed tree: {0}")]
    InvalidTree(String),

    #[error("{0} is not a literal")]
    NotALiteral(&'static str),

    #[error("frontend `{program}` failed: {message}")]
    Frontend { program: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
