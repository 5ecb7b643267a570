//! A frontend answering from canned trees instead of running a parser.

use gast::{Frontend, GastError, Mode, Result, SchemaVersion, SourceTree};
use tracing::debug;

use crate::fixtures;

#[derive(Debug, Clone)]
pub struct FixtureFrontend {
    version: SchemaVersion,
    trees: Vec<(String, Mode, &'static str)>,
}

impl FixtureFrontend {
    pub fn new(version: SchemaVersion) -> Self {
        FixtureFrontend {
            version,
            trees: Vec::new(),
        }
    }

    /// Answers `text` parsed in `mode` with `json`.
    pub fn with(mut self, text: &str, mode: Mode, json: &'static str) -> Self {
        self.trees.push((text.to_string(), mode, json));
        self
    }

    /// The fixtures of [`crate::fixtures`] that belong to `version`.
    pub fn standard(version: SchemaVersion) -> Self {
        let frontend = FixtureFrontend::new(version);
        match version {
            SchemaVersion::Python2 => frontend
                .with("x + 1", Mode::Eval, fixtures::X_PLUS_ONE_27)
                .with("def f(*args, **kwargs): pass", Mode::Exec, fixtures::VARARGS_27)
                .with("raise E, \"boom\", tb", Mode::Exec, fixtures::RAISE_27),
            SchemaVersion::Python33 => frontend
                .with("def f(*args, **kwargs): pass", Mode::Exec, fixtures::VARARGS_33)
                .with("try:\n    f()\nexcept E as e:\n    pass\n", Mode::Exec, fixtures::TRY_EXCEPT_AS_33),
            SchemaVersion::Python38 => frontend
                .with("x + 1", Mode::Eval, fixtures::X_PLUS_ONE_38)
                .with("def f(*args, **kwargs): pass", Mode::Exec, fixtures::VARARGS_38),
        }
    }
}

impl Frontend for FixtureFrontend {
    fn version(&self) -> SchemaVersion {
        self.version
    }

    fn parse_source(&self, text: &str, mode: Mode) -> Result<SourceTree> {
        debug!("Fixture lookup for {:?} in {} mode", text, mode);
        let (_, _, json) = self
            .trees
            .iter()
            .find(|(t, m, _)| t == text && *m == mode)
            .ok_or_else(|| GastError::Frontend {
                program: "fixture".to_string(),
                message: format!("no tree for {:?} in {} mode", text, mode),
            })?;
        SourceTree::from_json_str(json, self.version)
    }
}
