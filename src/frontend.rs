//! The external parser boundary.
//!
//! A [`Frontend`] turns source text into a source-schema tree. The crate ships
//! [`CommandFrontend`], which runs a parser program that prints the JSON tree
//! format of [`crate::ir::json`].

use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::FrontendConfig;
use crate::error::{GastError, Result};
use crate::ir::Node;
use crate::nodemap::{map_and_convert, MappedTree};
use crate::translate::{translator_for, SchemaVersion, SourceTree};

/// What the text is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A module: a sequence of statements.
    #[default]
    Exec,
    /// A single expression.
    Eval,
    /// One interactive statement.
    Single,
}

impl Mode {
    pub fn tag(self) -> &'static str {
        match self {
            Mode::Exec => "exec",
            Mode::Eval => "eval",
            Mode::Single => "single",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Mode {
    type Err = GastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "exec" => Ok(Mode::Exec),
            "eval" => Ok(Mode::Eval),
            "single" => Ok(Mode::Single),
            other => Err(GastError::Config(format!("unknown parse mode '{}'", other))),
        }
    }
}

/// Source text → source-schema tree.
pub trait Frontend {
    fn version(&self) -> SchemaVersion;

    fn parse_source(&self, text: &str, mode: Mode) -> Result<SourceTree>;
}

/// Runs an external parser program.
///
/// The program gets the configured arguments followed by the mode tag, reads the
/// text on stdin and prints one JSON tree on stdout.
#[derive(Debug, Clone)]
pub struct CommandFrontend {
    config: FrontendConfig,
}

impl CommandFrontend {
    pub fn new(config: FrontendConfig) -> Self {
        CommandFrontend { config }
    }

    pub fn from_env() -> Result<Self> {
        FrontendConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    fn failure(&self, message: impl Into<String>) -> GastError {
        GastError::Frontend {
            program: self.config.program.clone(),
            message: message.into(),
        }
    }
}

impl Frontend for CommandFrontend {
    fn version(&self) -> SchemaVersion {
        self.config.version
    }

    fn parse_source(&self, text: &str, mode: Mode) -> Result<SourceTree> {
        debug!(
            "Running frontend {} {:?} {} on {} bytes",
            self.config.program,
            self.config.args,
            mode,
            text.len()
        );
        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(mode.tag())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("cannot start: {}", e)))?;

        // stdin is fed from its own thread while stdout and stderr drain here.
        let writer = child.stdin.take().map(|mut stdin| {
            let text = text.to_owned();
            thread::spawn(move || stdin.write_all(text.as_bytes()))
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A program that fails early may close its stdin before reading it.
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(self.failure("stdin writer panicked")),
            }
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{}: {}", output.status, stderr.trim())));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| self.failure(format!("non-UTF-8 output: {}", e)))?;
        let tree = SourceTree::from_json_str(&stdout, self.config.version)?;
        info!("Parsed {} tree from schema {}", tree.root.name(), tree.version);
        Ok(tree)
    }
}

/// Parses `text` and lowers it to the canonical schema.
pub fn parse(frontend: &dyn Frontend, text: &str, mode: Mode) -> Result<Node> {
    let tree = frontend.parse_source(text, mode)?;
    translator_for(tree.version).to_canonical(&tree.root)
}

/// Like [`parse`], keeping the source tree and the correspondence map.
pub fn parse_and_map(frontend: &dyn Frontend, text: &str, mode: Mode) -> Result<MappedTree> {
    map_and_convert(frontend.parse_source(text, mode)?)
}
