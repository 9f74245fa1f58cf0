#![forbid(unsafe_code)]

//! Shared data model for the seqwire signal DSL.
//!
//! Two views of a parsed diagram live here:
//!
//! - the raw parse tree ([`Node`] / [`Content`]): generic label/content
//!   records as the combinator engine produces them, bookkeeping included;
//! - the typed AST ([`Diagram`] / [`Statement`] / [`Signal`]): what the
//!   parser hands to the code generator and other consumers once the
//!   bookkeeping has been filtered out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rule labels attached to raw parse-tree nodes.
///
/// The combinator layer treats labels as opaque strings; these constants are
/// the grammar's vocabulary, shared between the parser and the filter pass.
pub mod label {
    pub const WS: &str = "ws";
    pub const IDENTIFIER: &str = "identifier";
    pub const ARROW: &str = "arrow";
    pub const COLON: &str = "colon";
    pub const EOF: &str = "eof";
    pub const PARTICIPANT: &str = "participant";
    pub const SIGNAL_PARTICIPANTS: &str = "signal_participants";
    pub const SIGNAL_BODY_LINE: &str = "signal_body_line";
    pub const SIGNAL: &str = "signal";
    pub const STATEMENT: &str = "statement";
    pub const INTERSTATEMENT_WS: &str = "interstatement_ws";
    pub const LINE_END: &str = "line_end";
    pub const STATEMENT_LIST: &str = "statement_list";
}

/// Content of a raw parse-tree node: matched text for leaves, ordered
/// children for composites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Leaf(String),
    Branch(Vec<Node>),
}

/// A raw parse-tree node produced by the combinator engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub label: &'static str,
    pub content: Content,
}

impl Node {
    #[must_use]
    pub fn leaf(label: &'static str, text: impl Into<String>) -> Self {
        Self {
            label,
            content: Content::Leaf(text.into()),
        }
    }

    #[must_use]
    pub fn branch(label: &'static str, children: Vec<Node>) -> Self {
        Self {
            label,
            content: Content::Branch(children),
        }
    }

    /// Empty-content sentinel for a rule that did not match.
    #[must_use]
    pub fn empty(label: &'static str) -> Self {
        Self::leaf(label, "")
    }

    /// Leaf text, or `None` for a composite node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Leaf(text) => Some(text),
            Content::Branch(_) => None,
        }
    }

    /// Child nodes; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Leaf(_) => &[],
            Content::Branch(children) => children,
        }
    }

    /// Concatenation of every leaf span under this node, in order.
    ///
    /// For a tree built by a successful match over whitespace-free input this
    /// reproduces exactly the consumed slice of that input.
    #[must_use]
    pub fn consumed_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match &self.content {
            Content::Leaf(text) => out.push_str(text),
            Content::Branch(children) => {
                for child in children {
                    child.write_text(out);
                }
            }
        }
    }
}

/// Directional marker between two participants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArrowKind {
    /// `->`
    Solid,
    /// `-->`
    Dashed,
}

impl ArrowKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "->",
            Self::Dashed => "-->",
        }
    }

    /// Map a matched arrow token back to its kind.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "->" => Some(Self::Solid),
            "-->" => Some(Self::Dashed),
            _ => None,
        }
    }
}

/// One actor-to-actor message.
///
/// Participant text is verbatim as scanned: embedded and trailing whitespace
/// up to the arrow/colon delimiter is preserved, leading whitespace is not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signal {
    pub from: String,
    pub arrow: ArrowKind,
    pub to: String,
    pub message: String,
}

/// A single diagram statement. The grammar currently recognizes exactly one
/// kind; new kinds become new variants here plus a new alternative in the
/// statement rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Signal(Signal),
}

/// A fully parsed diagram: its statements in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagram {
    pub statements: Vec<Statement>,
}

impl Diagram {
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// The signal statements, in input order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.statements.iter().map(|statement| match statement {
            Statement::Signal(signal) => signal,
        })
    }
}

/// Why an input failed to parse as a diagram.
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The statement list did not match at the start of input.
    #[error("no {rule} matched at the start of input")]
    Unmatched { rule: String },
    /// The statement list matched but left unconsumed input behind.
    #[error("trailing input after the last statement: {preview:?}")]
    TrailingInput { preview: String },
    /// A successfully matched tree had an unexpected shape. Indicates a
    /// grammar/assembly mismatch, not bad user input.
    #[error("malformed {label} node in the parse tree")]
    MalformedNode { label: String },
}
