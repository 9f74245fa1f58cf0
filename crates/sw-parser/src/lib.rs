#![forbid(unsafe_code)]

//! Parser for the seqwire signal DSL.
//!
//! The DSL is line-oriented: each statement is a signal of the form
//! `alice->bob:hello`, with `->` or `-->` between two participants and a
//! message after the colon. Statements are separated by one or more line
//! breaks; blank lines in between are ignored.
//!
//! The implementation is a small backtracking parser-combinator engine
//! ([`engine`]) with the signal grammar ([`grammar`]) composed on top.
//! [`parse`] runs the full pipeline and returns the typed
//! [`Diagram`](sw_core::Diagram); [`parse_tree`] stops at the raw labeled
//! tree for tooling.

pub mod ast;
pub mod engine;
pub mod grammar;

use sw_core::{Diagram, Node, ParseError};

/// Parse a full diagram into the typed AST.
///
/// A successful statement-list match that leaves unconsumed input behind is
/// reported as [`ParseError::TrailingInput`]: the engine itself never
/// enforces full consumption, so the check lives here with the caller.
pub fn parse(input: &str) -> Result<Diagram, ParseError> {
    let (node, rest) = parse_tree(input)?;
    if !rest.is_empty() {
        return Err(ParseError::TrailingInput {
            preview: preview(rest),
        });
    }
    ast::build_diagram(&node)
}

/// Parse into the raw labeled tree (bookkeeping already filtered) plus the
/// unconsumed remainder. Callers wanting a full parse must check that the
/// remainder is empty; [`parse`] does.
pub fn parse_tree(input: &str) -> Result<(Node, &str), ParseError> {
    match grammar::statement_list(input) {
        Ok(matched) => Ok((matched.node, matched.rest)),
        Err(miss) => Err(ParseError::Unmatched {
            rule: miss.label.to_owned(),
        }),
    }
}

fn preview(rest: &str) -> String {
    const MAX_CHARS: usize = 40;
    rest.chars().take(MAX_CHARS).collect()
}
