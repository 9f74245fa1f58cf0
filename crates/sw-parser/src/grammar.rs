//! The signal grammar, built by composing the engine's combinators over its
//! primitives. Each rule is a plain function and therefore a [`Matcher`];
//! rules are exercised individually by the tests below and assembled into
//! diagrams by [`crate::parse`].

use once_cell::sync::Lazy;
use regex::Regex;
use sw_core::{Node, label};

use crate::ast;
use crate::engine::{
    self, EmptyInput, MatchResult, Matched, Matcher, Mismatch, match_pattern, match_text,
};

// Compiled once at first use and shared across parses; never mutated.
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*").expect("whitespace pattern"));
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("identifier pattern"));
static ARROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"--?>").expect("arrow pattern"));
static INTERSTATEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*(\r?\n[ \t]*)+").expect("inter-statement pattern"));

/// Zero or more horizontal space/tab characters. Total: the empty prefix
/// always matches, so this returns [`Matched`] directly.
pub fn whitespace(input: &str) -> Matched<'_> {
    match match_pattern(label::WS, &WS_RE, input) {
        Ok(matched) => matched,
        // `[ \t]*` matches the empty prefix of every input.
        Err(miss) => Matched {
            node: Node::leaf(label::WS, ""),
            rest: miss.rest,
        },
    }
}

/// Optional leading whitespace, then `re` anchored at the cursor. The node
/// is the bare token leaf so composite rules stay flat; a failure rolls back
/// over the whitespace.
fn token<'a>(label: &'static str, re: &Regex, input: &'a str) -> MatchResult<'a> {
    let lead = whitespace(input);
    match match_pattern(label, re, lead.rest) {
        Ok(matched) => Ok(matched),
        Err(_) => Err(Mismatch::new(label, input)),
    }
}

/// A word of `\w` characters, leading whitespace allowed. Not consumed by
/// the signal rule, which scans participants up to a delimiter instead, but
/// part of the grammar's public vocabulary.
pub fn identifier(input: &str) -> MatchResult<'_> {
    token(label::IDENTIFIER, &ID_RE, input)
}

/// `->` or `-->`, leading whitespace allowed.
pub fn arrow(input: &str) -> MatchResult<'_> {
    token(label::ARROW, &ARROW_RE, input)
}

/// The literal `:` separating participants from the message.
pub fn colon(input: &str) -> MatchResult<'_> {
    match_text(label::COLON, ":", input)
}

/// End of input; consumes nothing.
pub fn end_of_input(input: &str) -> MatchResult<'_> {
    engine::match_end(input)
}

/// Optional leading whitespace, then everything up to (not including) the
/// delimiter. Embedded and trailing whitespace inside the capture is
/// preserved verbatim. Empty remaining input is a mismatch: a participant
/// needs at least one character.
fn participant<'a>(delimiter: &dyn Matcher, input: &'a str) -> MatchResult<'a> {
    let lead = whitespace(input);
    match engine::scan_until(label::PARTICIPANT, delimiter, EmptyInput::Reject, lead.rest) {
        Ok(matched) => Ok(matched),
        Err(_) => Err(Mismatch::new(label::PARTICIPANT, input)),
    }
}

/// The actor on the sending side: scanned up to the arrow.
pub fn left_participant(input: &str) -> MatchResult<'_> {
    participant(&arrow, input)
}

/// The actor on the receiving side: scanned up to the colon.
pub fn right_participant(input: &str) -> MatchResult<'_> {
    participant(&colon, input)
}

/// `<left> <arrow> <right>` as an ordered three-child node.
pub fn signal_participants(input: &str) -> MatchResult<'_> {
    engine::sequence(
        label::SIGNAL_PARTICIPANTS,
        &[&left_participant, &arrow, &right_participant],
        input,
    )
}

/// Message text up to but excluding the line ending (or end of input).
///
/// Unlike the participant rules this accepts empty remaining input, so an
/// empty message parses at end of input only; a line ending directly after
/// the colon is still a mismatch, because a delimiter hit at offset 0 never
/// produces a capture.
pub fn signal_body_line(input: &str) -> MatchResult<'_> {
    engine::scan_until(
        label::SIGNAL_BODY_LINE,
        &line_ending_or_end,
        EmptyInput::Accept,
        input,
    )
}

/// A full signal statement: participants, colon, message line.
pub fn signal(input: &str) -> MatchResult<'_> {
    engine::sequence(
        label::SIGNAL,
        &[&signal_participants, &colon, &signal_body_line],
        input,
    )
}

/// Statement-kind alternation. Currently the only kind is [`signal`];
/// adding a kind means adding an alternative here and a variant to
/// [`sw_core::Statement`]. The list and filter logic are generic over it.
pub fn statement(input: &str) -> MatchResult<'_> {
    engine::one_of(label::STATEMENT, &[&signal], input)
}

/// One or more line breaks, optionally surrounded by horizontal whitespace.
/// Bookkeeping: filtered out of the final statement list.
fn interstatement_ws(input: &str) -> MatchResult<'_> {
    match_pattern(label::INTERSTATEMENT_WS, &INTERSTATEMENT_RE, input)
}

/// What terminates a statement: end of input, or inter-statement whitespace.
pub fn line_ending_or_end(input: &str) -> MatchResult<'_> {
    engine::one_of(label::LINE_END, &[&end_of_input, &interstatement_ws], input)
}

/// The top-level driver: one or more `(statement, line-ending-or-end)`
/// iterations, with the bookkeeping nodes filtered from the collected
/// children. A diagram with zero statements is a mismatch.
pub fn statement_list(input: &str) -> MatchResult<'_> {
    let matched = engine::repeat1(
        label::STATEMENT_LIST,
        &[&statement, &line_ending_or_end],
        input,
    )?;
    Ok(Matched {
        node: ast::strip_statement_list(matched.node),
        rest: matched.rest,
    })
}
