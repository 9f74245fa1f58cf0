//! Grammar-agnostic parser-combinator engine.
//!
//! A matcher maps an input slice to a [`MatchResult`]: either a [`Matched`]
//! carrying the produced node and the unconsumed remainder, or a [`Mismatch`]
//! whose remainder is the exact input the matcher received (the rollback
//! invariant). Mismatches are ordinary values; grammar mismatches never
//! panic and never surface out-of-band.
//!
//! Grammar rules are plain functions, which the blanket [`Matcher`] impl
//! turns into composable values for the combinators below.

use regex::Regex;
use sw_core::{Node, label};
use tracing::trace;

/// A successful match: the produced node and the unconsumed remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<'a> {
    pub node: Node,
    pub rest: &'a str,
}

/// A failed match attempt.
///
/// `rest` always equals the input the failing matcher was given; callers can
/// resume from it as if the attempt never happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch<'a> {
    pub label: &'static str,
    pub rest: &'a str,
}

impl<'a> Mismatch<'a> {
    #[must_use]
    pub const fn new(label: &'static str, rest: &'a str) -> Self {
        Self { label, rest }
    }

    /// Empty-content sentinel node for the attempted rule.
    #[must_use]
    pub fn into_node(self) -> Node {
        Node::empty(self.label)
    }
}

pub type MatchResult<'a> = Result<Matched<'a>, Mismatch<'a>>;

/// Uniform matcher abstraction: anything that maps input to a [`MatchResult`].
///
/// Every `fn(&str) -> MatchResult<'_>` implements this, so grammar rules
/// compose as values and each rule stays unit-testable in isolation.
pub trait Matcher {
    fn apply<'a>(&self, input: &'a str) -> MatchResult<'a>;
}

impl<F> Matcher for F
where
    F: for<'a> Fn(&'a str) -> MatchResult<'a>,
{
    fn apply<'a>(&self, input: &'a str) -> MatchResult<'a> {
        self(input)
    }
}

/// What [`scan_until`] reports when handed empty input. The grammar assigns
/// a policy explicitly at every call site; see the participant and body-line
/// rules for the two assignments in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInput {
    /// Empty input is an empty successful capture.
    Accept,
    /// Empty input is a mismatch.
    Reject,
}

/// Trace hook at the matcher boundary. Observability only: the result passes
/// through untouched.
fn traced<'a>(rule: &'static str, input: &'a str, result: MatchResult<'a>) -> MatchResult<'a> {
    match &result {
        Ok(matched) => trace!(rule, consumed = input.len() - matched.rest.len(), "matched"),
        Err(_) => trace!(rule, input_len = input.len(), "no match"),
    }
    result
}

/// Succeeds iff `input` starts with `expected`, consuming exactly that
/// prefix.
pub fn match_text<'a>(label: &'static str, expected: &str, input: &'a str) -> MatchResult<'a> {
    let result = match input.strip_prefix(expected) {
        Some(rest) => Ok(Matched {
            node: Node::leaf(label, expected),
            rest,
        }),
        None => Err(Mismatch::new(label, input)),
    };
    traced(label, input, result)
}

/// Succeeds iff `input` is empty. Never consumes.
pub fn match_end(input: &str) -> MatchResult<'_> {
    let result = if input.is_empty() {
        Ok(Matched {
            node: Node::leaf(label::EOF, ""),
            rest: input,
        })
    } else {
        Err(Mismatch::new(label::EOF, input))
    };
    traced(label::EOF, input, result)
}

/// Succeeds iff `re` matches starting exactly at position 0 of `input`. A
/// match found at a later offset is a mismatch.
pub fn match_pattern<'a>(label: &'static str, re: &Regex, input: &'a str) -> MatchResult<'a> {
    let result = match re.find(input) {
        Some(found) if found.start() == 0 => Ok(Matched {
            node: Node::leaf(label, found.as_str()),
            rest: &input[found.end()..],
        }),
        _ => Err(Mismatch::new(label, input)),
    };
    traced(label, input, result)
}

/// Fail-fast sequencing with rollback: applies `parts` in order, threading
/// each remainder into the next. Succeeds only if every part does, producing
/// the ordered child-node list; on any failure the mismatch carries the
/// failing part's label and the original input.
pub fn sequence<'a>(label: &'static str, parts: &[&dyn Matcher], input: &'a str) -> MatchResult<'a> {
    let result = match run_parts(parts, input) {
        Ok((children, rest)) => Ok(Matched {
            node: Node::branch(label, children),
            rest,
        }),
        Err(miss) => Err(miss),
    };
    traced(label, input, result)
}

/// Ordered alternation: the first alternative to succeed wins. Earlier
/// alternatives deliberately shadow later ones on overlapping success.
pub fn one_of<'a>(
    label: &'static str,
    alternatives: &[&dyn Matcher],
    input: &'a str,
) -> MatchResult<'a> {
    for alternative in alternatives {
        if let Ok(matched) = alternative.apply(input) {
            return traced(label, input, Ok(matched));
        }
    }
    traced(label, input, Err(Mismatch::new(label, input)))
}

/// Scan forward from position 0, re-applying `delimiter` to the suffix at
/// every character boundary; the first offset where it succeeds ends the
/// scan and the prefix before it is the capture.
///
/// A delimiter success at offset 0 is always a mismatch (the capture may not
/// be empty). A delimiter that never succeeds captures the entire input.
/// Empty input is governed by the explicit `policy`.
pub fn scan_until<'a>(
    label: &'static str,
    delimiter: &dyn Matcher,
    policy: EmptyInput,
    input: &'a str,
) -> MatchResult<'a> {
    if input.is_empty() {
        let result = match policy {
            EmptyInput::Accept => Ok(Matched {
                node: Node::leaf(label, ""),
                rest: input,
            }),
            EmptyInput::Reject => Err(Mismatch::new(label, input)),
        };
        return traced(label, input, result);
    }

    for (offset, _) in input.char_indices() {
        if delimiter.apply(&input[offset..]).is_ok() {
            let result = if offset == 0 {
                Err(Mismatch::new(label, input))
            } else {
                Ok(Matched {
                    node: Node::leaf(label, &input[..offset]),
                    rest: &input[offset..],
                })
            };
            return traced(label, input, result);
        }
    }

    traced(
        label,
        input,
        Ok(Matched {
            node: Node::leaf(label, input),
            rest: &input[input.len()..],
        }),
    )
}

/// One-or-more repetition of `parts` applied as one atomic iteration.
///
/// Children of every accepted iteration are flattened into a single ordered
/// list. The loop stops at the first iteration that fails or that would
/// consume zero characters; a zero-width iteration is never accepted, which
/// guarantees termination even when every part permits an empty match.
pub fn repeat1<'a>(label: &'static str, parts: &[&dyn Matcher], input: &'a str) -> MatchResult<'a> {
    let mut collected = Vec::new();
    let mut rest = input;
    let mut accepted = 0usize;

    loop {
        let Ok((children, next)) = run_parts(parts, rest) else {
            break;
        };
        if next.len() == rest.len() {
            break;
        }
        collected.extend(children);
        rest = next;
        accepted += 1;
    }

    let result = if accepted == 0 {
        Err(Mismatch::new(label, input))
    } else {
        Ok(Matched {
            node: Node::branch(label, collected),
            rest,
        })
    };
    traced(label, input, result)
}

/// One pass over `parts`. Failure reports the failing part's label with the
/// caller's input as the remainder, so both [`sequence`] and [`repeat1`]
/// roll back for free.
fn run_parts<'a>(
    parts: &[&dyn Matcher],
    input: &'a str,
) -> Result<(Vec<Node>, &'a str), Mismatch<'a>> {
    let mut children = Vec::with_capacity(parts.len());
    let mut rest = input;
    for part in parts {
        let matched = part
            .apply(rest)
            .map_err(|miss| Mismatch::new(miss.label, input))?;
        children.push(matched.node);
        rest = matched.rest;
    }
    Ok((children, rest))
}

#[cfg(test)]
mod tests {
    use super::{EmptyInput, MatchResult, Matched, Mismatch, match_end, match_pattern, match_text};
    use super::{one_of, repeat1, scan_until, sequence};
    use regex::Regex;
    use sw_core::{Node, label};

    fn colon(input: &str) -> MatchResult<'_> {
        match_text(label::COLON, ":", input)
    }

    fn word_test(input: &str) -> MatchResult<'_> {
        match_text("test", "test", input)
    }

    /// Matches the empty prefix of anything. Exists to exercise the
    /// zero-width-iteration guard.
    fn empty_ok(input: &str) -> MatchResult<'_> {
        Ok(Matched {
            node: Node::leaf(label::WS, ""),
            rest: input,
        })
    }

    #[test]
    fn match_text_table() {
        let cases: &[(&str, Option<(&str, &str)>)] = &[
            ("", None),
            ("test", Some(("test", ""))),
            ("test1", Some(("test", "1"))),
            (" test", None),
            ("testtest", Some(("test", "test"))),
        ];
        for (input, expected) in cases {
            match expected {
                Some((text, rest)) => {
                    let matched = word_test(input).expect(input);
                    assert_eq!(matched.node, Node::leaf("test", *text));
                    assert_eq!(matched.rest, *rest);
                }
                None => {
                    let miss = word_test(input).expect_err(input);
                    assert_eq!(miss.rest, *input, "rollback for {input:?}");
                }
            }
        }
    }

    #[test]
    fn match_end_only_accepts_empty_input() {
        let matched = match_end("").expect("empty input");
        assert_eq!(matched.node, Node::leaf(label::EOF, ""));
        assert_eq!(matched.rest, "");

        let miss = match_end("x").expect_err("non-empty input");
        assert_eq!(miss.label, label::EOF);
        assert_eq!(miss.rest, "x");
    }

    #[test]
    fn match_pattern_requires_zero_offset() {
        let re = Regex::new(r"--?>").expect("arrow pattern");

        let matched = match_pattern(label::ARROW, &re, "->rest").expect("anchored match");
        assert_eq!(matched.node, Node::leaf(label::ARROW, "->"));
        assert_eq!(matched.rest, "rest");

        // A match exists at offset 1, which counts as failure.
        let miss = match_pattern(label::ARROW, &re, "a->").expect_err("offset match");
        assert_eq!(miss.rest, "a->");
    }

    #[test]
    fn sequence_threads_remainders_and_collects_children() {
        let matched = sequence("pair", &[&colon, &word_test], ":testX").expect("pair");
        assert_eq!(
            matched.node,
            Node::branch(
                "pair",
                vec![Node::leaf(label::COLON, ":"), Node::leaf("test", "test")]
            )
        );
        assert_eq!(matched.rest, "X");
    }

    #[test]
    fn sequence_rolls_back_and_reports_failing_rule() {
        let miss = sequence("pair", &[&colon, &word_test], ":nope").expect_err("second fails");
        assert_eq!(miss.label, "test");
        assert_eq!(miss.rest, ":nope", "rollback to the original input");

        let miss = sequence("pair", &[&colon, &word_test], "nope").expect_err("first fails");
        assert_eq!(miss.label, label::COLON);
        assert_eq!(miss.rest, "nope");
    }

    #[test]
    fn one_of_prefers_earlier_alternatives() {
        fn ab(input: &str) -> MatchResult<'_> {
            match_text("ab", "ab", input)
        }
        fn abc(input: &str) -> MatchResult<'_> {
            match_text("abc", "abc", input)
        }

        // Both match "abc"; the earlier alternative shadows the longer one.
        let matched = one_of("either", &[&ab, &abc], "abc").expect("first wins");
        assert_eq!(matched.node, Node::leaf("ab", "ab"));
        assert_eq!(matched.rest, "c");

        let miss = one_of("either", &[&ab, &abc], "zzz").expect_err("none match");
        assert_eq!(miss.label, "either");
        assert_eq!(miss.rest, "zzz");
    }

    #[test]
    fn scan_until_empty_input_follows_policy() {
        let matched =
            scan_until("capture", &colon, EmptyInput::Accept, "").expect("accept policy");
        assert_eq!(matched.node, Node::leaf("capture", ""));
        assert_eq!(matched.rest, "");

        let miss =
            scan_until("capture", &colon, EmptyInput::Reject, "").expect_err("reject policy");
        assert_eq!(miss.rest, "");
    }

    #[test]
    fn scan_until_rejects_delimiter_at_position_zero() {
        let miss = scan_until("capture", &colon, EmptyInput::Accept, ":x").expect_err("empty capture");
        assert_eq!(miss.rest, ":x");
    }

    #[test]
    fn scan_until_stops_before_the_delimiter() {
        let matched = scan_until("capture", &colon, EmptyInput::Reject, "ab:x").expect("capture");
        assert_eq!(matched.node, Node::leaf("capture", "ab"));
        assert_eq!(matched.rest, ":x");
    }

    #[test]
    fn scan_until_consumes_everything_without_a_delimiter() {
        let matched = scan_until("capture", &colon, EmptyInput::Reject, "abc").expect("capture");
        assert_eq!(matched.node, Node::leaf("capture", "abc"));
        assert_eq!(matched.rest, "");
    }

    #[test]
    fn scan_until_walks_char_boundaries() {
        let matched =
            scan_until("capture", &colon, EmptyInput::Reject, "héllo→x:y").expect("capture");
        assert_eq!(matched.node, Node::leaf("capture", "héllo→x"));
        assert_eq!(matched.rest, ":y");
    }

    #[test]
    fn repeat1_collects_flattened_children() {
        let miss = repeat1("colons", &[&colon], "").expect_err("zero iterations");
        assert_eq!(miss.rest, "");

        let matched = repeat1("colons", &[&colon], ":").expect("one iteration");
        assert_eq!(
            matched.node,
            Node::branch("colons", vec![Node::leaf(label::COLON, ":")])
        );
        assert_eq!(matched.rest, "");

        let matched = repeat1("colons", &[&colon], ":::x").expect("three iterations");
        assert_eq!(matched.node.children().len(), 3);
        assert_eq!(matched.rest, "x");
    }

    #[test]
    fn repeat1_stops_at_the_first_failing_iteration() {
        let matched = repeat1("pairs", &[&colon, &word_test], ":test:bad").expect("one pair");
        assert_eq!(
            matched.node,
            Node::branch(
                "pairs",
                vec![Node::leaf(label::COLON, ":"), Node::leaf("test", "test")]
            )
        );
        // The failing second iteration left the remainder where it started.
        assert_eq!(matched.rest, ":bad");
    }

    #[test]
    fn repeat1_never_accepts_a_zero_width_iteration() {
        let miss = repeat1("nothing", &[&empty_ok], "abc").expect_err("must terminate");
        assert_eq!(miss.rest, "abc");

        // A zero-width tail iteration ends the loop without being collected.
        let matched = repeat1("padded", &[&colon, &empty_ok], "::").expect("two iterations");
        assert_eq!(matched.node.children().len(), 4);
        assert_eq!(matched.rest, "");
    }

    #[test]
    fn mismatch_sentinel_node_is_empty() {
        let miss = Mismatch::new("rule", "input");
        assert_eq!(miss.into_node(), Node::empty("rule"));
    }
}
