//! Bookkeeping filter and typed-AST assembly.
//!
//! The raw statement-list node interleaves signal nodes with bookkeeping
//! (inter-statement whitespace, the end-of-input marker). The filter drops
//! the bookkeeping; the builder turns what survives into the typed
//! [`Diagram`].

use sw_core::{ArrowKind, Content, Diagram, Node, ParseError, Signal, Statement, label};

/// Labels that never survive into the final statement list.
const BOOKKEEPING: [&str; 2] = [label::INTERSTATEMENT_WS, label::EOF];

/// Drop bookkeeping nodes, preserving the order of everything else.
/// Idempotent: filtering a filtered list is a no-op.
#[must_use]
pub fn strip_bookkeeping(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .filter(|node| !BOOKKEEPING.contains(&node.label))
        .collect()
}

/// Apply the filter to a statement-list node's children.
pub(crate) fn strip_statement_list(node: Node) -> Node {
    match node.content {
        Content::Branch(children) => Node::branch(node.label, strip_bookkeeping(children)),
        Content::Leaf(_) => node,
    }
}

/// Assemble the typed AST from a filtered statement-list node.
pub(crate) fn build_diagram(node: &Node) -> Result<Diagram, ParseError> {
    let statements = node
        .children()
        .iter()
        .map(build_statement)
        .collect::<Result<_, _>>()?;
    Ok(Diagram { statements })
}

/// Dispatch on statement kind. New kinds get a new arm here.
fn build_statement(node: &Node) -> Result<Statement, ParseError> {
    match node.label {
        label::SIGNAL => Ok(Statement::Signal(build_signal(node)?)),
        other => Err(ParseError::MalformedNode {
            label: other.to_owned(),
        }),
    }
}

fn build_signal(node: &Node) -> Result<Signal, ParseError> {
    let malformed = || ParseError::MalformedNode {
        label: node.label.to_owned(),
    };

    let [participants, _colon, body] = node.children() else {
        return Err(malformed());
    };
    let [left, arrow, right] = participants.children() else {
        return Err(malformed());
    };

    let arrow = arrow
        .text()
        .and_then(ArrowKind::from_token)
        .ok_or_else(malformed)?;

    Ok(Signal {
        from: left.text().ok_or_else(malformed)?.to_owned(),
        arrow,
        to: right.text().ok_or_else(malformed)?.to_owned(),
        message: body.text().ok_or_else(malformed)?.to_owned(),
    })
}
