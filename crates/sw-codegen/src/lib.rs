#![forbid(unsafe_code)]

//! Compact-form generator: turns a parsed [`Diagram`] back into diagram
//! text, one statement per line. Pure formatting; no I/O and no error path.

use sw_core::{Diagram, Signal, Statement};

/// Escaped line-break token that keeps a multi-line message on one line.
/// The grammar itself never produces embedded breaks, but constructed
/// diagrams may carry them.
const LINE_BREAK_ESCAPE: &str = "\\n";

/// Render the whole diagram, statements joined by single line breaks.
#[must_use]
pub fn render(diagram: &Diagram) -> String {
    diagram
        .statements
        .iter()
        .map(render_statement)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_statement(statement: &Statement) -> String {
    match statement {
        Statement::Signal(signal) => render_signal(signal),
    }
}

fn render_signal(signal: &Signal) -> String {
    format!(
        "{}{}{}:{}",
        signal.from,
        signal.arrow.as_str(),
        signal.to,
        escape_message(&signal.message)
    )
}

fn escape_message(message: &str) -> String {
    message.replace('\n', LINE_BREAK_ESCAPE)
}
