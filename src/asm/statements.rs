//! Statement splitting and failure location
//!
//! Backends report that a source failed, not where. The locator re-encodes
//! prefixes of the source, bisecting on where the first failure starts.

use crate::backend::{CancelToken, Encoder};

/// One `;`- or newline-separated unit of source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement<'a> {
    /// 1-based line number
    pub line: usize,
    /// 1-based column of the first non-blank character
    pub column: usize,
    pub text: &'a str,
}

impl<'a> Statement<'a> {
    /// Label defined at the start of this statement, if any (`loop:`, `.L1:`, `1:`)
    pub fn label(&self) -> Option<&'a str> {
        let (name, _) = self.text.split_once(':')?;
        let name = name.trim();
        let is_symbol = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$'));
        is_symbol.then_some(name)
    }
}

/// Split source into statements, dropping comments and blank pieces
pub(crate) fn split_statements<'a>(
    source: &'a str,
    comment_markers: &[&str],
) -> Vec<Statement<'a>> {
    let mut statements = Vec::new();

    for (line_idx, line) in source.lines().enumerate() {
        let code_end = comment_markers
            .iter()
            .filter_map(|marker| line.find(marker))
            .min()
            .unwrap_or(line.len());
        let code = &line[..code_end];

        let mut piece_start = 0;
        for piece in code.split(';') {
            let leading = piece.len() - piece.trim_start().len();
            let text = piece.trim();
            if !text.is_empty() {
                let start = piece_start + leading;
                statements.push(Statement {
                    line: line_idx + 1,
                    column: line[..start].chars().count() + 1,
                    text,
                });
            }
            piece_start += piece.len() + 1;
        }
    }

    statements
}

/// Find the first statement that cannot be encoded
///
/// Returns the statement index and the encoder's message for it. Labels
/// defined after the probed prefix are appended as empty definitions so
/// forward references still resolve. With those stubs a failing prefix
/// keeps failing as it grows, so the first failure is found by bisection.
pub(crate) fn locate_failure(
    encoder: &dyn Encoder,
    statements: &[Statement<'_>],
    address: u64,
    cancel: &CancelToken,
) -> Option<(usize, String)> {
    let last = statements.len().checked_sub(1)?;
    let mut failure = match encoder.encode(&prefix_probe(statements, last), address) {
        Ok(_) => return None,
        Err(message) => (last, message),
    };

    // Invariant: prefix `failure.0` fails, every prefix ending before `low` passes
    let mut low = 0;
    while low < failure.0 {
        if cancel.is_cancelled() {
            log::debug!("Failure location cancelled");
            return None;
        }
        let mid = low + (failure.0 - low) / 2;
        match encoder.encode(&prefix_probe(statements, mid), address) {
            Ok(_) => low = mid + 1,
            Err(message) => failure = (mid, message),
        }
    }

    Some(failure)
}

/// Statements `0..=end`, followed by stubs for the labels defined after them
fn prefix_probe(statements: &[Statement<'_>], end: usize) -> String {
    let mut probe = statements[..=end]
        .iter()
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join("\n");

    for label in statements[end + 1..].iter().filter_map(Statement::label) {
        probe.push('\n');
        probe.push_str(label);
        probe.push(':');
    }
    probe
}
