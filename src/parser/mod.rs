mod ast;
mod combinators;

// Re-export the public surface so that `crate::parser::*` keeps working
// for all callers (main.rs, engine/).
pub use ast::{ParseError, Pipeline, Stage};

use combinators::parse_tokens;

// ── Public API ────────────────────────────────────────────────────────────

/// Parse one input line into a [`Pipeline`].
///
/// The line is split on the literal `|`, each stage is trimmed and
/// tokenized on runs of whitespace, and stage order is preserved exactly.
/// A line with no pipe yields a pipeline of length 1.
///
/// Returns [`ParseError::EmptyCommand`] for a blank line and
/// [`ParseError::MalformedPipeline`] when a stage between or after pipe
/// delimiters is empty — rejected here, before anything is spawned.
pub fn parse_line(input: &str) -> Result<Pipeline, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    let mut stages = Vec::new();
    for (position, raw) in trimmed.split('|').enumerate() {
        let argv = tokenize(raw);
        if argv.is_empty() {
            // A fully blank line was caught above, so an empty stage here
            // means adjacent or trailing delimiters.
            return Err(ParseError::MalformedPipeline { stage: position });
        }
        stages.push(Stage::new(argv));
    }

    Ok(Pipeline { stages })
}

/// Tokenize one stage string into its argument vector.
///
/// Empty tokens produced by leading/trailing/repeated whitespace never
/// survive; an all-whitespace stage yields an empty vector.
pub fn tokenize(stage: &str) -> Vec<String> {
    match parse_tokens(stage.trim()) {
        Ok((_, argv)) => argv,
        Err(_) => Vec::new(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
