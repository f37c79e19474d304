// ── Pipeline types ─────────────────────────────────────────────────────────

/// One program invocation within a pipeline.
///
/// `argv` is never empty and never contains empty strings; element 0 is the
/// program name, used both as the lookup key for execution and as the
/// display name in error messages.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Stage {
    pub argv: Vec<String>,
}

impl Stage {
    pub fn new(argv: Vec<String>) -> Self {
        debug_assert!(!argv.is_empty());
        Stage { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }
}

/// An ordered chain of stages connected by `|`.
///
/// Stages appear in left-to-right input order, and that order is the
/// execution and descriptor-wiring order. Length is always ≥ 1; a length-1
/// pipeline is the single-command path.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

/// Why a line could not be turned into a [`Pipeline`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// Nothing left after trimming. Not reported to the user; the read loop
    /// just prompts again.
    EmptyCommand,
    /// An empty stage produced by adjacent or trailing `|` delimiters.
    /// Carries the 0-based position of the offending stage.
    MalformedPipeline { stage: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyCommand => write!(f, "empty command"),
            ParseError::MalformedPipeline { stage } => {
                write!(f, "empty pipeline stage at position {}", stage)
            }
        }
    }
}
