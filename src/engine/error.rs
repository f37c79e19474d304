use std::fmt;
use std::io;

/// Failures recovered at the failing stage. None of these terminate the
/// interpreter; the read loop continues with the next line.
#[derive(Debug)]
pub enum ExecError {
    /// `argv[0]` did not resolve to an executable. Reported with the
    /// program name, not a generic message.
    UnresolvedProgram(String),
    /// Process creation itself failed; the rest of the pipeline is not
    /// built. Reported with the underlying failure description.
    SpawnFailure(String, io::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::UnresolvedProgram(name) => write!(f, "command not found: {}", name),
            ExecError::SpawnFailure(name, err) => write!(f, "error executing '{}': {}", name, err),
        }
    }
}
