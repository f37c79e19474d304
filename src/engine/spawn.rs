use std::os::fd::OwnedFd;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};

use crate::parser::Stage;
use crate::signals;

use super::error::ExecError;
use super::path::{expand_home, find_executable};

/// Where a stage's standard input or output comes from.
///
/// `Inherit` keeps the interpreter's own descriptor (first-stage stdin,
/// last-stage stdout); `Pipe` moves one end of a pipe pair into the child,
/// closing the parent's copy in the process.
pub enum Binding {
    Inherit,
    Pipe(OwnedFd),
}

impl Binding {
    fn into_stdio(self) -> Stdio {
        match self {
            Binding::Inherit => Stdio::inherit(),
            Binding::Pipe(fd) => Stdio::from(fd),
        }
    }
}

/// Spawn one pipeline stage with its standard streams bound as given.
///
/// The child branch rebinds the given descriptors onto fd 0 and fd 1
/// (`Inherit` means no rebinding), restores default signal dispositions,
/// and replaces its image with `argv[0]` resolved against PATH, the
/// argument vector passed through verbatim. The branch never resumes the
/// parent's instruction stream: on image-replacement failure it terminates
/// and the error surfaces here in the parent instead. Pipe ends the stage
/// does not use never reach it — every pipe descriptor is close-on-exec.
pub fn spawn_stage(stage: &Stage, stdin: Binding, stdout: Binding) -> Result<Child, ExecError> {
    let name = stage.program();
    let resolved = find_executable(name).unwrap_or_else(|| expand_home(name));

    let mut command = Command::new(&resolved);
    command.args(&stage.argv[1..]);
    command.stdin(stdin.into_stdio());
    command.stdout(stdout.into_stdio());

    let result = unsafe {
        command
            .pre_exec(|| {
                signals::restore_default();
                Ok(())
            })
            .spawn()
    };

    match result {
        Ok(child) => Ok(child),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExecError::UnresolvedProgram(name.to_string()))
        }
        Err(e) => Err(ExecError::SpawnFailure(name.to_string(), e)),
    }
}
