use nix::fcntl::OFlag;
use nix::unistd::pipe2;

use crate::parser::Pipeline;
use crate::signals;

use super::spawn::{Binding, spawn_stage};
use super::state::ExecutionOutcome;
use super::wait;

// ── Pipeline execution ────────────────────────────────────────────────────

/// Execute a full pipeline (one or more stages connected by `|`).
///
/// Stages are spawned in input order. Each adjacent pair gets a fresh
/// close-on-exec pipe, created immediately before the stage that writes
/// into it: the write end moves into that child's stdout binding, the read
/// end is carried forward into the next child's stdin binding. The parent's
/// copy of every descriptor closes as soon as it has been handed over, so a
/// downstream read always observes end-of-stream once its writer exits.
/// The first stage reads the inherited stdin and the last writes the
/// inherited stdout; with a single stage that degenerates to one child on
/// both inherited streams.
///
/// A spawn failure aborts construction of the remaining stages, but every
/// child already spawned is still waited for before this returns. The
/// pipeline-level outcome is failure if any stage exited non-zero.
pub fn execute(pipeline: &Pipeline) -> ExecutionOutcome {
    let stages = &pipeline.stages;
    let last = stages.len() - 1;

    // Statuses of actively-awaited children belong to the synchronous waits
    // below, not to the SIGCHLD sweep; the mask lifts when the guard drops.
    let _mask = signals::defer_child_notifications();

    let mut children = Vec::with_capacity(stages.len());
    let mut outcome = ExecutionOutcome::success();
    let mut carried: Option<std::os::fd::OwnedFd> = None;

    for (i, stage) in stages.iter().enumerate() {
        let mut next_read = None;
        let stdout_binding = if i < last {
            match pipe2(OFlag::O_CLOEXEC) {
                Ok((read_end, write_end)) => {
                    next_read = Some(read_end);
                    Binding::Pipe(write_end)
                }
                Err(err) => {
                    eprintln!("mishell: cannot create pipe: {}", err);
                    outcome.mark_failed();
                    break;
                }
            }
        } else {
            Binding::Inherit
        };

        let stdin_binding = match carried.take() {
            Some(fd) => Binding::Pipe(fd),
            None => Binding::Inherit,
        };

        match spawn_stage(stage, stdin_binding, stdout_binding) {
            Ok(child) => {
                children.push(child);
                carried = next_read;
            }
            Err(err) => {
                eprintln!("mishell: {}", err);
                outcome.mark_failed();
                // next_read drops here, closing the orphaned read end; the
                // remaining stages are never spawned.
                break;
            }
        }
    }

    // On an aborted construction the carried read end still has no consumer;
    // release it before waiting or its writer could block forever.
    drop(carried);

    for child in &children {
        outcome.absorb(wait::collect(child.id()));
    }

    outcome
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{self, Stage};

    fn run(line: &str) -> ExecutionOutcome {
        execute(&parser::parse_line(line).unwrap())
    }

    #[test]
    fn test_single_command_reports_child_exit_code() {
        assert!(run("true").is_success());
        let failed = run("false");
        assert!(!failed.is_success());
        assert_eq!(failed.exit_code, 1);
    }

    #[test]
    fn test_exit_code_passes_through_verbatim() {
        // The tokenizer has no quoting, so build the sh script stage directly.
        let pipeline = Pipeline {
            stages: vec![Stage::new(vec![
                "sh".into(),
                "-c".into(),
                "exit 42".into(),
            ])],
        };
        assert_eq!(execute(&pipeline).exit_code, 42);
    }

    #[test]
    fn test_any_failing_stage_fails_the_pipeline() {
        let outcome = run("false | true");
        assert!(!outcome.is_success());
        assert_eq!(outcome.exit_code, 1);
    }

    #[test]
    fn test_bytes_survive_multiple_pipe_hops() {
        let dir = tempfile::tempdir().unwrap();
        let capture = dir.path().join("capture");
        let pipeline = Pipeline {
            stages: vec![
                Stage::new(vec!["printf".into(), "one two three".into()]),
                Stage::new(vec!["cat".into()]),
                Stage::new(vec![
                    "sh".into(),
                    "-c".into(),
                    format!("cat > {}", capture.display()),
                ]),
            ],
        };
        assert!(execute(&pipeline).is_success());
        assert_eq!(std::fs::read_to_string(&capture).unwrap(), "one two three");
    }

    #[test]
    fn test_large_transfer_does_not_deadlock() {
        // Well past the kernel pipe buffer, so the writer must observe the
        // reader draining; a leaked write end would hang this test.
        let dir = tempfile::tempdir().unwrap();
        let capture = dir.path().join("capture");
        let pipeline = Pipeline {
            stages: vec![
                Stage::new(vec![
                    "sh".into(),
                    "-c".into(),
                    "yes y | head -c 1048576".into(),
                ]),
                Stage::new(vec!["cat".into()]),
                Stage::new(vec![
                    "sh".into(),
                    "-c".into(),
                    format!("wc -c > {}", capture.display()),
                ]),
            ],
        };
        assert!(execute(&pipeline).is_success());
        let counted: u64 = std::fs::read_to_string(&capture)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert_eq!(counted, 1_048_576);
    }

    #[test]
    fn test_unresolved_program_is_recovered() {
        let outcome = run("definitely-not-a-real-program-462");
        assert!(!outcome.is_success());
        assert_eq!(outcome.exit_code, 127);
    }

    #[test]
    fn test_failed_spawn_aborts_rest_but_collects_spawned() {
        let dir = tempfile::tempdir().unwrap();
        let witness = dir.path().join("witness");
        let pipeline = Pipeline {
            stages: vec![
                Stage::new(vec!["true".into()]),
                Stage::new(vec!["definitely-not-a-real-program-462".into()]),
                Stage::new(vec![
                    "sh".into(),
                    "-c".into(),
                    format!("touch {}", witness.display()),
                ]),
            ],
        };
        let outcome = execute(&pipeline);
        assert!(!outcome.is_success());
        // Construction stopped at the unresolvable stage.
        assert!(!witness.exists());
    }

    #[test]
    fn test_reader_sees_end_of_stream_from_silent_writer() {
        // `wc -l` behind a writer that emits nothing must see the pipe
        // close and report zero rather than hang.
        let dir = tempfile::tempdir().unwrap();
        let capture = dir.path().join("capture");
        let pipeline = Pipeline {
            stages: vec![
                Stage::new(vec!["true".into()]),
                Stage::new(vec![
                    "sh".into(),
                    "-c".into(),
                    format!("wc -l > {}", capture.display()),
                ]),
            ],
        };
        assert!(execute(&pipeline).is_success());
        assert_eq!(
            std::fs::read_to_string(&capture).unwrap().trim(),
            "0"
        );
    }

    #[cfg(target_os = "linux")]
    fn open_fd_count() -> usize {
        std::fs::read_dir("/proc/self/fd").map(|d| d.count()).unwrap_or(0)
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_no_descriptor_leak_across_executions() {
        run("true | true | true");
        let before = open_fd_count();
        for _ in 0..10 {
            run("true | true | true");
        }
        // Concurrent tests may hold pipe descriptors for the duration of
        // their own execute call, so allow a little transient noise; a real
        // leak here would be 20 descriptors and up.
        assert!(
            open_fd_count() <= before + 4,
            "descriptor count grew across executions"
        );
    }

    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        let mut count = 0;
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return 0;
        };
        for entry in entries.flatten() {
            if !entry.file_name().to_string_lossy().bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            let Ok(stat) = std::fs::read_to_string(entry.path().join("stat")) else {
                continue;
            };
            // state and ppid are the first two fields after the
            // parenthesized comm, which may itself contain spaces
            let Some(rest) = stat.rsplit(')').next() else { continue };
            let mut fields = rest.split_whitespace();
            let state = fields.next();
            let ppid = fields.next();
            if state == Some("Z") && ppid == Some(me.as_str()) {
                count += 1;
            }
        }
        count
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_sequential_commands_leave_no_zombies() {
        let before = zombie_children();
        for _ in 0..100 {
            run("true");
        }
        // Concurrent tests have their own short-lived children; unreaped
        // ones from this loop would number in the dozens.
        assert!(
            zombie_children() <= before + 2,
            "terminated children were left unreaped"
        );
    }
}
