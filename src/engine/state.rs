use crate::favorites::Favorites;

use super::wait::StageStatus;

/// State carried across read-loop iterations.
///
/// The favorites list is owned here and handed by reference into the point
/// where outcomes are reported; nothing else persists between dispatches.
pub struct ShellState {
    pub favorites: Favorites,
}

impl ShellState {
    pub fn new() -> Self {
        ShellState {
            favorites: Favorites::restore(),
        }
    }
}

/// The verdict surfaced after a pipeline or single command completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// False when some stage was killed by a signal rather than exiting.
    pub exited_normally: bool,
    /// 0 when every stage succeeded, otherwise the code of the first
    /// failing stage; spawn-level failures count as 127.
    pub exit_code: i32,
}

impl ExecutionOutcome {
    pub fn success() -> Self {
        ExecutionOutcome {
            exited_normally: true,
            exit_code: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exited_normally && self.exit_code == 0
    }

    /// Fold one stage's termination into the pipeline-level verdict: a
    /// single non-zero stage fails the whole pipeline, even when later
    /// stages succeed.
    pub(super) fn absorb(&mut self, status: StageStatus) {
        if !status.exited_normally {
            self.exited_normally = false;
        }
        if self.exit_code == 0 && status.code != 0 {
            self.exit_code = status.code;
        }
    }

    /// Record a stage that could not be spawned at all.
    pub(super) fn mark_failed(&mut self) {
        if self.exit_code == 0 {
            self.exit_code = 127;
        }
    }
}
