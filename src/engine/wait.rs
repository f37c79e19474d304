use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;

/// How one stage left the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStatus {
    pub exited_normally: bool,
    pub code: i32,
}

impl StageStatus {
    pub fn clean() -> Self {
        StageStatus {
            exited_normally: true,
            code: 0,
        }
    }
}

/// Synchronously collect one child's termination status.
///
/// Loops until the child reports an exit or a signal death, restarting on
/// `EINTR`. `ECHILD` means the asynchronous sweep won the race for this
/// child: the status source delivers at most once, so finding nothing left
/// is not an error and counts as a clean exit.
pub fn collect(pid: u32) -> StageStatus {
    let pid = Pid::from_raw(pid as i32);
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                return StageStatus {
                    exited_normally: true,
                    code,
                };
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                return StageStatus {
                    exited_normally: false,
                    code: 128 + sig as i32,
                };
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(_) => return StageStatus::clean(),
        }
    }
}
