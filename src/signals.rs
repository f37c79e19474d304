use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{
    SaFlags, SigAction, SigHandler, SigSet, Signal, SigmaskHow, sigaction, signal, sigprocmask,
};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

/// Install the interpreter's signal handlers.
///
/// SIGINT and SIGQUIT are ignored so the interpreter survives Ctrl+C and
/// Ctrl+\ aimed at a foreground child (rustyline re-arms SIGINT during
/// readline calls, which is fine). SIGCHLD gets the reaping handler; the
/// interpreter cannot run without it, so installation failure is fatal.
pub fn init() {
    unsafe {
        signal(Signal::SIGINT, SigHandler::SigIgn).expect("failed to ignore SIGINT");
        signal(Signal::SIGQUIT, SigHandler::SigIgn).expect("failed to ignore SIGQUIT");

        let reap = SigAction::new(
            SigHandler::Handler(handle_sigchld),
            SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
            SigSet::empty(),
        );
        sigaction(Signal::SIGCHLD, &reap).expect("failed to install SIGCHLD handler");
    }
}

/// Restore default signal dispositions (for child processes).
pub fn restore_default() {
    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::SigDfl);
        let _ = signal(Signal::SIGQUIT, SigHandler::SigDfl);
        let _ = signal(Signal::SIGCHLD, SigHandler::SigDfl);
    }
}

/// Asynchronous reaping sweep, run on every SIGCHLD delivery.
///
/// Deliveries coalesce, so one notification can stand for several
/// terminated children: drain everything currently reapable, without
/// blocking. A child being awaited synchronously may already be gone by the
/// time this runs; `StillAlive` and `ECHILD` both mean nothing is left to
/// collect here. Only async-signal-safe calls, and errno is preserved.
extern "C" fn handle_sigchld(_: libc::c_int) {
    let saved = Errno::last_raw();
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {}
            _ => break,
        }
    }
    Errno::set_raw(saved);
}

/// Blocks SIGCHLD for the current scope; the mask lifts on drop.
///
/// The pipeline executor holds one of these across its spawn-and-wait
/// window, so the status of every actively-awaited child is delivered to
/// the synchronous wait and to nothing else. A notification raised while
/// the mask is held arrives when the guard drops, and the sweep then finds
/// only what the wait did not claim.
pub struct ChildSignalMask;

pub fn defer_child_notifications() -> ChildSignalMask {
    let mut set = SigSet::empty();
    set.add(Signal::SIGCHLD);
    let _ = sigprocmask(SigmaskHow::SIG_BLOCK, Some(&set), None);
    ChildSignalMask
}

impl Drop for ChildSignalMask {
    fn drop(&mut self) {
        let mut set = SigSet::empty();
        set.add(Signal::SIGCHLD);
        let _ = sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&set), None);
    }
}
