use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use chrono::Local;

use crate::signals;

/// Handle `remind <seconds> <message…>`.
///
/// The reminder is a detached child that sleeps for the given duration and
/// then prints the message. It takes no part in pipe wiring; its eventual
/// termination is just one more entry for the SIGCHLD sweep to drain. The
/// sleep duration and message travel as positional shell arguments, so no
/// quoting layer is needed.
pub fn schedule(rest: &str) {
    let Some((seconds, message)) = parse(rest) else {
        eprintln!("usage: remind <seconds> <message>");
        return;
    };

    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(r#"sleep "$1"; printf '\n[reminder] %s\n' "$2""#)
        .arg("mishell-reminder")
        .arg(seconds.to_string())
        .arg(&message)
        .stdin(Stdio::null());

    let spawned = unsafe {
        command
            .pre_exec(|| {
                signals::restore_default();
                Ok(())
            })
            .spawn()
    };

    match spawned {
        Ok(_) => {
            let due = Local::now() + chrono::Duration::seconds(i64::from(seconds));
            println!("reminder set for {}", due.format("%H:%M:%S"));
        }
        Err(e) => eprintln!("mishell: cannot schedule reminder: {}", e),
    }
}

/// Split the directive tail into a sleep duration and a message. Durations
/// beyond u32 range are rejected rather than scheduled.
fn parse(rest: &str) -> Option<(u32, String)> {
    let mut words = rest.split_whitespace();
    let seconds = words.next()?.parse().ok()?;
    let message = words.collect::<Vec<_>>().join(" ");
    if message.is_empty() {
        return None;
    }
    Some((seconds, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_duration_and_message() {
        assert_eq!(
            parse("10 take a break"),
            Some((10, "take a break".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_missing_pieces() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("10"), None);
        assert_eq!(parse("soon coffee"), None);
    }
}
