//! Desktop notifications. Only macOS is implemented; elsewhere these are
//! no-ops.

#[cfg(target_os = "macos")]
use std::process::Command;

use crate::domain::{SessionComplete, SessionKind};

/// Message shown when a pomodoro session ends
pub fn session_message(done: &SessionComplete) -> String {
    match (done.finished, done.next) {
        (SessionKind::Work, SessionKind::LongBreak) => {
            format!("Session {} done. Time for a long break.", done.completed_sessions)
        }
        (SessionKind::Work, _) => {
            format!("Session {} done. Take a short break.", done.completed_sessions)
        }
        _ => "Break is over. Back to work.".to_string(),
    }
}

/// Send a notification when a pomodoro session completes
pub fn notify_session_complete(done: &SessionComplete) {
    let message = session_message(done);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Daybook - Pomodoro""#,
            message.replace('"', "\\\"")
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            log::debug!("event=notify_failed error={}", e);
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        let _ = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_message() {
        let long = SessionComplete {
            finished: SessionKind::Work,
            next: SessionKind::LongBreak,
            completed_sessions: 4,
        };
        assert_eq!(session_message(&long), "Session 4 done. Time for a long break.");

        let back = SessionComplete {
            finished: SessionKind::ShortBreak,
            next: SessionKind::Work,
            completed_sessions: 1,
        };
        assert_eq!(session_message(&back), "Break is over. Back to work.");
    }
}
