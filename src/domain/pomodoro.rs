use super::error::StoreError;
use serde::{Deserialize, Serialize};

/// Durations (minutes) and the long-break cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
        }
    }
}

impl PomodoroSettings {
    pub fn validate(&self) -> Result<(), StoreError> {
        let fields = [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
            ("sessions_until_long_break", self.sessions_until_long_break),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(StoreError::InvalidSetting {
                    name,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Full length of a session in seconds
    pub fn duration_secs(&self, kind: SessionKind) -> u32 {
        let minutes = match kind {
            SessionKind::Work => self.work_minutes,
            SessionKind::ShortBreak => self.short_break_minutes,
            SessionKind::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }
}

/// Partial settings update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub work_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub sessions_until_long_break: Option<u32>,
}

/// Kind of session loaded into the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::ShortBreak => "Short break",
            SessionKind::LongBreak => "Long break",
        }
    }
}

/// Observable timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroState {
    Work,
    ShortBreak,
    LongBreak,
    Paused,
}

/// Emitted when a session runs out or is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionComplete {
    pub finished: SessionKind,
    pub next: SessionKind,
    pub completed_sessions: u32,
}

/// Countdown state machine. Counters are transient and start at zero.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    kind: SessionKind,
    time_left: u32,
    running: bool,
    completed_sessions: u32,
}

impl PomodoroTimer {
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            kind: SessionKind::Work,
            time_left: settings.duration_secs(SessionKind::Work),
            running: false,
            completed_sessions: 0,
        }
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn state(&self) -> PomodoroState {
        if !self.running {
            return PomodoroState::Paused;
        }
        match self.kind {
            SessionKind::Work => PomodoroState::Work,
            SessionKind::ShortBreak => PomodoroState::ShortBreak,
            SessionKind::LongBreak => PomodoroState::LongBreak,
        }
    }

    pub fn current_duration(&self) -> u32 {
        self.settings.duration_secs(self.kind)
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop and reload the full duration of the current session
    pub fn reset(&mut self) {
        self.running = false;
        self.time_left = self.current_duration();
    }

    /// Stop and finish the current session immediately
    pub fn skip(&mut self) -> SessionComplete {
        self.running = false;
        self.complete_session()
    }

    /// Stop and load another kind of session
    pub fn switch_mode(&mut self, kind: SessionKind) {
        self.kind = kind;
        self.running = false;
        self.time_left = self.current_duration();
    }

    /// Advance the countdown by whole seconds. Seconds left over after the
    /// session ends are dropped, since the timer stops at the transition.
    pub fn tick(&mut self, seconds: u32) -> Option<SessionComplete> {
        if !self.running || seconds == 0 {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(seconds);
        if self.time_left == 0 {
            self.running = false;
            Some(self.complete_session())
        } else {
            None
        }
    }

    fn complete_session(&mut self) -> SessionComplete {
        let finished = self.kind;
        let next = match finished {
            SessionKind::Work => {
                self.completed_sessions += 1;
                if self.completed_sessions % self.settings.sessions_until_long_break == 0 {
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                }
            }
            SessionKind::ShortBreak | SessionKind::LongBreak => SessionKind::Work,
        };
        self.kind = next;
        self.time_left = self.current_duration();

        SessionComplete {
            finished,
            next,
            completed_sessions: self.completed_sessions,
        }
    }

    /// Merge and validate new settings. When stopped, the countdown reloads
    /// with the new duration.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), StoreError> {
        let merged = PomodoroSettings {
            work_minutes: patch.work_minutes.unwrap_or(self.settings.work_minutes),
            short_break_minutes: patch
                .short_break_minutes
                .unwrap_or(self.settings.short_break_minutes),
            long_break_minutes: patch
                .long_break_minutes
                .unwrap_or(self.settings.long_break_minutes),
            sessions_until_long_break: patch
                .sessions_until_long_break
                .unwrap_or(self.settings.sessions_until_long_break),
        };
        merged.validate()?;
        self.settings = merged;
        if !self.running {
            self.time_left = self.current_duration();
        }
        Ok(())
    }

    /// Remaining time as `MM:SS`
    pub fn formatted_time(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    /// Percent of the current session already elapsed
    pub fn progress(&self) -> f64 {
        let total = self.current_duration();
        if total == 0 {
            return 0.0;
        }
        (total - self.time_left.min(total)) as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_settings() -> PomodoroSettings {
        PomodoroSettings {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 2,
            sessions_until_long_break: 2,
        }
    }

    #[test]
    fn test_new_timer_is_paused_work() {
        let timer = PomodoroTimer::new(PomodoroSettings::default());
        assert_eq!(timer.kind(), SessionKind::Work);
        assert_eq!(timer.state(), PomodoroState::Paused);
        assert_eq!(timer.time_left(), 25 * 60);
        assert_eq!(timer.formatted_time(), "25:00");
    }

    #[test]
    fn test_tick_only_counts_while_running() {
        let mut timer = PomodoroTimer::new(quick_settings());
        assert_eq!(timer.tick(5), None);
        assert_eq!(timer.time_left(), 60);

        timer.start();
        assert_eq!(timer.state(), PomodoroState::Work);
        timer.tick(5);
        assert_eq!(timer.time_left(), 55);
        assert_eq!(timer.formatted_time(), "00:55");
    }

    #[test]
    fn test_work_completion_moves_to_short_break() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();
        let done = timer.tick(60).unwrap();

        assert_eq!(done.finished, SessionKind::Work);
        assert_eq!(done.next, SessionKind::ShortBreak);
        assert_eq!(done.completed_sessions, 1);
        assert!(!timer.is_running());
        assert_eq!(timer.time_left(), 60);
    }

    #[test]
    fn test_every_nth_work_session_gets_long_break() {
        let mut timer = PomodoroTimer::new(quick_settings());
        let mut nexts = Vec::new();
        for _ in 0..4 {
            timer.start();
            let done = timer.tick(1000).unwrap();
            nexts.push(done.next);
            // finish the break too
            timer.start();
            timer.tick(1000).unwrap();
        }
        assert_eq!(
            nexts,
            vec![
                SessionKind::ShortBreak,
                SessionKind::LongBreak,
                SessionKind::ShortBreak,
                SessionKind::LongBreak,
            ]
        );
        assert_eq!(timer.kind(), SessionKind::Work);
        assert_eq!(timer.completed_sessions(), 4);
    }

    #[test]
    fn test_break_completion_returns_to_work() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.switch_mode(SessionKind::LongBreak);
        assert_eq!(timer.time_left(), 120);
        let done = timer.skip();
        assert_eq!(done.next, SessionKind::Work);
        assert_eq!(done.completed_sessions, 0);
    }

    #[test]
    fn test_reset_reloads_duration_and_stops() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();
        timer.tick(30);
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.time_left(), 60);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_progress_percent() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();
        timer.tick(15);
        assert_eq!(timer.progress(), 25.0);
    }

    #[test]
    fn test_update_settings_reloads_when_stopped() {
        let mut timer = PomodoroTimer::new(PomodoroSettings::default());
        timer
            .update_settings(SettingsPatch { work_minutes: Some(50), ..Default::default() })
            .unwrap();
        assert_eq!(timer.time_left(), 50 * 60);
        assert_eq!(timer.settings().short_break_minutes, 5);
    }

    #[test]
    fn test_update_settings_keeps_countdown_when_running() {
        let mut timer = PomodoroTimer::new(PomodoroSettings::default());
        timer.start();
        timer.tick(10);
        timer
            .update_settings(SettingsPatch { work_minutes: Some(50), ..Default::default() })
            .unwrap();
        assert_eq!(timer.time_left(), 25 * 60 - 10);
    }

    #[test]
    fn test_update_settings_rejects_zero() {
        let mut timer = PomodoroTimer::new(PomodoroSettings::default());
        let result = timer.update_settings(SettingsPatch {
            sessions_until_long_break: Some(0),
            ..Default::default()
        });
        assert!(matches!(result, Err(StoreError::InvalidSetting { name: "sessions_until_long_break", .. })));
        assert_eq!(*timer.settings(), PomodoroSettings::default());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: PomodoroSettings = serde_json::from_str(r#"{"workMinutes": 40}"#).unwrap();
        assert_eq!(settings.work_minutes, 40);
        assert_eq!(settings.long_break_minutes, 15);
    }
}
