//! Connection lifecycle as an explicit state machine.
//!
//! Connecting -> Open -> Closed -> (delay) -> Connecting ...
//!
//! The error flag overlays Connecting/Open without changing the phase and
//! belongs to one attempt: a new attempt starts without it. Each connection
//! attempt carries an id; events for any attempt other than the current one
//! are ignored, and a close schedules a reconnect at most once per attempt.

use std::time::Duration;

use holodash_core::{ConnectionState, ConnectionStatus};

/// A reconnect owed to one closed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnect {
    pub attempt: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ChannelStateMachine {
    phase: ConnectionState,
    error: bool,
    attempt: u64,
    reconnect_delay: Duration,
}

impl ChannelStateMachine {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            phase: ConnectionState::Connecting,
            error: false,
            attempt: 0,
            reconnect_delay,
        }
    }

    /// Start a new attempt; events from earlier attempts no longer apply.
    pub fn begin_connect(&mut self) -> u64 {
        self.attempt += 1;
        self.phase = ConnectionState::Connecting;
        self.error = false;
        self.attempt
    }

    pub fn on_open(&mut self, attempt: u64) -> bool {
        if attempt != self.attempt || self.phase != ConnectionState::Connecting {
            return false;
        }
        self.phase = ConnectionState::Open;
        self.error = false;
        true
    }

    /// Raise the error flag. Never schedules anything; the close that
    /// follows does.
    pub fn on_error(&mut self, attempt: u64) -> bool {
        if attempt != self.attempt || self.phase == ConnectionState::Closed {
            return false;
        }
        self.error = true;
        true
    }

    pub fn on_close(&mut self, attempt: u64) -> Option<Reconnect> {
        if attempt != self.attempt || self.phase == ConnectionState::Closed {
            return None;
        }
        self.phase = ConnectionState::Closed;
        Some(Reconnect {
            attempt,
            delay: self.reconnect_delay,
        })
    }

    pub fn state(&self) -> ConnectionState {
        match self.phase {
            ConnectionState::Connecting | ConnectionState::Open if self.error => {
                ConnectionState::Error
            }
            phase => phase,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        match self.state() {
            ConnectionState::Connecting => ConnectionStatus::Connecting,
            ConnectionState::Open => ConnectionStatus::Connected,
            ConnectionState::Closed => ConnectionStatus::Disconnected,
            ConnectionState::Error => ConnectionStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ChannelStateMachine {
        ChannelStateMachine::new(Duration::from_millis(3000))
    }

    #[test]
    fn test_happy_path() {
        let mut m = machine();
        let attempt = m.begin_connect();
        assert_eq!(m.state(), ConnectionState::Connecting);
        assert!(m.on_open(attempt));
        assert_eq!(m.status(), ConnectionStatus::Connected);

        let reconnect = m.on_close(attempt).unwrap();
        assert_eq!(reconnect.delay, Duration::from_millis(3000));
        assert_eq!(m.status(), ConnectionStatus::Disconnected);

        let next = m.begin_connect();
        assert_eq!(next, attempt + 1);
        assert_eq!(m.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_error_then_close_schedules_once() {
        let mut m = machine();
        let attempt = m.begin_connect();
        m.on_open(attempt);

        assert!(m.on_error(attempt));
        assert_eq!(m.state(), ConnectionState::Error);
        assert_eq!(m.status(), ConnectionStatus::Error);

        assert!(m.on_close(attempt).is_some());
        assert!(m.on_close(attempt).is_none());
        assert!(!m.on_error(attempt));
        assert_eq!(m.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_new_attempt_starts_without_error() {
        let mut m = machine();
        let first = m.begin_connect();
        m.on_error(first);
        m.on_close(first);

        let second = m.begin_connect();
        assert_eq!(m.state(), ConnectionState::Connecting);
        assert_eq!(m.status(), ConnectionStatus::Connecting);

        assert!(m.on_error(second));
        assert_eq!(m.state(), ConnectionState::Error);
    }

    #[test]
    fn test_open_clears_error_flag() {
        let mut m = machine();
        let attempt = m.begin_connect();
        m.on_error(attempt);
        assert!(m.on_open(attempt));
        assert_eq!(m.state(), ConnectionState::Open);
    }

    #[test]
    fn test_stale_attempt_events_ignored() {
        let mut m = machine();
        let first = m.begin_connect();
        m.on_close(first);
        let second = m.begin_connect();

        assert!(!m.on_open(first));
        assert!(!m.on_error(first));
        assert!(m.on_close(first).is_none());
        assert_eq!(m.state(), ConnectionState::Connecting);
        assert!(m.on_open(second));
    }

    #[test]
    fn test_reconnect_carries_attempt_and_delay() {
        let mut m = ChannelStateMachine::new(Duration::from_millis(250));
        let attempt = m.begin_connect();
        let reconnect = m.on_close(attempt).unwrap();
        assert_eq!(
            reconnect,
            Reconnect {
                attempt,
                delay: Duration::from_millis(250),
            }
        );
    }
}
