use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code of a log entry.
///
/// Convention carried by every log table:
///   start:       status = 0
///   in progress: 0 < status < 100 (50 is reserved for heartbeats)
///   finished:    status = 100
///   failed:      status = 400
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(pub u16);

impl Status {
    pub const START: Status = Status(0);
    pub const HEARTBEAT: Status = Status(50);
    pub const FINISHED: Status = Status(100);
    pub const FAILED: Status = Status(400);

    /// A custom in-progress code. Must lie strictly between start and finished.
    pub fn in_progress(code: u16) -> Option<Status> {
        if code > 0 && code < 100 {
            Some(Status(code))
        } else {
            None
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Status::FINISHED || self == Status::FAILED
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_rejects_boundaries() {
        assert_eq!(Status::in_progress(0), None);
        assert_eq!(Status::in_progress(100), None);
        assert_eq!(Status::in_progress(50), Some(Status::HEARTBEAT));
        assert_eq!(Status::in_progress(99), Some(Status(99)));
    }

    #[test]
    fn terminal_codes() {
        assert!(Status::FINISHED.is_terminal());
        assert!(Status::FAILED.is_terminal());
        assert!(!Status::START.is_terminal());
        assert!(!Status::HEARTBEAT.is_terminal());
    }
}
