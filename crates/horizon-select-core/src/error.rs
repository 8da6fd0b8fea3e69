//! Errors raised by the core primitives.

use std::fmt;

/// Any error from this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A timer operation failed.
    Timer(TimerError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "timer: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
        }
    }
}

/// Errors from [`TimerManager`](crate::TimerManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// No pending timer has this id: it fired, was stopped, or belongs elsewhere.
    InvalidTimerId,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "no pending timer with this id"),
        }
    }
}

impl std::error::Error for TimerError {}

impl From<TimerError> for CoreError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_error_wraps_into_core_error() {
        let err: CoreError = TimerError::InvalidTimerId.into();
        assert_eq!(err.to_string(), "timer: no pending timer with this id");
        assert!(std::error::Error::source(&err).is_some());
    }
}
