//! # Bridge Lifecycle
//!
//! ```text
//! Uninitialized ──initialize──▶ Running ◀──resume/pause──▶ Paused
//!                                  │                         │
//!                                  └────────close────────────┴──▶ Closed
//! ```
//!
//! `Closed` is terminal. `close` is also accepted from `Uninitialized` so a
//! bridge that never started can still be torn down.

use crate::error::{BridgeError, BridgeResult};

/// Lifecycle state of a [`Bridge`](super::Bridge).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BridgeState {
    /// Constructed, not yet initialized.
    #[default]
    Uninitialized,
    /// Registering and stepping.
    Running,
    /// Registrations kept, steps skipped.
    Paused,
    /// Torn down. Terminal.
    Closed,
}

impl BridgeState {
    /// Lower-case name used in operator reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }

    /// Whether steps and registrations are accepted.
    #[inline]
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the bridge holds live registrations (running or paused).
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// `Uninitialized -> Running`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from any other state.
    pub const fn initialize(self) -> BridgeResult<Self> {
        match self {
            Self::Uninitialized => Ok(Self::Running),
            from => Err(BridgeError::InvalidTransition {
                action: "initialize",
                from,
            }),
        }
    }

    /// `Running -> Paused`; already paused is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from `Uninitialized` or `Closed`.
    pub const fn pause(self) -> BridgeResult<Self> {
        match self {
            Self::Running | Self::Paused => Ok(Self::Paused),
            from => Err(BridgeError::InvalidTransition {
                action: "pause",
                from,
            }),
        }
    }

    /// `Paused -> Running`; already running is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from `Uninitialized` or `Closed`.
    pub const fn resume(self) -> BridgeResult<Self> {
        match self {
            Self::Running | Self::Paused => Ok(Self::Running),
            from => Err(BridgeError::InvalidTransition {
                action: "resume",
                from,
            }),
        }
    }

    /// Any state except `Closed` -> `Closed`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if already closed.
    pub const fn close(self) -> BridgeResult<Self> {
        match self {
            Self::Closed => Err(BridgeError::InvalidTransition {
                action: "close",
                from: Self::Closed,
            }),
            _ => Ok(Self::Closed),
        }
    }
}

impl std::fmt::Display for BridgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = BridgeState::default().initialize().unwrap();
        assert!(state.is_running());
        let state = state.pause().unwrap();
        assert!(!state.is_running());
        assert!(state.is_open());
        let state = state.resume().unwrap().close().unwrap();
        assert_eq!(state, BridgeState::Closed);
    }

    #[test]
    fn test_pause_resume_idempotent() {
        let running = BridgeState::Running;
        assert_eq!(running.resume().unwrap(), BridgeState::Running);
        assert_eq!(running.pause().unwrap().pause().unwrap(), BridgeState::Paused);
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(BridgeState::Running.initialize().is_err());
        assert!(BridgeState::Uninitialized.pause().is_err());
        assert!(BridgeState::Uninitialized.resume().is_err());
        assert!(BridgeState::Closed.resume().is_err());
        assert!(BridgeState::Closed.initialize().is_err());

        let err = BridgeState::Closed.close().unwrap_err();
        assert_eq!(
            err,
            BridgeError::InvalidTransition {
                action: "close",
                from: BridgeState::Closed
            }
        );
    }

    #[test]
    fn test_uninitialized_can_close() {
        assert_eq!(BridgeState::Uninitialized.close().unwrap(), BridgeState::Closed);
    }
}
