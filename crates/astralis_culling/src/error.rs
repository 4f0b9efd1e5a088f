//! # Culling Error Types
//!
//! All errors that can occur in the culling engine. None of them are fatal:
//! host-facing entry points turn them into sentinels or log lines.

use astralis_shared::HostId;
use thiserror::Error;

use crate::bridge::BridgeState;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but a value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by bridge lifecycle and registration calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Lifecycle call not valid from the current state.
    #[error("cannot {action} bridge in state {from:?}")]
    InvalidTransition {
        /// Attempted action.
        action: &'static str,
        /// State the bridge was in.
        from: BridgeState,
    },

    /// Operation requires a running bridge.
    #[error("bridge is not running (state {0:?})")]
    NotRunning(BridgeState),

    /// Host link already carries a bound slot.
    #[error("{host_id} already registered at slot {slot}")]
    AlreadyRegistered {
        /// Host identifier.
        host_id: HostId,
        /// Slot the link already holds.
        slot: i32,
    },

    /// Registration snapshot says the entity is dead.
    #[error("{0} is not alive")]
    EntityNotAlive(HostId),

    /// Slot index no longer fits the host's `i32` back-reference.
    #[error("slot {0} exceeds the host back-reference range")]
    SlotSpaceExhausted(u32),

    /// Host link does not match the record stored at its slot.
    #[error("slot {slot} is bound to {bound}, link claims {claimed}")]
    LinkMismatch {
        /// Slot in question.
        slot: u32,
        /// Host bound in the record.
        bound: HostId,
        /// Host the link claims to be.
        claimed: HostId,
    },
}

/// Per-entity failures inside a step. Caught at the entity boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StepError {
    /// Host returned no snapshot for a bound entity.
    #[error("no snapshot available for {0}")]
    SnapshotUnavailable(HostId),

    /// Snapshot position contains NaN or infinity.
    #[error("non-finite position for {0}")]
    NonFinitePosition(HostId),
}

/// Errors from the operator command surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Empty command line.
    #[error("no command given; try `help`")]
    Empty,

    /// Unrecognised subcommand.
    #[error("unknown command `{0}`; try `help`")]
    UnknownCommand(String),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
