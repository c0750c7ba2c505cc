//! Errors surfaced by the guard runtime.
//!
//! Gates never return these to their call sites; they are reported through a
//! [`crate::FaultReporter`] or returned from setup-time APIs (configuration,
//! builder).
use guard_core::{Slot, SlotShape};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("slot {slot} holds a {found} object, expected {expected}")]
    ShapeMismatch {
        slot: Slot,
        expected: SlotShape,
        found: SlotShape,
    },

    #[error("guard requires a message sink before building")]
    MissingSink,

    #[error("failed to parse guard configuration")]
    Config(#[from] toml::de::Error),
}
