//! State machine trait for status enums.
//!
//! Gives lifecycle statuses a single way to declare their transition table
//! and to validate a requested move against it.

use std::fmt;
use thiserror::Error;

/// A rejected `from -> to` move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid status transition: {from} -> {to}")]
pub struct InvalidTransition<S: fmt::Display + fmt::Debug> {
    pub from: S,
    pub to: S,
}

/// Trait for status enums that represent state machines.
///
/// Implementors list their outgoing edges in `valid_transitions`; the
/// remaining methods are derived from that table.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for BookingStatus {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Pending => vec![Arrived, Cancelled],
///             Arrived => vec![Completed, Cancelled],
///             Completed | Cancelled => vec![],
///         }
///     }
/// }
///
/// let next = BookingStatus::Pending.transition_to(BookingStatus::Arrived)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug + fmt::Display {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, InvalidTransition<Self>> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
