//! crates/docvault_core/src/action.rs
//!
//! Explicit state for one asynchronous user action. A view renders from this
//! value alone instead of juggling loading and error flags.

use crate::ports::ApiError;
use crate::validation::ValidationError;

/// Why an action ended in failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{}", .0.message)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionState<T> {
    Idle,
    InFlight,
    Succeeded(T),
    Failed(ActionError),
}

impl<T> Default for ActionState<T> {
    fn default() -> Self {
        ActionState::Idle
    }
}

impl<T> ActionState<T> {
    /// Moves to `InFlight` and returns the guard that settles the action.
    ///
    /// Callers check `is_in_flight` first; an action already in flight is not
    /// started again. If the guard is dropped without `finish`, e.g. because
    /// the surrounding future was cancelled, the state falls back to `Idle`.
    pub fn start(&mut self) -> InFlightGuard<'_, T> {
        *self = ActionState::InFlight;
        InFlightGuard {
            state: self,
            settled: false,
        }
    }

    fn settle<E: Into<ActionError>>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(value) => ActionState::Succeeded(value),
            Err(err) => ActionState::Failed(err.into()),
        };
    }

    /// Fails without ever going in flight, e.g. on a validation error.
    pub fn reject(&mut self, err: impl Into<ActionError>) {
        *self = ActionState::Failed(err.into());
    }

    /// Clears a failure from view. Does not retry.
    pub fn dismiss(&mut self) {
        if matches!(self, ActionState::Failed(_)) {
            *self = ActionState::Idle;
        }
    }

    pub fn reset(&mut self) {
        *self = ActionState::Idle;
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, ActionState::InFlight)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ActionState::Idle)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ActionState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            ActionState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// An action between `start` and its outcome.
#[must_use = "dropping the guard resets the action to Idle"]
pub struct InFlightGuard<'a, T> {
    state: &'a mut ActionState<T>,
    settled: bool,
}

impl<T> InFlightGuard<'_, T> {
    /// Records the terminal outcome of the action.
    pub fn finish<E: Into<ActionError>>(mut self, result: Result<T, E>) {
        self.state.settle(result);
        self.settled = true;
    }
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = ActionState::Idle;
        }
    }
}
