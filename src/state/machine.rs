use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

/// Lifecycle phases of one trivia session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Session object exists but the countdown has not started.
    Pending,
    /// Countdown is running and guesses are accepted.
    InProgress,
    /// Session has been finalized; terminal.
    Completed,
}

/// Why a session transitioned to its terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The countdown reached zero.
    TimerExpired,
    /// Every roster player was guessed before the clock ran out.
    RosterCompleted,
    /// The player gave up before the clock ran out.
    GaveUp,
}

/// Events that can be applied to the session machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The remote session row exists and the roster is loaded; begin play.
    Start,
    /// Finalize the session for the given reason.
    Finish(FinishReason),
}

/// Error returned when attempting an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the machine was in when the event was received.
    pub from: SessionPhase,
    /// Event that cannot be applied from that phase.
    pub event: SessionEvent,
}

/// Errors that can occur when planning a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// A transition is already pending and must be applied or aborted.
    AlreadyPending,
    /// The requested transition is not valid from the current phase.
    InvalidTransition(InvalidTransition),
}

/// Errors that can occur when applying a planned transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyError {
    /// No transition is currently pending.
    NoPending,
    /// Plan id does not match the pending plan.
    IdMismatch {
        /// Expected plan id.
        expected: PlanId,
        /// Provided plan id.
        got: PlanId,
    },
    /// Phase changed since the plan was created.
    PhaseMismatch {
        /// Phase when the plan was created.
        expected: SessionPhase,
        /// Current phase.
        actual: SessionPhase,
    },
}

/// Errors that can occur when aborting a planned transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortError {
    /// No transition is currently pending.
    NoPending,
    /// Plan id does not match the pending plan.
    IdMismatch {
        /// Expected plan id.
        expected: PlanId,
        /// Provided plan id.
        got: PlanId,
    },
}

/// Unique identifier for a planned transition.
pub type PlanId = Uuid;

/// A transition that has been validated but not yet applied. The remote
/// write tied to the transition runs between `plan` and `apply`; a failed
/// write aborts the plan and leaves the phase untouched.
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    /// Unique identifier for this plan.
    pub id: PlanId,
    /// Phase the machine is currently in.
    pub from: SessionPhase,
    /// Phase the machine will move to.
    pub to: SessionPhase,
    /// Event that triggered the transition.
    pub event: SessionEvent,
    /// When the plan was created.
    pub pending_since: Instant,
}

/// State machine implementing the session lifecycle. Three phases, strictly
/// forward: a completed session never accepts another event, which is what
/// makes finalization exactly-once.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    phase: SessionPhase,
    pending: Option<Plan>,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Pending,
            pending: None,
        }
    }
}

impl SessionMachine {
    /// Create a machine in the pending phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the machine reached its terminal phase.
    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// Validate that `event` can be applied from the current phase and record
    /// the pending transition.
    pub fn plan(&mut self, event: SessionEvent) -> Result<Plan, PlanError> {
        if self.pending.is_some() {
            return Err(PlanError::AlreadyPending);
        }

        let to = self
            .compute_transition(event)
            .map_err(PlanError::InvalidTransition)?;

        let plan = Plan {
            id: Uuid::new_v4(),
            from: self.phase,
            to,
            event,
            pending_since: Instant::now(),
        };

        self.pending = Some(plan);
        Ok(plan)
    }

    /// Commit a planned transition, moving the machine to the next phase.
    pub fn apply(&mut self, plan_id: PlanId) -> Result<SessionPhase, ApplyError> {
        let plan = self.pending.take().ok_or(ApplyError::NoPending)?;

        if plan.id != plan_id {
            let expected = plan.id;
            self.pending = Some(plan);
            return Err(ApplyError::IdMismatch {
                expected,
                got: plan_id,
            });
        }

        if self.phase != plan.from {
            return Err(ApplyError::PhaseMismatch {
                expected: plan.from,
                actual: self.phase,
            });
        }

        self.phase = plan.to;
        Ok(self.phase)
    }

    /// Drop a planned transition without applying it.
    pub fn abort(&mut self, plan_id: PlanId) -> Result<(), AbortError> {
        let plan = self.pending.as_ref().ok_or(AbortError::NoPending)?;

        if plan.id != plan_id {
            return Err(AbortError::IdMismatch {
                expected: plan.id,
                got: plan_id,
            });
        }

        self.pending = None;
        Ok(())
    }

    fn compute_transition(&self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        match (self.phase, event) {
            (SessionPhase::Pending, SessionEvent::Start) => Ok(SessionPhase::InProgress),
            (SessionPhase::InProgress, SessionEvent::Finish(_)) => Ok(SessionPhase::Completed),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }
}
