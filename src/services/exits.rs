//! Temporary-exit state machine, layered on top of a scan session.
//!
//! A resolved tag plus the backend's per-employee status decides what the
//! scan means: a return from a pending exit, a new exit that needs a reason,
//! or a blocked registration because the daily limit is spent. While the
//! status round-trip is in flight the underlying scan session must stay
//! armed-but-held so a second badge cannot race the first.

use crate::domain::models::ExitStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Idle,
    /// An exit scan resolved; a reason must be collected before registering.
    AwaitingReason,
    /// The employee already has an open exit; this scan is the return.
    PendingReturn,
    /// The exit allowance is spent; registration is blocked.
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    RegisterReturn,
    AskReason,
    Blocked,
}

/// Limit wins over a pending return when the backend reports both; blocking
/// is the conservative reading and keeps the allowance authoritative.
pub fn decide(status: ExitStatus) -> ExitDecision {
    if status.limit_reached {
        ExitDecision::Blocked
    } else if status.pending {
        ExitDecision::RegisterReturn
    } else {
        ExitDecision::AskReason
    }
}

/// Drives one exit flow across the async gap between tag resolution and the
/// status answer.
#[derive(Debug)]
pub struct ExitFlow {
    state: ExitState,
    hold_open: bool,
}

impl ExitFlow {
    pub fn new() -> Self {
        Self {
            state: ExitState::Idle,
            hold_open: false,
        }
    }

    pub fn state(&self) -> ExitState {
        self.state
    }

    /// True from the moment a tag resolves until its outcome is settled;
    /// the kiosk must not disarm the scanner while this holds.
    pub fn hold_open(&self) -> bool {
        self.hold_open
    }

    /// A tag resolved to an employee; the status query is about to fire.
    pub fn begin(&mut self) {
        self.hold_open = true;
    }

    /// The status answer arrived; move to the state the decision implies.
    pub fn on_status(&mut self, status: ExitStatus) -> ExitDecision {
        let decision = decide(status);
        self.state = match decision {
            ExitDecision::RegisterReturn => ExitState::PendingReturn,
            ExitDecision::AskReason => ExitState::AwaitingReason,
            ExitDecision::Blocked => ExitState::LimitReached,
        };
        decision
    }

    /// Outcome settled (registered, blocked-and-notified, or abandoned):
    /// release the hold and accept the next badge.
    pub fn settle(&mut self) {
        self.state = ExitState::Idle;
        self.hold_open = false;
    }
}

impl Default for ExitFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(pending: bool, limit_reached: bool) -> ExitStatus {
        ExitStatus {
            pending,
            limit_reached,
        }
    }

    #[test]
    fn pending_scan_is_a_return() {
        // pendiente:true registers a return, no reason form.
        let mut flow = ExitFlow::new();
        flow.begin();
        assert_eq!(flow.on_status(status(true, false)), ExitDecision::RegisterReturn);
        assert_eq!(flow.state(), ExitState::PendingReturn);
        assert!(flow.hold_open());
        flow.settle();
        assert_eq!(flow.state(), ExitState::Idle);
        assert!(!flow.hold_open());
    }

    #[test]
    fn limit_reached_blocks_registration() {
        // limiteAlcanzado:true blocks and re-arms for a new tag.
        let mut flow = ExitFlow::new();
        flow.begin();
        assert_eq!(flow.on_status(status(false, true)), ExitDecision::Blocked);
        assert_eq!(flow.state(), ExitState::LimitReached);
        flow.settle();
        assert_eq!(flow.state(), ExitState::Idle);
    }

    #[test]
    fn fresh_exit_asks_for_a_reason() {
        let mut flow = ExitFlow::new();
        flow.begin();
        assert_eq!(flow.on_status(status(false, false)), ExitDecision::AskReason);
        assert_eq!(flow.state(), ExitState::AwaitingReason);
        // Scanner is held until the reason form resolves.
        assert!(flow.hold_open());
    }

    #[test]
    fn hold_is_released_only_on_settle() {
        // The kiosk re-arms its scan session off this flag; it must stay
        // set through the whole reason round-trip.
        let mut flow = ExitFlow::new();
        flow.begin();
        flow.on_status(status(false, false));
        assert!(flow.hold_open());
        flow.settle();
        assert!(!flow.hold_open());
    }

    #[test]
    fn limit_wins_when_both_flags_are_set() {
        assert_eq!(decide(status(true, true)), ExitDecision::Blocked);
    }
}
