//! Pure inactivity state machine.
//!
//! All timing decisions of the inactivity monitor live in this one transition
//! function, with no timers or I/O attached. The async driver in
//! `session::monitor` feeds it inputs (timer fires, ticks, user commands) and
//! executes the actions it returns. Keeping the machine pure makes the two
//! invariants that matter - logout fires at most once, and `Expired` is
//! terminal - directly testable.

use std::time::Duration;

/// Idle time before forced logout.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How long before the forced logout the warning is shown.
pub const WARNING_WINDOW: Duration = Duration::from_secs(60);

/// Countdown start value, in seconds. Matches `WARNING_WINDOW`.
pub const WARNING_SECONDS: u32 = 60;

/// Monitor phase. `remaining` is only meaningful while warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Timers running, no warning shown.
    Active,
    /// Warning visible, countdown running toward forced logout.
    Warning { remaining: u32 },
    /// Terminal. The logout side effect has been requested exactly once.
    Expired,
}

/// Events fed into the machine by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A qualifying user-activity signal (pointer, key, scroll, touch, click).
    Activity,
    /// The warning deadline (timeout minus warning window) elapsed.
    WarningDeadline,
    /// One second of the warning countdown elapsed.
    CountdownTick,
    /// The outer logout deadline (full timeout) elapsed.
    LogoutDeadline,
    /// The user explicitly chose "stay logged in" on the warning modal.
    Accept,
    /// The user explicitly chose to log out now.
    ForceLogout,
}

/// Side effects the driver must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Cancel everything and arm fresh warning + logout timers.
    RearmTimers,
    /// Start the 1-second countdown; the outer logout timer stays armed
    /// as a safety net.
    StartCountdown,
    /// Clear the credential and navigate to login. Emitted at most once
    /// over the lifetime of the machine.
    Logout,
}

#[derive(Debug)]
pub struct IdleFsm {
    phase: Phase,
}

impl IdleFsm {
    pub fn new() -> Self {
        Self {
            phase: Phase::Active,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn show_warning(&self) -> bool {
        matches!(self.phase, Phase::Warning { .. })
    }

    /// Seconds left on the warning countdown; zero outside of `Warning`.
    pub fn remaining_seconds(&self) -> u32 {
        match self.phase {
            Phase::Warning { remaining } => remaining,
            _ => 0,
        }
    }

    /// The single transition function.
    ///
    /// `Expired` is absorbing: once reached, every further input is a no-op,
    /// which is what makes the double-fire case (countdown reaching zero and
    /// the outer deadline elapsing in the same instant) produce one logout.
    pub fn apply(&mut self, input: Input) -> Option<Action> {
        let (next, action) = match (self.phase, input) {
            // Activity while active restarts the idle clock.
            (Phase::Active, Input::Activity) => (Phase::Active, Some(Action::RearmTimers)),
            // Accept outside the warning is harmless and treated as activity.
            (Phase::Active, Input::Accept) => (Phase::Active, Some(Action::RearmTimers)),
            (Phase::Active, Input::WarningDeadline) => (
                Phase::Warning {
                    remaining: WARNING_SECONDS,
                },
                Some(Action::StartCountdown),
            ),
            // Safety net: the outer deadline logs out even if the warning
            // timer never fired.
            (Phase::Active, Input::LogoutDeadline) => (Phase::Expired, Some(Action::Logout)),
            // A tick with no countdown running is stale; drop it.
            (Phase::Active, Input::CountdownTick) => (Phase::Active, None),

            // Incidental activity must not dismiss the warning; only the
            // explicit accept clears it.
            (Phase::Warning { remaining }, Input::Activity) => {
                (Phase::Warning { remaining }, None)
            }
            (Phase::Warning { .. }, Input::Accept) => (Phase::Active, Some(Action::RearmTimers)),
            (Phase::Warning { remaining }, Input::CountdownTick) => {
                if remaining <= 1 {
                    (Phase::Expired, Some(Action::Logout))
                } else {
                    (
                        Phase::Warning {
                            remaining: remaining - 1,
                        },
                        None,
                    )
                }
            }
            (Phase::Warning { .. }, Input::LogoutDeadline) => (Phase::Expired, Some(Action::Logout)),
            // Stale warning deadline while already warning; drop it.
            (Phase::Warning { remaining }, Input::WarningDeadline) => {
                (Phase::Warning { remaining }, None)
            }

            (Phase::Active, Input::ForceLogout) | (Phase::Warning { .. }, Input::ForceLogout) => {
                (Phase::Expired, Some(Action::Logout))
            }

            // Terminal: absorb everything, emit nothing.
            (Phase::Expired, _) => (Phase::Expired, None),
        };

        self.phase = next;
        action
    }
}

impl Default for IdleFsm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_active_without_warning() {
        let fsm = IdleFsm::new();
        assert_eq!(fsm.phase(), Phase::Active);
        assert!(!fsm.show_warning());
        assert_eq!(fsm.remaining_seconds(), 0);
    }

    #[test]
    fn test_activity_rearms_while_active() {
        let mut fsm = IdleFsm::new();
        assert_eq!(fsm.apply(Input::Activity), Some(Action::RearmTimers));
        assert_eq!(fsm.phase(), Phase::Active);
    }

    #[test]
    fn test_warning_deadline_starts_countdown_at_sixty() {
        let mut fsm = IdleFsm::new();
        assert_eq!(fsm.apply(Input::WarningDeadline), Some(Action::StartCountdown));
        assert!(fsm.show_warning());
        assert_eq!(fsm.remaining_seconds(), 60);
    }

    #[test]
    fn test_countdown_runs_sixty_to_zero_then_logs_out_once() {
        let mut fsm = IdleFsm::new();
        fsm.apply(Input::WarningDeadline);

        // 59 ticks count down without any action
        for expected in (1..60).rev() {
            assert_eq!(fsm.apply(Input::CountdownTick), None);
            assert_eq!(fsm.remaining_seconds(), expected);
        }

        // The 60th tick expires the session
        assert_eq!(fsm.apply(Input::CountdownTick), Some(Action::Logout));
        assert_eq!(fsm.phase(), Phase::Expired);

        // The outer deadline firing right after must not log out again
        assert_eq!(fsm.apply(Input::LogoutDeadline), None);
        assert_eq!(fsm.apply(Input::CountdownTick), None);
    }

    #[test]
    fn test_outer_deadline_expires_from_warning() {
        let mut fsm = IdleFsm::new();
        fsm.apply(Input::WarningDeadline);
        assert_eq!(fsm.apply(Input::LogoutDeadline), Some(Action::Logout));
        // Countdown reaching zero afterwards is absorbed
        assert_eq!(fsm.apply(Input::CountdownTick), None);
        assert_eq!(fsm.phase(), Phase::Expired);
    }

    #[test]
    fn test_outer_deadline_is_a_safety_net_from_active() {
        let mut fsm = IdleFsm::new();
        assert_eq!(fsm.apply(Input::LogoutDeadline), Some(Action::Logout));
        assert_eq!(fsm.phase(), Phase::Expired);
    }

    #[test]
    fn test_activity_during_warning_is_ignored() {
        let mut fsm = IdleFsm::new();
        fsm.apply(Input::WarningDeadline);
        fsm.apply(Input::CountdownTick);
        let before = fsm.remaining_seconds();

        assert_eq!(fsm.apply(Input::Activity), None);
        assert!(fsm.show_warning());
        assert_eq!(fsm.remaining_seconds(), before);
    }

    #[test]
    fn test_accept_clears_warning_and_rearms() {
        let mut fsm = IdleFsm::new();
        fsm.apply(Input::WarningDeadline);
        fsm.apply(Input::CountdownTick);

        assert_eq!(fsm.apply(Input::Accept), Some(Action::RearmTimers));
        assert_eq!(fsm.phase(), Phase::Active);
        assert!(!fsm.show_warning());
    }

    #[test]
    fn test_force_logout_expires_from_any_live_phase() {
        let mut fsm = IdleFsm::new();
        assert_eq!(fsm.apply(Input::ForceLogout), Some(Action::Logout));

        let mut fsm = IdleFsm::new();
        fsm.apply(Input::WarningDeadline);
        assert_eq!(fsm.apply(Input::ForceLogout), Some(Action::Logout));

        // And never twice
        assert_eq!(fsm.apply(Input::ForceLogout), None);
    }

    #[test]
    fn test_expired_absorbs_every_input() {
        let mut fsm = IdleFsm::new();
        fsm.apply(Input::LogoutDeadline);

        for input in [
            Input::Activity,
            Input::WarningDeadline,
            Input::CountdownTick,
            Input::LogoutDeadline,
            Input::Accept,
            Input::ForceLogout,
        ] {
            assert_eq!(fsm.apply(input), None);
            assert_eq!(fsm.phase(), Phase::Expired);
        }
    }

    #[test]
    fn test_stale_tick_while_active_is_dropped() {
        let mut fsm = IdleFsm::new();
        assert_eq!(fsm.apply(Input::CountdownTick), None);
        assert_eq!(fsm.phase(), Phase::Active);
    }
}
