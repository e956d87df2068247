//! Inactivity monitor: the async driver around the pure idle state machine.
//!
//! The monitor runs as a single tokio task that owns its timer handles in an
//! explicit `Timers` struct with a cancel-all operation, feeds elapsed
//! deadlines and user commands into `IdleFsm`, and executes the actions the
//! machine returns. Dropping the monitor aborts the task, which cancels every
//! pending timer - no stale timer can log out a session that already
//! navigated away.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::auth::CredentialStore;

use super::fsm::{Action, IdleFsm, Input, INACTIVITY_TIMEOUT, WARNING_WINDOW};
use super::{Navigator, LOGIN_ROUTE};

/// Resolution of the warning countdown.
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// The user-activity signals that reset the idle clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerPress,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

/// What the embedding UI sees of the monitor at any moment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub show_warning: bool,
    /// Seconds left on the warning countdown; meaningless unless
    /// `show_warning` is true.
    pub remaining_seconds: u32,
}

enum Command {
    Activity(ActivityKind),
    Accept,
    Logout,
}

/// Owned timer handles for the monitor task.
///
/// The task owns exactly the handles it creates and releases all of them
/// through `cancel_all` before arming new ones, on every transition and on
/// teardown. Deadlines are plain instants re-polled each loop iteration, so
/// a cleared `Option` is a cancelled timer.
struct Timers {
    warning_at: Option<Instant>,
    logout_at: Option<Instant>,
    countdown: Option<Interval>,
}

impl Timers {
    fn disarmed() -> Self {
        Self {
            warning_at: None,
            logout_at: None,
            countdown: None,
        }
    }

    fn cancel_all(&mut self) {
        self.warning_at = None;
        self.logout_at = None;
        self.countdown = None;
    }

    /// Arm fresh warning and logout deadlines, as on mount.
    fn rearm(&mut self) {
        self.cancel_all();
        let now = Instant::now();
        self.warning_at = Some(now + INACTIVITY_TIMEOUT - WARNING_WINDOW);
        self.logout_at = Some(now + INACTIVITY_TIMEOUT);
    }

    /// Consume the warning deadline and start the 1-second countdown.
    /// The logout deadline stays armed as a safety net.
    fn start_countdown(&mut self) {
        self.warning_at = None;
        let mut ticker = interval_at(Instant::now() + COUNTDOWN_TICK, COUNTDOWN_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.countdown = Some(ticker);
    }
}

/// Idle-timeout monitor for an authenticated admin session.
///
/// Created by `SessionGate` once authorization is confirmed; never started
/// before. The handle is cheap to query: `show_warning` and
/// `remaining_seconds` read a watch channel updated by the monitor task.
pub struct InactivityMonitor {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<MonitorSnapshot>,
    task: JoinHandle<()>,
}

impl InactivityMonitor {
    /// Spawn the monitor task with fresh timers.
    ///
    /// If no credential is stored the monitor arms nothing and ignores all
    /// commands - there is no authenticated session to time out.
    pub fn spawn(store: CredentialStore, navigator: Arc<dyn Navigator>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snap_tx, snap_rx) = watch::channel(MonitorSnapshot::default());
        let task = tokio::spawn(run(store, navigator, cmd_rx, snap_tx));
        Self {
            commands: cmd_tx,
            snapshot: snap_rx,
            task,
        }
    }

    pub fn show_warning(&self) -> bool {
        self.snapshot.borrow().show_warning
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.snapshot.borrow().remaining_seconds
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver the UI can await for warning/countdown changes.
    pub fn watch(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshot.clone()
    }

    /// Report a qualifying user-activity signal. Resets the idle clock while
    /// active; ignored while the warning is showing.
    pub fn record_activity(&self, kind: ActivityKind) {
        let _ = self.commands.send(Command::Activity(kind));
    }

    /// The "stay logged in" action on the warning modal.
    pub fn stay_logged_in(&self) {
        let _ = self.commands.send(Command::Accept);
    }

    /// Immediate logout, e.g. the logout button on the warning modal.
    pub fn log_out(&self) {
        let _ = self.commands.send(Command::Logout);
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        // Cancels all pending timers with the task
        self.task.abort();
    }
}

async fn run(
    store: CredentialStore,
    navigator: Arc<dyn Navigator>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshot_tx: watch::Sender<MonitorSnapshot>,
) {
    if !store.exists() {
        debug!("No credential stored, inactivity monitor idle");
        return;
    }

    let mut fsm = IdleFsm::new();
    let mut timers = Timers::disarmed();
    timers.rearm();
    info!(
        timeout_secs = INACTIVITY_TIMEOUT.as_secs(),
        warning_secs = WARNING_WINDOW.as_secs(),
        "Inactivity monitor armed"
    );

    loop {
        // Deadlines are copied out so the countdown branch can borrow the
        // ticker mutably.
        let warning_at = timers.warning_at;
        let logout_at = timers.logout_at;

        let input = tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(Command::Activity(kind)) => {
                    debug!(?kind, "Activity signal");
                    Input::Activity
                }
                Some(Command::Accept) => Input::Accept,
                Some(Command::Logout) => Input::ForceLogout,
                // Handle dropped: teardown. Returning drops the timer set,
                // which cancels everything; no logout fires.
                None => {
                    debug!("Monitor handle dropped, tearing down");
                    return;
                }
            },
            _ = deadline(warning_at), if warning_at.is_some() => Input::WarningDeadline,
            _ = deadline(logout_at), if logout_at.is_some() => Input::LogoutDeadline,
            _ = next_tick(&mut timers.countdown) => Input::CountdownTick,
        };

        match fsm.apply(input) {
            Some(Action::RearmTimers) => timers.rearm(),
            Some(Action::StartCountdown) => {
                info!("Idle warning shown, countdown started");
                timers.start_countdown();
            }
            Some(Action::Logout) => {
                timers.cancel_all();
                perform_logout(&store, &navigator);
                publish(&snapshot_tx, &fsm);
                return;
            }
            None => {}
        }

        publish(&snapshot_tx, &fsm);
    }
}

/// Resolve when the deadline elapses; pend forever when disarmed.
async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Next countdown tick; pends forever while no countdown is running.
async fn next_tick(countdown: &mut Option<Interval>) {
    match countdown {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn publish(tx: &watch::Sender<MonitorSnapshot>, fsm: &IdleFsm) {
    let _ = tx.send(MonitorSnapshot {
        show_warning: fsm.show_warning(),
        remaining_seconds: fsm.remaining_seconds(),
    });
}

/// The logout side effect: purge the credential and navigate to login.
///
/// If the credential is already gone some other path logged this session out
/// first; take no action rather than navigating twice.
fn perform_logout(store: &CredentialStore, navigator: &Arc<dyn Navigator>) {
    if !store.exists() {
        debug!("No credential at logout, skipping side effects");
        return;
    }
    if let Err(e) = store.clear() {
        warn!(error = %e, "Failed to clear credential on idle logout");
    }
    info!("Session expired from inactivity, redirecting to login");
    navigator.redirect(LOGIN_ROUTE);
}
