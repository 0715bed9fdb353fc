//! Session runner - async event loop that drives a cleaning session
//!
//! The runner is the only writer of its session. User commands arrive on an
//! mpsc channel; countdown ticks come from a `tokio::time::Interval` polled in
//! the same `select!`, so commands and ticks are strictly serialized and at
//! most one tick is ever pending.
//!
//! The interval exists only while the session is cleaning. It is dropped right
//! after the command or tick that moved the session out of `Cleaning`, so no
//! tick is delivered to a completed or reset session.

use crate::domain::command::Command;
use crate::services::session::{CleaningSession, SessionSnapshot};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

pub struct SessionRunner {
    session: CleaningSession,
    cmd_rx: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    tick_period: Duration,
}

/// Wait for the next countdown tick, or forever when no timer is armed
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl SessionRunner {
    pub fn new(
        session: CleaningSession,
        cmd_rx: mpsc::Receiver<Command>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        tick_period: Duration,
    ) -> Self {
        Self { session, cmd_rx, snapshot_tx, tick_period }
    }

    /// Run until every command sender is dropped; returns the final session
    pub async fn run(self) -> CleaningSession {
        let SessionRunner { mut session, mut cmd_rx, snapshot_tx, tick_period } = self;
        let mut ticker: Option<Interval> = None;

        info!(
            session_id = %session.session_id(),
            tick_period_ms = %tick_period.as_millis(),
            "session_runner_started"
        );

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            session.apply(cmd);
                        }
                        None => break,
                    }
                }
                _ = next_tick(&mut ticker) => {
                    session.tick();
                }
            }

            sync_ticker(&mut ticker, &session, tick_period);
            snapshot_tx.send_replace(session.snapshot());
        }

        info!(session_id = %session.session_id(), "session_runner_stopped");
        session
    }
}

/// Arm the timer on entering `Cleaning`, drop it on leaving
fn sync_ticker(ticker: &mut Option<Interval>, session: &CleaningSession, period: Duration) {
    match (session.countdown().is_cleaning(), ticker.is_some()) {
        (true, false) => {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
            debug!(session_id = %session.session_id(), "countdown_timer_armed");
        }
        (false, true) => {
            *ticker = None;
            debug!(
                session_id = %session.session_id(),
                phase = %session.phase(),
                "countdown_timer_cancelled"
            );
        }
        _ => {}
    }
}

/// Create a command channel, a snapshot channel, and the runner
///
/// Returns the sender (for the front end), the snapshot receiver and the
/// runner (to be spawned)
pub fn create_session_runner(
    session: CleaningSession,
    tick_period: Duration,
    buffer_size: usize,
) -> (mpsc::Sender<Command>, watch::Receiver<SessionSnapshot>, SessionRunner) {
    let (cmd_tx, cmd_rx) = mpsc::channel(buffer_size);
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
    let runner = SessionRunner::new(session, cmd_rx, snapshot_tx, tick_period);
    (cmd_tx, snapshot_rx, runner)
}
