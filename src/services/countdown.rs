//! Per-session countdown tasks. One task per started session, ticking at
//! 1 Hz until the session reaches its terminal phase.

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

use crate::{
    services::session_service,
    state::{SharedSession, SharedState},
};

/// Spawn the countdown task for a freshly started session. The task exits
/// once a tick pass reports the session completed.
pub fn spawn(state: SharedState, session: SharedSession) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a Tokio interval resolves immediately; consume it
        // so the clock first moves a full second after the session starts.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if session_service::run_tick(&state, &session).await {
                break;
            }
        }

        let session_id = session.lock().await.id;
        debug!(%session_id, "countdown task finished");
    })
}
