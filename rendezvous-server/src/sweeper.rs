use std::{sync::Arc, time::Duration};

use log::debug;
use rendezvous_core::Engine;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

/// Periodically expires stale state, so memory stays bounded even when no
/// requests arrive to trigger the lazy sweeps.
pub fn spawn_sweeper(engine: Arc<Engine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let removed = engine.sweep();
            if removed > 0 {
                debug!("Background sweep removed {} entries", removed);
            }
        }
    })
}

#[cfg(test)]
mod test {
    use std::{sync::Arc, time::Duration};

    use chrono::Duration as TimeDelta;
    use rendezvous_core::{Config, Endpoint, Engine, ManualClock};

    use super::spawn_sweeper;

    #[tokio::test]
    async fn sweeps_without_requests() {
        let clock = Arc::new(ManualClock::starting_now());
        let engine = Arc::new(Engine::with_clock(Config::default(), clock.clone()));

        engine.heartbeat("alice", Endpoint::new("10.0.0.1", 4000));
        clock.advance(TimeDelta::seconds(16));

        let handle = spawn_sweeper(engine.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        // Nothing left for an explicit sweep to do
        assert_eq!(engine.sweep(), 0);
        assert!(engine.list_online().is_empty());
    }
}
