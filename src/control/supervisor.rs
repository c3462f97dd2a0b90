//! # Supervisor: runs controllers, bridges events, shuts down gracefully.
//!
//! The [`Supervisor`] owns the event bus, the live [`SubscriberSet`], and the
//! global [`Config`]. It spawns one task per intersection controller, each
//! with a child [`CancellationToken`], and fans bus events out to whoever is
//! subscribed.
//!
//! ```text
//! Controllers:                            Shutdown path:
//!   Crossing_1 ──┐                          SIGINT/SIGTERM (or explicit cancel)
//!   Crossing_2 ──┼─► Bus ─► listener ─►       └─► cancel all child tokens
//!   Crossing_3 ──┘          SubscriberSet      └─► wait up to Config::grace
//!                                              └─► GraceExceeded{stuck} if some
//!                                                  intersections never stopped
//! ```
//!
//! Controllers never exit on their own, so [`run`](Supervisor::run) returns
//! only after a termination signal (or immediately, `Ok`, when given zero
//! controllers — an explicit empty run, not an error).

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::control::controller::IntersectionController;
use crate::control::intersection::Intersection;
use crate::control::shutdown;
use crate::detect::CounterRef;
use crate::error::RuntimeError;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberId, SubscriberSet};

/// Names of intersections whose controllers are still running.
type AliveSet = Arc<Mutex<BTreeSet<String>>>;

/// Coordinates intersection controllers, event delivery, and shutdown.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
}

impl Supervisor {
    /// Creates a supervisor; the bus is sized from `cfg.bus_capacity`.
    pub fn new(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            bus,
            subs: Arc::new(SubscriberSet::new()),
        }
    }

    /// The shared event bus (clone it for feeds or extra publishers).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The live subscriber set.
    pub fn subscribers(&self) -> &Arc<SubscriberSet> {
        &self.subs
    }

    /// Adds a live subscriber. Must be called within a tokio runtime.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe>) -> SubscriberId {
        self.subs.add(sub)
    }

    /// Removes a live subscriber (clean disconnect).
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subs.remove(id)
    }

    /// Builds a controller wired to this supervisor's bus and timing.
    pub fn controller(
        &self,
        intersection: Intersection,
        counter: CounterRef,
    ) -> IntersectionController {
        IntersectionController::new(intersection, counter, self.cfg.timing, self.bus.clone())
    }

    /// Runs the controllers until an OS termination signal, then shuts down
    /// gracefully within `Config::grace`.
    pub async fn run(
        &self,
        controllers: Vec<IntersectionController>,
    ) -> Result<(), RuntimeError> {
        let token = CancellationToken::new();
        let signal_token = token.clone();
        tokio::spawn(async move {
            if shutdown::wait_for_termination().await.is_ok() {
                signal_token.cancel();
            }
        });
        self.run_with_token(controllers, token).await
    }

    /// Like [`run`](Supervisor::run), but driven by an explicit token instead
    /// of OS signals — the embedding application (and tests) cancel it.
    pub async fn run_with_token(
        &self,
        controllers: Vec<IntersectionController>,
        token: CancellationToken,
    ) -> Result<(), RuntimeError> {
        self.spawn_listener();

        let alive: AliveSet = Arc::new(Mutex::new(BTreeSet::new()));
        let mut set = JoinSet::new();
        for controller in controllers {
            let name = controller.name().to_string();
            alive
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(name.clone());
            let child = token.child_token();
            let alive = Arc::clone(&alive);
            set.spawn(async move {
                controller.run(child).await;
                alive.lock().unwrap_or_else(|e| e.into_inner()).remove(&name);
            });
        }

        tokio::select! {
            _ = token.cancelled() => self.wait_with_grace(&mut set, &alive).await,
            // Zero controllers: nothing to wait for, an explicit empty run.
            _ = async { while set.join_next().await.is_some() {} } => Ok(()),
        }
    }

    /// Forwards bus events to the subscriber set, fire-and-forget.
    fn spawn_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => subs.emit(&ev),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("subscriber listener lagged, skipped {skipped} events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Waits for every controller to stop within the grace period.
    async fn wait_with_grace(
        &self,
        set: &mut JoinSet<()>,
        alive: &AliveSet,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let drained = async { while set.join_next().await.is_some() {} };
        match tokio::time::timeout(grace, drained).await {
            Ok(()) => Ok(()),
            Err(_) => {
                let stuck: Vec<String> = alive
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .iter()
                    .cloned()
                    .collect();
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::control::intersection::Lane;
    use crate::detect::CounterFn;
    use crate::error::{DeliveryError, DetectError};
    use crate::events::SignalEvent;

    struct Recording {
        seen: AtomicU32,
        intersections: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl Subscribe for Recording {
        async fn deliver(&self, event: &SignalEvent) -> Result<(), DeliveryError> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            self.intersections
                .lock()
                .unwrap()
                .insert(event.intersection.to_string());
            Ok(())
        }
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn fixed_counter(count: u32) -> CounterRef {
        CounterFn::arc(move |_source: String| async move { Ok::<_, DetectError>(count) })
    }

    fn crossing(id: &str) -> Intersection {
        Intersection::new(
            id,
            format!("Crossing_{id}"),
            vec![
                Lane::new("lane1", format!("{id}/1")),
                Lane::new("lane2", format!("{id}/2")),
            ],
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_from_all_intersections_reach_subscriber() {
        let sup = Arc::new(Supervisor::new(Config::default()));
        let recording = Arc::new(Recording {
            seen: AtomicU32::new(0),
            intersections: Mutex::new(HashSet::new()),
        });
        sup.subscribe(recording.clone());

        let controllers = vec![
            sup.controller(crossing("1"), fixed_counter(4)),
            sup.controller(crossing("2"), fixed_counter(8)),
        ];

        let token = CancellationToken::new();
        let runner = {
            let sup = Arc::clone(&sup);
            let token = token.clone();
            tokio::spawn(async move { sup.run_with_token(controllers, token).await })
        };

        // Two full phase cycles of virtual time.
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        token.cancel();
        runner.await.unwrap().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(recording.seen.load(Ordering::SeqCst) >= 4);
        let seen = recording.intersections.lock().unwrap();
        assert!(seen.contains("1"));
        assert!(seen.contains("2"));
    }

    #[tokio::test]
    async fn test_zero_controllers_is_an_explicit_empty_run() {
        let sup = Supervisor::new(Config::default());
        let token = CancellationToken::new();
        // Returns Ok immediately: nothing to supervise is not an error.
        sup.run_with_token(Vec::new(), token).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_graceful_stop_within_grace() {
        let sup = Arc::new(Supervisor::new(Config::default()));
        let controllers = vec![sup.controller(crossing("1"), fixed_counter(2))];
        let token = CancellationToken::new();

        let runner = {
            let sup = Arc::clone(&sup);
            let token = token.clone();
            tokio::spawn(async move { sup.run_with_token(controllers, token).await })
        };

        tokio::time::sleep(std::time::Duration::from_secs(12)).await;
        token.cancel();
        runner.await.unwrap().unwrap();
    }
}
