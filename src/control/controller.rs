//! # IntersectionController: the per-intersection phase state machine.
//!
//! Cycles lanes through GREEN/YELLOW with no terminal state:
//!
//! ```text
//! loop {
//!   ├─► vehicle count for lane i (lookahead cache, else live query)
//!   ├─► publish GREEN(i) event
//!   ├─► spawn prescan of lane (i+1) mod N      (overlaps the green sleep)
//!   ├─► sleep green duration (cancellable)
//!   ├─► publish YELLOW(i → i+1) event
//!   ├─► sleep yellow buffer (cancellable)
//!   └─► i = (i+1) mod N, prescan becomes the lookahead cache
//! }
//! ```
//!
//! ## Rules
//! - The prescan runs concurrently with the green sleep and never extends the
//!   phase timer; its result is consumed exactly once, by the next GREEN.
//! - A stale cache (index mismatch) or a dead prescan task falls back to a
//!   live, awaited query.
//! - A counter failure degrades to a count of `0` — the controller never
//!   stops because detection broke.
//! - Cancellation is honored at the phase sleeps; any in-flight prescan is
//!   aborted on exit.

use tokio::{select, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::control::intersection::{Intersection, Phase};
use crate::detect::CounterRef;
use crate::events::{Bus, SignalEvent};
use crate::timing::SignalTiming;

/// A lookahead count in flight for one lane index.
struct Prescan {
    lane: usize,
    handle: JoinHandle<u32>,
}

/// Drives the phase cycle of one intersection until cancelled.
///
/// Controllers share no mutable state with each other; each one owns its
/// intersection, its counter handle, and a clone of the event bus.
pub struct IntersectionController {
    intersection: Intersection,
    counter: CounterRef,
    timing: SignalTiming,
    bus: Bus,
}

impl IntersectionController {
    pub fn new(
        intersection: Intersection,
        counter: CounterRef,
        timing: SignalTiming,
        bus: Bus,
    ) -> Self {
        Self {
            intersection,
            counter,
            timing,
            bus,
        }
    }

    /// The intersection id this controller drives.
    pub fn name(&self) -> &str {
        self.intersection.id().as_ref()
    }

    /// Runs the phase cycle until the token is cancelled.
    ///
    /// Every transition publishes one [`SignalEvent`] *before* the phase
    /// sleep, so subscribers see the phase as it begins.
    pub async fn run(self, token: CancellationToken) {
        let lane_count = self.intersection.lanes().len();
        let mut idx = 0usize;
        let mut cache: Option<Prescan> = None;

        loop {
            if token.is_cancelled() {
                break;
            }

            let count = self.lane_count(&mut cache, idx).await;
            let green = Phase::green(idx, self.timing.green_duration(count));
            self.bus.publish(SignalEvent::green(
                self.intersection.id().clone(),
                self.intersection.lane(idx).name.clone(),
                count,
                self.timing.green_time(count),
            ));

            // Pre-scan the next lane while the current green runs, so its
            // duration is ready without adding detection latency later.
            let next = (idx + 1) % lane_count;
            let pending = self.spawn_prescan(next);

            if !self.sleep_phase(&green, &token).await {
                pending.handle.abort();
                break;
            }

            let yellow = Phase::yellow(idx, next, self.timing.yellow_duration());
            self.bus.publish(SignalEvent::yellow(
                self.intersection.id().clone(),
                self.intersection.lane(idx).name.clone(),
                self.intersection.lane(next).name.clone(),
                count,
                self.timing.yellow_buffer,
            ));

            if !self.sleep_phase(&yellow, &token).await {
                pending.handle.abort();
                break;
            }

            cache = Some(pending);
            idx = next;
        }

        if let Some(stale) = cache.take() {
            stale.handle.abort();
        }
    }

    /// Resolves the vehicle count for a lane: lookahead cache first, live
    /// query otherwise. The cache is consumed here, valid for one use only.
    async fn lane_count(&self, cache: &mut Option<Prescan>, idx: usize) -> u32 {
        if let Some(prescan) = cache.take() {
            if prescan.lane == idx {
                match prescan.handle.await {
                    Ok(count) => return count,
                    Err(err) => {
                        log::warn!("{}: prescan for lane {idx} lost: {err}", self.name());
                    }
                }
            } else {
                // Index mismatch: a stale cache is discarded, never reused.
                prescan.handle.abort();
            }
        }
        self.query(idx).await
    }

    /// Live count query; a counter failure degrades to `0`.
    async fn query(&self, idx: usize) -> u32 {
        let lane = self.intersection.lane(idx);
        match self.counter.count(&lane.source).await {
            Ok(count) => count,
            Err(err) => {
                log::warn!("{}: {} count failed ({err}), using 0", self.name(), lane.name);
                0
            }
        }
    }

    /// Spawns the lookahead count for a lane; runs concurrently with the
    /// caller. Failures degrade to `0` inside the task.
    fn spawn_prescan(&self, lane: usize) -> Prescan {
        let counter = CounterRef::clone(&self.counter);
        let source = self.intersection.lane(lane).source.clone();
        let id = self.intersection.id().clone();
        let handle = tokio::spawn(async move {
            match counter.count(&source).await {
                Ok(count) => count,
                Err(err) => {
                    log::warn!("{id}: prescan count failed ({err}), using 0");
                    0
                }
            }
        });
        Prescan { lane, handle }
    }

    /// Sleeps out a phase; returns `false` if cancelled mid-phase.
    async fn sleep_phase(&self, phase: &Phase, token: &CancellationToken) -> bool {
        let sleep = time::sleep(phase.duration());
        tokio::pin!(sleep);
        select! {
            _ = &mut sleep => true,
            _ = token.cancelled() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::control::intersection::Lane;
    use crate::detect::VehicleCounter;
    use crate::error::DetectError;
    use crate::events::PhaseKind;

    /// Fixed counts per source, with per-source query counters and an
    /// optional per-query delay (virtual time).
    struct FakeCounter {
        counts: HashMap<String, u32>,
        queries: AtomicU32,
        delay: Duration,
    }

    impl FakeCounter {
        fn new(counts: &[(&str, u32)], delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                counts: counts
                    .iter()
                    .map(|(s, c)| (s.to_string(), *c))
                    .collect(),
                queries: AtomicU32::new(0),
                delay,
            })
        }
    }

    #[async_trait]
    impl VehicleCounter for FakeCounter {
        async fn count(&self, source: &str) -> Result<u32, DetectError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }
            Ok(*self.counts.get(source).unwrap_or(&0))
        }
    }

    struct BrokenCounter;

    #[async_trait]
    impl VehicleCounter for BrokenCounter {
        async fn count(&self, source: &str) -> Result<u32, DetectError> {
            Err(DetectError::Failed {
                source: source.to_string(),
                reason: "camera offline".into(),
            })
        }
    }

    fn two_lane_controller(counter: CounterRef, bus: Bus) -> IntersectionController {
        let intersection = Intersection::new(
            "1",
            "Test Crossing",
            vec![Lane::new("lane1", "cam/1"), Lane::new("lane2", "cam/2")],
        )
        .unwrap();
        IntersectionController::new(intersection, counter, SignalTiming::default(), bus)
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_lanes_cycle_strictly() {
        let counter = FakeCounter::new(&[("cam/1", 4), ("cam/2", 10)], Duration::ZERO);
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();

        let handle = tokio::spawn(two_lane_controller(counter, bus).run(token.clone()));

        let mut events = Vec::new();
        for _ in 0..6 {
            events.push(rx.recv().await.unwrap());
        }
        token.cancel();
        handle.await.unwrap();

        // GREEN(l1) YELLOW(l1→l2) GREEN(l2) YELLOW(l2→l1) GREEN(l1) YELLOW…
        let kinds: Vec<PhaseKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PhaseKind::Green,
                PhaseKind::Yellow,
                PhaseKind::Green,
                PhaseKind::Yellow,
                PhaseKind::Green,
                PhaseKind::Yellow,
            ]
        );
        assert_eq!(&*events[0].current_lane, "lane1");
        assert_eq!(events[1].next_lane.as_deref(), Some("lane2"));
        assert_eq!(&*events[2].current_lane, "lane2");
        assert_eq!(events[3].next_lane.as_deref(), Some("lane1"));
        assert_eq!(&*events[4].current_lane, "lane1");

        let timing = SignalTiming::default();
        for ev in &events {
            match ev.kind {
                PhaseKind::Green => {
                    assert!(ev.duration_secs >= timing.min_green);
                    assert!(ev.duration_secs <= timing.max_green);
                }
                PhaseKind::Yellow => assert_eq!(ev.duration_secs, timing.yellow_buffer),
            }
        }

        // 4 vehicles → 10s, 10 vehicles → 25s.
        assert_eq!(events[0].duration_secs, 10);
        assert_eq!(events[2].duration_secs, 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prescan_hides_detection_latency() {
        // Each count takes 3 virtual seconds. With the lookahead, phase
        // boundaries still land exactly at green + yellow.
        let counter = FakeCounter::new(&[("cam/1", 4), ("cam/2", 4)], Duration::from_secs(3));
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();

        let handle = tokio::spawn(two_lane_controller(counter.clone(), bus).run(token.clone()));

        // First GREEN: one live query (3s), published at t≈3.
        let first = rx.recv().await.unwrap();
        assert!(first.is_green());
        let t_first = time::Instant::now();

        // YELLOW at +10s, second GREEN at +15s — the 3s prescan happened
        // during the first green, adding nothing.
        let second = rx.recv().await.unwrap();
        assert!(second.is_yellow());
        let third = rx.recv().await.unwrap();
        assert!(third.is_green());
        let elapsed = time::Instant::now() - t_first;
        assert_eq!(elapsed, Duration::from_secs(15));

        token.cancel();
        handle.await.unwrap();

        // At minimum: the initial live query plus the consumed prescan. The
        // second green's prescan may have been aborted before first poll.
        assert!(counter.queries.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_failure_degrades_to_zero() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();

        let handle =
            tokio::spawn(two_lane_controller(Arc::new(BrokenCounter), bus).run(token.clone()));

        // The controller keeps cycling on failures: every green gets the
        // minimum duration from a degraded count of 0.
        for _ in 0..2 {
            let green = rx.recv().await.unwrap();
            assert!(green.is_green());
            assert_eq!(green.vehicle_count, 0);
            assert_eq!(green.duration_secs, SignalTiming::default().min_green);
            let yellow = rx.recv().await.unwrap();
            assert!(yellow.is_yellow());
        }

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_mid_phase() {
        let counter = FakeCounter::new(&[("cam/1", 20), ("cam/2", 20)], Duration::ZERO);
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();

        let handle = tokio::spawn(two_lane_controller(counter, bus).run(token.clone()));

        // Enter the first (50s) green, then cancel right away.
        let first = rx.recv().await.unwrap();
        assert!(first.is_green());
        token.cancel();
        handle.await.unwrap();

        // No further events were published.
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }
}
