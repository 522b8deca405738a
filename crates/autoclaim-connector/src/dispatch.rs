//! Live dispatch timelines keyed by claim token.
//!
//! Each started dispatch gets a background task that reads elapsed time
//! from the shared [`Clock`], advances its [`Timeline`] and publishes a
//! snapshot on a watch channel every tick until all steps complete.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};

use autoclaim_protocol::decorative_token;
use autoclaim_state::{Clock, Timeline, TimelinePreset, TimelineSnapshot};

/// Returned when a dispatch is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchTicket {
    pub token: String,
    pub preset: TimelinePreset,
    pub snapshot: TimelineSnapshot,
}

/// How long a finished timeline stays queryable before it is dropped.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60);

struct DispatchEntry {
    preset: TimelinePreset,
    generation: u64,
    updates: watch::Receiver<TimelineSnapshot>,
}

#[derive(Default)]
struct Entries {
    next_generation: u64,
    by_token: HashMap<String, DispatchEntry>,
}

#[derive(Clone)]
pub struct DispatchRegistry {
    clock: Arc<dyn Clock>,
    tick: Duration,
    dwell_secs: u64,
    retention: Duration,
    entries: Arc<RwLock<Entries>>,
}

impl DispatchRegistry {
    pub fn new(clock: Arc<dyn Clock>, tick: Duration, dwell_secs: u64) -> Self {
        Self {
            clock,
            tick,
            dwell_secs,
            retention: DEFAULT_RETENTION,
            entries: Arc::new(RwLock::new(Entries::default())),
        }
    }

    /// Keep finished timelines for `retention` of wall time, then evict them.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Start a dispatch under a fresh decorative token.
    pub async fn start(&self, preset: TimelinePreset) -> DispatchTicket {
        let mut entries = self.entries.write().await;
        let mut token = decorative_token();
        while entries.by_token.contains_key(&token) {
            token = decorative_token();
        }
        self.spawn_locked(&mut entries, token, preset)
    }

    /// Start (or restart) a dispatch under a caller-chosen token, such as
    /// the object id returned by the notarize service.
    pub async fn start_with_token(&self, token: String, preset: TimelinePreset) -> DispatchTicket {
        let mut entries = self.entries.write().await;
        self.spawn_locked(&mut entries, token, preset)
    }

    fn spawn_locked(
        &self,
        entries: &mut Entries,
        token: String,
        preset: TimelinePreset,
    ) -> DispatchTicket {
        let started_at = self.clock.now_secs();
        let mut timeline = Timeline::new(preset.steps(), self.dwell_secs);
        let snapshot = timeline.snapshot();
        let (tx, rx) = watch::channel(snapshot.clone());

        entries.next_generation += 1;
        let generation = entries.next_generation;

        let clock = self.clock.clone();
        let tick = self.tick;
        let retention = self.retention;
        let registry = Arc::downgrade(&self.entries);
        let task_token = token.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            while !timeline.is_finished() {
                interval.tick().await;
                let elapsed = clock.now_secs().saturating_sub(started_at);
                for transition in timeline.advance_to(elapsed) {
                    tracing::info!(
                        token = %task_token,
                        step = %transition.step_id,
                        from = %transition.from,
                        to = %transition.to,
                        elapsed = transition.at_secs,
                        "Dispatch step advanced"
                    );
                }
                if tx.send(timeline.snapshot()).is_err() {
                    break;
                }
            }
            tracing::debug!(token = %task_token, "Dispatch timeline finished");

            tokio::time::sleep(retention).await;
            let Some(shared) = registry.upgrade() else {
                return;
            };
            let mut entries = shared.write().await;
            // A restart under the same token owns the slot now.
            if entries
                .by_token
                .get(&task_token)
                .is_some_and(|e| e.generation == generation)
            {
                entries.by_token.remove(&task_token);
                tracing::debug!(token = %task_token, "Dispatch evicted");
            }
        });

        tracing::info!(token = %token, preset = ?preset, "Dispatch started");
        entries.by_token.insert(
            token.clone(),
            DispatchEntry {
                preset,
                generation,
                updates: rx,
            },
        );
        DispatchTicket {
            token,
            preset,
            snapshot,
        }
    }

    pub async fn snapshot(&self, token: &str) -> Option<TimelineSnapshot> {
        let entries = self.entries.read().await;
        entries.by_token.get(token).map(|e| e.updates.borrow().clone())
    }

    /// Current ticket (token, preset and latest snapshot) for `token`.
    pub async fn ticket(&self, token: &str) -> Option<DispatchTicket> {
        let entries = self.entries.read().await;
        entries.by_token.get(token).map(|e| DispatchTicket {
            token: token.to_string(),
            preset: e.preset,
            snapshot: e.updates.borrow().clone(),
        })
    }

    /// A receiver that yields every published snapshot for `token`.
    pub async fn subscribe(&self, token: &str) -> Option<watch::Receiver<TimelineSnapshot>> {
        self.entries.read().await.by_token.get(token).map(|e| e.updates.clone())
    }

    pub async fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.entries.read().await.by_token.keys().cloned().collect();
        tokens.sort();
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclaim_protocol::StepStatus;
    use autoclaim_state::ManualClock;

    fn registry(clock: &ManualClock) -> DispatchRegistry {
        DispatchRegistry::new(Arc::new(clock.clone()), Duration::from_millis(5), 2)
    }

    async fn wait_for<F>(rx: &mut watch::Receiver<TimelineSnapshot>, done: F) -> TimelineSnapshot
    where
        F: Fn(&TimelineSnapshot) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                {
                    let snap = rx.borrow_and_update();
                    if done(&snap) {
                        return snap.clone();
                    }
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("timed out waiting for snapshot")
    }

    #[tokio::test]
    async fn timeline_follows_manual_clock() {
        let clock = ManualClock::new();
        let reg = registry(&clock);
        let ticket = reg.start(TimelinePreset::Dispatch).await;
        assert_eq!(ticket.snapshot.completed, 0);

        let mut rx = reg.subscribe(&ticket.token).await.unwrap();
        clock.set(3);
        let snap = wait_for(&mut rx, |s| s.elapsed_secs == 3).await;
        assert_eq!(snap.steps[0].status, StepStatus::Completed);
        assert_eq!(snap.steps[1].status, StepStatus::Processing);

        clock.set(20);
        let snap = wait_for(&mut rx, |s| s.finished).await;
        assert_eq!(snap.completed, 4);
        assert!(reg.snapshot(&ticket.token).await.unwrap().finished);
    }

    #[tokio::test]
    async fn tokens_are_tracked() {
        let clock = ManualClock::new();
        let reg = registry(&clock);
        reg.start_with_token("0xfeed".into(), TimelinePreset::PostSubmission)
            .await;
        assert_eq!(reg.tokens().await, vec!["0xfeed".to_string()]);
        let ticket = reg.ticket("0xfeed").await.unwrap();
        assert_eq!(ticket.preset, TimelinePreset::PostSubmission);
        assert!(reg.snapshot("0xnope").await.is_none());
    }

    #[tokio::test]
    async fn finished_timelines_are_evicted() {
        let clock = ManualClock::new();
        let reg = registry(&clock).with_retention(Duration::from_millis(20));
        for _ in 0..50 {
            reg.start(TimelinePreset::Dispatch).await;
        }
        assert_eq!(reg.tokens().await.len(), 50);

        clock.set(100);
        tokio::time::timeout(Duration::from_secs(2), async {
            while !reg.tokens().await.is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("finished dispatches were never evicted");
    }

    #[tokio::test]
    async fn restart_survives_eviction_of_previous_run() {
        let clock = ManualClock::new();
        let reg = registry(&clock).with_retention(Duration::from_millis(50));
        let first = reg
            .start_with_token("0xbeef".into(), TimelinePreset::Dispatch)
            .await;
        let mut rx = reg.subscribe(&first.token).await.unwrap();
        clock.set(100);
        wait_for(&mut rx, |s| s.finished).await;

        // Restart before the first run's retention expires. The new run
        // starts at clock 100 and stays unfinished.
        reg.start_with_token("0xbeef".into(), TimelinePreset::Dispatch)
            .await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        let snap = reg.snapshot("0xbeef").await.expect("restart was evicted");
        assert!(!snap.finished);
    }
}
