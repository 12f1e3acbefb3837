//! The client synchronizer: fetch, fall back, publish.
//!
//! Each refresh either mirrors the server's counts (`Connected`) or, when the
//! fetch fails for any reason, draws synthetic counts from every lot's busy
//! range (`Disconnected`). The result is published as a fresh
//! `Arc<MirrorSnapshot>` on a [`watch`] channel.
//!
//! [`start`] performs one refresh before returning, then keeps refreshing on
//! a background task until [`SyncHandle::shutdown`] is called.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use lotwatch_core::{ConnectionState, MirrorSnapshot};
use lotwatch_types::{LotDefinition, RequesterClass};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::feed::LotFeed;
use crate::presentation::{PresentationRecord, format_source_label, present};

/// What a single refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// `true` if the server's counts were applied, `false` if synthetic
    /// counts were generated.
    pub used_live_data: bool,
    /// When the new snapshot was produced.
    pub timestamp: DateTime<Utc>,
}

/// Keeps a local mirror of every catalog lot in step with a [`LotFeed`].
#[derive(Debug)]
pub struct Synchronizer<F> {
    feed: F,
    snapshot: watch::Sender<Arc<MirrorSnapshot>>,
    requester: watch::Sender<RequesterClass>,
}

impl<F: LotFeed> Synchronizer<F> {
    /// Create a synchronizer with every lot empty and disconnected.
    pub fn new(feed: F, catalog: Vec<LotDefinition>, requester: RequesterClass) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(MirrorSnapshot::new(catalog)));
        let (requester, _) = watch::channel(requester);
        Self {
            feed,
            snapshot,
            requester,
        }
    }

    /// Fetch once and publish the resulting snapshot.
    ///
    /// Never fails: a fetch error switches to synthetic counts.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let fetched = self.feed.fetch().await;
        let timestamp = Utc::now();

        let used_live_data = match fetched {
            Ok(summaries) => {
                self.snapshot
                    .send_modify(|snap| *snap = Arc::new(snap.apply_live(&summaries, timestamp)));
                true
            }
            Err(e) => {
                self.snapshot.send_modify(|snap| {
                    *snap = Arc::new(snap.apply_synthetic(&mut rand::rng(), timestamp));
                });
                warn!(error = %e, "fetch failed, using simulated occupancy");
                false
            }
        };

        debug!(used_live_data, "snapshot published");
        RefreshOutcome {
            used_live_data,
            timestamp,
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<MirrorSnapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Receive every newly published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MirrorSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Whether the last refresh reached the server.
    pub fn connection_state(&self) -> ConnectionState {
        self.snapshot.borrow().state()
    }

    /// Change the requester class used by [`Self::recommendations`].
    pub fn set_requester_class(&self, class: RequesterClass) {
        let previous = self.requester.send_replace(class);
        if previous != class {
            info!(%previous, current = %class, "requester class changed");
        }
    }

    /// The currently selected requester class.
    pub fn requester_class(&self) -> RequesterClass {
        *self.requester.borrow()
    }

    /// Receive requester class changes.
    pub fn subscribe_requester(&self) -> watch::Receiver<RequesterClass> {
        self.requester.subscribe()
    }

    /// Lots `class` may use, in priority order, from the current snapshot.
    pub fn list_recommended_areas(&self, class: RequesterClass) -> Vec<PresentationRecord> {
        present(&self.snapshot(), class)
    }

    /// [`Self::list_recommended_areas`] for the selected requester class.
    pub fn recommendations(&self) -> Vec<PresentationRecord> {
        self.list_recommended_areas(self.requester_class())
    }

    /// "Last updated: 03:04:05 PM (server)" in local time, or
    /// "(simulated)" when the counts are synthetic.
    pub fn source_label(&self) -> String {
        let snapshot = self.snapshot();
        format_source_label(
            snapshot.state(),
            snapshot.refreshed_at().map(|at| at.with_timezone(&Local)),
        )
    }
}

/// Handle to a running background refresh loop.
#[derive(Debug)]
pub struct SyncHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the loop and wait for it to exit. A fetch already in flight is
    /// allowed to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "refresh task ended abnormally");
        }
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Refresh once, then keep refreshing every `period` on a background task.
pub async fn start<F: LotFeed>(sync: Arc<Synchronizer<F>>, period: Duration) -> SyncHandle {
    let initial = sync.refresh_now().await;
    info!(
        used_live_data = initial.used_live_data,
        period_secs = period.as_secs_f64(),
        "initial refresh done"
    );

    let cancel = CancellationToken::new();
    let task = tokio::spawn(refresh_task(sync, period, cancel.clone()));
    SyncHandle { cancel, task }
}

async fn refresh_task<F: LotFeed>(
    sync: Arc<Synchronizer<F>>,
    period: Duration,
    cancel: CancellationToken,
) {
    // tokio::time::interval panics on a zero period.
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let outcome = sync.refresh_now().await;
                debug!(used_live_data = outcome.used_live_data, "periodic refresh");
            }
        }
    }

    debug!("refresh task stopped");
}
