//! Periodic indicator presentation.
//!
//! Each tick reads the full position map and redraws every indicator from
//! scratch: the local member's own marker first, anchored at its
//! window-relative center, then one marker per other member, ordered by
//! identity. There is no incremental diffing; a full replace per tick
//! keeps the surface consistent with whatever the map said at read time.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, warn};

use crate::geometry::{local_anchor, relative_marker};
use crate::membership::MembershipCoordinator;
use crate::registry::{MemberId, SharedRegistry};
use crate::sensor::GeometrySensor;
use crate::store::StoreError;
use crate::surface::RenderSurface;

/// Renders every other member's position relative to the local window on
/// a fixed cadence.
pub struct PresentationLoop {
    registry: Arc<SharedRegistry>,
    coordinator: Arc<MembershipCoordinator>,
    sensor: Arc<dyn GeometrySensor>,
    surface: Arc<dyn RenderSurface>,
    member_id: MemberId,
    interval: std::time::Duration,
    running: Arc<AtomicBool>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl PresentationLoop {
    pub fn new(
        registry: Arc<SharedRegistry>,
        coordinator: Arc<MembershipCoordinator>,
        sensor: Arc<dyn GeometrySensor>,
        surface: Arc<dyn RenderSurface>,
        member_id: MemberId,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            registry,
            coordinator,
            sensor,
            surface,
            member_id,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            task_handle: Mutex::new(None),
        }
    }

    /// One presentation cycle.
    ///
    /// A no-op while another member holds the pause token, and a no-op
    /// while the surface reports itself unavailable.
    pub async fn tick(&self) -> Result<(), StoreError> {
        if self.coordinator.should_defer(self.member_id).await? {
            return Ok(());
        }
        if !self.surface.is_available() {
            return Ok(());
        }

        let own = self.sensor.rect();
        let positions = self.registry.read_positions().await?;

        self.surface.clear();
        self.surface.draw_marker(local_anchor(&own));
        for (id, rect) in &positions {
            if *id == self.member_id {
                continue;
            }
            self.surface.draw_marker(relative_marker(&own, rect));
        }
        Ok(())
    }

    /// Start the periodic presentation task.
    pub async fn start(self: &Arc<Self>) {
        self.running.store(true, Ordering::SeqCst);
        let presenter = Arc::clone(self);
        let handle = tokio::spawn(async move {
            debug!(member = %presenter.member_id, interval = ?presenter.interval, "presentation loop started");
            let mut timer = tokio::time::interval(presenter.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            while presenter.running.load(Ordering::SeqCst) {
                timer.tick().await;
                if let Err(e) = presenter.tick().await {
                    warn!(member = %presenter.member_id, error = %e, "presentation skipped");
                }
            }
        });
        *self.task_handle.lock().await = Some(handle);
    }

    /// Stop the periodic presentation task. No tick runs after this
    /// returns.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.task_handle.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }
        debug!(member = %self.member_id, "presentation loop stopped");
    }
}
