//! Periodic position publishing.

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

use crate::geometry::Rect;
use crate::membership::MembershipCoordinator;
use crate::registry::{MemberId, SharedRegistry};
use crate::sensor::GeometrySensor;
use crate::store::StoreError;

/// Read-modify-write of the shared position map for one member.
///
/// Not atomic with respect to other members' concurrent position writes;
/// the whole map is last-writer-wins. Each member refreshes its own entry
/// every tick, so a lost update heals on the next cycle.
pub(crate) async fn publish_position(
    registry: &SharedRegistry,
    id: MemberId,
    rect: Rect,
) -> Result<(), StoreError> {
    let mut positions = registry.read_positions().await?;
    positions.insert(id, rect);
    registry.write_positions(&positions).await
}

/// Publishes the local window's rectangle into the shared position map on
/// a fixed cadence.
pub struct PositionPublisher {
    registry: Arc<SharedRegistry>,
    coordinator: Arc<MembershipCoordinator>,
    sensor: Arc<dyn GeometrySensor>,
    member_id: MemberId,
    interval: std::time::Duration,
    running: Arc<AtomicBool>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl PositionPublisher {
    pub fn new(
        registry: Arc<SharedRegistry>,
        coordinator: Arc<MembershipCoordinator>,
        sensor: Arc<dyn GeometrySensor>,
        member_id: MemberId,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            registry,
            coordinator,
            sensor,
            member_id,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            task_handle: Mutex::new(None),
        }
    }

    /// One publish cycle.
    ///
    /// A no-op while another member holds the pause token. Skipped or
    /// delayed ticks are harmless; the next tick republishes the current
    /// rectangle.
    pub async fn tick(&self) -> Result<(), StoreError> {
        if self.coordinator.should_defer(self.member_id).await? {
            return Ok(());
        }
        publish_position(&self.registry, self.member_id, self.sensor.rect()).await
    }

    /// Start the periodic publish task.
    pub async fn start(self: &Arc<Self>) {
        self.running.store(true, Ordering::SeqCst);
        let publisher = Arc::clone(self);
        let handle = tokio::spawn(async move {
            debug!(member = %publisher.member_id, interval = ?publisher.interval, "position publisher started");
            let mut timer = tokio::time::interval(publisher.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            while publisher.running.load(Ordering::SeqCst) {
                timer.tick().await;
                if let Err(e) = publisher.tick().await {
                    warn!(member = %publisher.member_id, error = %e, "position publish skipped");
                }
            }
        });
        *self.task_handle.lock().await = Some(handle);
    }

    /// Stop the periodic publish task. No tick runs after this returns.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.task_handle.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }
        debug!(member = %self.member_id, "position publisher stopped");
    }
}
