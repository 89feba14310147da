//! Per-window coordination system.
//!
//! [`WindowSystem`] wires the registry, the membership coordinator and
//! the two periodic loops together and owns the member's lifecycle:
//! `Unjoined -> Active` on attach, `Active -> Departed` on shutdown.
//! Departed is terminal; a departed identity is simply absent from future
//! membership reads.

use std::sync::Arc;
use strum::Display;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::config::CoordinatorConfig;
use crate::error::{WinlinkError, WinlinkResult};
use crate::membership::MembershipCoordinator;
use crate::presenter::PresentationLoop;
use crate::publisher::PositionPublisher;
use crate::registry::{MemberId, SharedRegistry};
use crate::sensor::GeometrySensor;
use crate::store::StoreBackend;
use crate::surface::RenderSurface;

/// Lifecycle state of the local member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MemberState {
    Unjoined,
    Active(MemberId),
    Departed,
}

/// One window's view of the coordination group.
pub struct WindowSystem {
    config: CoordinatorConfig,
    registry: Arc<SharedRegistry>,
    coordinator: Arc<MembershipCoordinator>,
    sensor: Arc<dyn GeometrySensor>,
    surface: Arc<dyn RenderSurface>,
    state: RwLock<MemberState>,
    publisher: Mutex<Option<Arc<PositionPublisher>>>,
    presenter: Mutex<Option<Arc<PresentationLoop>>>,
}

impl WindowSystem {
    pub fn new(
        config: CoordinatorConfig,
        store: Arc<dyn StoreBackend>,
        sensor: Arc<dyn GeometrySensor>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        let registry = Arc::new(SharedRegistry::new(store));
        let coordinator = Arc::new(MembershipCoordinator::new(registry.clone()));
        Self {
            config,
            registry,
            coordinator,
            sensor,
            surface,
            state: RwLock::new(MemberState::Unjoined),
            publisher: Mutex::new(None),
            presenter: Mutex::new(None),
        }
    }

    /// Join the group and start both periodic loops.
    ///
    /// The join completes, including its one-shot position publish,
    /// before the first tick of either loop can run.
    pub async fn attach(&self) -> WinlinkResult<MemberId> {
        {
            let state = self.state.read().await;
            match *state {
                MemberState::Unjoined => {}
                MemberState::Active(id) => return Err(WinlinkError::AlreadyAttached(id)),
                MemberState::Departed => {
                    return Err(WinlinkError::internal("a departed window cannot rejoin"))
                }
            }
        }

        let id = self.coordinator.join(self.sensor.as_ref()).await?;
        *self.state.write().await = MemberState::Active(id);

        let publisher = Arc::new(PositionPublisher::new(
            self.registry.clone(),
            self.coordinator.clone(),
            self.sensor.clone(),
            id,
            self.config.publish_interval,
        ));
        publisher.start().await;
        *self.publisher.lock().await = Some(publisher);

        let presenter = Arc::new(PresentationLoop::new(
            self.registry.clone(),
            self.coordinator.clone(),
            self.sensor.clone(),
            self.surface.clone(),
            id,
            self.config.render_interval,
        ));
        presenter.start().await;
        *self.presenter.lock().await = Some(presenter);

        info!(member = %id, "window attached");
        Ok(id)
    }

    /// Stop both periodic loops, then leave the group.
    ///
    /// The loops are cancelled first so no tick can race the leave's own
    /// pause/mutate/clear sequence from this member. Calling shutdown on
    /// a window that never attached, or a second time, is a no-op.
    pub async fn shutdown(&self) -> WinlinkResult<()> {
        let id = {
            let state = self.state.read().await;
            match *state {
                MemberState::Active(id) => id,
                MemberState::Unjoined | MemberState::Departed => return Ok(()),
            }
        };

        if let Some(publisher) = self.publisher.lock().await.take() {
            publisher.stop().await;
        }
        if let Some(presenter) = self.presenter.lock().await.take() {
            presenter.stop().await;
        }

        self.coordinator.leave(id).await?;
        *self.state.write().await = MemberState::Departed;

        info!(member = %id, "window detached");
        Ok(())
    }

    pub async fn state(&self) -> MemberState {
        *self.state.read().await
    }

    pub async fn member_id(&self) -> WinlinkResult<MemberId> {
        match *self.state.read().await {
            MemberState::Active(id) => Ok(id),
            _ => Err(WinlinkError::NotAttached),
        }
    }

    pub fn registry(&self) -> &Arc<SharedRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::sensor::FixedWindow;
    use crate::store::InMemoryStore;
    use crate::surface::TracingSurface;
    use pretty_assertions::assert_eq;

    fn create_system(store: &InMemoryStore, rect: Rect) -> WindowSystem {
        WindowSystem::new(
            CoordinatorConfig::default(),
            Arc::new(store.clone()),
            Arc::new(FixedWindow::new(rect)),
            Arc::new(TracingSurface::new()),
        )
    }

    #[tokio::test]
    async fn test_attach_shutdown_lifecycle() {
        let store = InMemoryStore::new();
        let system = create_system(&store, Rect::new(0.0, 0.0, 800.0, 600.0));

        assert_eq!(system.state().await, MemberState::Unjoined);

        let id = system.attach().await.unwrap();
        assert_eq!(id, MemberId(1));
        assert_eq!(system.state().await, MemberState::Active(id));
        assert_eq!(system.member_id().await.unwrap(), id);
        assert_eq!(
            system.registry().read_active_members().await.unwrap(),
            vec![id]
        );

        system.shutdown().await.unwrap();
        assert_eq!(system.state().await, MemberState::Departed);
        assert_eq!(
            system.registry().read_active_members().await.unwrap(),
            vec![]
        );
    }

    #[tokio::test]
    async fn test_attach_twice_fails() {
        let store = InMemoryStore::new();
        let system = create_system(&store, Rect::new(0.0, 0.0, 1.0, 1.0));

        let id = system.attach().await.unwrap();
        let result = system.attach().await;
        assert!(matches!(result, Err(WinlinkError::AlreadyAttached(other)) if other == id));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let store = InMemoryStore::new();
        let system = create_system(&store, Rect::new(0.0, 0.0, 1.0, 1.0));

        // Before attach: no-op.
        system.shutdown().await.unwrap();
        assert_eq!(system.state().await, MemberState::Unjoined);

        system.attach().await.unwrap();
        system.shutdown().await.unwrap();
        system.shutdown().await.unwrap();
        assert_eq!(system.state().await, MemberState::Departed);
    }

    #[tokio::test]
    async fn test_member_id_requires_attachment() {
        let store = InMemoryStore::new();
        let system = create_system(&store, Rect::new(0.0, 0.0, 1.0, 1.0));

        assert!(matches!(
            system.member_id().await,
            Err(WinlinkError::NotAttached)
        ));
    }
}
