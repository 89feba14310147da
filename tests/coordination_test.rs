use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use winlink::{
    config::{CoordinatorConfig, StoreConfig},
    geometry::Rect,
    sensor::{FixedWindow, SimulatedWindow},
    store::{InMemoryStore, LocalFsStore},
    surface::TracingSurface,
    MemberId, MemberState, WindowSystem,
};

fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig {
        publish_interval: Duration::from_millis(20),
        render_interval: Duration::from_millis(20),
        ..CoordinatorConfig::default()
    }
}

fn fixed_system(store: &InMemoryStore, rect: Rect) -> WindowSystem {
    WindowSystem::new(
        fast_config(),
        Arc::new(store.clone()),
        Arc::new(FixedWindow::new(rect)),
        Arc::new(TracingSurface::new()),
    )
}

#[tokio::test]
async fn test_group_membership_across_windows() {
    let store = InMemoryStore::new();
    let first = fixed_system(&store, Rect::new(0.0, 0.0, 800.0, 600.0));
    let second = fixed_system(&store, Rect::new(100.0, 200.0, 400.0, 300.0));
    let third = fixed_system(&store, Rect::new(50.0, 50.0, 640.0, 480.0));

    assert_eq!(first.attach().await.unwrap(), MemberId(1));
    assert_eq!(second.attach().await.unwrap(), MemberId(2));
    assert_eq!(third.attach().await.unwrap(), MemberId(3));

    // Every window sees the same membership and all three positions.
    let members = first.registry().read_active_members().await.unwrap();
    assert_eq!(members, vec![MemberId(1), MemberId(2), MemberId(3)]);

    let positions = third.registry().read_positions().await.unwrap();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[&MemberId(2)], Rect::new(100.0, 200.0, 400.0, 300.0));

    for system in [&first, &second, &third] {
        system.shutdown().await.unwrap();
    }
    assert_eq!(
        first.registry().read_active_members().await.unwrap(),
        vec![]
    );
}

#[tokio::test]
async fn test_departed_window_disappears_from_peers() {
    let store = InMemoryStore::new();
    let first = fixed_system(&store, Rect::new(0.0, 0.0, 100.0, 100.0));
    let second = fixed_system(&store, Rect::new(10.0, 10.0, 100.0, 100.0));

    let a = first.attach().await.unwrap();
    let b = second.attach().await.unwrap();

    second.shutdown().await.unwrap();
    assert_eq!(second.state().await, MemberState::Departed);

    let members = first.registry().read_active_members().await.unwrap();
    assert_eq!(members, vec![a]);

    // The departed member's position entry is pruned on read.
    let positions = first.registry().read_positions().await.unwrap();
    assert!(positions.contains_key(&a));
    assert!(!positions.contains_key(&b));

    first.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_moving_window_positions_are_republished() {
    let store = InMemoryStore::new();
    let mover = WindowSystem::new(
        fast_config(),
        Arc::new(store.clone()),
        Arc::new(SimulatedWindow::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            1.0,
        )),
        Arc::new(TracingSurface::new()),
    );
    let watcher = fixed_system(&store, Rect::new(500.0, 500.0, 100.0, 100.0));

    let moving_id = mover.attach().await.unwrap();
    watcher.attach().await.unwrap();

    let before = watcher.registry().read_positions().await.unwrap()[&moving_id];
    sleep(Duration::from_millis(200)).await;
    let after = watcher.registry().read_positions().await.unwrap()[&moving_id];

    // The simulated window drifts down-right between publish ticks.
    assert!(after.top > before.top);
    assert!(after.left > before.left);

    mover.shutdown().await.unwrap();
    watcher.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stale_pause_token_freezes_other_members() {
    let store = InMemoryStore::new();
    let frozen = WindowSystem::new(
        fast_config(),
        Arc::new(store.clone()),
        Arc::new(SimulatedWindow::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            1.0,
            1.0,
        )),
        Arc::new(TracingSurface::new()),
    );

    let id = frozen.attach().await.unwrap();

    // A member that crashed mid-mutation leaves its token behind.
    frozen
        .registry()
        .write_pause_token(MemberId(99))
        .await
        .unwrap();

    let before = frozen.registry().read_positions().await.unwrap()[&id];
    sleep(Duration::from_millis(100)).await;
    let after = frozen.registry().read_positions().await.unwrap()[&id];

    // Publishing is deferred indefinitely while the stale token is held.
    assert_eq!(before, after);

    frozen.registry().clear_pause_token().await.unwrap();
    sleep(Duration::from_millis(100)).await;
    let resumed = frozen.registry().read_positions().await.unwrap()[&id];
    assert!(resumed.top > after.top);

    frozen.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_windows_coordinate_through_shared_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store_config = StoreConfig {
        base_dir: dir.path().to_path_buf(),
        file_extension: "json".to_string(),
    };
    let config = CoordinatorConfig {
        publish_interval: Duration::from_millis(20),
        render_interval: Duration::from_millis(20),
        store: store_config.clone(),
    };

    // Two systems with independent store handles, linked only by the
    // directory, as two real window processes would be.
    let first = WindowSystem::new(
        config.clone(),
        Arc::new(LocalFsStore::new(store_config.clone())),
        Arc::new(FixedWindow::new(Rect::new(0.0, 0.0, 800.0, 600.0))),
        Arc::new(TracingSurface::new()),
    );
    let second = WindowSystem::new(
        config,
        Arc::new(LocalFsStore::new(store_config)),
        Arc::new(FixedWindow::new(Rect::new(100.0, 200.0, 400.0, 300.0))),
        Arc::new(TracingSurface::new()),
    );

    let a = first.attach().await.unwrap();
    let b = second.attach().await.unwrap();
    assert_eq!((a, b), (MemberId(1), MemberId(2)));

    let positions = first.registry().read_positions().await.unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[&b], Rect::new(100.0, 200.0, 400.0, 300.0));

    second.shutdown().await.unwrap();
    first.shutdown().await.unwrap();

    // Both records survive in files; the member list is empty, not gone.
    let leftover = LocalFsStore::new(StoreConfig {
        base_dir: dir.path().to_path_buf(),
        file_extension: "json".to_string(),
    });
    let registry = winlink::SharedRegistry::new(Arc::new(leftover));
    assert_eq!(registry.read_active_members().await.unwrap(), vec![]);
}
