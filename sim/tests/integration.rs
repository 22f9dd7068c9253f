//! Integration tests for the frame loop.
//!
//! These run a real scene on an in-memory host under the tokio runtime and
//! observe it through the command and broadcast channels.

use orbit_shared::config::OrbitConfig;
use orbit_shared::protocol::{AmbientTilt, SceneMsg};
use orbit_sim::clock::{Clock, MonotonicClock, SequenceClock};
use orbit_sim::config::SimConfig;
use orbit_sim::frame_loop::{run_frame_loop, SceneCommand};
use orbit_sim::scene::Scene;
use orbit_sim::surface::{MemorySurface, Rect, StaticEnvironment, Viewport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

fn test_config() -> SimConfig {
    SimConfig {
        frame_rate_hz: 120,
        report_rate_hz: 120,
        rng_seed: Some(12345),
        viewport_width: 1000.0,
        viewport_height: 800.0,
        icons: Some("/icons/a.svg,/icons/b.svg".to_string()),
        reduced_motion: false,
        orbit: OrbitConfig::default(),
    }
}

fn mount(config: &SimConfig) -> Scene<MemorySurface> {
    let env =
        StaticEnvironment::new(Viewport::new(config.viewport_width, config.viewport_height))
            .with_reduced_motion(config.reduced_motion);
    let mut host = MemorySurface::new(Rect::new(
        0.0,
        0.0,
        config.viewport_width,
        config.viewport_height,
    ));
    host.icon_attribute = config.icons.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed.unwrap_or(0));
    Scene::mount(Some(host), &env, config.orbit.clone(), &mut rng).expect("host present")
}

struct Running {
    cmd_tx: mpsc::Sender<SceneCommand>,
    rx: broadcast::Receiver<SceneMsg>,
    handle: JoinHandle<MemorySurface>,
}

fn start<C: Clock + Send + 'static>(config: SimConfig, clock: C) -> Running {
    let scene = mount(&config);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (broadcast_tx, rx) = broadcast::channel(1024);
    let handle = tokio::spawn(run_frame_loop(scene, clock, cmd_rx, broadcast_tx, config));
    Running { cmd_tx, rx, handle }
}

async fn stop(running: Running) -> (MemorySurface, Vec<SceneMsg>) {
    let Running {
        cmd_tx,
        mut rx,
        handle,
    } = running;
    cmd_tx.send(SceneCommand::Stop).await.unwrap();
    let host = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop did not stop")
        .unwrap();
    let mut msgs = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        msgs.push(msg);
    }
    (host, msgs)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_mounted_first_then_frames_then_unmounted() {
    let running = start(test_config(), MonotonicClock::new());
    tokio::time::sleep(Duration::from_millis(100)).await;
    let (_, msgs) = stop(running).await;

    match msgs.first() {
        Some(SceneMsg::Mounted(m)) => assert_eq!(m.items.len(), 10),
        other => panic!("Expected Mounted first, got {:?}", other),
    }
    assert!(matches!(msgs.last(), Some(SceneMsg::Unmounted)));
    let frames = msgs
        .iter()
        .filter(|m| matches!(m, SceneMsg::Frame(_)))
        .count();
    assert!(frames >= 2, "expected several frames, got {}", frames);
}

#[tokio::test]
async fn test_stop_releases_every_element() {
    let running = start(test_config(), MonotonicClock::new());
    tokio::time::sleep(Duration::from_millis(50)).await;
    let (host, _) = stop(running).await;

    assert_eq!(host.elements.len(), 10);
    assert_eq!(host.attached_count(), 0);
    assert!(host.elements.iter().all(|e| e.frames_applied >= 2));
}

#[tokio::test]
async fn test_simulated_time_advances() {
    let running = start(test_config(), MonotonicClock::new());
    tokio::time::sleep(Duration::from_millis(150)).await;
    let (_, msgs) = stop(running).await;

    let last_time = msgs
        .iter()
        .filter_map(|m| match m {
            SceneMsg::Frame(f) => Some(f.time),
            _ => None,
        })
        .last()
        .expect("at least one frame");
    assert!(last_time > 0.05, "simulated time {} too small", last_time);
}

#[tokio::test]
async fn test_stalled_frame_is_clamped() {
    // One 500ms gap, then the clock holds still
    let running = start(test_config(), SequenceClock::new([0.0, 0.5]));
    tokio::time::sleep(Duration::from_millis(80)).await;
    let (_, msgs) = stop(running).await;

    let times: Vec<f64> = msgs
        .iter()
        .filter_map(|m| match m {
            SceneMsg::Frame(f) => Some(f.time),
            _ => None,
        })
        .collect();
    assert!(times.len() >= 2);
    assert_eq!(times[0], 0.0);
    assert_eq!(*times.last().unwrap(), 0.1);
}

#[tokio::test]
async fn test_pointer_move_broadcasts_tilt() {
    let running = start(test_config(), MonotonicClock::new());
    running
        .cmd_tx
        .send(SceneCommand::PointerMove { x: 1000.0, y: 400.0 })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    let (host, msgs) = stop(running).await;

    let tilt = msgs
        .iter()
        .find_map(|m| match m {
            SceneMsg::Tilt(t) => Some(*t),
            _ => None,
        })
        .expect("tilt broadcast");
    assert!((tilt.ry - 8.0).abs() < 1e-9);
    assert_eq!(tilt.rx, 0.0);
    assert_eq!(host.ambient, tilt);
    assert_eq!(host.tilt_writes, 1);
}

#[tokio::test]
async fn test_reduced_motion_never_tilts() {
    let config = SimConfig {
        reduced_motion: true,
        ..test_config()
    };
    let running = start(config, MonotonicClock::new());
    for (x, y) in [(0.0, 0.0), (1000.0, 800.0), (250.0, 600.0)] {
        running
            .cmd_tx
            .send(SceneCommand::PointerMove { x, y })
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(30)).await;
    let (host, msgs) = stop(running).await;

    assert!(!msgs.iter().any(|m| matches!(m, SceneMsg::Tilt(_))));
    assert_eq!(host.tilt_writes, 0);
    assert_eq!(host.ambient, AmbientTilt::default());
    for msg in &msgs {
        if let SceneMsg::Frame(f) = msg {
            assert_eq!(f.ambient, AmbientTilt::default());
        }
    }
}

#[tokio::test]
async fn test_resize_rescales_positions() {
    let running = start(
        SimConfig {
            report_rate_hz: 1,
            ..test_config()
        },
        SequenceClock::new([0.0]),
    );
    running
        .cmd_tx
        .send(SceneCommand::Resize {
            viewport: Viewport::new(2000.0, 1600.0),
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    let (host, msgs) = stop(running).await;

    let mounted = match msgs.first() {
        Some(SceneMsg::Mounted(m)) => m.clone(),
        other => panic!("Expected Mounted first, got {:?}", other),
    };
    // Clock never moves, so each item sits at its start angle; 2000x1600 gives 16 px/vmin
    for (element, spawn) in host.elements.iter().zip(&mounted.items) {
        let frame = element.last_frame.expect("frame written");
        let dx = frame.x - 500.0;
        let dy = frame.y - 400.0;
        let r = (dx * dx + dy * dy + frame.depth * frame.depth).sqrt();
        assert!((r - spawn.radius_vmin * 16.0).abs() < 1e-6);
    }
}

#[tokio::test]
async fn test_dropping_all_senders_ends_loop() {
    let config = test_config();
    let scene = mount(&config);
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (broadcast_tx, _rx) = broadcast::channel(1024);
    let handle = tokio::spawn(run_frame_loop(
        scene,
        MonotonicClock::new(),
        cmd_rx,
        broadcast_tx,
        config,
    ));
    drop(cmd_tx);
    let host = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop did not stop")
        .unwrap();
    assert_eq!(host.attached_count(), 0);
}
