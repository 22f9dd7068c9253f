use crate::clock::Clock;
use crate::config::SimConfig;
use crate::scene::Scene;
use crate::surface::{HostSurface, Viewport};
use orbit_shared::protocol::SceneMsg;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Inputs delivered to a running scene
#[derive(Debug, Clone, Copy)]
pub enum SceneCommand {
    PointerMove { x: f64, y: f64 },
    Resize { viewport: Viewport },
    Stop,
}

/// Drive `scene` once per frame until stopped. Owns the scene; on exit it
/// is torn down and the host returned.
///
/// The loop ends on [`SceneCommand::Stop`] or when every command sender
/// has been dropped.
pub async fn run_frame_loop<S, C>(
    mut scene: Scene<S>,
    mut clock: C,
    mut cmd_rx: mpsc::Receiver<SceneCommand>,
    broadcast_tx: broadcast::Sender<SceneMsg>,
    config: SimConfig,
) -> S
where
    S: HostSurface,
    C: Clock,
{
    let frame_rate_hz = config.frame_rate_hz.max(1);
    let frame_duration = Duration::from_secs_f64(1.0 / frame_rate_hz as f64);
    let report_every_n = (frame_rate_hz / config.report_rate_hz.max(1)).max(1);
    let mut frame_count: u64 = 0;

    let mut frame_interval = tokio::time::interval(frame_duration);
    frame_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let _ = broadcast_tx.send(SceneMsg::Mounted(scene.mounted_msg()));
    tracing::info!(
        "Frame loop started at {} Hz ({} items)",
        frame_rate_hz,
        scene.items().len()
    );

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                scene.advance_to(clock.now());

                // Snapshots go out at a lower rate
                frame_count += 1;
                if frame_count % report_every_n as u64 == 0 {
                    let _ = broadcast_tx.send(SceneMsg::Frame(scene.snapshot()));
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SceneCommand::PointerMove { x, y }) => {
                        if let Some(tilt) = scene.pointer_moved(x, y) {
                            let _ = broadcast_tx.send(SceneMsg::Tilt(tilt));
                        }
                    }
                    Some(SceneCommand::Resize { viewport }) => {
                        scene.resize(viewport);
                    }
                    Some(SceneCommand::Stop) | None => break,
                }
            }
        }
    }

    tracing::info!("Frame loop ended after {} frames", frame_count);
    let host = scene.teardown();
    let _ = broadcast_tx.send(SceneMsg::Unmounted);
    host
}
