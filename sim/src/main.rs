//! Headless orbit simulator.
//!
//! Mounts a scene on an in-memory host, runs the frame loop and prints
//! every broadcast message as one JSON line on stdout.
//!
//! Usage: orbit-sim [OPTIONS]
//!
//! Options:
//!   --config PATH      JSON config file (defaults for absent fields)
//!   --seed N           RNG seed (default: random)
//!   --duration S       Stop after S seconds (default: run until Ctrl-C)
//!   --icons LIST       Comma-separated icon list
//!   --viewport WxH     Viewport size in pixels (default: 1280x720)
//!   --reduced-motion   Behave as if reduced motion is preferred
//!   --wander           Feed a synthetic pointer path into the scene

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    use orbit_shared::protocol::SceneMsg;
    use orbit_sim::clock::MonotonicClock;
    use orbit_sim::config::SimConfig;
    use orbit_sim::frame_loop::{run_frame_loop, SceneCommand};
    use orbit_sim::scene::Scene;
    use orbit_sim::surface::{MemorySurface, Rect, StaticEnvironment};
    use std::path::Path;
    use std::time::Duration;
    use tokio::sync::{broadcast, mpsc};

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut duration_secs: Option<f64> = None;
    let mut icons: Option<String> = None;
    let mut viewport: Option<(f64, f64)> = None;
    let mut reduced_motion = false;
    let mut wander = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = args.get(i).cloned();
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|s| s.parse().ok());
            }
            "--duration" => {
                i += 1;
                duration_secs = args.get(i).and_then(|s| s.parse().ok());
            }
            "--icons" => {
                i += 1;
                icons = args.get(i).cloned();
            }
            "--viewport" => {
                i += 1;
                viewport = args.get(i).and_then(|s| parse_viewport(s));
            }
            "--reduced-motion" => reduced_motion = true,
            "--wander" => wander = true,
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => match SimConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid simulator configuration: {}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if seed.is_some() {
        config.rng_seed = seed;
    }
    if icons.is_some() {
        config.icons = icons;
    }
    if let Some((w, h)) = viewport {
        config.viewport_width = w;
        config.viewport_height = h;
    }
    config.reduced_motion |= reduced_motion;

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid simulator configuration: {}", e);
        std::process::exit(1);
    }

    let env = StaticEnvironment::new(config.viewport()).with_reduced_motion(config.reduced_motion);
    let mut host = MemorySurface::new(Rect::new(
        0.0,
        0.0,
        config.viewport_width,
        config.viewport_height,
    ));
    host.icon_attribute = config.icons.clone();

    let mut rng = config.rng();
    let Some(scene) = Scene::mount(Some(host), &env, config.orbit.clone(), &mut rng) else {
        return;
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<SceneCommand>(64);
    let (broadcast_tx, mut broadcast_rx) = broadcast::channel::<SceneMsg>(64);

    // Print broadcasts until the loop drops its sender
    let printer = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => match serde_json::to_string(&msg) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::error!("Failed to encode message: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Output lagged by {} messages", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    if wander {
        let wander_tx = cmd_tx.clone();
        let (w, h) = (config.viewport_width, config.viewport_height);
        tokio::spawn(async move {
            let mut t = 0.0_f64;
            let mut interval = tokio::time::interval(Duration::from_millis(50));
            loop {
                interval.tick().await;
                t += 0.05;
                let x = w * (0.5 + 0.5 * (t * 0.7).sin());
                let y = h * (0.5 + 0.5 * (t * 1.1).cos());
                if wander_tx.send(SceneCommand::PointerMove { x, y }).await.is_err() {
                    break;
                }
            }
        });
    }

    let frame_loop = tokio::spawn(run_frame_loop(
        scene,
        MonotonicClock::new(),
        cmd_rx,
        broadcast_tx,
        config,
    ));

    tracing::info!("Orbit simulator running");

    match duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs_f64(secs.max(0.0))) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }

    let _ = cmd_tx.send(SceneCommand::Stop).await;
    match frame_loop.await {
        Ok(host) => tracing::info!(
            "Stopped; {} elements created, {} still attached",
            host.elements.len(),
            host.attached_count()
        ),
        Err(e) => tracing::error!("Frame loop task failed: {}", e),
    }
    let _ = printer.await;
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_viewport(s: &str) -> Option<(f64, f64)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
