use crate::clock::{clamp_dt, FrameClock};
use crate::icons::IconList;
use crate::orbit::{OrbitItem, Projection};
use crate::parallax::PointerParallax;
use crate::surface::{Environment, HostSurface, Viewport};
use orbit_shared::config::OrbitConfig;
use orbit_shared::protocol::{
    round4, AmbientTilt, FrameMsg, ItemFrame, ItemSpawn, MountedMsg, PROTOCOL_VERSION,
};
use rand::Rng;

/// Uniform draw in [min, max).
fn rand_between(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// The set of orbiting items attached to one host.
pub struct Scene<S: HostSurface> {
    host: S,
    items: Vec<OrbitItem<S::Handle>>,
    /// Per-frame output, reused every step
    frames: Vec<ItemFrame>,
    config: OrbitConfig,
    projection: Projection,
    /// None when the environment prefers reduced motion
    parallax: Option<PointerParallax>,
    ambient: AmbientTilt,
    frame_clock: FrameClock,
    elapsed: f64,
}

impl<S: HostSurface> Scene<S> {
    /// Build the scene on `host`. A missing host is not an error: nothing
    /// is created and `None` is returned. An invalid `config` is replaced
    /// by the defaults.
    pub fn mount(
        host: Option<S>,
        env: &impl Environment,
        mut config: OrbitConfig,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        let Some(mut host) = host else {
            tracing::debug!("No host surface; orbit scene not mounted");
            return None;
        };
        if let Err(e) = config.validate() {
            tracing::warn!("Invalid orbit config ({}), using defaults", e);
            config = OrbitConfig::default();
        }

        let icon_attr = host.icon_attribute();
        let icons = IconList::parse(icon_attr.as_deref(), &config.default_icon);
        let projection = projection_for(&host, env.viewport(), &config);

        let count = config.icon_count as usize;
        let mut items = Vec::with_capacity(count);
        let mut prev_radius: Option<f64> = None;

        for i in 0..count {
            let tilt_x = rand_between(rng, config.min_tilt_deg, config.max_tilt_deg).to_radians();
            let tilt_y = rand_between(rng, config.min_tilt_deg, config.max_tilt_deg).to_radians();
            let base_angle_deg = rand_between(rng, 0.0, 360.0);

            let mut speed_deg_per_sec = rand_between(rng, config.min_speed, config.max_speed);
            if rng.gen_bool(0.5) {
                speed_deg_per_sec = -speed_deg_per_sec;
            }

            let icon = icons.choose(rng).to_string();

            let jitter = rand_between(rng, -config.radius_jitter_vmin, config.radius_jitter_vmin);
            let mut radius_vmin =
                config.min_radius_vmin + i as f64 * config.radius_step_vmin + jitter;
            // Keep consecutive orbits at least (step - jitter) apart
            if let Some(prev) = prev_radius {
                radius_vmin =
                    radius_vmin.max(prev + config.radius_step_vmin - config.radius_jitter_vmin);
            }
            prev_radius = Some(radius_vmin);

            let size_vmin = rand_between(rng, config.min_size_vmin, config.max_size_vmin);
            let hue_deg = rand_between(rng, 0.0, 360.0).floor() as u16;

            let spawn = ItemSpawn {
                index: i as u32,
                icon: icon.clone(),
                hue_deg,
                size_vmin,
                radius_vmin,
                tilt_x_deg: tilt_x.to_degrees(),
                tilt_y_deg: tilt_y.to_degrees(),
            };
            let Some(handle) = host.create_item(&spawn) else {
                tracing::warn!("Host refused orbit item {}", i);
                continue;
            };
            tracing::debug!(
                "Orbit item {}: r={:.2}vmin speed={:.1}deg/s icon={}",
                i,
                radius_vmin,
                speed_deg_per_sec,
                icon
            );

            items.push(OrbitItem {
                handle,
                index: i as u32,
                base_angle_deg,
                speed_deg_per_sec,
                radius_vmin,
                size_vmin,
                tilt_x,
                tilt_y,
                icon,
                hue_deg,
            });
        }

        let parallax = if env.prefers_reduced_motion() {
            tracing::info!("Reduced motion preferred; pointer parallax disabled");
            None
        } else {
            Some(PointerParallax::new(config.max_ambient_tilt_deg))
        };

        tracing::info!("Mounted orbit scene with {} items", items.len());

        let frames = vec![ItemFrame::default(); items.len()];
        let frame_clock = FrameClock::new(config.max_frame_dt);
        let mut scene = Self {
            host,
            items,
            frames,
            config,
            projection,
            parallax,
            ambient: AmbientTilt::default(),
            frame_clock,
            elapsed: 0.0,
        };
        scene.render();
        Some(scene)
    }

    /// Advance every item by `dt` seconds (clamped to the configured
    /// maximum) and write the new frame. Returns the step actually applied.
    pub fn step(&mut self, dt: f64) -> f64 {
        let dt = clamp_dt(dt, self.config.max_frame_dt);
        for item in &mut self.items {
            item.advance(dt);
        }
        self.elapsed += dt;
        self.render();
        dt
    }

    /// Step to the timestamp `now` (seconds). The first call only renders.
    pub fn advance_to(&mut self, now: f64) -> f64 {
        let dt = self.frame_clock.tick(now);
        self.step(dt)
    }

    fn render(&mut self) {
        let projection = self.projection;
        for (item, frame) in self.items.iter().zip(self.frames.iter_mut()) {
            *frame = item.frame(&projection);
            self.host.apply_frame(&item.handle, frame);
        }
    }

    /// Pointer moved to client position (x, y). Returns the new ambient
    /// tilt, or `None` when parallax is disabled.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> Option<AmbientTilt> {
        let parallax = self.parallax?;
        let tilt = parallax.tilt_for(x, y, self.host.bounds());
        self.ambient = tilt;
        self.host.apply_ambient_tilt(tilt);
        Some(tilt)
    }

    /// Recompute unit conversion and centre after the viewport changed.
    pub fn resize(&mut self, viewport: Viewport) {
        self.projection = projection_for(&self.host, viewport, &self.config);
        tracing::debug!(
            "Resized to {}x{} ({:.2}px/vmin)",
            viewport.width,
            viewport.height,
            self.projection.px_per_vmin
        );
        self.render();
    }

    pub fn items(&self) -> &[OrbitItem<S::Handle>] {
        &self.items
    }

    /// Output of the most recent step, in item order.
    pub fn frames(&self) -> &[ItemFrame] {
        &self.frames
    }

    pub fn ambient_tilt(&self) -> AmbientTilt {
        self.ambient
    }

    pub fn parallax_enabled(&self) -> bool {
        self.parallax.is_some()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Simulated seconds since mount.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn host(&self) -> &S {
        &self.host
    }

    pub fn mounted_msg(&self) -> MountedMsg {
        MountedMsg {
            protocol_version: PROTOCOL_VERSION,
            items: self
                .items
                .iter()
                .map(OrbitItem::spawn_info)
                .collect(),
            config: self.config.clone(),
        }
    }

    pub fn snapshot(&self) -> FrameMsg {
        FrameMsg {
            time: round4(self.elapsed),
            items: self.frames.iter().map(ItemFrame::rounded).collect(),
            ambient: self.ambient,
        }
    }

    /// Remove every item element and hand the host back.
    pub fn teardown(mut self) -> S {
        let count = self.items.len();
        for item in self.items.drain(..) {
            self.host.remove_item(item.handle);
        }
        tracing::info!("Orbit scene torn down ({} items released)", count);
        self.host
    }
}

fn projection_for<S: HostSurface>(host: &S, viewport: Viewport, config: &OrbitConfig) -> Projection {
    let (center_x, center_y) = host.bounds().local_center();
    Projection {
        center_x,
        center_y,
        px_per_vmin: viewport.px_per_vmin(),
        max_depth_vmin: config.max_depth_vmin,
        min_opacity: config.min_opacity,
    }
}
