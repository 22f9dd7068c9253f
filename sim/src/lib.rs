//! Orbit simulator library.
//!
//! Icons revolve on tilted circular orbits around the centre of a host
//! surface, shaded by depth, with a pointer-driven whole-scene tilt.

pub mod clock;
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod frame_loop;
pub mod icons;
pub mod orbit;
pub mod parallax;
pub mod scene;
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod web;
