//! Types shared between the orbit simulator and its presentation layer.

pub mod config;
pub mod protocol;
pub mod vec3;
