//! Mocha Core - Core types and utilities for the Mocha engine
//!
//! This crate provides the payloads shared between the ECS and its drivers:
//! - Mathematical primitives (re-exported from glam)
//! - Transform, velocity and render-handle components
//! - Frame clock producing the per-frame delta time

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, TimeConfig, TimeConfigError};
pub use types::{RenderHandle, Transform, Velocity};
