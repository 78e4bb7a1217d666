//! Render surface
//!
//! The simulation never draws. This module flattens a [`GameState`] into
//! plain-old-data instance buffers (circles, lines, rects) that an external
//! renderer can upload as-is.
//!
//! [`GameState`]: crate::sim::GameState

pub mod instance;
pub mod scene;

pub use instance::{CircleInstance, LineInstance, RectInstance, colors};
pub use scene::{Scene, trajectory_preview};
