//! Dynamically growing trail ribbon that follows a moving anchor entity,
//! fading and tapering over time and distance.
//!
//! The core is a point lifecycle buffer (motion-gated sampling, lifespan
//! eviction) and a stateless strip-mesh builder run once per frame. The
//! [`TrailRibbonPlugin`] wires both into the host's `Update` schedule and
//! writes the result into the entity's `Mesh` asset.

/// Point lifecycle buffer: motion-gated sampling and lifespan eviction.
///
/// Holds the ordered, aging sample history the strip builder reads each frame.
pub mod point_buffer;

/// Bevy integration: the trail component, attach/update/clear systems.
///
/// Owns the per-frame step that samples the anchor transform and rewrites the mesh.
pub mod plugin;

/// The exposed configuration surface with JSON preset support.
///
/// Plain settings struct plus typed boundary validation.
pub mod settings;

/// Stateless triangle-strip builder and the per-frame vertex stream.
///
/// Pure geometry: buffer snapshot in, tapered and coloured vertex stream out.
pub mod strip_mesh;

pub use point_buffer::{PointBuffer, TrailPoint};
pub use plugin::{TrailClearEvent, TrailRibbon, TrailRibbonPlugin};
pub use settings::{SettingsError, TrailSettings};
pub use strip_mesh::{RibbonVertex, VertexStream, build_strip};
