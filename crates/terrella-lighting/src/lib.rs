//! Shadow-map update throttling.
//!
//! Re-rendering shadow maps is among the most expensive per-frame costs, and
//! on a slowly-spinning planet the light barely moves between frames. The
//! throttle skips shadow recomputation on a per-quality-tier cadence,
//! leaving the previous frame's shadow map in place: shadows hold still for
//! a few frames, which is invisible at the chosen intervals.

mod lights;
mod throttle;

pub use lights::{LightId, ShadowLights};
pub use throttle::ShadowThrottle;
