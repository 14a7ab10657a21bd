//! Uniform spatial hash grid over mesh bounding boxes.
//!
//! Accelerates nearest-mesh queries for the physics raycaster. The world is
//! bounded and roughly uniform in mesh density, so a uniform grid with O(1)
//! expected cell lookup beats a hierarchy here; crucially, building the grid
//! in the rotating planet's local frame keeps it valid for the lifetime of
//! the scene, with no per-frame rebuild as the planet spins.

mod cell;
mod grid;

pub use cell::{cell_coord, pack_cell, unpack_cell};
pub use grid::{GridStats, SpatialGrid};
