//! Incremental ray march for block targeting.
//!
//! Not a DDA: the look vector is cut into fixed sub-block steps and the
//! world is sampled at each step. The step is guaranteed smaller than one
//! block, so no voxel along the path can be skipped.

use glam::Vec3;

use super::World;
use super::block::BlockId;
use super::position::{BlockPos, Face};

/// Sub-block steps per unit of look vector. At 15 the step is always shorter
/// than a cell edge.
const SUBDIVISIONS: f32 = 15.0;

/// Result of a block-targeting ray march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The struck block.
    pub pos: BlockPos,
    /// Struck face, or `None` when the axis compare finds no discernible
    /// side.
    pub face: Option<Face>,
    /// Sample point at which the march entered the block's collision volume.
    pub point: Vec3,
}

impl World {
    /// March from `origin` along `look`, returning the first solid block
    /// whose collision volume the ray enters within `max_distance`, or
    /// `None`.
    ///
    /// The step negates X and Z but not Y. That asymmetry is the step
    /// convention every caller's look vectors are calibrated against;
    /// flipping it mirrors all horizontal targeting.
    pub fn ray_trace_blocks(&self, origin: Vec3, look: Vec3, max_distance: f32) -> Option<RayHit> {
        let step = Vec3::new(
            -look.x / SUBDIVISIONS,
            look.y / SUBDIVISIONS,
            -look.z / SUBDIVISIONS,
        );
        // A zero look vector would march in place forever.
        if step == Vec3::ZERO {
            return None;
        }

        let mut point = origin;
        while point.distance(origin) <= max_distance {
            point += step;

            // Truncation toward zero, not floor: sample cells at negative
            // coordinates are deliberately misaligned, exactly as callers
            // expect. Negative territory is all border column anyway.
            let pos = BlockPos::new(point.x as i32, point.y as i32, point.z as i32);
            let id = self.block_id(pos);

            // A chunk known to contain nothing ends the march outright; the
            // border region past the X/Z extent has no chunk to consult.
            if self.column_in_bounds(pos.x, pos.z) && self.chunks.chunk(pos.chunk()).is_empty() {
                return None;
            }

            if id != BlockId::AIR {
                let volume = self
                    .registry
                    .get(id)
                    .and_then(|b| b.collision_volume(self, pos));
                if let Some(volume) = volume {
                    if volume.contains(point) {
                        return Some(RayHit {
                            pos,
                            face: struck_face(point, step),
                            point,
                        });
                    }
                }
            }
        }

        None
    }
}

/// Face pick by integer compare of the truncated `step - point` against the
/// hit block coordinate: Z before X before Y, "greater" before "less", first
/// match wins. A heuristic, not face geometry -- kept because every consumer
/// of hit faces is tuned to it.
fn struck_face(point: Vec3, step: Vec3) -> Option<Face> {
    let last = step - point;

    let x = point.x as i32;
    let y = point.y as i32;
    let z = point.z as i32;
    let xl = last.x as i32;
    let yl = last.y as i32;
    let zl = last.z as i32;

    if zl > z {
        Some(Face::North)
    } else if zl < z {
        Some(Face::South)
    } else if xl > x {
        Some(Face::West)
    } else if xl < x {
        Some(Face::East)
    } else if yl > y {
        Some(Face::Bottom)
    } else if yl < y {
        Some(Face::Top)
    } else {
        None
    }
}
