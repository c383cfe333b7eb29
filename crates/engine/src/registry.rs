//! The block-type capability seam.
//!
//! Chunks store bare ids; everything a block *does* -- collision, placement
//! rules, reactions to neighbors -- lives behind [`BlockBehavior`], looked up
//! through a game-supplied [`BlockRegistry`]. The world store treats "no
//! behavior registered" and "air" identically: no collision, no
//! notifications, nothing to place against.

use glam::Vec3;

use crate::world::block::BlockId;
use crate::world::position::{BlockPos, Face};
use crate::world::World;

/// Axis-aligned box used for collision and targeting tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unit cube occupying the cell at `pos`.
    pub fn block(pos: BlockPos) -> Self {
        let min = Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32);
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    /// Strict interior test: points exactly on a face do not count.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }
}

/// Per-block-type capabilities, dispatched by id through the registry.
///
/// Implementations may re-enter the world from `on_neighbor_changed` (set
/// blocks, trigger further notifications); the world store guarantees it
/// holds no chunk guard while calling in.
pub trait BlockBehavior: Send + Sync {
    /// Whether the block counts as solid ground for support and collision
    /// purposes.
    fn is_solid(&self) -> bool {
        true
    }

    /// Collision volume anchored at `pos`, or `None` for blocks that cannot
    /// be collided with or targeted.
    fn collision_volume(&self, _world: &World, pos: BlockPos) -> Option<Aabb> {
        Some(Aabb::block(pos))
    }

    /// Whether this block type may be placed at `pos` when the player struck
    /// the given face of an adjacent block.
    fn can_place_on_side(&self, _world: &World, _pos: BlockPos, _face: Face) -> bool {
        true
    }

    /// One of the six axis neighbors of `pos` changed; `changed` is the id it
    /// changed to.
    fn on_neighbor_changed(&self, _world: &World, _pos: BlockPos, _changed: BlockId) {}
}

/// Maps block ids to their behavior.
///
/// Must return `None` for [`BlockId::AIR`] and for any id the game never
/// registered -- unknown ids are "no block", not an error.
pub trait BlockRegistry: Send + Sync {
    fn get(&self, id: BlockId) -> Option<&dyn BlockBehavior>;
}
