//! Block table: ids, behaviors, and the registry the world store dispatches
//! through.
//!
//! Id 1 doubles as the world-border sentinel, so stone is what the edge of
//! the world is made of.

use glam::Vec3;

use voxide_engine::registry::{Aabb, BlockBehavior, BlockRegistry};
use voxide_engine::world::World;
use voxide_engine::world::block::BlockId;
use voxide_engine::world::position::{BlockPos, Face};

pub const AIR: BlockId = BlockId::AIR;
pub const STONE: BlockId = BlockId(1);
pub const DIRT: BlockId = BlockId(2);
pub const GRASS: BlockId = BlockId(3);
pub const SAND: BlockId = BlockId(4);
pub const PLANKS: BlockId = BlockId(5);
pub const FLOWER: BlockId = BlockId(6);

/// Plain full solid cube; the default behavior covers it entirely.
struct Cube;

impl BlockBehavior for Cube {}

/// Falls when the cell below opens up.
///
/// The move itself is silent -- clear and re-place without fan-out -- and the
/// two affected cells are notified once the block has landed. Interleaving
/// notifications into the middle of a move lets the sand above fall into the
/// vacated cell and collide with our own landing write.
struct Sand;

impl Sand {
    fn try_fall(world: &World, pos: BlockPos) {
        let mut current = pos;
        let meta = world.block_metadata(pos);

        while current.y > 0 && world.is_air(current.below()) {
            world.set_block_id(current, AIR);
            world.set_block_and_metadata(current.below(), SAND, meta);
            current = current.below();
        }

        if current != pos {
            world.notify_neighbors(pos, AIR);
            world.notify_neighbors(current, SAND);
        }
    }
}

impl BlockBehavior for Sand {
    fn on_neighbor_changed(&self, world: &World, pos: BlockPos, _changed: BlockId) {
        Sand::try_fall(world, pos);
    }
}

/// Decorative flora: no collision volume to speak of, placeable only on top
/// of solid ground, pops to air the moment that ground goes away.
struct Flower;

impl BlockBehavior for Flower {
    fn is_solid(&self) -> bool {
        false
    }

    fn collision_volume(&self, _world: &World, pos: BlockPos) -> Option<Aabb> {
        // Slim targeting box around the stem.
        let base = Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32);
        Some(Aabb::new(
            base + Vec3::new(0.3, 0.0, 0.3),
            base + Vec3::new(0.7, 0.6, 0.7),
        ))
    }

    fn can_place_on_side(&self, world: &World, pos: BlockPos, face: Face) -> bool {
        face == Face::Top && world.is_solid_block(pos.below())
    }

    fn on_neighbor_changed(&self, world: &World, pos: BlockPos, _changed: BlockId) {
        if !world.is_solid_block(pos.below()) {
            world.set_block_and_metadata_notify(pos, AIR, 0);
        }
    }
}

/// Dense id-indexed block table.
pub struct Blocks {
    table: Vec<Option<Box<dyn BlockBehavior>>>,
}

impl Blocks {
    /// The standard table. Index 0 stays vacant: air has no behavior.
    pub fn standard() -> Self {
        let mut blocks = Self { table: Vec::new() };
        blocks.register(STONE, Box::new(Cube));
        blocks.register(DIRT, Box::new(Cube));
        blocks.register(GRASS, Box::new(Cube));
        blocks.register(SAND, Box::new(Sand));
        blocks.register(PLANKS, Box::new(Cube));
        blocks.register(FLOWER, Box::new(Flower));
        blocks
    }

    fn register(&mut self, id: BlockId, behavior: Box<dyn BlockBehavior>) {
        let index = id.0 as usize;
        if self.table.len() <= index {
            self.table.resize_with(index + 1, || None);
        }
        self.table[index] = Some(behavior);
    }
}

impl BlockRegistry for Blocks {
    fn get(&self, id: BlockId) -> Option<&dyn BlockBehavior> {
        if id == BlockId::AIR {
            return None;
        }
        self.table.get(id.0 as usize).and_then(|slot| slot.as_deref())
    }
}
