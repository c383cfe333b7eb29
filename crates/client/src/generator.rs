//! Flat terrain: a stone body, a band of dirt, a grass cap.

use voxide_engine::storage::{ChunkGenerator, RawChunkData};
use voxide_engine::world::chunk::{cell_index, CHUNK_WIDTH, WORLD_HEIGHT};
use voxide_engine::world::position::ChunkPos;

use crate::blocks;

/// Same column everywhere: filled up to `surface` blocks high.
pub struct FlatGenerator {
    /// Number of filled layers; the grass cap sits at `surface - 1`.
    pub surface: u8,
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self { surface: 8 }
    }
}

impl ChunkGenerator for FlatGenerator {
    fn generate_chunk(&self, _pos: ChunkPos) -> RawChunkData {
        let mut raw = RawChunkData::empty();
        let top = self.surface.min(WORLD_HEIGHT as u8);

        for y in 0..top {
            let id = if y + 1 == top {
                blocks::GRASS
            } else if y + 3 >= top {
                blocks::DIRT
            } else {
                blocks::STONE
            };
            for z in 0..CHUNK_WIDTH as u8 {
                for x in 0..CHUNK_WIDTH as u8 {
                    raw.ids[cell_index(x, y, z)] = id.0;
                }
            }
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_at(raw: &RawChunkData, x: u8, y: u8, z: u8) -> u8 {
        raw.ids[cell_index(x, y, z)]
    }

    #[test]
    fn columns_are_stone_dirt_grass_air() {
        let raw = FlatGenerator { surface: 8 }.generate_chunk(ChunkPos::new(0, 0));

        assert_eq!(id_at(&raw, 0, 0, 0), blocks::STONE.0);
        assert_eq!(id_at(&raw, 2, 4, 3), blocks::STONE.0);
        assert_eq!(id_at(&raw, 2, 5, 3), blocks::DIRT.0);
        assert_eq!(id_at(&raw, 2, 6, 3), blocks::DIRT.0);
        assert_eq!(id_at(&raw, 2, 7, 3), blocks::GRASS.0);
        assert_eq!(id_at(&raw, 2, 8, 3), 0);
        assert_eq!(id_at(&raw, 2, 31, 3), 0);
    }

    #[test]
    fn every_chunk_generates_identically() {
        let generator = FlatGenerator::default();
        let a = generator.generate_chunk(ChunkPos::new(0, 0));
        let b = generator.generate_chunk(ChunkPos::new(7, -3));
        assert_eq!(&a.ids[..], &b.ids[..]);
    }

    #[test]
    fn zero_surface_generates_pure_air() {
        let raw = FlatGenerator { surface: 0 }.generate_chunk(ChunkPos::new(1, 1));
        assert!(raw.ids.iter().all(|&id| id == 0));
    }

    #[test]
    fn surface_is_clamped_to_the_world_height() {
        let raw = FlatGenerator { surface: 255 }.generate_chunk(ChunkPos::new(0, 0));
        assert_eq!(id_at(&raw, 0, 31, 0), blocks::GRASS.0);
        assert_eq!(id_at(&raw, 0, 30, 0), blocks::DIRT.0);
    }
}
