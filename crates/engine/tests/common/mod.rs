//! Shared fixtures: an in-memory storage double with call counters, canned
//! generators, and a handful of block behaviors.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use parking_lot::Mutex;

use voxide_engine::registry::{BlockBehavior, BlockRegistry};
use voxide_engine::storage::{
    ChunkGenerator, ProgressSink, RawChunkData, WorldInfo, WorldStorage,
};
use voxide_engine::world::block::BlockId;
use voxide_engine::world::chunk::{cell_index, Chunk, CHUNK_VOLUME, CHUNK_WIDTH, WORLD_HEIGHT};
use voxide_engine::world::position::{BlockPos, ChunkPos, Face};
use voxide_engine::world::{World, WorldConfig};

// ── Storage double ──────────────────────────────────────────────────────

pub struct MemoryStorage {
    chunks: Mutex<HashMap<(i32, i32), (Vec<u8>, Vec<u8>)>>,
    info: Mutex<Option<WorldInfo>>,
    pub chunk_saves: AtomicUsize,
    pub info_saves: AtomicUsize,
    fail_loads: bool,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            chunks: Mutex::new(HashMap::new()),
            info: Mutex::new(None),
            chunk_saves: AtomicUsize::new(0),
            info_saves: AtomicUsize::new(0),
            fail_loads: false,
        })
    }

    /// A storage whose chunk loads always error, for the degraded path.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            chunks: Mutex::new(HashMap::new()),
            info: Mutex::new(None),
            chunk_saves: AtomicUsize::new(0),
            info_saves: AtomicUsize::new(0),
            fail_loads: true,
        })
    }

    /// Pre-seed a saved chunk with a single occupied cell.
    pub fn seed_chunk(&self, pos: ChunkPos, x: u8, y: u8, z: u8, id: u8) {
        let mut ids = vec![0u8; CHUNK_VOLUME];
        ids[cell_index(x, y, z)] = id;
        self.chunks
            .lock()
            .insert((pos.x, pos.z), (ids, vec![0u8; CHUNK_VOLUME]));
    }

    pub fn saved_chunk_count(&self) -> usize {
        self.chunks.lock().len()
    }
}

impl WorldStorage for MemoryStorage {
    fn load_world_info(&self) -> Result<Option<WorldInfo>> {
        Ok(self.info.lock().clone())
    }

    fn save_world_info(&self, info: &WorldInfo) -> Result<()> {
        self.info_saves.fetch_add(1, Ordering::SeqCst);
        *self.info.lock() = Some(info.clone());
        Ok(())
    }

    fn load_chunk(&self, pos: ChunkPos) -> Result<Option<RawChunkData>> {
        if self.fail_loads {
            bail!("storage offline");
        }
        let chunks = self.chunks.lock();
        let Some((ids, meta)) = chunks.get(&(pos.x, pos.z)) else {
            return Ok(None);
        };
        let mut raw = RawChunkData::empty();
        raw.ids.copy_from_slice(ids);
        raw.meta.copy_from_slice(meta);
        Ok(Some(raw))
    }

    fn save_chunk(&self, pos: ChunkPos, chunk: &Chunk) -> Result<()> {
        self.chunk_saves.fetch_add(1, Ordering::SeqCst);
        self.chunks.lock().insert(
            (pos.x, pos.z),
            (chunk.id_bytes().to_vec(), chunk.meta_bytes().to_vec()),
        );
        Ok(())
    }
}

// ── Generators ──────────────────────────────────────────────────────────

/// Nothing but air.
pub struct AirGenerator;

impl ChunkGenerator for AirGenerator {
    fn generate_chunk(&self, _pos: ChunkPos) -> RawChunkData {
        RawChunkData::empty()
    }
}

/// One full layer of `id` at y = 0, so every chunk is non-empty.
pub struct FloorGenerator {
    pub id: u8,
}

impl ChunkGenerator for FloorGenerator {
    fn generate_chunk(&self, _pos: ChunkPos) -> RawChunkData {
        let mut raw = RawChunkData::empty();
        for z in 0..CHUNK_WIDTH as u8 {
            for x in 0..CHUNK_WIDTH as u8 {
                raw.ids[cell_index(x, 0, z)] = self.id;
            }
        }
        raw
    }
}

// ── Behaviors ───────────────────────────────────────────────────────────

/// Plain solid unit cube.
pub struct SolidRock;

impl BlockBehavior for SolidRock {}

/// Records every neighbor-change callback it receives.
pub struct Recorder {
    pub log: Arc<Mutex<Vec<(BlockPos, BlockId)>>>,
}

impl BlockBehavior for Recorder {
    fn on_neighbor_changed(&self, _world: &World, pos: BlockPos, changed: BlockId) {
        self.log.lock().push((pos, changed));
    }
}

/// Solid, but collides with nothing -- rays pass through.
pub struct Ghost;

impl BlockBehavior for Ghost {
    fn collision_volume(
        &self,
        _world: &World,
        _pos: BlockPos,
    ) -> Option<voxide_engine::registry::Aabb> {
        None
    }
}

/// Placeable only onto the top face of solid ground.
pub struct TopOnly;

impl BlockBehavior for TopOnly {
    fn is_solid(&self) -> bool {
        false
    }

    fn can_place_on_side(&self, world: &World, pos: BlockPos, face: Face) -> bool {
        face == Face::Top && world.is_solid_block(pos.below())
    }
}

// ── Registry double ─────────────────────────────────────────────────────

pub struct TestRegistry {
    table: Vec<Option<Box<dyn BlockBehavior>>>,
}

impl TestRegistry {
    /// Id 1 (the border sentinel) is pre-registered as solid rock.
    pub fn new() -> Self {
        let mut registry = Self {
            table: Vec::new(),
        };
        registry.register(1, Box::new(SolidRock));
        registry
    }

    pub fn register(&mut self, id: u8, behavior: Box<dyn BlockBehavior>) {
        let index = id as usize;
        if self.table.len() <= index {
            self.table.resize_with(index + 1, || None);
        }
        self.table[index] = Some(behavior);
    }

    pub fn with(mut self, id: u8, behavior: Box<dyn BlockBehavior>) -> Self {
        self.register(id, behavior);
        self
    }
}

impl BlockRegistry for TestRegistry {
    fn get(&self, id: BlockId) -> Option<&dyn BlockBehavior> {
        if id == BlockId::AIR {
            return None;
        }
        self.table.get(id.0 as usize).and_then(|slot| slot.as_deref())
    }
}

// ── Progress sink ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct CollectSink {
    pub messages: Vec<String>,
}

impl ProgressSink for CollectSink {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}

// ── World builders ──────────────────────────────────────────────────────

pub const LONG_INTERVAL: Duration = Duration::from_secs(3600);

pub fn build_world(
    size: i32,
    storage: Arc<MemoryStorage>,
    generator: Box<dyn ChunkGenerator>,
    registry: TestRegistry,
    autosave_interval: Duration,
) -> World {
    World::new(
        WorldInfo {
            name: "fixture".into(),
            world_size: size,
        },
        WorldConfig {
            autosave_interval,
            render_distance: 2,
        },
        storage,
        generator,
        Arc::new(registry),
    )
}

/// All-air world over throwaway storage.
pub fn empty_world(size: i32, registry: TestRegistry) -> World {
    build_world(
        size,
        MemoryStorage::new(),
        Box::new(AirGenerator),
        registry,
        LONG_INTERVAL,
    )
}

/// World whose chunks all carry a rock floor at y = 0 (id 2).
pub fn floored_world(size: i32, registry: TestRegistry) -> World {
    build_world(
        size,
        MemoryStorage::new(),
        Box::new(FloorGenerator { id: 2 }),
        registry,
        LONG_INTERVAL,
    )
}

pub const fn max_y() -> i32 {
    WORLD_HEIGHT as i32
}
