//! The world store: the single entry point for world-space block queries and
//! mutations.
//!
//! Callers speak world coordinates; the facade applies the bounds policy,
//! resolves the owning chunk through the [`ChunkManager`], fans mutation
//! notifications out to neighbors, and polls autosave. Queries degrade at the
//! edges instead of failing: columns past the X/Z extent read as the border
//! sentinel, heights past the Y range read as air, and out-of-bounds writes
//! report `false` without touching anything.

pub mod block;
pub mod chunk;
pub mod chunk_store;
pub mod position;
pub mod raytrace;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::registry::{Aabb, BlockBehavior, BlockRegistry};
use crate::storage::{ChunkGenerator, ProgressSink, WorldInfo, WorldStorage};
use self::block::BlockId;
use self::chunk_store::ChunkManager;
use self::position::{BlockPos, ChunkPos, Face, MAX_Y};

/// Tunables read once at construction.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Elapsed time between polled autosaves.
    pub autosave_interval: Duration,
    /// Radius, in chunks, of the square of chunks kept in view around a
    /// center point.
    pub render_distance: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            autosave_interval: Duration::from_secs(300),
            render_distance: 2,
        }
    }
}

/// A bounded, chunk-paged voxel world.
///
/// Single-threaded cooperative model: queries, mutations, autosave checks,
/// and ray marches all run between frames on one logical simulation thread.
/// The interior-mutable chunk table exists so behaviors can re-enter the
/// world from notification callbacks, not to support concurrent callers.
pub struct World {
    info: WorldInfo,
    /// Cached from `info`; the world spans `world_size * 4` blocks per axis.
    world_size: i32,
    start_time: Instant,
    autosave_interval: Duration,
    render_distance: i32,
    /// `None` until the first autosave check seeds it.
    last_autosave: Mutex<Option<Instant>>,
    chunks: ChunkManager,
    registry: Arc<dyn BlockRegistry>,
    storage: Arc<dyn WorldStorage>,
}

impl World {
    pub fn new(
        info: WorldInfo,
        config: WorldConfig,
        storage: Arc<dyn WorldStorage>,
        generator: Box<dyn ChunkGenerator>,
        registry: Arc<dyn BlockRegistry>,
    ) -> Self {
        debug_assert!(info.world_size > 0, "world size must be positive");
        let world_size = info.world_size;
        Self {
            info,
            world_size,
            start_time: Instant::now(),
            autosave_interval: config.autosave_interval,
            render_distance: config.render_distance,
            last_autosave: Mutex::new(None),
            chunks: ChunkManager::new(Arc::clone(&storage), generator),
            registry,
            storage,
        }
    }

    pub fn info(&self) -> &WorldInfo {
        &self.info
    }

    /// Chunks per side of the (square) world.
    pub fn world_size(&self) -> i32 {
        self.world_size
    }

    /// Instant the world object was constructed.
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.loaded_count()
    }

    // ── Bounds policy ───────────────────────────────────────────────────

    /// Whether an X/Z column lies inside the playable extent.
    fn column_in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.world_size << 2 && z < self.world_size << 2
    }

    /// Whether a chunk coordinate lies inside the world grid.
    fn chunk_in_bounds(&self, pos: ChunkPos) -> bool {
        pos.x >= 0 && pos.z >= 0 && pos.x < self.world_size && pos.z < self.world_size
    }

    fn in_bounds(&self, pos: BlockPos) -> bool {
        self.column_in_bounds(pos.x, pos.z) && pos.y >= 0 && pos.y < MAX_Y
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Block id at `pos`. Columns outside the X/Z extent read as
    /// [`BlockId::BORDER`]; heights outside `[0, 32)` read as air. The
    /// column test comes first: a coordinate that is out of range on both
    /// axes reads as border.
    pub fn block_id(&self, pos: BlockPos) -> BlockId {
        if !self.column_in_bounds(pos.x, pos.z) {
            BlockId::BORDER
        } else if pos.y < 0 || pos.y >= MAX_Y {
            BlockId::AIR
        } else {
            self.chunks.chunk(pos.chunk()).block_id(pos.local())
        }
    }

    /// Metadata at `pos`. Same bound order as [`World::block_id`], but both
    /// out-of-bounds cases read as 0 -- the border sentinel applies to ids
    /// only.
    pub fn block_metadata(&self, pos: BlockPos) -> u8 {
        if !self.column_in_bounds(pos.x, pos.z) || pos.y < 0 || pos.y >= MAX_Y {
            0
        } else {
            self.chunks.chunk(pos.chunk()).metadata(pos.local())
        }
    }

    pub fn is_air(&self, pos: BlockPos) -> bool {
        self.block_id(pos) == BlockId::AIR
    }

    /// Behavior of the block occupying `pos`, if any is registered.
    pub fn behavior(&self, pos: BlockPos) -> Option<&dyn BlockBehavior> {
        self.registry.get(self.block_id(pos))
    }

    /// Whether the block at `pos` counts as solid ground.
    pub fn is_solid_block(&self, pos: BlockPos) -> bool {
        self.behavior(pos).is_some_and(|b| b.is_solid())
    }

    /// Collision volume of the block at `pos`, or `None` when the cell holds
    /// air, an unknown id, or a volume-less block type.
    pub fn block_bounding_box(&self, pos: BlockPos) -> Option<Aabb> {
        self.behavior(pos).and_then(|b| b.collision_volume(self, pos))
    }

    /// Whether a block of type `id` may be placed at `pos` against the given
    /// face. Air and unknown ids are never placeable. Overlap tests against
    /// entity bodies belong to the caller.
    pub fn can_place_block_at(&self, id: BlockId, pos: BlockPos, face: Face) -> bool {
        self.registry
            .get(id)
            .is_some_and(|b| b.can_place_on_side(self, pos, face))
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Set a block id. Returns `false` without mutating when `pos` violates
    /// any bound.
    pub fn set_block_id(&self, pos: BlockPos, id: BlockId) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.chunks.chunk_mut(pos.chunk()).set_block_id(pos.local(), id)
    }

    /// Set a block id and its metadata together. Bounds policy as
    /// [`World::set_block_id`].
    pub fn set_block_and_metadata(&self, pos: BlockPos, id: BlockId, meta: u8) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.chunks
            .chunk_mut(pos.chunk())
            .set_block_and_metadata(pos.local(), id, meta)
    }

    /// Set only the metadata byte. Bounds policy as [`World::set_block_id`].
    pub fn set_block_metadata(&self, pos: BlockPos, meta: u8) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.chunks.chunk_mut(pos.chunk()).set_metadata(pos.local(), meta)
    }

    /// [`World::set_block_id`] plus neighbor fan-out on success.
    pub fn set_block_id_notify(&self, pos: BlockPos, id: BlockId) -> bool {
        if self.set_block_id(pos, id) {
            self.notify_neighbors(pos, id);
            true
        } else {
            false
        }
    }

    /// [`World::set_block_and_metadata`] plus neighbor fan-out on success.
    pub fn set_block_and_metadata_notify(&self, pos: BlockPos, id: BlockId, meta: u8) -> bool {
        if self.set_block_and_metadata(pos, id, meta) {
            self.notify_neighbors(pos, id);
            true
        } else {
            false
        }
    }

    /// Tell the six axis neighbors of `pos` that it changed to `changed`.
    /// Fires in the fixed order -X, +X, -Y, +Y, -Z, +Z; neighbors with no
    /// registered behavior (air, unknown ids, the void past the Y range) are
    /// skipped.
    pub fn notify_neighbors(&self, pos: BlockPos, changed: BlockId) {
        for neighbor in pos.neighbors() {
            self.notify_block(neighbor, changed);
        }
    }

    fn notify_block(&self, pos: BlockPos, changed: BlockId) {
        let id = self.block_id(pos);
        // The chunk guard is already dropped here: behaviors are free to
        // re-enter the world and mutate.
        if let Some(behavior) = self.registry.get(id) {
            behavior.on_neighbor_changed(self, pos, changed);
        }
    }

    // ── Bulk operations ─────────────────────────────────────────────────

    /// Materialize every chunk in the world grid, row by row. Synchronous;
    /// the optional sink receives one message per row.
    pub fn load_all_chunks(&self, mut progress: Option<&mut dyn ProgressSink>) {
        for z in 0..self.world_size {
            if let Some(sink) = progress.as_deref_mut() {
                sink.report(&format!("Loading chunks ({}/{})", z + 1, self.world_size));
            }
            for x in 0..self.world_size {
                let _ = self.chunks.chunk(ChunkPos::new(x, z));
            }
        }
    }

    /// The square of chunk coordinates within the configured render distance
    /// of `center`, clamped to the world grid. Each listed chunk is
    /// materialized before this returns.
    pub fn chunks_in_view(&self, center: BlockPos) -> Vec<ChunkPos> {
        let r = self.render_distance;
        let mut view = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for z in -r..=r {
            for x in -r..=r {
                let pos = BlockPos::new(center.x + (x << 2), center.y, center.z + (z << 2)).chunk();
                if self.chunk_in_bounds(pos) {
                    let _ = self.chunks.chunk(pos);
                    view.push(pos);
                }
            }
        }
        view
    }

    /// Persist the world description and every loaded chunk. Returns the
    /// number of chunks written.
    pub fn save_world(&self, mut progress: Option<&mut dyn ProgressSink>) -> Result<usize> {
        if let Some(sink) = progress.as_deref_mut() {
            sink.report("Saving world");
        }
        self.storage
            .save_world_info(&self.info)
            .context("saving world info")?;
        self.chunks.save_all(progress)
    }

    /// Final chunk flush at teardown. Hosts that also want the world info
    /// written call [`World::save_world`] first.
    pub fn on_world_end(&self) -> Result<usize> {
        self.chunks.on_store_end()
    }

    // ── Autosave ────────────────────────────────────────────────────────

    /// Poll the autosave timer; the host calls this once per simulation
    /// tick. The first call only seeds the timestamp. Later calls save once
    /// the configured interval has elapsed, then reset it. Save failures are
    /// logged, never raised -- the next interval retries naturally.
    pub fn check_autosave(&self) {
        self.check_autosave_at(Instant::now());
    }

    fn check_autosave_at(&self, now: Instant) {
        let mut last = self.last_autosave.lock();
        let Some(previous) = *last else {
            *last = Some(now);
            return;
        };
        if now.duration_since(previous) > self.autosave_interval {
            match self.save_world(None) {
                Ok(written) => tracing::info!("autosave complete: {} chunks", written),
                Err(e) => tracing::error!("autosave failed: {:#}", e),
            }
            *last = Some(now);
        }
    }
}
