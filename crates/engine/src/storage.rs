//! Collaborator contracts for persistence, terrain generation, and progress
//! reporting.
//!
//! The world store never touches bytes on disk itself. It talks to a
//! [`WorldStorage`] for everything persisted and a [`ChunkGenerator`] for
//! everything that has never been saved. Both are synchronous from the
//! store's point of view: a chunk is either fully resolved or being resolved
//! on the calling thread.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::world::chunk::{Chunk, CHUNK_VOLUME};
use crate::world::position::ChunkPos;

/// Raw cell planes as produced by a loader or generator, in
/// [`cell_index`](crate::world::chunk::cell_index) order.
pub struct RawChunkData {
    pub ids: Box<[u8; CHUNK_VOLUME]>,
    pub meta: Box<[u8; CHUNK_VOLUME]>,
}

impl RawChunkData {
    /// All-air planes with zeroed metadata.
    pub fn empty() -> Self {
        Self {
            ids: Box::new([0; CHUNK_VOLUME]),
            meta: Box::new([0; CHUNK_VOLUME]),
        }
    }
}

/// Description of a saved world, stored alongside its chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldInfo {
    pub name: String,
    /// Chunks per side; the world spans `world_size * 4` blocks on X and Z.
    /// Fixed for the lifetime of the world.
    pub world_size: i32,
}

/// Persistence collaborator: world description plus per-chunk payloads.
///
/// Load errors are recoverable by contract -- the chunk store logs them and
/// regenerates. Save errors propagate to the caller; retry policy belongs to
/// the implementation, not the world store.
pub trait WorldStorage: Send + Sync {
    fn load_world_info(&self) -> Result<Option<WorldInfo>>;

    fn save_world_info(&self, info: &WorldInfo) -> Result<()>;

    /// `Ok(None)` means "never saved"; the chunk store generates instead.
    fn load_chunk(&self, pos: ChunkPos) -> Result<Option<RawChunkData>>;

    fn save_chunk(&self, pos: ChunkPos, chunk: &Chunk) -> Result<()>;
}

/// Produces fresh terrain for chunks with no saved payload.
pub trait ChunkGenerator: Send + Sync {
    fn generate_chunk(&self, pos: ChunkPos) -> RawChunkData;
}

/// Receives one-line status messages during long synchronous operations
/// (full-world load, save-all). The world store calls it and moves on; what
/// the sink does with the message is its own business.
pub trait ProgressSink {
    fn report(&mut self, message: &str);
}
