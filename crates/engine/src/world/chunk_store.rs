use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use dashmap::DashMap;
use dashmap::mapref::one::{Ref, RefMut};

use super::chunk::Chunk;
use super::position::ChunkPos;
use crate::storage::{ChunkGenerator, ProgressSink, WorldStorage};

/// Owns every materialized chunk, keyed by chunk coordinate.
///
/// Chunks come into being on first access: loaded from storage when a saved
/// payload exists, generated fresh otherwise. At most one `Chunk` instance
/// exists per coordinate, and once materialized a chunk lives as long as the
/// store -- there is no eviction, only save-all at autosave and world end.
///
/// The table is a `DashMap` so the store can hand out reads and writes from
/// `&self`; the surrounding world facade is what makes mutation and iteration
/// well-ordered within a tick.
pub struct ChunkManager {
    chunks: DashMap<ChunkPos, Chunk>,
    storage: Arc<dyn WorldStorage>,
    generator: Box<dyn ChunkGenerator>,
}

impl ChunkManager {
    pub fn new(storage: Arc<dyn WorldStorage>, generator: Box<dyn ChunkGenerator>) -> Self {
        Self {
            chunks: DashMap::new(),
            storage,
            generator,
        }
    }

    /// Shared view of the chunk at `pos`, materializing it on first access.
    /// Never absent. Do not hold the returned guard across calls back into
    /// the world.
    pub fn chunk(&self, pos: ChunkPos) -> Ref<'_, ChunkPos, Chunk> {
        if let Some(chunk) = self.chunks.get(&pos) {
            return chunk;
        }
        self.chunks
            .entry(pos)
            .or_insert_with(|| self.resolve(pos))
            .downgrade()
    }

    /// Exclusive view of the chunk at `pos`, materializing it on first
    /// access. Same guard discipline as [`ChunkManager::chunk`].
    pub fn chunk_mut(&self, pos: ChunkPos) -> RefMut<'_, ChunkPos, Chunk> {
        self.chunks.entry(pos).or_insert_with(|| self.resolve(pos))
    }

    /// Load-or-generate. A loader error is recoverable by contract: log it
    /// and fall back to fresh generation rather than surfacing a missing
    /// chunk to callers.
    fn resolve(&self, pos: ChunkPos) -> Chunk {
        match self.storage.load_chunk(pos) {
            Ok(Some(raw)) => Chunk::from_raw(raw),
            Ok(None) => Chunk::from_raw(self.generator.generate_chunk(pos)),
            Err(e) => {
                tracing::warn!(
                    "chunk ({}, {}) failed to load, regenerating: {:#}",
                    pos.x,
                    pos.z,
                    e
                );
                Chunk::from_raw(self.generator.generate_chunk(pos))
            }
        }
    }

    /// Number of chunks currently materialized.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Persist every materialized chunk through the storage collaborator.
    /// Returns the number of chunks written; the first save error aborts and
    /// propagates.
    pub fn save_all(&self, mut progress: Option<&mut dyn ProgressSink>) -> Result<usize> {
        let start = Instant::now();
        let total = self.chunks.len();
        let mut written = 0usize;

        for entry in self.chunks.iter() {
            let pos = *entry.key();
            if let Some(sink) = progress.as_deref_mut() {
                sink.report(&format!("Saving chunks ({}/{})", written + 1, total));
            }
            self.storage
                .save_chunk(pos, &*entry)
                .with_context(|| format!("saving chunk ({}, {})", pos.x, pos.z))?;
            written += 1;
        }

        tracing::info!("saved {} chunks ({:.2?})", written, start.elapsed());
        Ok(written)
    }

    /// Final flush when the world is being torn down.
    pub fn on_store_end(&self) -> Result<usize> {
        self.save_all(None)
    }
}
