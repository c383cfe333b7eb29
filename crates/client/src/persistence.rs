//! File-backed world storage.
//!
//! On-disk layout:
//!
//! ```text
//! <root>/world.json           world description (serde_json)
//! <root>/chunks/c.<x>.<z>.vxc one compressed payload per chunk
//! ```
//!
//! A chunk payload, after gzip decompression, is the 4-byte magic `VXC\x01`
//! followed by the 512 id bytes and the 512 metadata bytes, both in
//! cell-index order. Anything that does not decompress to exactly that shape
//! is an error; the chunk store answers such errors by regenerating.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use voxide_engine::storage::{RawChunkData, WorldInfo, WorldStorage};
use voxide_engine::world::chunk::{Chunk, CHUNK_VOLUME};
use voxide_engine::world::position::ChunkPos;

const MAGIC: [u8; 4] = *b"VXC\x01";
const PAYLOAD_LEN: usize = MAGIC.len() + 2 * CHUNK_VOLUME;

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn info_path(&self) -> PathBuf {
        self.root.join("world.json")
    }

    fn chunk_path(&self, pos: ChunkPos) -> PathBuf {
        self.root.join("chunks").join(format!("c.{}.{}.vxc", pos.x, pos.z))
    }
}

impl WorldStorage for FileStorage {
    fn load_world_info(&self) -> Result<Option<WorldInfo>> {
        let path = self.info_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let info = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(info))
    }

    fn save_world_info(&self, info: &WorldInfo) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating {}", self.root.display()))?;
        let bytes = serde_json::to_vec_pretty(info).context("encoding world info")?;
        let path = self.info_path();
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))
    }

    fn load_chunk(&self, pos: ChunkPos) -> Result<Option<RawChunkData>> {
        let path = self.chunk_path(pos);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut payload = Vec::with_capacity(PAYLOAD_LEN);
        GzDecoder::new(file)
            .read_to_end(&mut payload)
            .with_context(|| format!("decompressing {}", path.display()))?;

        if payload.len() != PAYLOAD_LEN || payload[..MAGIC.len()] != MAGIC {
            bail!("{} is not a chunk payload", path.display());
        }

        let mut raw = RawChunkData::empty();
        let body = &payload[MAGIC.len()..];
        raw.ids.copy_from_slice(&body[..CHUNK_VOLUME]);
        raw.meta.copy_from_slice(&body[CHUNK_VOLUME..]);
        Ok(Some(raw))
    }

    fn save_chunk(&self, pos: ChunkPos, chunk: &Chunk) -> Result<()> {
        let dir = self.root.join("chunks");
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;

        let path = self.chunk_path(pos);
        let file = File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&MAGIC)?;
        encoder.write_all(chunk.id_bytes())?;
        encoder.write_all(chunk.meta_bytes())?;
        encoder
            .finish()
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
