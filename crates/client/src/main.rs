use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;

use voxide_client::config::Settings;
use voxide_client::generator::FlatGenerator;
use voxide_client::persistence::FileStorage;
use voxide_client::blocks;
use voxide_engine::storage::{ProgressSink, WorldInfo, WorldStorage};
use voxide_engine::world::World;
use voxide_engine::world::position::BlockPos;

/// Progress messages from long operations go straight to the log.
struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, message: &str) {
        tracing::info!("{}", message);
    }
}

fn main() -> anyhow::Result<()> {
    let world_dir: PathBuf = std::env::args()
        .skip_while(|a| a != "--world")
        .nth(1)
        .unwrap_or_else(|| "world".into())
        .into();
    let world_size: i32 = std::env::args()
        .skip_while(|a| a != "--size")
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    tracing::info!("voxide -- chunked voxel world demo");

    let settings = Settings::load_or_default(&world_dir.join("settings.json"));
    let storage = Arc::new(FileStorage::new(&world_dir));

    let info = match storage.load_world_info()? {
        Some(info) => {
            tracing::info!("Opening world '{}' ({} chunks/side)", info.name, info.world_size);
            info
        }
        None => {
            let info = WorldInfo {
                name: "demo".into(),
                world_size,
            };
            tracing::info!("Creating world '{}' ({} chunks/side)", info.name, info.world_size);
            storage.save_world_info(&info)?;
            info
        }
    };

    let world = World::new(
        info,
        settings.world_config(),
        storage,
        Box::new(FlatGenerator::default()),
        Arc::new(blocks::Blocks::standard()),
    );

    world.load_all_chunks(Some(&mut LogProgress));
    tracing::info!("World ready: {} chunks", world.loaded_chunk_count());

    // A short scripted session: a plank pillar with sand on top, then knock
    // the pillar out and let the notifications do the rest.
    let pillar = BlockPos::new(6, 8, 6);
    world.set_block_id_notify(pillar, blocks::PLANKS);
    world.set_block_id_notify(pillar.above(), blocks::SAND);
    world.set_block_id_notify(pillar, blocks::AIR);
    tracing::info!(
        "after the collapse, {:?} holds {:?}",
        pillar,
        world.block_id(pillar)
    );

    // Target the ground from above. Look vectors use the engine's step
    // convention (X/Z negated).
    match world.ray_trace_blocks(Vec3::new(6.5, 20.0, 6.5), Vec3::new(0.0, -1.0, 0.0), 32.0) {
        Some(hit) => tracing::info!("targeting {:?}, face {:?}", hit.pos, hit.face),
        None => tracing::info!("nothing targeted"),
    }

    world.check_autosave();

    let written = world.save_world(Some(&mut LogProgress))?;
    world.on_world_end()?;
    tracing::info!(
        "world saved: {} chunks, session {:.2?}",
        written,
        world.start_time().elapsed()
    );
    Ok(())
}
