//! Chunk-partitioned voxel world store.
//!
//! Maps 3D integer block coordinates to per-block id/metadata byte pairs,
//! lazily materializes and persists 4x32x4 chunk columns, fans mutation
//! notifications out to neighboring blocks, and answers ray-versus-voxel
//! targeting queries. Game semantics -- what blocks do, how bytes hit disk,
//! what terrain looks like -- stay behind the collaborator traits in
//! [`registry`] and [`storage`].

pub mod registry;
pub mod storage;
pub mod world;
