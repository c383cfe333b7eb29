//! Everything game-flavored that the world store treats as a collaborator:
//! the block table, file-backed persistence, terrain generation, and the
//! settings file.

pub mod blocks;
pub mod config;
pub mod generator;
pub mod persistence;
