//! Hierarchical pathfinder over hex-packed voxel schematics: builds a
//! directed motion graph of standable positions, condenses it into an SCC
//! DAG, and answers route queries with a family of node-level and
//! super-node-level search strategies.

#![allow(dead_code)]

#[cfg(all(feature = "mimalloc", not(test)))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod condense;
pub mod coordinate;
pub mod decode;
pub mod error;
mod frontier;
pub mod graph;
mod lattice;
pub mod search;
mod super_search;
pub mod travel;
pub mod trip;
pub(crate) mod util;
pub mod world;

pub use coordinate::{Coordinate, Move, Route};
pub use error::{Error, LatticeError, Result};
pub use lattice::Lattice;
pub use search::SearchMode;
pub use trip::TripPlan;
pub use world::World;
