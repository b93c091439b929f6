//! Entry point for turning a loaded schematic into a queryable [`Lattice`].

use log::debug;

use crate::decode;
use crate::error::Error;
use crate::graph::Graph;
use crate::lattice::Lattice;

/// A decoded voxel world: the motion graph plus its declared extents.
/// Construction never touches a filesystem; callers supply the already
/// loaded schematic bytes.
pub struct World {
    pub(crate) graph: Graph,
    pub x_size: i32,
    pub y_size: i32,
    pub z_size: i32,
}

impl World {
    /// Parses a `.vox` body from an in-memory byte slice.
    pub fn parse(bytes: &[u8]) -> Result<World, Error> {
        debug!("parsing world from {} bytes", bytes.len());
        let decoded = decode::decode(bytes)?;
        Ok(World {
            graph: decoded.graph,
            x_size: decoded.x_size,
            y_size: decoded.y_size,
            z_size: decoded.z_size,
        })
    }

    /// Loads and parses a `.vox` file from disk.
    #[cfg(feature = "fs")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<World, Error> {
        use crate::decode::error::DecodeError;

        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("vox") {
            return Err(Error::Decode(DecodeError::NotVoxFile(path.display().to_string())));
        }
        let bytes = std::fs::read(path)
            .map_err(|_| Error::Decode(DecodeError::Unreadable(path.display().to_string())))?;
        World::parse(&bytes)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Consumes the world and builds the queryable lattice.
    pub fn into_lattice(self) -> Lattice {
        Lattice::new(self.graph, (self.x_size, self.y_size, self.z_size))
    }
}
