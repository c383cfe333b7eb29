use crate::world::chunk::WORLD_HEIGHT;

/// Absolute block position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk column this block belongs to (each chunk is 4x4 blocks
    /// horizontally). Arithmetic right shift floors toward negative infinity,
    /// so negative world coordinates land in negative chunk coordinates.
    ///
    /// This is the one place world-to-chunk math lives; everything else goes
    /// through here.
    pub const fn chunk(&self) -> ChunkPos {
        ChunkPos {
            x: self.x >> 2,
            z: self.z >> 2,
        }
    }

    /// Position within the chunk. Only meaningful once the caller has
    /// bounds-checked `y` into `[0, 32)`; x/z wrap by mask.
    pub const fn local(&self) -> LocalPos {
        LocalPos {
            x: (self.x & 3) as u8,
            y: self.y as u8,
            z: (self.z & 3) as u8,
        }
    }

    /// The neighbor one step below.
    pub const fn below(&self) -> BlockPos {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// The neighbor one step above.
    pub const fn above(&self) -> BlockPos {
        Self::new(self.x, self.y + 1, self.z)
    }

    /// The six axis neighbors in notification order: -X, +X, -Y, +Y, -Z, +Z.
    ///
    /// Block-change fan-out replays side effects in this exact order; do not
    /// reorder.
    pub const fn neighbors(&self) -> [BlockPos; 6] {
        [
            Self::new(self.x - 1, self.y, self.z),
            Self::new(self.x + 1, self.y, self.z),
            Self::new(self.x, self.y - 1, self.z),
            Self::new(self.x, self.y + 1, self.z),
            Self::new(self.x, self.y, self.z - 1),
            Self::new(self.x, self.y, self.z + 1),
        ]
    }
}

/// Chunk column position: world coordinate divided by the chunk width (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World position of this chunk's (0, 0, 0) corner.
    pub const fn origin(&self) -> BlockPos {
        BlockPos::new(self.x << 2, 0, self.z << 2)
    }
}

/// Cell position inside a chunk: x and z in `[0, 4)`, y in `[0, 32)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

/// A block face, named for the axis direction it points toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// -Z
    North,
    /// +Z
    South,
    /// -X
    West,
    /// +X
    East,
    /// -Y
    Bottom,
    /// +Y
    Top,
}

impl Face {
    /// Unit offset from a block to the neighbor through this face.
    pub const fn normal(self) -> (i32, i32, i32) {
        match self {
            Face::North => (0, 0, -1),
            Face::South => (0, 0, 1),
            Face::West => (-1, 0, 0),
            Face::East => (1, 0, 0),
            Face::Bottom => (0, -1, 0),
            Face::Top => (0, 1, 0),
        }
    }
}

/// Upper bound (exclusive) of the valid y range, as an i32 for bounds checks.
pub const MAX_Y: i32 = WORLD_HEIGHT as i32;
