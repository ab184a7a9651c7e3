use wordsmith_protocol::{Morpheme, TileId};

/// A draggable tile. The id only tells tiles with the same surface form apart.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub morpheme: Morpheme,
}

/// Where a tile sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// The shuffled pool the player picks from
    Bank,
    /// The word being assembled, read left to right
    Answer,
}

/// Zone plus left-to-right position inside it. Slots in a zone are always 0..n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub zone: Zone,
    pub slot: u32,
}
