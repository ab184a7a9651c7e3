pub mod components;
pub mod session;
pub mod systems;

use std::collections::HashMap;

use hecs::{Entity, World};
use thiserror::Error;
use wordsmith_protocol::{Morpheme, Question, TileId};

use components::{Placement, Tile, Zone};
use systems::check::{answer_parts, check_answer, Verdict};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no tile with id {0:?} on the board")]
    UnknownTile(TileId),
    #[error("new {zone:?} order is not a permutation of the tiles already there")]
    NotAPermutation { zone: Zone },
    #[error("no round in progress")]
    NoRound,
}

/// The tiles of one round, split between the bank and the answer row.
pub struct Board {
    world: World,
    tiles: HashMap<TileId, Entity>,
    next_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            tiles: HashMap::new(),
            next_id: 0,
        }
    }

    /// One bank tile per bank entry, in the question's (already shuffled) order.
    pub fn load(question: &Question) -> Self {
        let mut board = Self::new();
        for morpheme in &question.bank {
            board.add_tile(morpheme.clone());
        }
        board
    }

    /// Add a tile to the end of the bank
    pub fn add_tile(&mut self, morpheme: Morpheme) -> TileId {
        self.next_id += 1;
        let id = TileId::new(self.next_id);
        let slot = self.zone_len(Zone::Bank);
        let entity = self.world.spawn((
            Tile { id, morpheme },
            Placement { zone: Zone::Bank, slot },
        ));
        self.tiles.insert(id, entity);
        id
    }

    pub fn tile(&self, id: TileId) -> Option<Morpheme> {
        let entity = *self.tiles.get(&id)?;
        self.world.get::<&Tile>(entity).ok().map(|t| t.morpheme.clone())
    }

    /// Tile ids of a zone, left to right.
    pub fn order(&self, zone: Zone) -> Vec<TileId> {
        let mut placed: Vec<(u32, TileId)> = self
            .world
            .query::<(&Tile, &Placement)>()
            .iter()
            .filter(|(_, (_, placement))| placement.zone == zone)
            .map(|(_, (tile, placement))| (placement.slot, tile.id))
            .collect();
        placed.sort_unstable();
        placed.into_iter().map(|(_, id)| id).collect()
    }

    pub fn tiles(&self, zone: Zone) -> Vec<(TileId, Morpheme)> {
        self.order(zone)
            .into_iter()
            .filter_map(|id| self.tile(id).map(|m| (id, m)))
            .collect()
    }

    /// Moves a tile to the end of `zone`. The zone it left is re-packed.
    pub fn move_to(&mut self, id: TileId, zone: Zone) -> Result<(), BoardError> {
        let entity = self.entity(id)?;
        let from = self
            .world
            .get::<&Placement>(entity)
            .map(|p| p.zone)
            .map_err(|_| BoardError::UnknownTile(id))?;
        if from == zone {
            return Ok(());
        }
        let slot = self.zone_len(zone);
        self.place(id, zone, slot)?;
        self.repack(from)
    }

    /// Accepts a new left-to-right order for `zone` from the drag-and-drop layer.
    /// The order must contain exactly the tiles already in that zone.
    pub fn commit_order(&mut self, zone: Zone, order: &[TileId]) -> Result<(), BoardError> {
        let mut current = self.order(zone);
        let mut proposed = order.to_vec();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return Err(BoardError::NotAPermutation { zone });
        }
        for (slot, id) in order.iter().enumerate() {
            self.place(*id, zone, slot as u32)?;
        }
        Ok(())
    }

    /// Sends every answer tile back to the bank.
    pub fn clear_answer(&mut self) -> Result<(), BoardError> {
        for id in self.order(Zone::Answer) {
            self.move_to(id, Zone::Bank)?;
        }
        Ok(())
    }

    pub fn assembled_parts(&self) -> Vec<String> {
        answer_parts(&self.world)
    }

    /// The assembled word with affix hyphens removed, for display or speech.
    pub fn assembled_word(&self) -> String {
        self.assembled_parts()
            .iter()
            .map(|p| p.trim_matches('-'))
            .collect()
    }

    pub fn check(&self, question: &Question) -> Verdict {
        check_answer(&self.world, question)
    }

    fn entity(&self, id: TileId) -> Result<Entity, BoardError> {
        self.tiles.get(&id).copied().ok_or(BoardError::UnknownTile(id))
    }

    fn zone_len(&self, zone: Zone) -> u32 {
        self.world
            .query::<&Placement>()
            .iter()
            .filter(|(_, placement)| placement.zone == zone)
            .count() as u32
    }

    fn place(&mut self, id: TileId, zone: Zone, slot: u32) -> Result<(), BoardError> {
        let entity = self.entity(id)?;
        let mut placement = self
            .world
            .get::<&mut Placement>(entity)
            .map_err(|_| BoardError::UnknownTile(id))?;
        placement.zone = zone;
        placement.slot = slot;
        Ok(())
    }

    fn repack(&mut self, zone: Zone) -> Result<(), BoardError> {
        for (slot, id) in self.order(zone).into_iter().enumerate() {
            self.place(id, zone, slot as u32)?;
        }
        Ok(())
    }
}
