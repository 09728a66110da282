//! A player's dealt tiles.

use domino_protocol::WireTile;

use crate::{Chain, Tile};

/// The tiles a player was dealt, in stable slots.
///
/// Slot indices never shift: playing a tile empties its slot, and clients
/// keep addressing the remaining tiles by their original index.
#[derive(Debug, Default)]
pub struct Hand {
    slots: Vec<Option<Tile>>,
}

impl Hand {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            slots: tiles.into_iter().map(Some).collect(),
        }
    }

    /// Number of slots dealt, played or not.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of tiles still held.
    pub fn remaining(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The tile in `slot`, `None` if the slot is empty or out of range.
    pub fn get(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Removes and returns the tile in `slot`.
    pub fn take(&mut self, slot: usize) -> Option<Tile> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Puts a tile back into an empty slot.
    pub(crate) fn restore(&mut self, slot: usize, tile: Tile) {
        if let Some(entry @ None) = self.slots.get_mut(slot) {
            *entry = Some(tile);
        }
    }

    /// Held tiles with their slot index.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, &Tile)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, tile)| tile.as_ref().map(|t| (slot, t)))
    }

    /// Pip total of the held tiles; lowest wins.
    pub fn pip_total(&self) -> u32 {
        self.tiles().map(|(_, t)| t.pips()).sum()
    }

    /// `true` if any held tile can be attached to `chain`.
    pub fn has_legal(&self, chain: &Chain) -> bool {
        self.tiles().any(|(_, t)| chain.is_legal(t))
    }

    /// `true` if some held tile shares a face with `tile`.
    pub fn can_follow(&self, tile: &Tile) -> bool {
        self.tiles().any(|(_, t)| t.shares_face_with(tile))
    }

    /// Wire snapshot, one entry per slot, `None` for played slots.
    pub fn to_wire(&self) -> Vec<Option<WireTile>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(Tile::to_wire))
            .collect()
    }
}
