//! The draw pile.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::Tile;
use crate::tile::MAX_PIPS;

/// Lowest face value in the standard deck.
pub const MIN_PIPS: u8 = 1;

/// Size of the standard deck: every `(i, j)` with `1 <= i <= j <= 6`.
pub const DECK_SIZE: usize = 21;

/// An ordered pile of undealt tiles. Draws come off the end.
#[derive(Debug)]
pub struct Deck {
    tiles: Vec<Tile>,
}

impl Deck {
    /// The full deck in canonical order.
    pub fn standard() -> Self {
        let tiles = (MIN_PIPS..=MAX_PIPS)
            .flat_map(|i| (i..=MAX_PIPS).map(move |j| Tile::new(i, j)))
            .collect();
        Self { tiles }
    }

    /// The full deck, shuffled with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.tiles.shuffle(rng);
        deck
    }

    /// A deck in exactly this order. The last tile is drawn first.
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// A rigged deck that deals `hands` in seat order and then offers
    /// `openers` as opener candidates in order.
    pub fn stacked(hands: &[&[(u8, u8)]], openers: &[(u8, u8)]) -> Self {
        let mut tiles: Vec<Tile> = openers.iter().rev().map(|&(a, b)| Tile::new(a, b)).collect();
        for hand in hands.iter().rev() {
            tiles.extend(hand.iter().map(|&(a, b)| Tile::new(a, b)));
        }
        Self { tiles }
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Draws `n` tiles from the end, or nothing if fewer than `n` remain.
    pub fn pop(&mut self, n: usize) -> Option<Vec<Tile>> {
        if n > self.tiles.len() {
            return None;
        }
        let at = self.tiles.len() - n;
        Some(self.tiles.split_off(at))
    }

    /// Draws a single tile.
    pub fn pop_one(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }
}
