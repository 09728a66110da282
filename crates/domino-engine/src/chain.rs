//! The line of played tiles.
//!
//! The chain only ever grows at its two open ends. Each tile is stored in
//! normalized orientation: walking from head to tail, the faces of
//! neighbouring tiles touch, so the head tile's `face_a` and the tail
//! tile's `face_b` are the two open values.

use std::collections::VecDeque;

use domino_protocol::WireTile;

use crate::Tile;

/// Which end of the chain a tile was attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// The chain was empty; the tile is both head and tail.
    Opener,
    Head,
    Tail,
}

/// Where [`Chain::append`] put a tile and the faces it ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub end: Attachment,
    /// Faces after orientation normalization; what goes on the wire.
    pub tile: WireTile,
}

/// An append-only sequence of played tiles.
#[derive(Debug, Default)]
pub struct Chain {
    tiles: VecDeque<Tile>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Open value at the head, `None` while empty.
    pub fn head_value(&self) -> Option<u8> {
        self.tiles.front().map(Tile::face_a)
    }

    /// Open value at the tail, `None` while empty.
    pub fn tail_value(&self) -> Option<u8> {
        self.tiles.back().map(Tile::face_b)
    }

    /// `(head, tail)` open values, `None` while empty.
    pub fn open_ends(&self) -> Option<(u8, u8)> {
        Some((self.head_value()?, self.tail_value()?))
    }

    /// Tiles from head to tail.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// `true` if `tile` can be attached right now.
    ///
    /// A played tile is never legal. Any unplayed tile is legal on an empty
    /// chain; otherwise one of its faces must equal an open value.
    pub fn is_legal(&self, tile: &Tile) -> bool {
        if tile.is_played() {
            return false;
        }
        match self.open_ends() {
            None => true,
            Some((head, tail)) => tile.has_face(head) || tile.has_face(tail),
        }
    }

    /// Attaches `tile`, trying the head before the tail.
    ///
    /// Returns the tile untouched if it fits neither end. On success the
    /// tile is marked played and flipped if needed so its touching face
    /// faces the chain.
    pub fn append(&mut self, mut tile: Tile) -> Result<Placement, Tile> {
        if !self.is_legal(&tile) {
            return Err(tile);
        }
        let Some((head, tail)) = self.open_ends() else {
            tile.mark_played();
            let placement = Placement {
                end: Attachment::Opener,
                tile: tile.to_wire(),
            };
            self.tiles.push_back(tile);
            return Ok(placement);
        };

        let attachment = if tile.face_a() == head {
            tile.flip();
            Attachment::Head
        } else if tile.face_b() == head {
            Attachment::Head
        } else if tile.face_a() == tail {
            Attachment::Tail
        } else {
            // is_legal guarantees face_b == tail here.
            tile.flip();
            Attachment::Tail
        };

        tile.mark_played();
        let placement = Placement {
            end: attachment,
            tile: tile.to_wire(),
        };
        match attachment {
            Attachment::Head => self.tiles.push_front(tile),
            _ => self.tiles.push_back(tile),
        }
        Ok(placement)
    }

    /// The tile most recently attached at `attachment`'s end.
    pub fn end_tile(&self, attachment: Attachment) -> Option<&Tile> {
        match attachment {
            Attachment::Head => self.tiles.front(),
            Attachment::Tail | Attachment::Opener => self.tiles.back(),
        }
    }

    /// Places a tile whose faces are already normalized, as reported by
    /// the server in a move broadcast.
    ///
    /// A head tile's `y` touches the old head and a tail tile's `x` touches
    /// the old tail; the head is checked first. Used by client mirrors,
    /// which never re-derive orientation. Faces above `MAX_PIPS` are
    /// rejected like a tile that fits neither end.
    pub fn place_normalized(&mut self, wire: WireTile) -> Result<Attachment, WireTile> {
        let Some(tile) = Tile::from_wire(wire) else {
            return Err(wire);
        };
        let Some((head, tail)) = self.open_ends() else {
            self.tiles.push_back(tile);
            return Ok(Attachment::Opener);
        };
        if wire.y == head {
            self.tiles.push_front(tile);
            Ok(Attachment::Head)
        } else if wire.x == tail {
            self.tiles.push_back(tile);
            Ok(Attachment::Tail)
        } else {
            Err(wire)
        }
    }
}
