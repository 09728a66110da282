//! A single domino tile.

use std::fmt;

use domino_protocol::WireTile;

/// Highest face value a tile may carry.
pub const MAX_PIPS: u8 = 6;

/// A domino tile: two face values plus play/orientation state.
///
/// `Tile` is deliberately not `Clone`: a tile lives in exactly one hand,
/// deck or chain at a time and moves between them by value.
#[derive(Debug, PartialEq, Eq)]
pub struct Tile {
    face_a: u8,
    face_b: u8,
    played: bool,
    flipped: bool,
}

impl Tile {
    /// Creates an unplayed tile. Faces must be in `0..=MAX_PIPS`.
    pub fn new(face_a: u8, face_b: u8) -> Self {
        debug_assert!(face_a <= MAX_PIPS && face_b <= MAX_PIPS);
        Self {
            face_a,
            face_b,
            played: false,
            flipped: false,
        }
    }

    /// Rebuilds an already-played tile from its wire form.
    ///
    /// Returns `None` if either face is above [`MAX_PIPS`].
    pub fn from_wire(wire: WireTile) -> Option<Self> {
        if wire.x > MAX_PIPS || wire.y > MAX_PIPS {
            return None;
        }
        Some(Self {
            face_a: wire.x,
            face_b: wire.y,
            played: true,
            flipped: false,
        })
    }

    pub fn face_a(&self) -> u8 {
        self.face_a
    }

    pub fn face_b(&self) -> u8 {
        self.face_b
    }

    pub fn is_played(&self) -> bool {
        self.played
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn has_face(&self, value: u8) -> bool {
        self.face_a == value || self.face_b == value
    }

    /// `true` if the two tiles have at least one face value in common.
    pub fn shares_face_with(&self, other: &Tile) -> bool {
        self.has_face(other.face_a) || self.has_face(other.face_b)
    }

    /// Sum of both faces.
    pub fn pips(&self) -> u32 {
        u32::from(self.face_a) + u32::from(self.face_b)
    }

    pub fn to_wire(&self) -> WireTile {
        WireTile {
            x: self.face_a,
            y: self.face_b,
        }
    }

    /// Swaps the faces. Only the first call has an effect.
    pub(crate) fn flip(&mut self) {
        if self.flipped {
            return;
        }
        std::mem::swap(&mut self.face_a, &mut self.face_b);
        self.flipped = true;
    }

    pub(crate) fn mark_played(&mut self) {
        self.played = true;
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.face_a, self.face_b)
    }
}
