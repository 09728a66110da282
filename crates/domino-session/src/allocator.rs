//! Player identity allocation.
//!
//! Ids and colors come from an allocator owned by the server, so two
//! servers in one process (or two tests) never share counters.

use domino_protocol::{PlayerId, PlayerInfo};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Display colors handed out in rotation.
pub const COLORS: [&str; 30] = [
    "maroon",
    "green",
    "olive",
    "navy",
    "purple",
    "teal",
    "silver",
    "gray",
    "red",
    "lime",
    "yellow",
    "blue",
    "fuchsia",
    "aqua",
    "white",
    "antiquewhite",
    "aquamarine",
    "azure",
    "beige",
    "bisque",
    "blanchedalmond",
    "blueviolet",
    "brown",
    "burlywood",
    "cadetblue",
    "chartreuse",
    "chocolate",
    "coral",
    "cornflowerblue",
    "cornsilk",
];

/// Hands out sequential player ids and rotating colors.
#[derive(Debug)]
pub struct PlayerAllocator {
    next_id: u64,
    color_cursor: usize,
}

impl PlayerAllocator {
    /// Starts the color rotation at a random entry.
    pub fn new() -> Self {
        Self::starting_at(rand::rng().random_range(0..COLORS.len()))
    }

    /// Starts the color rotation at an entry derived from `seed`.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::starting_at(rng.random_range(0..COLORS.len()))
    }

    /// Starts the color rotation at `COLORS[index % COLORS.len()]`.
    pub fn starting_at(index: usize) -> Self {
        Self {
            next_id: 1,
            color_cursor: index % COLORS.len(),
        }
    }

    /// Allocates the next id (`P1`, `P2`, ...) and color for `name`.
    pub fn allocate(&mut self, name: &str) -> PlayerInfo {
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        let color = COLORS[self.color_cursor];
        self.color_cursor = (self.color_cursor + 1) % COLORS.len();
        tracing::debug!(player_id = %id, color, "player allocated");
        PlayerInfo {
            id,
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

impl Default for PlayerAllocator {
    fn default() -> Self {
        Self::new()
    }
}
