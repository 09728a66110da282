//! A seated player.

use domino_protocol::{PlayerId, PlayerInfo};

use crate::Hand;

/// A player on the roster: public identity plus private hand.
#[derive(Debug)]
pub struct Player {
    info: PlayerInfo,
    hand: Hand,
}

impl Player {
    pub fn new(info: PlayerInfo, hand: Hand) -> Self {
        Self { info, hand }
    }

    pub fn id(&self) -> PlayerId {
        self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn info(&self) -> &PlayerInfo {
        &self.info
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub(crate) fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
}
