//! Client-side view of the game, rebuilt from server updates.
//!
//! The mirror never decides legality or orientation for itself: tiles go
//! onto its chain exactly as the server reports them. The only local rule
//! check is [`ClientMirror::presumed_legal`], used to warn before sending
//! a move the server is going to reject anyway.

use std::fmt;

use domino_engine::{Chain, Tile, MAX_PIPS};
use domino_protocol::{PlayerId, PlayerInfo, ServerUpdate, WireTile};

use crate::ClientError;

/// What this client knows about another player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opponent {
    pub info: PlayerInfo,
    /// `(slot, tile)` for every move they made, in order.
    pub played: Vec<(usize, WireTile)>,
}

/// Read-only reconstruction of the state relevant to one player.
#[derive(Debug)]
pub struct ClientMirror {
    me: PlayerInfo,
    hand: Vec<Option<WireTile>>,
    opponents: Vec<Opponent>,
    chain: Chain,
    current: Option<PlayerId>,
    finished: bool,
    winner: Option<PlayerInfo>,
    log: Vec<String>,
}

impl ClientMirror {
    /// Starts a mirror from a join reply.
    pub fn new(me: PlayerInfo, players_in_game: Vec<PlayerInfo>) -> Self {
        let opponents = players_in_game
            .into_iter()
            .filter(|p| p.id != me.id)
            .map(|info| Opponent {
                info,
                played: Vec::new(),
            })
            .collect();
        Self {
            me,
            hand: Vec::new(),
            opponents,
            chain: Chain::new(),
            current: None,
            finished: false,
            winner: None,
            log: Vec::new(),
        }
    }

    pub fn me(&self) -> &PlayerInfo {
        &self.me
    }

    /// Own hand by slot. Played slots are `None`.
    pub fn hand(&self) -> &[Option<WireTile>] {
        &self.hand
    }

    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn current_turn(&self) -> Option<PlayerId> {
        self.current
    }

    pub fn is_my_turn(&self) -> bool {
        self.current == Some(self.me.id)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<&PlayerInfo> {
        self.winner.as_ref()
    }

    /// Log lines received so far, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Name of `id` if this client has heard of them.
    pub fn name_of(&self, id: PlayerId) -> Option<&str> {
        if id == self.me.id {
            return Some(&self.me.name);
        }
        self.opponents
            .iter()
            .find(|o| o.info.id == id)
            .map(|o| o.info.name.as_str())
    }

    /// Applies one update in arrival order.
    ///
    /// Fails only if a reported tile doesn't touch either open end of the
    /// local chain, which means this mirror missed an update.
    pub fn apply(&mut self, update: ServerUpdate) -> Result<(), ClientError> {
        match update {
            ServerUpdate::NewPlayer { player } => {
                let known = player.id == self.me.id
                    || self.opponents.iter().any(|o| o.info.id == player.id);
                if !known {
                    self.opponents.push(Opponent {
                        info: player,
                        played: Vec::new(),
                    });
                }
            }
            ServerUpdate::PlayerTurn { player_id } => self.current = Some(player_id),
            ServerUpdate::Cards { player_id, cards } => {
                if player_id == self.me.id {
                    self.hand = cards;
                } else {
                    tracing::warn!(%player_id, "received someone else's hand");
                }
            }
            ServerUpdate::InitialCard { card } => {
                if !self.chain.is_empty() {
                    return Err(ClientError::OutOfSync(card));
                }
                self.place(card)?;
            }
            ServerUpdate::PlayerMove {
                player,
                next_player,
                card_index,
                card,
            } => {
                self.place(card)?;
                if player == self.me.id {
                    if let Some(slot) = self.hand.get_mut(card_index) {
                        *slot = None;
                    }
                } else if let Some(opponent) =
                    self.opponents.iter_mut().find(|o| o.info.id == player)
                {
                    opponent.played.push((card_index, card));
                }
                self.current = next_player;
            }
            ServerUpdate::Log { message } => self.log.push(message),
            ServerUpdate::GameFinished { winner, reason } => {
                tracing::info!(winner = ?winner.as_ref().map(|w| w.id), %reason, "game finished");
                self.finished = true;
                self.current = None;
                self.winner = winner;
            }
        }
        Ok(())
    }

    fn place(&mut self, card: WireTile) -> Result<(), ClientError> {
        self.chain
            .place_normalized(card)
            .map(|_| ())
            .map_err(ClientError::OutOfSync)
    }

    /// `true` if playing `slot` now looks legal from what this client
    /// knows. The server has the final word.
    pub fn presumed_legal(&self, slot: usize) -> bool {
        if self.finished || !self.is_my_turn() || self.chain.is_empty() {
            return false;
        }
        match self.hand.get(slot) {
            Some(Some(wire)) if wire.x <= MAX_PIPS && wire.y <= MAX_PIPS => {
                self.chain.is_legal(&Tile::new(wire.x, wire.y))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ClientMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chain:")?;
        for tile in self.chain.tiles() {
            write!(f, " {tile}")?;
        }
        writeln!(f)?;

        match (self.finished, self.current) {
            (true, _) => match &self.winner {
                Some(w) => writeln!(f, "Game over. Winner: {} ({})", w.name, w.id)?,
                None => writeln!(f, "Game over. No winner")?,
            },
            (false, Some(id)) if id == self.me.id => writeln!(f, "Turn: yours")?,
            (false, Some(id)) => {
                writeln!(f, "Turn: {} ({id})", self.name_of(id).unwrap_or("?"))?
            }
            (false, None) => writeln!(f, "Waiting for players")?,
        }

        write!(f, "Hand ({} {}):", self.me.name, self.me.id)?;
        for (slot, tile) in self.hand.iter().enumerate() {
            match tile {
                Some(tile) => write!(f, " {slot}:{tile}")?,
                None => write!(f, " {slot}:--")?,
            }
        }
        writeln!(f)?;

        for o in &self.opponents {
            writeln!(
                f,
                "  {} ({}, {}) played {}",
                o.info.name,
                o.info.id,
                o.info.color,
                o.played.len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: u64, name: &str) -> PlayerInfo {
        PlayerInfo {
            id: PlayerId(id),
            name: name.into(),
            color: "navy".into(),
        }
    }

    fn tile(x: u8, y: u8) -> WireTile {
        WireTile { x, y }
    }

    /// P1 is me, P2 already seated, game started with [2,6] on my turn.
    fn started() -> ClientMirror {
        let mut mirror = ClientMirror::new(info(1, "ana"), vec![info(2, "bo")]);
        mirror
            .apply(ServerUpdate::Cards {
                player_id: PlayerId(1),
                cards: vec![Some(tile(1, 2)), Some(tile(3, 5))],
            })
            .unwrap();
        mirror
            .apply(ServerUpdate::InitialCard { card: tile(2, 6) })
            .unwrap();
        mirror
            .apply(ServerUpdate::PlayerTurn {
                player_id: PlayerId(1),
            })
            .unwrap();
        mirror
    }

    #[test]
    fn test_new_skips_self_in_roster() {
        let mirror = ClientMirror::new(info(2, "bo"), vec![info(1, "ana"), info(2, "bo")]);
        assert_eq!(mirror.opponents().len(), 1);
        assert_eq!(mirror.name_of(PlayerId(1)), Some("ana"));
    }

    #[test]
    fn test_apply_new_player_is_idempotent() {
        let mut mirror = ClientMirror::new(info(1, "ana"), vec![]);
        for _ in 0..2 {
            mirror
                .apply(ServerUpdate::NewPlayer {
                    player: info(2, "bo"),
                })
                .unwrap();
        }
        assert_eq!(mirror.opponents().len(), 1);
    }

    #[test]
    fn test_apply_cards_for_other_player_is_ignored() {
        let mut mirror = started();
        mirror
            .apply(ServerUpdate::Cards {
                player_id: PlayerId(2),
                cards: vec![Some(tile(6, 6))],
            })
            .unwrap();
        assert_eq!(mirror.hand()[0], Some(tile(1, 2)));
    }

    #[test]
    fn test_apply_own_move_clears_slot_and_passes_turn() {
        let mut mirror = started();
        mirror
            .apply(ServerUpdate::PlayerMove {
                player: PlayerId(1),
                next_player: Some(PlayerId(2)),
                card_index: 0,
                card: tile(1, 2),
            })
            .unwrap();

        assert_eq!(mirror.hand(), &[None, Some(tile(3, 5))]);
        assert_eq!(mirror.chain().open_ends(), Some((1, 6)));
        assert_eq!(mirror.current_turn(), Some(PlayerId(2)));
        assert!(!mirror.is_my_turn());
    }

    #[test]
    fn test_apply_opponent_move_records_history() {
        let mut mirror = started();
        mirror
            .apply(ServerUpdate::PlayerMove {
                player: PlayerId(2),
                next_player: Some(PlayerId(1)),
                card_index: 1,
                card: tile(6, 4),
            })
            .unwrap();

        assert_eq!(mirror.opponents()[0].played, vec![(1, tile(6, 4))]);
        assert_eq!(mirror.chain().open_ends(), Some((2, 4)));
    }

    #[test]
    fn test_apply_move_touching_no_end_is_out_of_sync() {
        let mut mirror = started();
        let err = mirror
            .apply(ServerUpdate::PlayerMove {
                player: PlayerId(2),
                next_player: Some(PlayerId(1)),
                card_index: 0,
                card: tile(4, 4),
            })
            .unwrap_err();
        assert!(matches!(err, ClientError::OutOfSync(t) if t == tile(4, 4)));
    }

    #[test]
    fn test_apply_second_initial_card_is_out_of_sync() {
        let mut mirror = started();
        assert!(mirror
            .apply(ServerUpdate::InitialCard { card: tile(1, 1) })
            .is_err());
    }

    #[test]
    fn test_apply_initial_card_out_of_range_is_out_of_sync() {
        let mut mirror = ClientMirror::new(info(1, "ana"), Vec::new());
        let err = mirror
            .apply(ServerUpdate::InitialCard { card: tile(7, 1) })
            .unwrap_err();
        assert!(matches!(err, ClientError::OutOfSync(t) if t == tile(7, 1)));
        assert!(mirror.chain().is_empty());
    }

    #[test]
    fn test_presumed_legal_checks_turn_and_ends() {
        let mut mirror = started();
        assert!(mirror.presumed_legal(0));
        assert!(!mirror.presumed_legal(1));
        assert!(!mirror.presumed_legal(7));

        mirror
            .apply(ServerUpdate::PlayerTurn {
                player_id: PlayerId(2),
            })
            .unwrap();
        assert!(!mirror.presumed_legal(0));
    }

    #[test]
    fn test_presumed_legal_before_start_is_false() {
        let mut mirror = ClientMirror::new(info(1, "ana"), vec![]);
        mirror
            .apply(ServerUpdate::Cards {
                player_id: PlayerId(1),
                cards: vec![Some(tile(1, 2))],
            })
            .unwrap();
        assert!(!mirror.presumed_legal(0));
    }

    #[test]
    fn test_apply_game_finished_clears_turn() {
        let mut mirror = started();
        mirror
            .apply(ServerUpdate::GameFinished {
                winner: Some(info(2, "bo")),
                reason: "P2 has no tiles left".into(),
            })
            .unwrap();

        assert!(mirror.is_finished());
        assert_eq!(mirror.current_turn(), None);
        assert_eq!(mirror.winner().map(|w| w.id), Some(PlayerId(2)));
        assert!(!mirror.presumed_legal(0));
        assert!(mirror.to_string().contains("Winner: bo"));
    }

    #[test]
    fn test_display_shows_hand_slots() {
        let mut mirror = started();
        mirror
            .apply(ServerUpdate::Log {
                message: "hello".into(),
            })
            .unwrap();
        let text = mirror.to_string();
        assert!(text.contains("Chain: [2,6]"));
        assert!(text.contains("0:[1,2] 1:[3,5]"));
        assert!(text.contains("Turn: yours"));
        assert_eq!(mirror.log(), &["hello".to_string()]);
    }
}
