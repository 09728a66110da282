//! The authoritative turn engine.
//!
//! [`TurnEngine`] owns the deck, the roster, the chain and the turn
//! pointer. It is synchronous and not `Sync`-shared: the server wraps it
//! in a single actor task so every join and move is applied one at a time.
//! Each operation returns the [`GameEvent`]s it produced, in order.

use domino_protocol::{PlayerId, PlayerInfo};

use crate::event::LogScope;
use crate::{Chain, Deck, EngineError, GameConfig, GameEvent, GamePhase, Hand, Player};

/// Game state plus the rules that mutate it.
#[derive(Debug)]
pub struct TurnEngine {
    config: GameConfig,
    deck: Deck,
    roster: Vec<Player>,
    chain: Chain,
    phase: GamePhase,
    /// Roster index of the player to move. `None` outside `InProgress`.
    current: Option<usize>,
    /// Roster index of the winner. Set once, when the game finishes.
    winner: Option<usize>,
}

impl TurnEngine {
    /// Creates an engine in `WaitingForPlayers` that deals from `deck`.
    ///
    /// Fails unless the deck can give every seat a full hand and still
    /// keep at least one tile back for the opener.
    pub fn new(config: GameConfig, deck: Deck) -> Result<Self, EngineError> {
        let needed = config
            .capacity
            .checked_mul(config.hand_size)
            .unwrap_or(usize::MAX);
        if needed >= deck.remaining() {
            return Err(EngineError::DeckExhausted {
                needed,
                available: deck.remaining(),
            });
        }
        Ok(Self {
            config,
            deck,
            roster: Vec::new(),
            chain: Chain::new(),
            phase: GamePhase::WaitingForPlayers,
            current: None,
            winner: None,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// `true` while a join would be accepted.
    pub fn has_open_seat(&self) -> bool {
        self.phase.is_joinable() && self.roster.len() < self.config.capacity
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Players in join order, which is also turn order.
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.roster.iter().find(|p| p.id() == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current.map(|i| &self.roster[i])
    }

    pub fn is_current(&self, id: PlayerId) -> bool {
        self.current_player().is_some_and(|p| p.id() == id)
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.roster[i])
    }

    /// Public identities of everyone seated, in join order.
    pub fn roster_info(&self) -> Vec<PlayerInfo> {
        self.roster.iter().map(|p| p.info().clone()).collect()
    }

    /// A fresh `HandAssigned` snapshot for `id`.
    pub fn hand_snapshot(&self, id: PlayerId) -> Result<GameEvent, EngineError> {
        let player = self.player(id).ok_or(EngineError::UnknownPlayer(id))?;
        Ok(GameEvent::HandAssigned {
            player: id,
            cards: player.hand().to_wire(),
        })
    }

    // -----------------------------------------------------------------------
    // Join / start
    // -----------------------------------------------------------------------

    /// Seats a player and deals their hand.
    ///
    /// The join that fills the last seat also starts the game, so its
    /// events include the opener and the first turn (or the start failure).
    pub fn join(&mut self, info: PlayerInfo) -> Result<Vec<GameEvent>, EngineError> {
        if !self.has_open_seat() {
            return Err(EngineError::RosterFull);
        }

        let available = self.deck.remaining();
        let tiles = self
            .deck
            .pop(self.config.hand_size)
            .ok_or(EngineError::DeckExhausted {
                needed: self.config.hand_size,
                available,
            })?;
        let player = Player::new(info.clone(), Hand::new(tiles));
        let cards = player.hand().to_wire();

        tracing::info!(
            player_id = %info.id,
            name = %info.name,
            seat = self.roster.len(),
            "player joined"
        );
        self.roster.push(player);

        let mut events = vec![
            GameEvent::log(format!("{} joined as {}", info.name, info.id)),
            GameEvent::PlayerJoined {
                player: info.clone(),
            },
            GameEvent::HandAssigned {
                player: info.id,
                cards,
            },
        ];
        if self.roster.len() == self.config.capacity {
            events.extend(self.start());
        }
        Ok(events)
    }

    /// Searches the deck for an opener every player can follow.
    ///
    /// Candidates that fail are discarded. Exhausting the deck ends the
    /// game without a winner.
    fn start(&mut self) -> Vec<GameEvent> {
        while let Some(candidate) = self.deck.pop_one() {
            if !self.roster.iter().all(|p| p.hand().can_follow(&candidate)) {
                tracing::trace!(tile = %candidate, "opener candidate discarded");
                continue;
            }
            let Ok(placement) = self.chain.append(candidate) else {
                continue;
            };

            self.phase = GamePhase::InProgress;
            self.current = Some(0);
            let first = self.roster[0].id();
            tracing::info!(opener = %placement.tile, first = %first, "game started");

            return vec![
                GameEvent::InitialTileRevealed {
                    tile: placement.tile,
                },
                GameEvent::log(format!("Game Initiated with card {}", placement.tile)),
                GameEvent::TurnChanged { player: first },
            ];
        }

        tracing::warn!("deck exhausted without a playable opener");
        self.phase = GamePhase::Finished;
        vec![
            GameEvent::log("Can not start game. Could not initiate playable card"),
            GameEvent::GameFinished {
                winner: None,
                reason: "no playable opener".into(),
            },
        ]
    }

    // -----------------------------------------------------------------------
    // Moves
    // -----------------------------------------------------------------------

    /// Plays the tile in `slot` of `player`'s hand.
    ///
    /// A rejected move yields a single [`GameEvent::InvalidMove`] for the
    /// offender and changes nothing.
    pub fn play(&mut self, player: PlayerId, slot: usize) -> Vec<GameEvent> {
        match self.try_play(player, slot) {
            Ok(events) => events,
            Err(error) => {
                tracing::warn!(player_id = %player, slot, %error, "move rejected");
                vec![GameEvent::InvalidMove { player, error }]
            }
        }
    }

    fn try_play(&mut self, player: PlayerId, slot: usize) -> Result<Vec<GameEvent>, EngineError> {
        match self.phase {
            GamePhase::WaitingForPlayers => return Err(EngineError::GameNotStarted),
            GamePhase::Finished => return Err(EngineError::GameFinished),
            GamePhase::InProgress => {}
        }
        let current = self.current.ok_or(EngineError::GameNotStarted)?;

        // Turn ownership is checked before the hand is touched.
        let current_id = self.roster[current].id();
        if player != current_id {
            return Err(EngineError::NotYourTurn {
                player,
                current: current_id,
            });
        }

        let hand = self.roster[current].hand_mut();
        if slot >= hand.slot_count() {
            return Err(EngineError::SlotOutOfRange(slot));
        }
        let tile = hand.get(slot).ok_or(EngineError::TileAlreadyPlayed)?;
        if !self.chain.is_legal(tile) {
            return Err(EngineError::IllegalTile(tile.to_wire()));
        }
        let tile = hand.take(slot).ok_or(EngineError::TileAlreadyPlayed)?;
        let placement = match self.chain.append(tile) {
            Ok(placement) => placement,
            Err(tile) => {
                let wire = tile.to_wire();
                hand.restore(slot, tile);
                return Err(EngineError::IllegalTile(wire));
            }
        };

        tracing::debug!(
            player_id = %player,
            slot,
            tile = %placement.tile,
            end = ?placement.end,
            "tile played"
        );

        if let Some(reason) = self.end_condition() {
            let mut events = vec![GameEvent::TileMoved {
                player,
                slot,
                tile: placement.tile,
                next_player: None,
            }];
            events.extend(self.finish(reason));
            return Ok(events);
        }

        let (next, skipped) = self.advance_from(current);
        let Some(next) = next else {
            // Unreachable while end_condition is accurate; treat as stalemate.
            let mut events = vec![GameEvent::TileMoved {
                player,
                slot,
                tile: placement.tile,
                next_player: None,
            }];
            events.extend(self.finish("no player can move".into()));
            return Ok(events);
        };

        self.current = Some(next);
        let next_id = self.roster[next].id();
        let mut events = vec![GameEvent::TileMoved {
            player,
            slot,
            tile: placement.tile,
            next_player: Some(next_id),
        }];
        for index in skipped {
            let id = self.roster[index].id();
            tracing::debug!(player_id = %id, "turn skipped");
            events.push(GameEvent::TurnSkipped { player: id });
        }
        Ok(events)
    }

    /// Walks the roster after `from`, wrapping, until someone can move.
    ///
    /// Returns that player's index (possibly `from` itself) and everyone
    /// passed over on the way. Visits each seat at most once.
    fn advance_from(&self, from: usize) -> (Option<usize>, Vec<usize>) {
        let seats = self.roster.len();
        let mut skipped = Vec::new();
        for step in 1..=seats {
            let candidate = (from + step) % seats;
            if self.roster[candidate].hand().has_legal(&self.chain) {
                return (Some(candidate), skipped);
            }
            skipped.push(candidate);
        }
        (None, skipped)
    }

    /// Why the game should end now, if it should.
    fn end_condition(&self) -> Option<String> {
        if let Some(out) = self.roster.iter().find(|p| p.hand().is_empty()) {
            return Some(format!("{} has no tiles left", out.id()));
        }
        if !self.roster.iter().any(|p| p.hand().has_legal(&self.chain)) {
            return Some("no player can move".into());
        }
        None
    }

    fn finish(&mut self, reason: String) -> Vec<GameEvent> {
        self.phase = GamePhase::Finished;
        self.current = None;
        self.winner = select_winner(&self.roster);

        let winner = self.winner().map(|p| p.info().clone());
        tracing::info!(
            winner = ?winner.as_ref().map(|w| w.id),
            %reason,
            "game finished"
        );
        vec![GameEvent::GameFinished { winner, reason }]
    }
}

/// Index of the player with the lowest remaining pip total.
///
/// Ties go to the earliest player in roster order.
pub fn select_winner(players: &[Player]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, player) in players.iter().enumerate() {
        let total = player.hand().pip_total();
        if best.is_none_or(|(_, lowest)| total < lowest) {
            best = Some((index, total));
        }
    }
    best.map(|(index, _)| index)
}

/// `LogMessage` scoped to a single player.
pub fn player_log(player: PlayerId, message: impl Into<String>) -> GameEvent {
    GameEvent::LogMessage {
        scope: LogScope::Player(player),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tile;

    fn info(n: u64) -> PlayerInfo {
        PlayerInfo {
            id: PlayerId(n),
            name: format!("player-{n}"),
            color: "navy".into(),
        }
    }

    fn player(n: u64, tiles: &[(u8, u8)]) -> Player {
        Player::new(
            info(n),
            Hand::new(tiles.iter().map(|&(a, b)| Tile::new(a, b)).collect()),
        )
    }

    fn two_seat_config() -> GameConfig {
        GameConfig {
            capacity: 2,
            hand_size: 2,
        }
    }

    #[test]
    fn test_select_winner_lowest_total() {
        let players = [player(1, &[(6, 6)]), player(2, &[(1, 2)]), player(3, &[(0, 0)])];
        assert_eq!(select_winner(&players), Some(2));
    }

    #[test]
    fn test_select_winner_tie_goes_to_first_in_roster() {
        let players = [player(1, &[(3, 4)]), player(2, &[(1, 6)]), player(3, &[(2, 5)])];
        assert_eq!(select_winner(&players), Some(0));
    }

    #[test]
    fn test_select_winner_empty_roster_is_none() {
        assert_eq!(select_winner(&[]), None);
    }

    #[test]
    fn test_new_rejects_oversized_config() {
        let config = GameConfig {
            capacity: 5,
            hand_size: 5,
        };
        let result = TurnEngine::new(config, Deck::standard());
        assert!(matches!(result, Err(EngineError::DeckExhausted { needed: 25, .. })));
    }

    #[test]
    fn test_new_deck_exactly_dealt_is_rejected() {
        // 3 x 7 takes all 21 tiles and leaves nothing to open with.
        let config = GameConfig {
            capacity: 3,
            hand_size: 7,
        };
        let result = TurnEngine::new(config, Deck::standard());
        assert!(matches!(
            result,
            Err(EngineError::DeckExhausted {
                needed: 21,
                available: 21
            })
        ));
    }

    #[test]
    fn test_new_one_spare_tile_is_accepted() {
        let config = GameConfig {
            capacity: 4,
            hand_size: 5,
        };
        let engine = TurnEngine::new(config, Deck::standard()).unwrap();
        assert_eq!(engine.deck_remaining(), 21);
    }

    #[test]
    fn test_new_overflowing_config_is_rejected() {
        let config = GameConfig {
            capacity: usize::MAX,
            hand_size: 2,
        };
        let result = TurnEngine::new(config, Deck::standard());
        assert!(matches!(
            result,
            Err(EngineError::DeckExhausted {
                needed: usize::MAX,
                available: 21
            })
        ));
    }

    #[test]
    fn test_join_deals_hand_and_waits() {
        let mut engine = TurnEngine::new(GameConfig::default(), Deck::standard()).unwrap();
        let events = engine.join(info(1)).unwrap();

        assert_eq!(engine.phase(), GamePhase::WaitingForPlayers);
        assert_eq!(engine.deck_remaining(), 16);
        assert!(events.contains(&GameEvent::PlayerJoined { player: info(1) }));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::HandAssigned { player, cards } if *player == PlayerId(1) && cards.len() == 5
        )));
    }

    #[test]
    fn test_join_when_full_is_rejected() {
        let deck = Deck::stacked(&[&[(1, 2), (1, 3)], &[(2, 4), (3, 4)]], &[(1, 4)]);
        let mut engine = TurnEngine::new(two_seat_config(), deck).unwrap();
        engine.join(info(1)).unwrap();
        engine.join(info(2)).unwrap();

        assert_eq!(engine.join(info(3)), Err(EngineError::RosterFull));
        assert_eq!(engine.roster().len(), 2);
    }

    #[test]
    fn test_start_discards_until_universal_opener() {
        // P1 holds 1s and 2s, P2 holds 3s and 4s. [5,6] fits nobody, [2,3] fits both.
        let deck =
            Deck::stacked(&[&[(1, 2), (1, 1)], &[(3, 4), (4, 4)]], &[(5, 6), (2, 3), (6, 6)]);
        let mut engine = TurnEngine::new(two_seat_config(), deck).unwrap();
        engine.join(info(1)).unwrap();
        let events = engine.join(info(2)).unwrap();

        assert_eq!(engine.phase(), GamePhase::InProgress);
        assert_eq!(engine.chain().open_ends(), Some((2, 3)));
        assert_eq!(engine.deck_remaining(), 1);
        assert!(engine.is_current(PlayerId(1)));
        assert!(events.contains(&GameEvent::TurnChanged {
            player: PlayerId(1)
        }));
    }

    #[test]
    fn test_start_without_opener_finishes_with_no_winner() {
        let deck = Deck::stacked(&[&[(1, 2), (1, 1)], &[(3, 4), (4, 4)]], &[(5, 6), (6, 6)]);
        let mut engine = TurnEngine::new(two_seat_config(), deck).unwrap();
        engine.join(info(1)).unwrap();
        let events = engine.join(info(2)).unwrap();

        assert!(engine.is_finished());
        assert!(engine.winner().is_none());
        assert!(events.contains(&GameEvent::GameFinished {
            winner: None,
            reason: "no playable opener".into(),
        }));
        assert_eq!(
            engine.play(PlayerId(1), 0),
            vec![GameEvent::InvalidMove {
                player: PlayerId(1),
                error: EngineError::GameFinished
            }]
        );
    }

    #[test]
    fn test_play_before_start_is_rejected() {
        let mut engine = TurnEngine::new(GameConfig::default(), Deck::standard()).unwrap();
        engine.join(info(1)).unwrap();
        assert_eq!(
            engine.play(PlayerId(1), 0),
            vec![GameEvent::InvalidMove {
                player: PlayerId(1),
                error: EngineError::GameNotStarted
            }]
        );
    }

    fn started_two_seat() -> TurnEngine {
        // P1: [1,2] [1,1]   P2: [2,4] [4,4]   opener [2,3]
        let deck = Deck::stacked(&[&[(1, 2), (1, 1)], &[(2, 4), (4, 4)]], &[(2, 3), (6, 6)]);
        let mut engine = TurnEngine::new(two_seat_config(), deck).unwrap();
        engine.join(info(1)).unwrap();
        engine.join(info(2)).unwrap();
        engine
    }

    #[test]
    fn test_play_wrong_player_checked_first() {
        let mut engine = started_two_seat();
        // Slot 9 is out of range too, but turn ownership wins.
        let events = engine.play(PlayerId(2), 9);
        assert_eq!(
            events,
            vec![GameEvent::InvalidMove {
                player: PlayerId(2),
                error: EngineError::NotYourTurn {
                    player: PlayerId(2),
                    current: PlayerId(1)
                }
            }]
        );
        assert!(engine.is_current(PlayerId(1)));
    }

    #[test]
    fn test_play_out_of_range_slot_is_rejected() {
        let mut engine = started_two_seat();
        let events = engine.play(PlayerId(1), 2);
        assert!(matches!(
            &events[..],
            [GameEvent::InvalidMove {
                error: EngineError::SlotOutOfRange(2),
                ..
            }]
        ));
    }

    #[test]
    fn test_play_illegal_tile_leaves_state_unchanged() {
        let mut engine = started_two_seat();
        // [1,1] touches neither 2 nor 3.
        let events = engine.play(PlayerId(1), 1);
        assert_eq!(
            events[0].clone(),
            GameEvent::InvalidMove {
                player: PlayerId(1),
                error: EngineError::IllegalTile(domino_protocol::WireTile { x: 1, y: 1 })
            }
        );
        assert_eq!(engine.chain().len(), 1);
        assert_eq!(engine.player(PlayerId(1)).unwrap().hand().remaining(), 2);
        assert!(engine.is_current(PlayerId(1)));
    }

    #[test]
    fn test_play_skips_player_without_legal_tile() {
        let mut engine = started_two_seat();
        let events = engine.play(PlayerId(1), 0);

        // [1,2] matches head 2 on face_b: new head 1, ends (1,3).
        // P2 holds [2,4] [4,4] and is passed over.
        assert_eq!(
            events[0],
            GameEvent::TileMoved {
                player: PlayerId(1),
                slot: 0,
                tile: domino_protocol::WireTile { x: 1, y: 2 },
                next_player: Some(PlayerId(1)),
            }
        );
        assert_eq!(events[1], GameEvent::TurnSkipped { player: PlayerId(2) });
        assert_eq!(engine.chain().open_ends(), Some((1, 3)));
        assert!(engine.is_current(PlayerId(1)));
    }

    #[test]
    fn test_play_already_played_slot_is_rejected() {
        let mut engine = started_two_seat();
        engine.play(PlayerId(1), 0);
        // P2 was skipped, so P1 is to move again.
        let events = engine.play(PlayerId(1), 0);
        assert!(matches!(
            &events[..],
            [GameEvent::InvalidMove {
                error: EngineError::TileAlreadyPlayed,
                ..
            }]
        ));
    }

    #[test]
    fn test_player_log_is_scoped() {
        assert_eq!(
            player_log(PlayerId(4), "hi"),
            GameEvent::LogMessage {
                scope: LogScope::Player(PlayerId(4)),
                message: "hi".into()
            }
        );
    }
}
