//! Turns game events into wire updates for the right players.

use domino_engine::{EventKind, GameEvent, LogScope};
use domino_protocol::ServerUpdate;

use crate::{EventBus, Recipient, SessionRegistry};

/// Registers one bus handler per event kind that routes the event's
/// updates into `registry`.
pub fn install_fanout(bus: &EventBus<GameEvent>, registry: &SessionRegistry) {
    for kind in EventKind::ALL {
        let registry = registry.clone();
        bus.add_handler(kind, move |event: &GameEvent| {
            for (recipient, update) in updates_for(event) {
                registry.deliver(recipient, update);
            }
        });
    }
}

/// The wire updates an event produces and who receives each one.
///
/// Hands only ever go to their owner, a join is announced to everyone but
/// the joiner, and rejections go back to the offender alone.
pub fn updates_for(event: &GameEvent) -> Vec<(Recipient, ServerUpdate)> {
    match event {
        GameEvent::PlayerJoined { player } => vec![(
            Recipient::AllExcept(player.id),
            ServerUpdate::NewPlayer {
                player: player.clone(),
            },
        )],
        GameEvent::HandAssigned { player, cards } => vec![(
            Recipient::Player(*player),
            ServerUpdate::Cards {
                player_id: *player,
                cards: cards.clone(),
            },
        )],
        GameEvent::InitialTileRevealed { tile } => {
            vec![(Recipient::All, ServerUpdate::InitialCard { card: *tile })]
        }
        GameEvent::TurnChanged { player } => vec![(
            Recipient::All,
            ServerUpdate::PlayerTurn { player_id: *player },
        )],
        GameEvent::TurnSkipped { player } => vec![(
            Recipient::All,
            log(format!("{player} not have playable card. Skipping turn...")),
        )],
        GameEvent::InvalidMove { player, error } => {
            vec![(Recipient::Player(*player), log(error.to_string()))]
        }
        GameEvent::TileMoved {
            player,
            slot,
            tile,
            next_player,
        } => vec![(
            Recipient::All,
            ServerUpdate::PlayerMove {
                player: *player,
                next_player: *next_player,
                card_index: *slot,
                card: *tile,
            },
        )],
        GameEvent::GameFinished { winner, reason } => {
            let line = match winner {
                Some(w) => format!("GAME FINISHED. Winner is {} ({})", w.name, w.id),
                None => format!("GAME FINISHED. No winner: {reason}"),
            };
            vec![
                (
                    Recipient::All,
                    ServerUpdate::GameFinished {
                        winner: winner.clone(),
                        reason: reason.clone(),
                    },
                ),
                (Recipient::All, log(line)),
            ]
        }
        GameEvent::LogMessage { scope, message } => {
            let recipient = match scope {
                LogScope::Everyone => Recipient::All,
                LogScope::Player(id) => Recipient::Player(*id),
            };
            vec![(recipient, log(message.clone()))]
        }
    }
}

fn log(message: String) -> ServerUpdate {
    ServerUpdate::Log { message }
}

#[cfg(test)]
mod tests {
    use domino_engine::EngineError;
    use domino_protocol::{PlayerId, PlayerInfo, WireTile};

    use super::*;

    fn ana() -> PlayerInfo {
        PlayerInfo {
            id: PlayerId(1),
            name: "ana".into(),
            color: "navy".into(),
        }
    }

    #[test]
    fn test_updates_for_player_joined_excludes_joiner() {
        let updates = updates_for(&GameEvent::PlayerJoined { player: ana() });
        assert_eq!(
            updates,
            vec![(
                Recipient::AllExcept(PlayerId(1)),
                ServerUpdate::NewPlayer { player: ana() }
            )]
        );
    }

    #[test]
    fn test_updates_for_hand_goes_to_owner_only() {
        let cards = vec![Some(WireTile { x: 1, y: 2 }), None];
        let updates = updates_for(&GameEvent::HandAssigned {
            player: PlayerId(2),
            cards: cards.clone(),
        });
        assert_eq!(
            updates,
            vec![(
                Recipient::Player(PlayerId(2)),
                ServerUpdate::Cards {
                    player_id: PlayerId(2),
                    cards
                }
            )]
        );
    }

    #[test]
    fn test_updates_for_invalid_move_is_scoped_log() {
        let updates = updates_for(&GameEvent::InvalidMove {
            player: PlayerId(3),
            error: EngineError::IllegalTile(WireTile { x: 2, y: 5 }),
        });
        assert_eq!(
            updates,
            vec![(
                Recipient::Player(PlayerId(3)),
                ServerUpdate::Log {
                    message: "Card [2,5] not playable. Please select another".into()
                }
            )]
        );
    }

    #[test]
    fn test_updates_for_tile_moved_broadcasts_normalized_faces() {
        let updates = updates_for(&GameEvent::TileMoved {
            player: PlayerId(1),
            slot: 3,
            tile: WireTile { x: 6, y: 2 },
            next_player: Some(PlayerId(2)),
        });
        assert_eq!(
            updates,
            vec![(
                Recipient::All,
                ServerUpdate::PlayerMove {
                    player: PlayerId(1),
                    next_player: Some(PlayerId(2)),
                    card_index: 3,
                    card: WireTile { x: 6, y: 2 },
                }
            )]
        );
    }

    #[test]
    fn test_updates_for_game_finished_announces_winner() {
        let updates = updates_for(&GameEvent::GameFinished {
            winner: Some(ana()),
            reason: "P1 has no tiles left".into(),
        });
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|(r, _)| *r == Recipient::All));
        assert_eq!(
            updates[1].1,
            ServerUpdate::Log {
                message: "GAME FINISHED. Winner is ana (P1)".into()
            }
        );
    }
}
