//! The event surface: what clients send and what the room sends back.
//!
//! Both enums are adjacently tagged, so every frame looks like
//! `{"type": "guess", "data": {"guess": "mèo"}}`. Event names and payload
//! fields are camelCase to match the browser client.

use serde::{Deserialize, Serialize};

use crate::{GameMode, Player, PlayerId, ScoreEntry, Stroke};

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Enter the roster under a display name.
    JoinGame { player_name: String },

    /// Leave the roster. The connection stays open and may join again.
    LeaveGame,

    /// Host only: start a mini-game by wire name (`quickdraw`, `trivia`,
    /// `spy`). Unknown names are dropped by the room.
    StartGame { game: String },

    /// A canvas segment from the drawing mode.
    Draw(Stroke),

    /// Wipe everyone else's canvas.
    ClearCanvas,

    /// A guess (or ordinary chat) in the drawing mode.
    Guess { guess: String },

    /// Index of the chosen answer in the quiz mode.
    TriviaAnswer { answer: usize },

    /// Discussion message in the deduction mode.
    SpyChat { message: String },

    /// Accuse a player during the deduction vote.
    Vote { player_id: PlayerId },
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Sent only to the client that just joined.
    PlayerJoined {
        player_id: PlayerId,
        player_name: String,
        is_host: bool,
    },

    /// Full roster in join order.
    UpdatePlayers { players: Vec<Player> },

    GameStarted { game: GameMode },

    /// Start of a drawing round. `word` is only filled in for the drawer.
    NewRound {
        drawer: PlayerId,
        drawer_name: String,
        word: Option<String>,
        word_length: usize,
        time: u64,
    },

    /// Relayed canvas segment.
    Draw(Stroke),

    /// Relayed canvas wipe.
    ClearCanvas,

    CorrectGuess {
        player: String,
        points: u32,
        scores: Vec<ScoreEntry>,
    },

    /// A relayed guess that was not accepted as correct.
    ChatMessage { player: String, message: String },

    /// End of a scored mode. `winner` is `None` only for an empty board.
    GameOver {
        winner: Option<PlayerId>,
        score: u32,
        scores: Vec<ScoreEntry>,
    },

    TriviaQuestion {
        question: String,
        answers: Vec<String>,
        round: u32,
    },

    /// Private, at round close: the right index and what this player chose.
    TriviaResults {
        correct_answer: usize,
        player_answer: Option<usize>,
    },

    TriviaScores { scores: Vec<ScoreEntry> },

    /// Private role card. The spy gets `location: None`.
    SpyRole {
        is_spy: bool,
        location: Option<String>,
    },

    SpyChat { player: String, message: String },

    /// Discussion is over; votes are now accepted.
    VotingTime,

    VoteResults {
        spy_caught: bool,
        spy_name: String,
        location: String,
    },

    /// User-facing rejection or lobby-return notice.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_join_json_format() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"joinGame","data":{"playerName":"Hoa"}}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinGame {
                player_name: "Hoa".into()
            }
        );
    }

    #[test]
    fn test_client_event_unit_variant_without_data() {
        let event: ClientEvent = serde_json::from_str(r#"{"type":"leaveGame"}"#).unwrap();
        assert_eq!(event, ClientEvent::LeaveGame);
    }

    #[test]
    fn test_client_event_draw_carries_stroke() {
        let json = r##"{"type":"draw","data":{"x0":0.1,"y0":0.2,"x1":0.3,"y1":0.4,"color":"#000","size":3.0}}"##;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match event {
            ClientEvent::Draw(stroke) => {
                assert_eq!(stroke.color, "#000");
                assert_eq!(stroke.size, 3.0);
            }
            other => panic!("expected Draw, got {other:?}"),
        }
    }

    #[test]
    fn test_client_event_vote_uses_player_id_field() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"vote","data":{"playerId":12}}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::Vote {
                player_id: PlayerId(12)
            }
        );
    }

    #[test]
    fn test_server_event_new_round_hides_word_as_null() {
        let event = ServerEvent::NewRound {
            drawer: PlayerId(1),
            drawer_name: "An".into(),
            word: None,
            word_length: 3,
            time: 60,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "newRound");
        assert!(json["data"]["word"].is_null());
        assert_eq!(json["data"]["wordLength"], 3);
        assert_eq!(json["data"]["drawerName"], "An");
    }

    #[test]
    fn test_server_event_game_over_keeps_score_order() {
        let event = ServerEvent::GameOver {
            winner: Some(PlayerId(2)),
            score: 100,
            scores: vec![
                ScoreEntry {
                    player_id: PlayerId(2),
                    score: 100,
                },
                ScoreEntry {
                    player_id: PlayerId(1),
                    score: 100,
                },
            ],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["data"]["winner"], 2);
        assert_eq!(json["data"]["scores"][0]["playerId"], 2);
        assert_eq!(json["data"]["scores"][1]["playerId"], 1);
    }

    #[test]
    fn test_server_event_voting_time_json_format() {
        let json = serde_json::to_value(ServerEvent::VotingTime).unwrap();
        assert_eq!(json["type"], "votingTime");
    }

    #[test]
    fn test_server_event_vote_results_json_format() {
        let event = ServerEvent::VoteResults {
            spy_caught: true,
            spy_name: "Binh".into(),
            location: "Sân bay".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "voteResults");
        assert_eq!(json["data"]["spyCaught"], true);
        assert_eq!(json["data"]["spyName"], "Binh");
    }
}
