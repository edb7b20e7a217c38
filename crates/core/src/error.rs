use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TraceError {
    #[error("deck has {len} cards, need {needed} to deal {players} hands")]
    DeckTooShort {
        len: usize,
        needed: usize,
        players: usize,
    },
    #[error("episode declares {declared} actions but only {available} steps are recorded")]
    TruncatedEpisode { declared: usize, available: usize },
    #[error("no color name for index {0}")]
    UnknownColor(u8),
    #[error("no description for action code {0}")]
    UnknownAction(i64),
    #[error("game data contains an invalid action value: {0}")]
    InvalidActionValue(i64),
    #[error("acting player {player} out of range for a {players}-player game")]
    UnknownPlayer { player: usize, players: usize },
    #[error("hand index {idx} out of range for player {player} holding {len} cards")]
    HandIndexOutOfRange {
        player: usize,
        idx: usize,
        len: usize,
    },
    #[error("step {step} has {actors} acting players, expected exactly one")]
    AmbiguousStep { step: usize, actors: usize },
}
