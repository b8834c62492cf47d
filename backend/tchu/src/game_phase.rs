use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Phases of a game, which act as the states of the orchestrator.
///
/// # JSON
/// Phases are serialized in snake_case.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
  /// Players are told who they are, and pick their initial tickets.
  Setup,
  /// The main turn-based game.
  Playing,
  /// A player is down to two cars or less: everyone plays one more turn.
  LastLap,
  /// Points are counted and the winner is announced.
  Scoring,
  Done,
}

impl GamePhase {
  /// The phase after a turn, given whether a last player has been designated and whether the
  /// player who just played was the last one.
  pub fn after_turn(self, last_player_set: bool, was_last_player: bool) -> GamePhase {
    match self {
      GamePhase::Playing if last_player_set => GamePhase::LastLap,
      GamePhase::LastLap if was_last_player => GamePhase::Scoring,
      phase => phase,
    }
  }
}
