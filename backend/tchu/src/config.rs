use crate::error::{check_argument, GameResult};
use crate::map::Map;

use std::sync::Arc;

pub const MIN_PLAYER_COUNT: usize = 2;
pub const MAX_PLAYER_COUNT: usize = 3;

/// Everything fixed for the whole duration of a game session.
///
/// Built once, then shared by the orchestrator and by everything that encodes or decodes
/// routes and tickets.
#[derive(Clone, Debug)]
pub struct GameConfig {
    player_count: usize,
    map: Arc<Map>,
}

impl GameConfig {
    /// Returns an `Err` if `player_count` is not 2 or 3.
    ///
    /// # Example
    /// ```
    /// use tchu::config::GameConfig;
    /// use tchu::map::Map;
    ///
    /// assert!(GameConfig::new(3, Map::standard()).is_ok());
    /// assert!(GameConfig::new(4, Map::standard()).is_err());
    /// ```
    pub fn new(player_count: usize, map: Arc<Map>) -> GameResult<Self> {
        check_argument(
            (MIN_PLAYER_COUNT..=MAX_PLAYER_COUNT).contains(&player_count),
            || {
                format!(
                    "A game needs between {} and {} players, got {}.",
                    MIN_PLAYER_COUNT, MAX_PLAYER_COUNT, player_count
                )
            },
        )?;
        Ok(Self { player_count, map })
    }

    /// A game on the standard map.
    pub fn standard(player_count: usize) -> GameResult<Self> {
        Self::new(player_count, Map::standard())
    }

    #[inline]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[inline]
    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }
}
