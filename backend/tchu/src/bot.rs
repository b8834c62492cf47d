//! A player that picks random legal moves, for simulations and as a stand-in opponent.

use crate::bag::SortedBag;
use crate::card::Card;
use crate::card_state::FACE_UP_CARDS_COUNT;
use crate::error::{GameError, GameResult};
use crate::game_state::PublicGameState;
use crate::map::Map;
use crate::player::{DecisionSource, DrawSlot, PlayerId, PresentationSink, TurnKind};
use crate::player_state::PlayerState;
use crate::route::Route;
use crate::ticket::Ticket;

use rand::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// How often the bot claims a route when it could also draw cards.
const CLAIM_PROBABILITY: f64 = 0.6;

/// A bot which only knows the rules, and follows them at random.
pub struct RandomPlayer {
    map: Arc<Map>,
    rng: StdRng,
    own_id: Option<PlayerId>,
    state: Option<(PublicGameState, PlayerState)>,
    initial_tickets: SortedBag<Ticket>,
    claim: Option<(Route, SortedBag<Card>)>,
}

impl RandomPlayer {
    /// A bot playing on `map`, whose choices only depend on `seed`.
    pub fn new(map: Arc<Map>, seed: u64) -> Self {
        Self::with_rng(map, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(map: Arc<Map>) -> Self {
        Self::with_rng(map, StdRng::from_entropy())
    }

    fn with_rng(map: Arc<Map>, rng: StdRng) -> Self {
        Self {
            map,
            rng,
            own_id: None,
            state: None,
            initial_tickets: SortedBag::new(),
            claim: None,
        }
    }

    fn state(&self) -> GameResult<&(PublicGameState, PlayerState)> {
        self.state
            .as_ref()
            .ok_or_else(|| GameError::InvalidArgument("The bot has not seen the game yet.".to_string()))
    }

    /// Keeps at least all tickets but two, and at least one.
    fn keep_some(&mut self, tickets: &SortedBag<Ticket>) -> SortedBag<Ticket> {
        let mut tickets = tickets.as_slice().to_vec();
        tickets.shuffle(&mut self.rng);
        let min = tickets.len().saturating_sub(2).max(1).min(tickets.len());
        let count = self.rng.gen_range(min..=tickets.len());
        tickets.truncate(count);
        tickets.into()
    }

    /// Every route the bot may claim right now, with every way to pay for it.
    fn claimable_routes(&self) -> GameResult<Vec<(Route, Vec<SortedBag<Card>>)>> {
        let (public, own) = self.state()?;
        let claimed = public.claimed_routes();

        let mut claimable = Vec::new();
        for route in self.map.routes() {
            if claimed.iter().any(|claimed| claimed.id() == route.id()) || !own.can_claim_route(route) {
                continue;
            }
            claimable.push((route.clone(), own.possible_claim_cards(route)?));
        }
        Ok(claimable)
    }
}

impl PresentationSink for RandomPlayer {
    fn init_players(
        &mut self,
        own_id: PlayerId,
        _player_names: &BTreeMap<PlayerId, String>,
    ) -> GameResult<()> {
        self.own_id = Some(own_id);
        Ok(())
    }

    fn receive_info(&mut self, _info: &str) -> GameResult<()> {
        Ok(())
    }

    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) -> GameResult<()> {
        self.state = Some((state.clone(), own_state.clone()));
        Ok(())
    }

    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) -> GameResult<()> {
        self.initial_tickets = tickets.clone();
        Ok(())
    }
}

impl DecisionSource for RandomPlayer {
    fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>> {
        let offered = self.initial_tickets.clone();
        Ok(self.keep_some(&offered))
    }

    fn next_turn(&mut self) -> GameResult<TurnKind> {
        let (can_draw_cards, can_draw_tickets) = {
            let (public, _) = self.state()?;
            (public.can_draw_cards(), public.can_draw_tickets())
        };
        let claimable = self.claimable_routes()?;

        let turn_kind = if !claimable.is_empty()
            && (!can_draw_cards || self.rng.gen_bool(CLAIM_PROBABILITY))
        {
            let (route, options) = &claimable[self.rng.gen_range(0..claimable.len())];
            let cards = options.choose(&mut self.rng).cloned().unwrap_or_default();
            self.claim = Some((route.clone(), cards));
            TurnKind::ClaimRoute
        } else if can_draw_cards {
            TurnKind::DrawCards
        } else if can_draw_tickets {
            TurnKind::DrawTickets
        } else {
            // Nothing is possible: an empty claim passes the turn.
            let route = self.map.routes().choose(&mut self.rng).cloned().ok_or_else(|| {
                GameError::InvalidArgument("The map has no routes.".to_string())
            })?;
            self.claim = Some((route, SortedBag::new()));
            TurnKind::ClaimRoute
        };

        debug!(player = ?self.own_id, %turn_kind, "Bot chose its turn");
        Ok(turn_kind)
    }

    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>> {
        Ok(self.keep_some(options))
    }

    fn draw_slot(&mut self) -> GameResult<DrawSlot> {
        let index = self.rng.gen_range(DrawSlot::DECK_INDEX..FACE_UP_CARDS_COUNT as i32);
        DrawSlot::from_index(index)
    }

    fn claimed_route(&mut self) -> GameResult<Route> {
        self.claim
            .as_ref()
            .map(|(route, _)| route.clone())
            .ok_or_else(|| GameError::InvalidArgument("The bot did not pick a route.".to_string()))
    }

    fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>> {
        self.claim
            .take()
            .map(|(_, cards)| cards)
            .ok_or_else(|| GameError::InvalidArgument("The bot did not pick a route.".to_string()))
    }

    fn choose_additional_cards(
        &mut self,
        options: &[SortedBag<Card>],
    ) -> GameResult<SortedBag<Card>> {
        Ok(options.choose(&mut self.rng).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameState;

    fn bot_in_game(seed: u64) -> GameResult<(RandomPlayer, GameState)> {
        let map = Map::standard();
        let mut rng = StdRng::seed_from_u64(seed);
        let state = GameState::initial(map.tickets(), 2, &mut rng)?;

        let mut bot = RandomPlayer::new(map, seed);
        let id = state.current_player_id();
        bot.init_players(id, &BTreeMap::new())?;
        bot.update_state(&state.to_public(), state.player_state(id)?)?;
        Ok((bot, state))
    }

    #[test]
    fn keeps_enough_tickets() -> GameResult<()> {
        let map = Map::standard();
        let offered: SortedBag<Ticket> = map.tickets().iter().take(5).cloned().collect();
        let mut bot = RandomPlayer::new(map, 3);
        bot.set_initial_ticket_choice(&offered)?;

        for _ in 0..20 {
            let kept = bot.choose_initial_tickets()?;
            assert!((3..=5).contains(&kept.len()));
            assert!(offered.contains_all(&kept));
        }

        let single: SortedBag<Ticket> = offered.iter().take(1).cloned().collect();
        assert_eq!(bot.choose_tickets(&single)?, single);
        Ok(())
    }

    #[test]
    fn claims_are_affordable() -> GameResult<()> {
        for seed in 0..20 {
            let (mut bot, state) = bot_in_game(seed)?;
            if bot.next_turn()? == TurnKind::ClaimRoute {
                let route = bot.claimed_route()?;
                let cards = bot.initial_claim_cards()?;
                let own = state.current_player_state()?;
                assert!(own.possible_claim_cards(&route)?.contains(&cards));
            }
        }
        Ok(())
    }

    #[test]
    fn draw_slots_are_valid() -> GameResult<()> {
        let (mut bot, _) = bot_in_game(11)?;
        for _ in 0..50 {
            let slot = bot.draw_slot()?;
            assert!((DrawSlot::DECK_INDEX..5).contains(&slot.to_index()));
        }
        Ok(())
    }

    #[test]
    fn needs_a_state_to_play() {
        let mut bot = RandomPlayer::new(Map::standard(), 0);
        assert!(bot.next_turn().is_err());
    }
}
