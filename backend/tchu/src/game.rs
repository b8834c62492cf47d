use crate::bag::SortedBag;
use crate::card::Card;
use crate::config::GameConfig;
use crate::error::{check_argument, GameError, GameResult};
use crate::game_phase::GamePhase;
use crate::game_state::GameState;
use crate::info::{Info, LONGEST_TRAIL_BONUS_POINTS};
use crate::player::{DrawSlot, Player, PlayerId, TurnKind};
use crate::route::{Route, ADDITIONAL_TUNNEL_CARDS};
use crate::ticket::Ticket;
use crate::trail::Trail;

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How many tickets each player picks from at the start of the game.
pub const INITIAL_TICKETS_COUNT: usize = 5;
/// How many tickets are revealed when a player draws tickets during the game.
pub const IN_GAME_TICKETS_COUNT: usize = 3;

/// How a game ended.
///
/// # JSON
/// ```json
/// {"points":{"player_1":54,"player_2":61},"longest_trail_bonus":["player_2"],"verdict":{"winner":"player_2"}}
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Winner(PlayerId),
    /// Every player sharing the best total, in seating order.
    Draw(Vec<PlayerId>),
}

/// The final count of a game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GameOutcome {
    /// Final points of every player, bonus included.
    pub points: BTreeMap<PlayerId, i32>,
    /// The players who got the longest trail bonus.
    pub longest_trail_bonus: Vec<PlayerId>,
    pub verdict: Verdict,
}

impl GameOutcome {
    /// Grants the longest trail bonus to every player tied for the longest trail, then finds
    /// the winner.
    pub fn compute(
        final_points: &BTreeMap<PlayerId, i32>,
        trail_lengths: &BTreeMap<PlayerId, u32>,
    ) -> GameOutcome {
        let longest = trail_lengths.values().copied().max().unwrap_or(0);
        let longest_trail_bonus: Vec<PlayerId> = trail_lengths
            .iter()
            .filter(|(_, length)| **length == longest)
            .map(|(id, _)| *id)
            .collect();

        let points: BTreeMap<PlayerId, i32> = final_points
            .iter()
            .map(|(id, points)| {
                let bonus = if longest_trail_bonus.contains(id) {
                    LONGEST_TRAIL_BONUS_POINTS
                } else {
                    0
                };
                (*id, points + bonus)
            })
            .collect();

        let best = points.values().copied().max().unwrap_or(0);
        let mut winners: Vec<PlayerId> = points
            .iter()
            .filter(|(_, points)| **points == best)
            .map(|(id, _)| *id)
            .collect();
        let verdict = if winners.len() == 1 {
            Verdict::Winner(winners.remove(0))
        } else {
            Verdict::Draw(winners)
        };

        GameOutcome {
            points,
            longest_trail_bonus,
            verdict,
        }
    }

    /// The best total among the players who did not win, if there is a single winner.
    pub fn best_loser_points(&self) -> Option<i32> {
        match &self.verdict {
            Verdict::Winner(winner) => self
                .points
                .iter()
                .filter(|(id, _)| *id != winner)
                .map(|(_, points)| *points)
                .max(),
            Verdict::Draw(_) => None,
        }
    }
}

/// Runs a complete game, asking each [`Player`] for decisions and keeping all of them informed.
///
/// The game holds the players and their names. The game state itself flows from one
/// transition to the next and is never shared.
pub struct Game<R: Rng> {
    config: GameConfig,
    phase: GamePhase,
    players: BTreeMap<PlayerId, Box<dyn Player>>,
    player_names: BTreeMap<PlayerId, String>,
    infos: BTreeMap<PlayerId, Info>,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Returns an `Err` unless there is exactly one player and one name for each seat of the
    /// configuration.
    pub fn new(
        config: GameConfig,
        players: BTreeMap<PlayerId, Box<dyn Player>>,
        player_names: BTreeMap<PlayerId, String>,
        rng: R,
    ) -> GameResult<Self> {
        let seats = PlayerId::all(config.player_count());
        check_argument(players.keys().eq(seats.iter()), || {
            format!("Expected one player per seat, for {} seats.", seats.len())
        })?;
        check_argument(player_names.keys().eq(seats.iter()), || {
            format!("Expected one name per seat, for {} seats.", seats.len())
        })?;

        let infos = player_names
            .iter()
            .map(|(id, name)| (*id, Info::new(name.clone())))
            .collect();

        Ok(Self {
            config,
            phase: GamePhase::Setup,
            players,
            player_names,
            infos,
            rng,
        })
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Plays the game to its end.
    ///
    /// Returns an `Err` if a player fails to answer, or takes a decision that the rules forbid.
    pub fn play(&mut self) -> GameResult<GameOutcome> {
        let mut state = self.setup()?;
        self.change_phase(GamePhase::Playing);

        while matches!(self.phase, GamePhase::Playing | GamePhase::LastLap) {
            let current_player = state.current_player_id();
            state = self.play_turn(state)?;

            if state.last_turn_begins() {
                let car_count = state.current_player_state()?.car_count();
                let message = self.info(current_player)?.last_turn_begins(car_count);
                self.receive_info_for_all(&message)?;
            }
            let was_last_player = state.last_player() == Some(current_player);
            state = state.for_next_turn();
            self.update_state_for_all(&state)?;

            let next_phase = self
                .phase
                .after_turn(state.last_player().is_some(), was_last_player);
            self.change_phase(next_phase);
        }

        let outcome = self.score(&state)?;
        self.change_phase(GamePhase::Done);
        Ok(outcome)
    }

    fn change_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            info!(from = %self.phase, to = %phase, "Game phase changed");
            self.phase = phase;
        }
    }

    fn setup(&mut self) -> GameResult<GameState> {
        let player_count = self.config.player_count();
        for player in self.players.values_mut() {
            player.set_player_count(player_count)?;
        }

        let mut state = GameState::initial(self.config.map().tickets(), player_count, &mut self.rng)?;

        let names = self.player_names.clone();
        for (id, player) in self.players.iter_mut() {
            player.init_players(*id, &names)?;
        }
        let message = self.info(state.current_player_id())?.will_play_first();
        self.receive_info_for_all(&message)?;

        let mut offers = BTreeMap::new();
        for id in PlayerId::all(player_count) {
            let offer = state.top_tickets(INITIAL_TICKETS_COUNT)?;
            self.player(*id)?.set_initial_ticket_choice(&offer)?;
            state = state.without_top_tickets(INITIAL_TICKETS_COUNT)?;
            let public = state.to_public();
            self.player(*id)?
                .update_state(&public, state.player_state(*id)?)?;
            offers.insert(*id, offer);
        }
        self.update_state_for_all(&state)?;

        for (id, offer) in &offers {
            let chosen = self.player(*id)?.choose_initial_tickets()?;
            Self::check_ticket_choice(offer, &chosen)?;
            state = state.with_initially_chosen_tickets(*id, &chosen)?;
        }
        for id in offers.keys() {
            let message = self.info(*id)?.kept_tickets(state.player_state(*id)?.ticket_count());
            self.receive_info_for_all(&message)?;
        }

        debug!(first_player = %state.current_player_id(), "Setup done");
        Ok(state)
    }

    fn check_ticket_choice(offer: &SortedBag<Ticket>, chosen: &SortedBag<Ticket>) -> GameResult<()> {
        check_argument(!chosen.is_empty(), || {
            "At least one ticket must be kept.".to_string()
        })?;
        check_argument(offer.contains_all(chosen), || {
            format!("The chosen tickets {:?} were not offered.", chosen)
        })
    }

    fn play_turn(&mut self, state: GameState) -> GameResult<GameState> {
        let current_player = state.current_player_id();
        let message = self.info(current_player)?.can_play();
        self.receive_info_for_all(&message)?;
        self.update_state_for_all(&state)?;

        let turn_kind = self.player(current_player)?.next_turn()?;
        debug!(player = %current_player, %turn_kind, "Playing turn");
        match turn_kind {
            TurnKind::DrawTickets => self.draw_tickets_turn(state),
            TurnKind::DrawCards => self.draw_cards_turn(state),
            TurnKind::ClaimRoute => self.claim_route_turn(state),
        }
    }

    fn draw_tickets_turn(&mut self, state: GameState) -> GameResult<GameState> {
        check_argument(state.can_draw_tickets(), || {
            "There are no tickets left to draw.".to_string()
        })?;
        let current_player = state.current_player_id();
        let count = IN_GAME_TICKETS_COUNT.min(state.ticket_count());

        let message = self.info(current_player)?.drew_tickets(count);
        self.receive_info_for_all(&message)?;
        let drawn = state.top_tickets(count)?;
        let chosen = self.player(current_player)?.choose_tickets(&drawn)?;
        Self::check_ticket_choice(&drawn, &chosen)?;

        let state = state.with_chosen_additional_tickets(&drawn, &chosen)?;
        let message = self.info(current_player)?.kept_tickets(chosen.len());
        self.receive_info_for_all(&message)?;
        Ok(state)
    }

    fn draw_cards_turn(&mut self, mut state: GameState) -> GameResult<GameState> {
        check_argument(state.can_draw_cards(), || {
            "There are not enough cards left to draw.".to_string()
        })?;
        let current_player = state.current_player_id();

        for draw in 0..2 {
            if draw == 1 {
                self.update_state_for_all(&state)?;
            }
            let slot = self.player(current_player)?.draw_slot()?;
            state = state.with_cards_deck_recreated_if_needed(&mut self.rng)?;
            match slot {
                DrawSlot::FaceUp(slot) => {
                    let card = state.card_state().face_up_card(slot)?;
                    let message = self.info(current_player)?.drew_visible_card(card);
                    self.receive_info_for_all(&message)?;
                    state = state.with_drawn_face_up_card(slot)?;
                }
                DrawSlot::Deck => {
                    let message = self.info(current_player)?.drew_blind_card();
                    self.receive_info_for_all(&message)?;
                    state = state.with_blind_drawn_card()?;
                }
            }
        }
        Ok(state)
    }

    fn claim_route_turn(&mut self, state: GameState) -> GameResult<GameState> {
        let current_player = state.current_player_id();
        let route = self.player(current_player)?.claimed_route()?;
        let initial_cards = self.player(current_player)?.initial_claim_cards()?;

        let already_claimed = state
            .to_public()
            .claimed_routes()
            .iter()
            .any(|claimed| claimed.id() == route.id());
        let player_state = state.current_player_state()?;
        let can_pay = !initial_cards.is_empty()
            && player_state.can_claim_route(&route)
            && player_state
                .possible_claim_cards(&route)
                .map_or(false, |options| options.contains(&initial_cards));

        if already_claimed || !can_pay {
            warn!(
                player = %current_player,
                route = route.id(),
                already_claimed,
                "Rejected route claim"
            );
            return self.did_not_claim(state, &route);
        }

        if !route.is_tunnel() {
            return self.claimed(state, route, &initial_cards);
        }
        self.claim_tunnel(state, route, initial_cards)
    }

    fn claim_tunnel(
        &mut self,
        mut state: GameState,
        route: Route,
        initial_cards: SortedBag<Card>,
    ) -> GameResult<GameState> {
        let current_player = state.current_player_id();
        let message = self
            .info(current_player)?
            .attempts_tunnel_claim(&route, &initial_cards);
        self.receive_info_for_all(&message)?;

        let available = state.card_state().deck_size() + state.card_state().discards_size();
        if available < ADDITIONAL_TUNNEL_CARDS {
            warn!(available, "Not enough cards left to draw for a tunnel");
            return self.did_not_claim(state, &route);
        }

        let mut drawn_cards = Vec::with_capacity(ADDITIONAL_TUNNEL_CARDS);
        for _ in 0..ADDITIONAL_TUNNEL_CARDS {
            state = state.with_cards_deck_recreated_if_needed(&mut self.rng)?;
            drawn_cards.push(state.top_card()?);
            state = state.without_top_card()?;
        }
        let drawn_cards: SortedBag<Card> = drawn_cards.into();
        state = state.with_more_discarded_cards(&drawn_cards);

        let additional_count = route.additional_claim_cards_count(&initial_cards, &drawn_cards)?;
        let message = self
            .info(current_player)?
            .drew_additional_cards(&drawn_cards, additional_count);
        self.receive_info_for_all(&message)?;

        if additional_count == 0 {
            return self.claimed(state, route, &initial_cards);
        }

        let options = state.current_player_state()?.possible_additional_cards(
            additional_count,
            &initial_cards,
            &drawn_cards,
        )?;
        if options.is_empty() {
            return self.did_not_claim(state, &route);
        }

        let additional_cards = self
            .player(current_player)?
            .choose_additional_cards(&options)?;
        if additional_cards.is_empty() {
            return self.did_not_claim(state, &route);
        }
        if !options.contains(&additional_cards) {
            warn!(player = %current_player, "Rejected additional cards which were not offered");
            return self.did_not_claim(state, &route);
        }
        self.claimed(state, route, &initial_cards.union(&additional_cards))
    }

    fn claimed(
        &mut self,
        state: GameState,
        route: Route,
        cards: &SortedBag<Card>,
    ) -> GameResult<GameState> {
        let current_player = state.current_player_id();
        let message = self.info(current_player)?.claimed_route(&route, cards);
        self.receive_info_for_all(&message)?;
        debug!(player = %current_player, route = route.id(), "Route claimed");
        state.with_claimed_route(route, cards)
    }

    fn did_not_claim(&mut self, state: GameState, route: &Route) -> GameResult<GameState> {
        let message = self.info(state.current_player_id())?.did_not_claim_route(route);
        self.receive_info_for_all(&message)?;
        Ok(state)
    }

    fn score(&mut self, state: &GameState) -> GameResult<GameOutcome> {
        self.change_phase(GamePhase::Scoring);

        let mut trails = BTreeMap::new();
        let mut final_points = BTreeMap::new();
        for id in PlayerId::all(state.player_count()) {
            let player_state = state.player_state(*id)?;
            trails.insert(*id, Trail::longest(player_state.routes()));
            final_points.insert(*id, player_state.final_points());
        }
        let trail_lengths = trails
            .iter()
            .map(|(id, trail)| (*id, trail.length()))
            .collect();
        let outcome = GameOutcome::compute(&final_points, &trail_lengths);

        for id in &outcome.longest_trail_bonus {
            let trail = trails
                .get(id)
                .ok_or_else(|| GameError::InvalidArgument(format!("{} has no trail.", id)))?;
            let message = self.info(*id)?.gets_longest_trail_bonus(trail);
            self.receive_info_for_all(&message)?;
        }

        let message = match &outcome.verdict {
            Verdict::Winner(winner) => {
                let points = outcome.points.get(winner).copied().unwrap_or_default();
                let loser_points = outcome.best_loser_points().unwrap_or_default();
                self.info(*winner)?.won(points, loser_points)
            }
            Verdict::Draw(players) => {
                let names: Vec<String> = players
                    .iter()
                    .filter_map(|id| self.player_names.get(id).cloned())
                    .collect();
                let points = players
                    .first()
                    .and_then(|id| outcome.points.get(id))
                    .copied()
                    .unwrap_or_default();
                Info::draw(&names, points)
            }
        };
        self.receive_info_for_all(&message)?;

        info!(?outcome, "Game over");
        Ok(outcome)
    }

    fn player(&mut self, id: PlayerId) -> GameResult<&mut Box<dyn Player>> {
        self.players
            .get_mut(&id)
            .ok_or_else(|| GameError::InvalidArgument(format!("{} is not playing.", id)))
    }

    fn info(&self, id: PlayerId) -> GameResult<&Info> {
        self.infos
            .get(&id)
            .ok_or_else(|| GameError::InvalidArgument(format!("{} is not playing.", id)))
    }

    fn receive_info_for_all(&mut self, message: &str) -> GameResult<()> {
        for player in self.players.values_mut() {
            player.receive_info(message)?;
        }
        Ok(())
    }

    fn update_state_for_all(&mut self, state: &GameState) -> GameResult<()> {
        let public = state.to_public();
        for (id, player) in self.players.iter_mut() {
            player.update_state(&public, state.player_state(*id)?)?;
        }
        Ok(())
    }
}
