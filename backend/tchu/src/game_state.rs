use crate::bag::SortedBag;
use crate::card::{Card, INITIAL_CARDS_COUNT};
use crate::card_state::{CardState, PublicCardState, FACE_UP_CARDS_COUNT};
use crate::config::{MAX_PLAYER_COUNT, MIN_PLAYER_COUNT};
use crate::deck::Deck;
use crate::error::{check_argument, GameError, GameResult};
use crate::player::PlayerId;
use crate::player_state::{PlayerState, PublicPlayerState};
use crate::route::Route;
use crate::ticket::Ticket;

use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Once a player has this many cars or less, every player gets one last turn.
const LAST_TURN_CAR_COUNT: u32 = 2;

fn check_seats<V>(players: &BTreeMap<PlayerId, V>, current_player: PlayerId) -> GameResult<()> {
    check_argument(
        (MIN_PLAYER_COUNT..=MAX_PLAYER_COUNT).contains(&players.len()),
        || format!("A game needs 2 or 3 players, got {}.", players.len()),
    )?;
    check_argument(
        players.keys().copied().eq(PlayerId::all(players.len()).iter().copied()),
        || "Players must take the first seats.".to_string(),
    )?;
    check_argument(players.contains_key(&current_player), || {
        format!("{} is not playing.", current_player)
    })
}

fn lookup<V>(players: &BTreeMap<PlayerId, V>, id: PlayerId) -> GameResult<&V> {
    players
        .get(&id)
        .ok_or_else(|| GameError::InvalidArgument(format!("{} is not playing.", id)))
}

/// The part of the game state that every player can see.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicGameState {
    ticket_count: usize,
    card_state: PublicCardState,
    current_player: PlayerId,
    players: BTreeMap<PlayerId, PublicPlayerState>,
    last_player: Option<PlayerId>,
}

impl PublicGameState {
    /// Returns an `Err` if there are not 2 or 3 players in the first seats, or if the current
    /// player is not one of them.
    pub fn new(
        ticket_count: usize,
        card_state: PublicCardState,
        current_player: PlayerId,
        players: BTreeMap<PlayerId, PublicPlayerState>,
        last_player: Option<PlayerId>,
    ) -> GameResult<Self> {
        check_seats(&players, current_player)?;
        Ok(Self {
            ticket_count,
            card_state,
            current_player,
            players,
            last_player,
        })
    }

    #[inline]
    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }

    #[inline]
    pub fn can_draw_tickets(&self) -> bool {
        self.ticket_count > 0
    }

    #[inline]
    pub fn card_state(&self) -> &PublicCardState {
        &self.card_state
    }

    /// Whether there are enough cards left, in the deck and the discards, to draw twice.
    #[inline]
    pub fn can_draw_cards(&self) -> bool {
        self.card_state.deck_size() + self.card_state.discards_size() >= FACE_UP_CARDS_COUNT
    }

    #[inline]
    pub fn current_player_id(&self) -> PlayerId {
        self.current_player
    }

    #[inline]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_state(&self, id: PlayerId) -> GameResult<&PublicPlayerState> {
        lookup(&self.players, id)
    }

    pub fn current_player_state(&self) -> GameResult<&PublicPlayerState> {
        self.player_state(self.current_player)
    }

    /// Every player's public state, in seating order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &PublicPlayerState)> + '_ {
        self.players.iter().map(|(id, state)| (*id, state))
    }

    /// The routes claimed by any player.
    pub fn claimed_routes(&self) -> Vec<&Route> {
        self.players
            .values()
            .flat_map(|state| state.routes().iter())
            .collect()
    }

    #[inline]
    pub fn last_player(&self) -> Option<PlayerId> {
        self.last_player
    }
}

/// The complete state of a game, only known to the orchestrator.
///
/// Every transition consumes the state and returns the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    tickets: Deck<Ticket>,
    card_state: CardState,
    current_player: PlayerId,
    players: BTreeMap<PlayerId, PlayerState>,
    last_player: Option<PlayerId>,
}

impl GameState {
    pub(crate) fn new(
        tickets: Deck<Ticket>,
        card_state: CardState,
        current_player: PlayerId,
        players: BTreeMap<PlayerId, PlayerState>,
        last_player: Option<PlayerId>,
    ) -> GameResult<Self> {
        check_seats(&players, current_player)?;
        Ok(Self {
            tickets,
            card_state,
            current_player,
            players,
            last_player,
        })
    }

    /// The state at the beginning of a game: cards are shuffled and dealt in seating order,
    /// tickets are shuffled, and the first player is picked at random.
    ///
    /// Returns an `Err` if `player_count` is not 2 or 3.
    ///
    /// # Example
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use tchu::game_state::GameState;
    /// use tchu::map::Map;
    ///
    /// let map = Map::standard();
    /// let state = GameState::initial(map.tickets(), 2, &mut StdRng::seed_from_u64(5)).unwrap();
    /// assert_eq!(state.ticket_count(), map.tickets().len());
    /// assert_eq!(state.card_state().deck_size(), 110 - 2 * 4 - 5);
    /// ```
    pub fn initial<R: Rng + ?Sized>(
        tickets: &SortedBag<Ticket>,
        player_count: usize,
        rng: &mut R,
    ) -> GameResult<Self> {
        check_argument(
            (MIN_PLAYER_COUNT..=MAX_PLAYER_COUNT).contains(&player_count),
            || format!("A game needs 2 or 3 players, got {}.", player_count),
        )?;

        let mut deck = Deck::of(&Card::all_cards(), rng);
        let mut players = BTreeMap::new();
        for id in PlayerId::all(player_count) {
            let initial_cards = deck.top_cards(INITIAL_CARDS_COUNT)?;
            deck = deck.without_top_cards(INITIAL_CARDS_COUNT)?;
            players.insert(*id, PlayerState::initial(initial_cards)?);
        }
        let first_player = PlayerId::ALL[rng.gen_range(0..player_count)];
        debug!(%first_player, player_count, "Dealt the initial cards");

        Self::new(
            Deck::of(tickets, rng),
            CardState::of(deck)?,
            first_player,
            players,
            None,
        )
    }

    #[inline]
    pub fn ticket_count(&self) -> usize {
        self.tickets.size()
    }

    #[inline]
    pub fn card_state(&self) -> &CardState {
        &self.card_state
    }

    #[inline]
    pub fn current_player_id(&self) -> PlayerId {
        self.current_player
    }

    #[inline]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn last_player(&self) -> Option<PlayerId> {
        self.last_player
    }

    pub fn player_state(&self, id: PlayerId) -> GameResult<&PlayerState> {
        lookup(&self.players, id)
    }

    pub fn current_player_state(&self) -> GameResult<&PlayerState> {
        self.player_state(self.current_player)
    }

    /// The `count` tickets on top of the ticket deck.
    pub fn top_tickets(&self, count: usize) -> GameResult<SortedBag<Ticket>> {
        self.tickets.top_cards(count)
    }

    pub fn without_top_tickets(self, count: usize) -> GameResult<Self> {
        Ok(Self {
            tickets: self.tickets.without_top_cards(count)?,
            ..self
        })
    }

    /// The top card of the card deck. Returns an `Err` if the deck is empty.
    pub fn top_card(&self) -> GameResult<Card> {
        self.card_state.top_deck_card().copied()
    }

    pub fn without_top_card(self) -> GameResult<Self> {
        Ok(Self {
            card_state: self.card_state.without_top_deck_card()?,
            ..self
        })
    }

    pub fn with_more_discarded_cards(self, discarded_cards: &SortedBag<Card>) -> Self {
        Self {
            card_state: self.card_state.with_more_discarded_cards(discarded_cards),
            ..self
        }
    }

    /// Shuffles the discards into a new deck if the deck is empty.
    pub fn with_cards_deck_recreated_if_needed<R: Rng + ?Sized>(self, rng: &mut R) -> GameResult<Self> {
        if !self.card_state.is_deck_empty() {
            return Ok(self);
        }
        debug!(
            discards = self.card_state.discards_size(),
            "Recreating the deck from the discards"
        );
        Ok(Self {
            card_state: self.card_state.with_deck_recreated_from_discards(rng)?,
            ..self
        })
    }

    fn with_player_state<F>(mut self, id: PlayerId, update: F) -> GameResult<Self>
    where
        F: FnOnce(PlayerState) -> PlayerState,
    {
        let state = self
            .players
            .remove(&id)
            .ok_or_else(|| GameError::InvalidArgument(format!("{} is not playing.", id)))?;
        self.players.insert(id, update(state));
        Ok(self)
    }

    /// Gives the `chosen_tickets` to `player` at the start of the game.
    ///
    /// Returns an `Err` if the player already holds tickets.
    pub fn with_initially_chosen_tickets(
        self,
        player: PlayerId,
        chosen_tickets: &SortedBag<Ticket>,
    ) -> GameResult<Self> {
        let ticket_count = self.player_state(player)?.ticket_count();
        check_argument(ticket_count == 0, || {
            format!("{} already chose their initial tickets.", player)
        })?;
        self.with_player_state(player, |state| state.with_added_tickets(chosen_tickets))
    }

    /// Gives the `chosen_tickets` to the current player, and removes all the `drawn_tickets`
    /// from the top of the ticket deck.
    ///
    /// Returns an `Err` if some chosen tickets were not drawn.
    pub fn with_chosen_additional_tickets(
        self,
        drawn_tickets: &SortedBag<Ticket>,
        chosen_tickets: &SortedBag<Ticket>,
    ) -> GameResult<Self> {
        check_argument(drawn_tickets.contains_all(chosen_tickets), || {
            format!(
                "The chosen tickets {:?} were not all drawn.",
                chosen_tickets
            )
        })?;
        let current_player = self.current_player;
        self.without_top_tickets(drawn_tickets.len())?
            .with_player_state(current_player, |state| {
                state.with_added_tickets(chosen_tickets)
            })
    }

    /// The current player takes the face-up card at `slot`, which is replaced from the deck.
    pub fn with_drawn_face_up_card(self, slot: usize) -> GameResult<Self> {
        let card = self.card_state.face_up_card(slot)?;
        let current_player = self.current_player;
        Self {
            card_state: self.card_state.with_drawn_face_up_card(slot)?,
            ..self
        }
        .with_player_state(current_player, |state| state.with_added_card(card))
    }

    /// The current player takes the top card of the deck.
    pub fn with_blind_drawn_card(self) -> GameResult<Self> {
        let card = self.top_card()?;
        let current_player = self.current_player;
        self.without_top_card()?
            .with_player_state(current_player, |state| state.with_added_card(card))
    }

    /// The current player claims `route` with `cards`, which go to the discards.
    pub fn with_claimed_route(self, route: Route, cards: &SortedBag<Card>) -> GameResult<Self> {
        let current_player = self.current_player;
        self.with_more_discarded_cards(cards)
            .with_player_state(current_player, |state| state.with_claimed_route(route, cards))
    }

    /// Whether the current player just got few enough cars for the last turn to begin.
    pub fn last_turn_begins(&self) -> bool {
        self.last_player.is_none()
            && self
                .current_player_state()
                .map_or(false, |state| state.car_count() <= LAST_TURN_CAR_COUNT)
    }

    /// Hands over to the next player. The current player becomes the last player if the last
    /// turn begins.
    pub fn for_next_turn(self) -> Self {
        let last_player = if self.last_turn_begins() {
            Some(self.current_player)
        } else {
            self.last_player
        };
        Self {
            current_player: self.current_player.next(self.players.len()),
            last_player,
            ..self
        }
    }

    pub fn can_draw_tickets(&self) -> bool {
        !self.tickets.is_empty()
    }

    pub fn can_draw_cards(&self) -> bool {
        self.card_state.deck_size() + self.card_state.discards_size() >= FACE_UP_CARDS_COUNT
    }

    /// The state as every player sees it.
    pub fn to_public(&self) -> PublicGameState {
        PublicGameState {
            ticket_count: self.tickets.size(),
            card_state: self.card_state.to_public(),
            current_player: self.current_player,
            players: self
                .players
                .iter()
                .map(|(id, state)| (*id, state.to_public()))
                .collect(),
            last_player: self.last_player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Color;
    use crate::route::Level;
    use crate::station::Station;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tickets() -> SortedBag<Ticket> {
        [
            Ticket::single(Station::Boston, Station::Miami, 12).unwrap(),
            Ticket::single(Station::Calgary, Station::Phoenix, 13).unwrap(),
            Ticket::single(Station::Chicago, Station::NewOrleans, 7).unwrap(),
            Ticket::single(Station::Dallas, Station::NewYork, 11).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    fn four_cars_route(id: &str) -> Route {
        Route::new(id, Station::Denver, Station::Omaha, 4, Level::Overground, Some(Color::Red)).unwrap()
    }

    /// A two-player state whose card deck and discards are given explicitly.
    fn state_with_cards(deck: Vec<Card>, discards: &SortedBag<Card>) -> GameState {
        let mut cards = vec![Card::Black, Card::Blue, Card::Green, Card::Orange, Card::Pink];
        cards.extend(deck);
        let card_state = CardState::of(Deck::from_top(cards))
            .unwrap()
            .with_more_discarded_cards(discards);
        let players = PlayerId::all(2)
            .iter()
            .map(|id| (*id, PlayerState::initial(SortedBag::of(4, Card::Red)).unwrap()))
            .collect();
        GameState::new(
            Deck::from_top(tickets().into_vec()),
            card_state,
            PlayerId::Player1,
            players,
            None,
        )
        .unwrap()
    }

    // Tests for `PublicGameState`.

    #[test]
    fn public_state_needs_two_or_three_seated_players() -> GameResult<()> {
        let card_state = PublicCardState::new(&[Card::Red; 5], 10, 0)?;
        let player = PublicPlayerState::new(0, 4, Vec::new());

        let one: BTreeMap<_, _> = [(PlayerId::Player1, player.clone())].into_iter().collect();
        assert!(PublicGameState::new(0, card_state.clone(), PlayerId::Player1, one, None).is_err());

        let skipped: BTreeMap<_, _> = [
            (PlayerId::Player1, player.clone()),
            (PlayerId::Player3, player.clone()),
        ]
        .into_iter()
        .collect();
        assert!(PublicGameState::new(0, card_state.clone(), PlayerId::Player1, skipped, None).is_err());

        let two: BTreeMap<_, _> = [
            (PlayerId::Player1, player.clone()),
            (PlayerId::Player2, player),
        ]
        .into_iter()
        .collect();
        assert!(PublicGameState::new(0, card_state.clone(), PlayerId::Player3, two.clone(), None).is_err());
        assert!(PublicGameState::new(0, card_state, PlayerId::Player2, two, None).is_ok());
        Ok(())
    }

    // Tests for `GameState`.

    #[test]
    fn initial_state() -> GameResult<()> {
        let mut rng = StdRng::seed_from_u64(2021);
        let state = GameState::initial(&tickets(), 3, &mut rng)?;

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.ticket_count(), 4);
        assert_eq!(state.card_state().deck_size(), 110 - 3 * 4 - 5);
        assert_eq!(state.last_player(), None);
        for id in PlayerId::all(3) {
            assert_eq!(state.player_state(*id)?.card_count(), 4);
            assert_eq!(state.player_state(*id)?.ticket_count(), 0);
        }
        assert!(GameState::initial(&tickets(), 4, &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn initial_state_is_reproducible() -> GameResult<()> {
        let first = GameState::initial(&tickets(), 2, &mut StdRng::seed_from_u64(3))?;
        let second = GameState::initial(&tickets(), 2, &mut StdRng::seed_from_u64(3))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn initially_chosen_tickets_only_once() -> GameResult<()> {
        let state = state_with_cards(vec![Card::White; 5], &SortedBag::new());
        let chosen = state.top_tickets(2)?;
        let state = state.with_initially_chosen_tickets(PlayerId::Player2, &chosen)?;
        assert_eq!(state.player_state(PlayerId::Player2)?.tickets(), &chosen);
        assert!(state
            .with_initially_chosen_tickets(PlayerId::Player2, &chosen)
            .is_err());
        Ok(())
    }

    #[test]
    fn chosen_additional_tickets_remove_all_drawn() -> GameResult<()> {
        let state = state_with_cards(vec![Card::White; 5], &SortedBag::new());
        let drawn = state.top_tickets(3)?;
        let chosen: SortedBag<Ticket> = drawn.iter().take(1).cloned().collect();

        let state = state.with_chosen_additional_tickets(&drawn, &chosen)?;
        assert_eq!(state.ticket_count(), 1);
        assert_eq!(state.current_player_state()?.tickets(), &chosen);
        Ok(())
    }

    #[test]
    fn chosen_additional_tickets_must_be_drawn() -> GameResult<()> {
        let state = state_with_cards(vec![Card::White; 5], &SortedBag::new());
        let drawn = state.top_tickets(2)?;
        let not_drawn = state.tickets.without_top_cards(3)?.top_cards(1)?;
        assert!(state.with_chosen_additional_tickets(&drawn, &not_drawn).is_err());
        Ok(())
    }

    #[test]
    fn face_up_and_blind_draws() -> GameResult<()> {
        let state = state_with_cards(vec![Card::Yellow, Card::Locomotive], &SortedBag::new())
            .with_drawn_face_up_card(1)?
            .with_blind_drawn_card()?;

        let hand = state.current_player_state()?.cards();
        assert_eq!(hand.count_of(&Card::Blue), 1);
        assert_eq!(hand.count_of(&Card::Locomotive), 1);
        assert_eq!(state.card_state().face_up_card(1)?, Card::Yellow);
        assert!(state.card_state().is_deck_empty());
        Ok(())
    }

    #[test]
    fn claimed_route_cards_are_discarded() -> GameResult<()> {
        let state = state_with_cards(vec![Card::White; 5], &SortedBag::new())
            .with_claimed_route(four_cars_route("DEN_OMA_1"), &SortedBag::of(4, Card::Red))?;
        assert_eq!(state.card_state().discards_size(), 4);
        assert_eq!(state.current_player_state()?.car_count(), 36);
        assert!(state.current_player_state()?.cards().is_empty());
        assert_eq!(state.to_public().claimed_routes().len(), 1);
        Ok(())
    }

    #[test]
    fn deck_recreated_only_when_empty() -> GameResult<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let discards = SortedBag::of(4, Card::Green);

        let full = state_with_cards(vec![Card::White], &discards)
            .with_cards_deck_recreated_if_needed(&mut rng)?;
        assert_eq!(full.card_state().deck_size(), 1);
        assert_eq!(full.card_state().discards_size(), 4);

        let empty = state_with_cards(Vec::new(), &discards)
            .with_cards_deck_recreated_if_needed(&mut rng)?;
        assert_eq!(empty.card_state().deck_size(), 4);
        assert_eq!(empty.card_state().discards_size(), 0);
        Ok(())
    }

    #[test]
    fn last_draw_pair_recreates_the_deck() -> GameResult<()> {
        let mut rng = StdRng::seed_from_u64(12);
        // One card left in the deck and four in the discards: a draw pair is still possible.
        let state = state_with_cards(vec![Card::White], &SortedBag::of(4, Card::Green));
        assert!(state.can_draw_cards());

        let state = state
            .with_cards_deck_recreated_if_needed(&mut rng)?
            .with_blind_drawn_card()?
            .with_cards_deck_recreated_if_needed(&mut rng)?
            .with_drawn_face_up_card(0)?;
        assert_eq!(state.current_player_state()?.card_count(), 6);
        assert_eq!(state.card_state().deck_size(), 3);
        assert!(!state.can_draw_cards());
        assert!(!state.to_public().can_draw_cards());
        Ok(())
    }

    #[test]
    fn last_player_is_set_once() -> GameResult<()> {
        let routes: Vec<Route> = (0..9).map(|i| four_cars_route(&format!("R{}", i))).collect();
        let state = state_with_cards(vec![Card::White; 5], &SortedBag::new());
        let players = state
            .players
            .iter()
            .map(|(id, player)| {
                let claimed = routes.iter().fold(player.clone(), |player, route| {
                    player.with_claimed_route(route.clone(), &SortedBag::new())
                });
                (*id, claimed)
            })
            .collect();
        // Both players have 4 cars left.
        let state = GameState { players, ..state };
        assert!(!state.last_turn_begins());

        let state = state
            .with_claimed_route(four_cars_route("LAST_1"), &SortedBag::new())?;
        assert!(state.last_turn_begins());
        let state = state.for_next_turn();
        assert_eq!(state.last_player(), Some(PlayerId::Player1));
        assert_eq!(state.current_player_id(), PlayerId::Player2);

        let state = state
            .with_claimed_route(four_cars_route("LAST_2"), &SortedBag::new())?;
        assert!(!state.last_turn_begins());
        let state = state.for_next_turn();
        assert_eq!(state.last_player(), Some(PlayerId::Player1));
        assert_eq!(state.current_player_id(), PlayerId::Player1);
        Ok(())
    }

    #[test]
    fn projection_to_public() -> GameResult<()> {
        let state = state_with_cards(vec![Card::White; 2], &SortedBag::of(1, Card::Green));
        let public = state.to_public();
        assert_eq!(public.ticket_count(), 4);
        assert_eq!(public.card_state(), &state.card_state().to_public());
        assert_eq!(public.current_player_id(), PlayerId::Player1);
        assert_eq!(public.player_count(), 2);
        assert_eq!(
            public.player_state(PlayerId::Player2)?,
            &state.player_state(PlayerId::Player2)?.to_public()
        );
        assert!(public.player_state(PlayerId::Player3).is_err());
        assert_eq!(public.last_player(), None);
        Ok(())
    }
}
