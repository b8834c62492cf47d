use crate::bag::SortedBag;
use crate::card::{Card, INITIAL_CARDS_COUNT};
use crate::error::{check_argument, GameResult};
use crate::route::{Route, ADDITIONAL_TUNNEL_CARDS};
use crate::station::Station;
use crate::station_partition::StationPartitionBuilder;
use crate::ticket::Ticket;

use strum::EnumCount;

/// Every player starts the game with 40 cars.
pub const INITIAL_CAR_COUNT: u32 = 40;

fn car_count_after(routes: &[Route]) -> u32 {
    let used: u32 = routes.iter().map(|route| route.length() as u32).sum();
    INITIAL_CAR_COUNT.saturating_sub(used)
}

fn claim_points_of(routes: &[Route]) -> i32 {
    routes.iter().map(Route::claim_points).sum()
}

/// Information about a player's state that is visible to all players.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicPlayerState {
    ticket_count: usize,
    card_count: usize,
    routes: Vec<Route>,
}

impl PublicPlayerState {
    pub fn new(ticket_count: usize, card_count: usize, routes: Vec<Route>) -> Self {
        Self {
            ticket_count,
            card_count,
            routes,
        }
    }

    #[inline]
    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }

    #[inline]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// The routes claimed by the player, in the order they were claimed.
    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// How many cars the player has left.
    pub fn car_count(&self) -> u32 {
        car_count_after(&self.routes)
    }

    /// Points earned by claiming routes so far.
    pub fn claim_points(&self) -> i32 {
        claim_points_of(&self.routes)
    }
}

/// The complete state of a player, which only that player gets to see.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    tickets: SortedBag<Ticket>,
    cards: SortedBag<Card>,
    routes: Vec<Route>,
}

impl PlayerState {
    pub fn new(tickets: SortedBag<Ticket>, cards: SortedBag<Card>, routes: Vec<Route>) -> Self {
        Self {
            tickets,
            cards,
            routes,
        }
    }

    /// The state of a player who was just dealt their initial cards.
    ///
    /// Returns an `Err` if there are not exactly four cards.
    ///
    /// # Example
    /// ```
    /// use tchu::bag::SortedBag;
    /// use tchu::card::Card;
    /// use tchu::player_state::PlayerState;
    ///
    /// let state = PlayerState::initial(SortedBag::of(4, Card::Red)).unwrap();
    /// assert_eq!(state.car_count(), 40);
    /// assert!(PlayerState::initial(SortedBag::of(3, Card::Red)).is_err());
    /// ```
    pub fn initial(initial_cards: SortedBag<Card>) -> GameResult<Self> {
        check_argument(initial_cards.len() == INITIAL_CARDS_COUNT, || {
            format!(
                "A player starts with {} cards, got {}.",
                INITIAL_CARDS_COUNT,
                initial_cards.len()
            )
        })?;
        Ok(Self::new(SortedBag::new(), initial_cards, Vec::new()))
    }

    #[inline]
    pub fn tickets(&self) -> &SortedBag<Ticket> {
        &self.tickets
    }

    #[inline]
    pub fn cards(&self) -> &SortedBag<Card> {
        &self.cards
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    #[inline]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn car_count(&self) -> u32 {
        car_count_after(&self.routes)
    }

    pub fn claim_points(&self) -> i32 {
        claim_points_of(&self.routes)
    }

    pub fn with_added_tickets(self, new_tickets: &SortedBag<Ticket>) -> Self {
        Self {
            tickets: self.tickets.union(new_tickets),
            ..self
        }
    }

    pub fn with_added_card(self, card: Card) -> Self {
        Self {
            cards: self.cards.union(&SortedBag::of(1, card)),
            ..self
        }
    }

    /// Whether the player has enough cars and cards to claim `route`.
    pub fn can_claim_route(&self, route: &Route) -> bool {
        self.car_count() >= route.length() as u32
            && route
                .possible_claim_cards()
                .iter()
                .any(|claim_cards| self.cards.contains_all(claim_cards))
    }

    /// Every combination of cards from the player's hand that pays for `route`.
    ///
    /// Returns an `Err` if the player does not have enough cars left for the route.
    pub fn possible_claim_cards(&self, route: &Route) -> GameResult<Vec<SortedBag<Card>>> {
        check_argument(self.car_count() >= route.length() as u32, || {
            format!(
                "{} cars are needed to claim {}, only {} are left.",
                route.length(),
                route,
                self.car_count()
            )
        })?;

        Ok(route
            .possible_claim_cards()
            .into_iter()
            .filter(|claim_cards| self.cards.contains_all(claim_cards))
            .collect())
    }

    /// Every way of paying the additional cost of a tunnel, fewest locomotives first.
    ///
    /// Only locomotives and cards of the kinds in `initial_cards` may be used, and never the
    /// initial cards themselves.
    ///
    /// Returns an `Err` if `additional_count` is not between 1 and 3, if there are not exactly
    /// three `drawn_cards`, or if `initial_cards` is empty or made of more than two kinds.
    pub fn possible_additional_cards(
        &self,
        additional_count: usize,
        initial_cards: &SortedBag<Card>,
        drawn_cards: &SortedBag<Card>,
    ) -> GameResult<Vec<SortedBag<Card>>> {
        check_argument(
            (1..=ADDITIONAL_TUNNEL_CARDS).contains(&additional_count),
            || format!("Cannot pay {} additional cards.", additional_count),
        )?;
        check_argument(drawn_cards.len() == ADDITIONAL_TUNNEL_CARDS, || {
            format!(
                "Expected {} drawn cards, got {}.",
                ADDITIONAL_TUNNEL_CARDS,
                drawn_cards.len()
            )
        })?;
        check_argument(
            !initial_cards.is_empty() && initial_cards.distinct().len() <= 2,
            || format!("Invalid initial cards {:?}.", initial_cards),
        )?;

        let usable: SortedBag<Card> = self
            .cards
            .difference(initial_cards)
            .iter()
            .filter(|card| card.is_locomotive() || initial_cards.contains(card))
            .copied()
            .collect();

        let mut options = usable.subsets_of_size(additional_count);
        options.sort_by_key(|option| option.count_of(&Card::Locomotive));
        Ok(options)
    }

    /// The player after claiming `route` with `claim_cards`, which leave their hand.
    pub fn with_claimed_route(self, route: Route, claim_cards: &SortedBag<Card>) -> Self {
        let mut routes = self.routes;
        routes.push(route);
        Self {
            tickets: self.tickets,
            cards: self.cards.difference(claim_cards),
            routes,
        }
    }

    /// Points won, or lost, with the tickets held by the player given the routes they claimed.
    pub fn ticket_points(&self) -> i32 {
        let mut builder = StationPartitionBuilder::new(Station::COUNT);
        for route in &self.routes {
            // Every station id is below `Station::COUNT`, so this never fails.
            builder.connect(route.station1(), route.station2()).ok();
        }
        let partition = builder.build();

        self.tickets
            .iter()
            .map(|ticket| ticket.points(&partition))
            .sum()
    }

    /// Claim points and ticket points together, not counting any bonus.
    pub fn final_points(&self) -> i32 {
        self.claim_points() + self.ticket_points()
    }

    pub fn to_public(&self) -> PublicPlayerState {
        PublicPlayerState::new(self.tickets.len(), self.cards.len(), self.routes.clone())
    }
}
