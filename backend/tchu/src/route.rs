use crate::bag::SortedBag;
use crate::card::{Card, Color};
use crate::error::{check_argument, GameError, GameResult};
use crate::station::Station;

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter};

pub const MIN_ROUTE_LENGTH: u8 = 1;
pub const MAX_ROUTE_LENGTH: u8 = 6;
/// How many cards are drawn from the deck when a player attempts to claim a tunnel.
pub const ADDITIONAL_TUNNEL_CARDS: usize = 3;

// Points granted for claiming a route, indexed by its length. There are no routes of length 0.
const ROUTE_CLAIM_POINTS: [i32; MAX_ROUTE_LENGTH as usize + 1] = [0, 1, 2, 4, 7, 10, 15];

/// Whether a route runs on the surface or through a tunnel.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Overground,
    /// Claiming a tunnel may cost additional cards.
    Underground,
}

/// A route between two adjacent stations, which a player can claim with cards.
///
/// Parallel routes between the same two stations are distinct routes, with distinct ids.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Route {
    id: String,
    station1: Station,
    station2: Station,
    length: u8,
    level: Level,
    /// `None` means that any color matches.
    color: Option<Color>,
}

impl Route {
    /// Creates a route, validating that its stations differ and that its length is legal.
    ///
    /// # Example
    /// ```
    /// use tchu::card::Color;
    /// use tchu::route::{Level, Route};
    /// use tchu::station::Station;
    ///
    /// let route = Route::new("BOS_NYC_1", Station::Boston, Station::NewYork, 2, Level::Overground, Some(Color::Red));
    /// assert!(route.is_ok());
    ///
    /// let loop_route = Route::new("BOS_BOS_1", Station::Boston, Station::Boston, 2, Level::Overground, None);
    /// assert!(loop_route.is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        station1: Station,
        station2: Station,
        length: u8,
        level: Level,
        color: Option<Color>,
    ) -> GameResult<Self> {
        let id = id.into();
        check_argument(station1 != station2, || {
            format!("Route {} connects {} to itself.", id, station1)
        })?;
        check_argument(
            (MIN_ROUTE_LENGTH..=MAX_ROUTE_LENGTH).contains(&length),
            || format!("Route {} has an invalid length of {}.", id, length),
        )?;

        Ok(Self {
            id,
            station1,
            station2,
            length,
            level,
            color,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn station1(&self) -> Station {
        self.station1
    }

    #[inline]
    pub fn station2(&self) -> Station {
        self.station2
    }

    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn is_tunnel(&self) -> bool {
        self.level == Level::Underground
    }

    /// Both ends of the route.
    #[inline]
    pub fn stations(&self) -> [Station; 2] {
        [self.station1, self.station2]
    }

    /// Whether `station` is one of the ends of the route.
    #[inline]
    pub fn touches(&self, station: Station) -> bool {
        self.station1 == station || self.station2 == station
    }

    /// The end of the route opposite to `station`.
    ///
    /// Returns an `Err` if `station` is not an end of the route.
    pub fn station_opposite(&self, station: Station) -> GameResult<Station> {
        if station == self.station1 {
            Ok(self.station2)
        } else if station == self.station2 {
            Ok(self.station1)
        } else {
            Err(GameError::InvalidArgument(format!(
                "{} is not an end of route {}.",
                station, self.id
            )))
        }
    }

    /// Every combination of cards that could pay for this route, ignoring what a player holds.
    ///
    /// Combinations are ordered by number of locomotives, then by color.
    /// Only tunnels can be paid with locomotives at claim time.
    pub fn possible_claim_cards(&self) -> Vec<SortedBag<Card>> {
        let length = self.length as usize;
        let max_locomotives = if self.is_tunnel() { length } else { 0 };
        let colors = match self.color {
            Some(color) => vec![color],
            None => Color::ALL.to_vec(),
        };

        let mut combinations = Vec::new();
        for locomotives in 0..=max_locomotives {
            for color in &colors {
                let combination =
                    SortedBag::of_two(length - locomotives, Card::of(*color), locomotives, Card::Locomotive);
                if !combinations.contains(&combination) {
                    combinations.push(combination);
                }
            }
        }
        combinations
    }

    /// How many additional cards the claimer of this tunnel must play, given the cards they
    /// initially committed and the three cards drawn from the deck.
    ///
    /// Every drawn locomotive counts, as does every drawn card matching the color of the
    /// committed cards. Committing only locomotives means that only drawn locomotives count.
    pub fn additional_claim_cards_count(
        &self,
        claim_cards: &SortedBag<Card>,
        drawn_cards: &SortedBag<Card>,
    ) -> GameResult<usize> {
        check_argument(self.is_tunnel(), || {
            format!("Route {} is not a tunnel.", self.id)
        })?;
        check_argument(drawn_cards.len() == ADDITIONAL_TUNNEL_CARDS, || {
            format!(
                "Expected {} drawn cards, got {}.",
                ADDITIONAL_TUNNEL_CARDS,
                drawn_cards.len()
            )
        })?;

        let locomotives = drawn_cards.count_of(&Card::Locomotive);
        let matching_color = claim_cards
            .iter()
            .find(|card| !card.is_locomotive())
            .map_or(0, |card| drawn_cards.count_of(card));

        Ok(locomotives + matching_color)
    }

    /// The points granted to the player claiming this route.
    #[inline]
    pub fn claim_points(&self) -> i32 {
        ROUTE_CLAIM_POINTS[self.length as usize]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.station1, self.station2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(length: u8, level: Level, color: Option<Color>) -> Route {
        Route::new(
            "TEST",
            Station::Denver,
            Station::SaltLakeCity,
            length,
            level,
            color,
        )
        .unwrap()
    }

    fn cards(cards: &[Card]) -> SortedBag<Card> {
        cards.iter().copied().collect()
    }

    // Tests for `Route::new`.

    #[test]
    fn invalid_lengths() {
        for length in [0, 7] {
            assert!(matches!(
                Route::new("X", Station::Boston, Station::Miami, length, Level::Overground, None),
                Err(GameError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn route_display() {
        assert_eq!(
            route(3, Level::Overground, None).to_string(),
            "Denver - Salt Lake City"
        );
    }

    #[test]
    fn station_opposite() -> GameResult<()> {
        let route = route(3, Level::Overground, None);
        assert_eq!(route.station_opposite(Station::Denver)?, Station::SaltLakeCity);
        assert_eq!(route.station_opposite(Station::SaltLakeCity)?, Station::Denver);
        assert!(route.station_opposite(Station::Miami).is_err());
        Ok(())
    }

    #[test]
    fn claim_points_table() {
        let points: Vec<_> = (1..=6)
            .map(|length| route(length, Level::Overground, None).claim_points())
            .collect();
        assert_eq!(points, vec![1, 2, 4, 7, 10, 15]);
    }

    // Tests for `Route::possible_claim_cards`.

    #[test]
    fn possible_claim_cards_colored_overground() {
        assert_eq!(
            route(2, Level::Overground, Some(Color::Red)).possible_claim_cards(),
            vec![SortedBag::of(2, Card::Red)]
        );
    }

    #[test]
    fn possible_claim_cards_neutral_overground() {
        let combinations = route(2, Level::Overground, None).possible_claim_cards();
        assert_eq!(combinations.len(), 8);
        assert_eq!(combinations[0], SortedBag::of(2, Card::Black));
        assert_eq!(combinations[7], SortedBag::of(2, Card::Yellow));
    }

    #[test]
    fn possible_claim_cards_colored_tunnel() {
        assert_eq!(
            route(2, Level::Underground, Some(Color::Green)).possible_claim_cards(),
            vec![
                cards(&[Card::Green, Card::Green]),
                cards(&[Card::Green, Card::Locomotive]),
                cards(&[Card::Locomotive, Card::Locomotive]),
            ]
        );
    }

    #[test]
    fn possible_claim_cards_neutral_tunnel() {
        let combinations = route(1, Level::Underground, None).possible_claim_cards();
        // One per color, and a single all-locomotive combination.
        assert_eq!(combinations.len(), 9);
        assert_eq!(combinations.last(), Some(&SortedBag::of(1, Card::Locomotive)));
    }

    // Tests for `Route::additional_claim_cards_count`.

    #[test]
    fn additional_cards_counts_color_and_locomotives() -> GameResult<()> {
        let tunnel = route(3, Level::Underground, None);
        let claim = cards(&[Card::Blue, Card::Blue, Card::Locomotive]);
        let drawn = cards(&[Card::Blue, Card::Locomotive, Card::Red]);
        assert_eq!(tunnel.additional_claim_cards_count(&claim, &drawn)?, 2);
        Ok(())
    }

    #[test]
    fn additional_cards_with_only_locomotives_committed() -> GameResult<()> {
        let tunnel = route(2, Level::Underground, None);
        let claim = SortedBag::of(2, Card::Locomotive);
        let drawn = cards(&[Card::Blue, Card::Locomotive, Card::Blue]);
        assert_eq!(tunnel.additional_claim_cards_count(&claim, &drawn)?, 1);
        Ok(())
    }

    #[test]
    fn additional_cards_none_matching() -> GameResult<()> {
        let tunnel = route(2, Level::Underground, Some(Color::Pink));
        let claim = SortedBag::of(2, Card::Pink);
        let drawn = cards(&[Card::Blue, Card::White, Card::Red]);
        assert_eq!(tunnel.additional_claim_cards_count(&claim, &drawn)?, 0);
        Ok(())
    }

    #[test]
    fn additional_cards_requires_tunnel_and_three_cards() {
        let claim = SortedBag::of(2, Card::Pink);
        let drawn = cards(&[Card::Blue, Card::White, Card::Red]);
        assert!(route(2, Level::Overground, None)
            .additional_claim_cards_count(&claim, &drawn)
            .is_err());
        assert!(route(2, Level::Underground, None)
            .additional_claim_cards_count(&claim, &SortedBag::of(2, Card::Red))
            .is_err());
    }
}
