use serde::{Deserialize, Serialize};
use std::iter::repeat;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};

use crate::bag::SortedBag;

/// How many locomotives are part of the full set of cards.
pub const LOCOMOTIVE_CARDS_COUNT: usize = 14;
/// How many cards of each color are part of the full set of cards.
pub const CAR_CARDS_COUNT: usize = 12;
/// How many cards each player is dealt at the start of the game.
pub const INITIAL_CARDS_COUNT: usize = 4;

/// The colors of the game, shared by routes and car cards.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Black,
    Blue,
    Green,
    Orange,
    Pink,
    Red,
    White,
    Yellow,
}

impl Color {
    /// All colors, in their canonical order.
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Orange,
        Color::Pink,
        Color::Red,
        Color::White,
        Color::Yellow,
    ];
}

/// Represents the different kinds of cards: one per color, plus the locomotive.
///
/// The order of the variants is the order used by sorted bags and by the wire format.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Card {
    Black,
    Blue,
    Green,
    Orange,
    Pink,
    Red,
    White,
    Yellow,
    /// Matches with any color.
    Locomotive,
}

impl Card {
    /// All kinds of cards, in their canonical order.
    pub const ALL: [Card; 9] = [
        Card::Black,
        Card::Blue,
        Card::Green,
        Card::Orange,
        Card::Pink,
        Card::Red,
        Card::White,
        Card::Yellow,
        Card::Locomotive,
    ];

    /// The colored cards only.
    pub const CARS: [Card; 8] = [
        Card::Black,
        Card::Blue,
        Card::Green,
        Card::Orange,
        Card::Pink,
        Card::Red,
        Card::White,
        Card::Yellow,
    ];

    /// The car card of the given color.
    ///
    /// # Example
    /// ```
    /// use tchu::card::{Card, Color};
    ///
    /// assert_eq!(Card::of(Color::Red), Card::Red);
    /// assert_eq!(Card::of(Color::Red).color(), Some(Color::Red));
    /// ```
    pub fn of(color: Color) -> Card {
        match color {
            Color::Black => Card::Black,
            Color::Blue => Card::Blue,
            Color::Green => Card::Green,
            Color::Orange => Card::Orange,
            Color::Pink => Card::Pink,
            Color::Red => Card::Red,
            Color::White => Card::White,
            Color::Yellow => Card::Yellow,
        }
    }

    /// The color of this card, or `None` for the locomotive.
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Black => Some(Color::Black),
            Card::Blue => Some(Color::Blue),
            Card::Green => Some(Color::Green),
            Card::Orange => Some(Color::Orange),
            Card::Pink => Some(Color::Pink),
            Card::Red => Some(Color::Red),
            Card::White => Some(Color::White),
            Card::Yellow => Some(Color::Yellow),
            Card::Locomotive => None,
        }
    }

    /// Whether the current card is the locomotive, i.e. matches with any color.
    ///
    /// # Example
    /// ```
    /// use tchu::card::Card;
    ///
    /// assert!(!Card::Black.is_locomotive());
    /// assert!(Card::Locomotive.is_locomotive());
    /// ```
    #[inline]
    pub fn is_locomotive(&self) -> bool {
        *self == Card::Locomotive
    }

    /// The full set of cards the game is played with: 12 of each color, and 14 locomotives.
    pub fn all_cards() -> SortedBag<Card> {
        Card::iter()
            .flat_map(|card| {
                let count = if card.is_locomotive() {
                    LOCOMOTIVE_CARDS_COUNT
                } else {
                    CAR_CARDS_COUNT
                };
                repeat(card).take(count)
            })
            .collect()
    }
}
