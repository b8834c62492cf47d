use crate::bag::SortedBag;
use crate::card::Card;
use crate::deck::Deck;
use crate::error::{check_argument, check_index, GameError, GameResult};

use rand::Rng;

/// How many cards are openly displayed next to the deck.
pub const FACE_UP_CARDS_COUNT: usize = 5;

/// The part of the card state that every player can see.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicCardState {
    face_up_cards: [Card; FACE_UP_CARDS_COUNT],
    deck_size: usize,
    discards_size: usize,
}

impl PublicCardState {
    /// Returns an `Err` if there are not exactly five face-up cards.
    pub fn new(face_up_cards: &[Card], deck_size: usize, discards_size: usize) -> GameResult<Self> {
        let face_up_cards: [Card; FACE_UP_CARDS_COUNT] =
            array_init::from_iter(face_up_cards.iter().copied())
                .filter(|_| face_up_cards.len() == FACE_UP_CARDS_COUNT)
                .ok_or_else(|| {
                    GameError::InvalidArgument(format!(
                        "Expected {} face-up cards, got {}.",
                        FACE_UP_CARDS_COUNT,
                        face_up_cards.len()
                    ))
                })?;

        Ok(Self {
            face_up_cards,
            deck_size,
            discards_size,
        })
    }

    #[inline]
    pub fn face_up_cards(&self) -> &[Card; FACE_UP_CARDS_COUNT] {
        &self.face_up_cards
    }

    /// The face-up card at the given slot.
    pub fn face_up_card(&self, slot: usize) -> GameResult<Card> {
        Ok(self.face_up_cards[check_index(slot, FACE_UP_CARDS_COUNT)?])
    }

    #[inline]
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    #[inline]
    pub fn is_deck_empty(&self) -> bool {
        self.deck_size == 0
    }

    #[inline]
    pub fn discards_size(&self) -> usize {
        self.discards_size
    }
}

/// The complete state of the car cards which are not in the hands of the players.
#[derive(Clone, Debug, PartialEq)]
pub struct CardState {
    face_up_cards: [Card; FACE_UP_CARDS_COUNT],
    deck: Deck<Card>,
    discards: SortedBag<Card>,
}

impl CardState {
    /// Lays out the five top cards of `deck` face-up; the rest of it becomes the deck.
    ///
    /// Returns an `Err` if the deck holds less than five cards.
    pub fn of(deck: Deck<Card>) -> GameResult<Self> {
        check_argument(deck.size() >= FACE_UP_CARDS_COUNT, || {
            format!(
                "At least {} cards are needed, got {}.",
                FACE_UP_CARDS_COUNT,
                deck.size()
            )
        })?;

        let mut face_up_cards = [Card::Locomotive; FACE_UP_CARDS_COUNT];
        let mut remaining = deck;
        for slot in face_up_cards.iter_mut() {
            *slot = *remaining.top_card()?;
            remaining = remaining.without_top_card()?;
        }

        Ok(Self {
            face_up_cards,
            deck: remaining,
            discards: SortedBag::new(),
        })
    }

    /// Replaces the face-up card at `slot` by the top card of the deck.
    ///
    /// The card previously at `slot` goes to the player who drew it; it is up to the caller to
    /// hand it over.
    pub fn with_drawn_face_up_card(self, slot: usize) -> GameResult<Self> {
        let slot = check_index(slot, FACE_UP_CARDS_COUNT)?;
        let top_card = *self.top_deck_card()?;

        let mut face_up_cards = self.face_up_cards;
        face_up_cards[slot] = top_card;
        Ok(Self {
            face_up_cards,
            deck: self.deck.without_top_card()?,
            discards: self.discards,
        })
    }

    /// The top card of the deck. Returns an `Err` if the deck is empty.
    pub fn top_deck_card(&self) -> GameResult<&Card> {
        self.deck.top_card()
    }

    /// Returns an `Err` if the deck is empty.
    pub fn without_top_deck_card(self) -> GameResult<Self> {
        Ok(Self {
            deck: self.deck.without_top_card()?,
            ..self
        })
    }

    /// Shuffles the discards into a new deck, leaving the discards empty.
    ///
    /// Returns an `Err` if the deck is not empty.
    pub fn with_deck_recreated_from_discards<R: Rng + ?Sized>(self, rng: &mut R) -> GameResult<Self> {
        check_argument(self.deck.is_empty(), || {
            format!(
                "The deck still has {} cards, it cannot be recreated.",
                self.deck.size()
            )
        })?;

        Ok(Self {
            face_up_cards: self.face_up_cards,
            deck: Deck::of(&self.discards, rng),
            discards: SortedBag::new(),
        })
    }

    pub fn with_more_discarded_cards(self, additional_discards: &SortedBag<Card>) -> Self {
        Self {
            discards: self.discards.union(additional_discards),
            ..self
        }
    }

    #[inline]
    pub fn face_up_cards(&self) -> &[Card; FACE_UP_CARDS_COUNT] {
        &self.face_up_cards
    }

    pub fn face_up_card(&self, slot: usize) -> GameResult<Card> {
        Ok(self.face_up_cards[check_index(slot, FACE_UP_CARDS_COUNT)?])
    }

    #[inline]
    pub fn deck_size(&self) -> usize {
        self.deck.size()
    }

    #[inline]
    pub fn is_deck_empty(&self) -> bool {
        self.deck.is_empty()
    }

    #[inline]
    pub fn discards(&self) -> &SortedBag<Card> {
        &self.discards
    }

    #[inline]
    pub fn discards_size(&self) -> usize {
        self.discards.len()
    }

    /// What every player can see of this card state.
    pub fn to_public(&self) -> PublicCardState {
        PublicCardState {
            face_up_cards: self.face_up_cards,
            deck_size: self.deck.size(),
            discards_size: self.discards.len(),
        }
    }
}
