use crate::bag::SortedBag;
use crate::error::{check_argument, GameError, GameResult};

use rand::seq::SliceRandom;
use rand::Rng;

/// An immutable pile of cards (or tickets), whose top is the first element.
///
/// Every operation returns a new deck rather than modifying the current one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck<T> {
    cards: Vec<T>,
}

impl<T: Ord + Clone> Deck<T> {
    /// Shuffles the given cards into a new deck.
    ///
    /// # Example
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use tchu::bag::SortedBag;
    /// use tchu::deck::Deck;
    ///
    /// let mut rng = StdRng::seed_from_u64(2021);
    /// let deck = Deck::of(&SortedBag::of(3, 'x'), &mut rng);
    /// assert_eq!(deck.size(), 3);
    /// ```
    pub fn of<R: Rng + ?Sized>(cards: &SortedBag<T>, rng: &mut R) -> Self {
        let mut cards = cards.as_slice().to_vec();
        cards.shuffle(rng);
        Self { cards }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card on top of the deck.
    ///
    /// If the deck is empty, returns an `Err`.
    pub fn top_card(&self) -> GameResult<&T> {
        self.cards
            .first()
            .ok_or_else(|| GameError::InvalidArgument("The deck is empty.".to_string()))
    }

    /// The deck without its top card.
    ///
    /// If the deck is empty, returns an `Err`.
    pub fn without_top_card(&self) -> GameResult<Deck<T>> {
        self.without_top_cards(1)
    }

    /// The `count` cards on top of the deck.
    ///
    /// Returns an `Err` if `count` exceeds the size of the deck.
    pub fn top_cards(&self, count: usize) -> GameResult<SortedBag<T>> {
        self.check_count(count)?;
        Ok(self.cards[..count].iter().cloned().collect())
    }

    /// The deck without its `count` top cards.
    ///
    /// Returns an `Err` if `count` exceeds the size of the deck.
    pub fn without_top_cards(&self, count: usize) -> GameResult<Deck<T>> {
        self.check_count(count)?;
        Ok(Self {
            cards: self.cards[count..].to_vec(),
        })
    }

    fn check_count(&self, count: usize) -> GameResult<()> {
        check_argument(count <= self.size(), || {
            format!(
                "Cannot take {} cards from a deck of {}.",
                count,
                self.size()
            )
        })
    }
}

#[cfg(test)]
impl<T> Deck<T> {
    /// Builds a deck in the given order, top first.
    pub(crate) fn from_top(cards: Vec<T>) -> Self {
        Self { cards }
    }
}
