use crate::bag::SortedBag;
use crate::card::Card;
use crate::card_state::FACE_UP_CARDS_COUNT;
use crate::error::{check_index, GameError, GameResult};
use crate::game_state::PublicGameState;
use crate::player_state::PlayerState;
use crate::route::Route;
use crate::ticket::Ticket;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[allow(unused_imports)]
use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Identifies a seat at the table. Seats are taken in order, so a game with two players uses
/// the first two ids only.
///
/// # JSON
/// Ids are serialized in snake_case, e.g. `"player_1"`.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCountMacro,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub enum PlayerId {
    #[serde(rename = "player_1")]
    #[strum(serialize = "player_1")]
    Player1,
    #[serde(rename = "player_2")]
    #[strum(serialize = "player_2")]
    Player2,
    #[serde(rename = "player_3")]
    #[strum(serialize = "player_3")]
    Player3,
}

impl PlayerId {
    pub const ALL: [PlayerId; 3] = [PlayerId::Player1, PlayerId::Player2, PlayerId::Player3];

    /// The ids of a game with `count` players, in seating order.
    #[inline]
    pub fn all(count: usize) -> &'static [PlayerId] {
        &Self::ALL[..count.min(Self::COUNT)]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The player playing after this one, in a game with `count` players.
    ///
    /// # Example
    /// ```
    /// use tchu::player::PlayerId;
    ///
    /// assert_eq!(PlayerId::Player2.next(2), PlayerId::Player1);
    /// assert_eq!(PlayerId::Player2.next(3), PlayerId::Player3);
    /// ```
    pub fn next(self, count: usize) -> PlayerId {
        Self::ALL[(self.index() + 1) % count.clamp(1, Self::COUNT)]
    }
}

/// What a player decides to do with their turn.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnKind {
    DrawTickets,
    DrawCards,
    ClaimRoute,
}

impl TurnKind {
    pub const ALL: [TurnKind; 3] = [TurnKind::DrawTickets, TurnKind::DrawCards, TurnKind::ClaimRoute];
}

/// Where a player draws a card from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawSlot {
    /// One of the face-up cards, in `0..5`.
    FaceUp(usize),
    /// The top of the deck, which nobody can see.
    Deck,
}

impl DrawSlot {
    /// The index standing for the deck when slots are exchanged as numbers.
    pub const DECK_INDEX: i32 = -1;

    /// Decodes a numbered slot: `-1` is the deck, `0..5` a face-up card.
    pub fn from_index(index: i32) -> GameResult<Self> {
        if index == Self::DECK_INDEX {
            return Ok(DrawSlot::Deck);
        }
        let index = usize::try_from(index)
            .map_err(|_| GameError::InvalidArgument(format!("{} is not a draw slot.", index)))?;
        Ok(DrawSlot::FaceUp(check_index(index, FACE_UP_CARDS_COUNT)?))
    }

    pub fn to_index(self) -> i32 {
        match self {
            DrawSlot::FaceUp(slot) => slot as i32,
            DrawSlot::Deck => Self::DECK_INDEX,
        }
    }
}

/// Receives everything a player gets to know about the game.
pub trait PresentationSink {
    /// Announces how many players take part, before anything else.
    fn set_player_count(&mut self, _player_count: usize) -> GameResult<()> {
        Ok(())
    }

    /// Tells the player which seat they occupy, and the names of everyone.
    fn init_players(
        &mut self,
        own_id: PlayerId,
        player_names: &BTreeMap<PlayerId, String>,
    ) -> GameResult<()>;

    /// A line of narrative, already formatted.
    fn receive_info(&mut self, info: &str) -> GameResult<()>;

    /// The public state of the game, and the complete state of this player.
    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) -> GameResult<()>;

    /// The tickets to pick from at the start of the game.
    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) -> GameResult<()>;
}

/// Supplies the choices of a player whenever the game asks for one.
pub trait DecisionSource {
    /// Which of the tickets offered through [`PresentationSink::set_initial_ticket_choice`] to keep.
    fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>>;

    fn next_turn(&mut self) -> GameResult<TurnKind>;

    /// Which of the drawn `options` to keep.
    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>>;

    /// Called twice per card-drawing turn.
    fn draw_slot(&mut self) -> GameResult<DrawSlot>;

    fn claimed_route(&mut self) -> GameResult<Route>;

    /// The cards initially played to claim the route given by [`DecisionSource::claimed_route`].
    fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>>;

    /// How to pay the additional cost of a tunnel. An empty bag gives up on the claim.
    fn choose_additional_cards(
        &mut self,
        options: &[SortedBag<Card>],
    ) -> GameResult<SortedBag<Card>>;
}

/// A participant in a game, whether local, remote or simulated.
pub trait Player: DecisionSource + PresentationSink {}

impl<T: DecisionSource + PresentationSink + ?Sized> Player for T {}

impl<T: PresentationSink + ?Sized> PresentationSink for Box<T> {
    fn set_player_count(&mut self, player_count: usize) -> GameResult<()> {
        (**self).set_player_count(player_count)
    }

    fn init_players(
        &mut self,
        own_id: PlayerId,
        player_names: &BTreeMap<PlayerId, String>,
    ) -> GameResult<()> {
        (**self).init_players(own_id, player_names)
    }

    fn receive_info(&mut self, info: &str) -> GameResult<()> {
        (**self).receive_info(info)
    }

    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) -> GameResult<()> {
        (**self).update_state(state, own_state)
    }

    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) -> GameResult<()> {
        (**self).set_initial_ticket_choice(tickets)
    }
}

impl<T: DecisionSource + ?Sized> DecisionSource for Box<T> {
    fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>> {
        (**self).choose_initial_tickets()
    }

    fn next_turn(&mut self) -> GameResult<TurnKind> {
        (**self).next_turn()
    }

    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>> {
        (**self).choose_tickets(options)
    }

    fn draw_slot(&mut self) -> GameResult<DrawSlot> {
        (**self).draw_slot()
    }

    fn claimed_route(&mut self) -> GameResult<Route> {
        (**self).claimed_route()
    }

    fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>> {
        (**self).initial_claim_cards()
    }

    fn choose_additional_cards(
        &mut self,
        options: &[SortedBag<Card>],
    ) -> GameResult<SortedBag<Card>> {
        (**self).choose_additional_cards(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests for `PlayerId`.

    #[test]
    fn player_id_to_json() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&PlayerId::Player1)?, r#""player_1""#);
        assert_eq!(serde_json::to_string(&PlayerId::Player3)?, r#""player_3""#);
        Ok(())
    }

    #[test]
    fn json_to_player_id() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::from_str::<PlayerId>(r#""player_2""#)?,
            PlayerId::Player2
        );
        Ok(())
    }

    #[test]
    fn invalid_json_to_player_id() {
        assert!(serde_json::from_str::<PlayerId>(r#""player_4""#).is_err());
    }

    #[test]
    fn next_player_wraps_around() {
        assert_eq!(PlayerId::Player1.next(2), PlayerId::Player2);
        assert_eq!(PlayerId::Player2.next(2), PlayerId::Player1);
        assert_eq!(PlayerId::Player3.next(3), PlayerId::Player1);
    }

    #[test]
    fn seating_order() {
        assert_eq!(PlayerId::all(2), &[PlayerId::Player1, PlayerId::Player2]);
        assert_eq!(PlayerId::all(3).len(), 3);
    }

    // Tests for `TurnKind`.

    #[test]
    fn turn_kind_to_json() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&TurnKind::DrawCards)?, r#""draw_cards""#);
        assert_eq!(TurnKind::ClaimRoute.to_string(), "claim_route");
        Ok(())
    }

    // Tests for `DrawSlot`.

    #[test]
    fn draw_slot_indices() -> GameResult<()> {
        assert_eq!(DrawSlot::from_index(-1)?, DrawSlot::Deck);
        assert_eq!(DrawSlot::from_index(4)?, DrawSlot::FaceUp(4));
        assert_eq!(DrawSlot::Deck.to_index(), -1);
        assert_eq!(DrawSlot::FaceUp(2).to_index(), 2);
        Ok(())
    }

    #[test]
    fn invalid_draw_slots() {
        assert!(matches!(
            DrawSlot::from_index(5),
            Err(GameError::IndexOutOfRange { index: 5, len: 5 })
        ));
        assert!(matches!(
            DrawSlot::from_index(-2),
            Err(GameError::InvalidArgument(_))
        ));
    }
}
