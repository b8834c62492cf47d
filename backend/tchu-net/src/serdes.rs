//! The encodings of every value exchanged between the server and its clients.
//!
//! Values which only depend on closed enums have process-wide encodings. Routes and tickets
//! are encoded by their position in the [`Map`], so their encodings live in [`Serdes`].

use crate::codec::{malformed, BagOf, IntSerde, ListOf, OneOf, Serde, StringSerde};

use std::collections::BTreeMap;
use tchu::card::Card;
use tchu::card_state::PublicCardState;
use tchu::game_state::PublicGameState;
use tchu::map::Map;
use tchu::player::{PlayerId, TurnKind};
use tchu::player_state::{PlayerState, PublicPlayerState};
use tchu::route::Route;
use tchu::ticket::Ticket;
use tchu::{GameError, GameResult};

lazy_static! {
    pub static ref INT: IntSerde = IntSerde;
    pub static ref STRING: StringSerde = StringSerde;
    pub static ref PLAYER_ID: OneOf<PlayerId> = OneOf::new(PlayerId::ALL);
    pub static ref TURN_KIND: OneOf<TurnKind> = OneOf::new(TurnKind::ALL);
    pub static ref CARD: OneOf<Card> = OneOf::new(Card::ALL);
    pub static ref STRING_LIST: ListOf<StringSerde> = ListOf::new(StringSerde, ',');
    pub static ref CARD_LIST: ListOf<OneOf<Card>> = ListOf::new(CARD.clone(), ',');
    pub static ref CARD_BAG: BagOf<OneOf<Card>> = BagOf::new(CARD.clone(), ',');
    pub static ref CARD_BAG_LIST: ListOf<BagOf<OneOf<Card>>> = ListOf::new(CARD_BAG.clone(), ';');
    pub static ref PUBLIC_CARD_STATE: PublicCardStateSerde = PublicCardStateSerde;
}

/// Splits `text` around `separator`, expecting exactly `count` fields.
fn fields<'a>(what: &str, text: &'a str, separator: char, count: usize) -> GameResult<Vec<&'a str>> {
    let fields: Vec<&str> = text.split(separator).collect();
    if fields.len() == count {
        Ok(fields)
    } else {
        Err(malformed(what, text))
    }
}

/// Decoded fields may still describe an impossible value.
fn invalid(error: GameError) -> GameError {
    GameError::Malformed(error.to_string())
}

/// `faceUp;deck;discards`
#[derive(Clone, Copy, Debug, Default)]
pub struct PublicCardStateSerde;

impl Serde<PublicCardState> for PublicCardStateSerde {
    fn serialize(&self, state: &PublicCardState) -> String {
        [
            CARD_LIST.serialize_slice(state.face_up_cards()),
            INT.serialize(&state.deck_size()),
            INT.serialize(&state.discards_size()),
        ]
        .join(";")
    }

    fn deserialize(&self, text: &str) -> GameResult<PublicCardState> {
        let fields = fields("card state", text, ';', 3)?;
        let face_up_cards: Vec<Card> = CARD_LIST.deserialize(fields[0])?;
        PublicCardState::new(
            &face_up_cards,
            INT.deserialize(fields[1])?,
            INT.deserialize(fields[2])?,
        )
        .map_err(invalid)
    }
}

/// `tickets;cards;routes`
#[derive(Clone, Debug)]
pub struct PublicPlayerStateSerde {
    routes: ListOf<OneOf<Route>>,
}

impl Serde<PublicPlayerState> for PublicPlayerStateSerde {
    fn serialize(&self, state: &PublicPlayerState) -> String {
        [
            INT.serialize(&state.ticket_count()),
            INT.serialize(&state.card_count()),
            self.routes.serialize_slice(state.routes()),
        ]
        .join(";")
    }

    fn deserialize(&self, text: &str) -> GameResult<PublicPlayerState> {
        let fields = fields("public player state", text, ';', 3)?;
        Ok(PublicPlayerState::new(
            INT.deserialize(fields[0])?,
            INT.deserialize(fields[1])?,
            self.routes.deserialize(fields[2])?,
        ))
    }
}

/// `ticketBag;cardBag;routes`
#[derive(Clone, Debug)]
pub struct PlayerStateSerde {
    tickets: BagOf<OneOf<Ticket>>,
    routes: ListOf<OneOf<Route>>,
}

impl Serde<PlayerState> for PlayerStateSerde {
    fn serialize(&self, state: &PlayerState) -> String {
        [
            self.tickets.serialize(state.tickets()),
            CARD_BAG.serialize(state.cards()),
            self.routes.serialize_slice(state.routes()),
        ]
        .join(";")
    }

    fn deserialize(&self, text: &str) -> GameResult<PlayerState> {
        let fields = fields("player state", text, ';', 3)?;
        Ok(PlayerState::new(
            self.tickets.deserialize(fields[0])?,
            CARD_BAG.deserialize(fields[1])?,
            self.routes.deserialize(fields[2])?,
        ))
    }
}

/// `tickets:cardState:current:player1:player2[:player3]:last`, where `last` is empty until
/// the last turn begins.
#[derive(Clone, Debug)]
pub struct PublicGameStateSerde {
    players: PublicPlayerStateSerde,
}

impl Serde<PublicGameState> for PublicGameStateSerde {
    fn serialize(&self, state: &PublicGameState) -> String {
        let mut fields = vec![
            INT.serialize(&state.ticket_count()),
            PUBLIC_CARD_STATE.serialize(state.card_state()),
            PLAYER_ID.serialize(&state.current_player_id()),
        ];
        fields.extend(
            state
                .players()
                .map(|(_, player)| self.players.serialize(player)),
        );
        fields.push(
            state
                .last_player()
                .map(|id| PLAYER_ID.serialize(&id))
                .unwrap_or_default(),
        );
        fields.join(":")
    }

    fn deserialize(&self, text: &str) -> GameResult<PublicGameState> {
        let fields: Vec<&str> = text.split(':').collect();
        // Three leading fields and the last player surround the player states.
        let player_count = fields
            .len()
            .checked_sub(4)
            .filter(|count| *count <= PlayerId::ALL.len())
            .ok_or_else(|| malformed("public game state", text))?;

        let mut players = BTreeMap::new();
        for (id, field) in PlayerId::ALL.iter().zip(&fields[3..3 + player_count]) {
            players.insert(*id, self.players.deserialize(field)?);
        }
        let last_player = match fields[3 + player_count] {
            "" => None,
            id => Some(PLAYER_ID.deserialize(id)?),
        };

        PublicGameState::new(
            INT.deserialize(fields[0])?,
            PUBLIC_CARD_STATE.deserialize(fields[1])?,
            PLAYER_ID.deserialize(fields[2])?,
            players,
            last_player,
        )
        .map_err(invalid)
    }
}

/// The encodings which depend on the routes and tickets of a [`Map`].
///
/// Both ends of a connection must build their `Serdes` from the same map.
#[derive(Clone, Debug)]
pub struct Serdes {
    pub route: OneOf<Route>,
    pub ticket_bag: BagOf<OneOf<Ticket>>,
    pub public_game_state: PublicGameStateSerde,
    pub player_state: PlayerStateSerde,
}

impl Serdes {
    pub fn new(map: &Map) -> Self {
        let route = OneOf::new(map.routes().to_vec());
        let ticket = OneOf::new(map.tickets().as_slice().to_vec());
        let routes = ListOf::new(route.clone(), ',');

        Self {
            route,
            ticket_bag: BagOf::new(ticket.clone(), ','),
            public_game_state: PublicGameStateSerde {
                players: PublicPlayerStateSerde {
                    routes: routes.clone(),
                },
            },
            player_state: PlayerStateSerde {
                tickets: BagOf::new(ticket, ','),
                routes,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tchu::bag::SortedBag;
    use tchu::game_state::GameState;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn serdes() -> Serdes {
        Serdes::new(&Map::standard())
    }

    // Tests for the constant serdes.

    #[test]
    fn enums_by_position() -> GameResult<()> {
        assert_eq!(PLAYER_ID.serialize(&PlayerId::Player2), "1");
        assert_eq!(TURN_KIND.serialize(&TurnKind::ClaimRoute), "2");
        assert_eq!(TURN_KIND.deserialize("0")?, TurnKind::DrawTickets);
        assert!(PLAYER_ID.deserialize("3").is_err());
        Ok(())
    }

    #[test]
    fn names_list() -> GameResult<()> {
        let names = vec!["Ada".to_string(), "Charles".to_string()];
        let text = STRING_LIST.serialize(&names);
        assert_eq!(text, "QWRh,Q2hhcmxlcw==");
        assert_eq!(STRING_LIST.deserialize(&text)?, names);
        Ok(())
    }

    #[test]
    fn card_state() -> GameResult<()> {
        let state = PUBLIC_CARD_STATE.deserialize("6,7,2,0,6;30;31")?;
        assert_eq!(state.face_up_card(0)?, Card::White);
        assert_eq!(state.deck_size(), 30);
        assert_eq!(state.discards_size(), 31);
        assert!(matches!(
            PUBLIC_CARD_STATE.deserialize("6,7,2;30;31"),
            Err(GameError::Malformed(_))
        ));
        assert!(PUBLIC_CARD_STATE.deserialize("6,7,2,0,6;30").is_err());
        Ok(())
    }

    // Tests for `Serdes`.

    #[test]
    fn known_public_game_state() -> GameResult<()> {
        let serdes = serdes();
        let text = "40:6,7,2,0,6;30;31:1:10;11;0,1:20;21;:";
        let state = serdes.public_game_state.deserialize(text)?;

        assert_eq!(state.ticket_count(), 40);
        assert_eq!(state.current_player_id(), PlayerId::Player2);
        assert_eq!(state.player_count(), 2);
        assert_eq!(state.last_player(), None);
        let first = state.player_state(PlayerId::Player1)?;
        assert_eq!(first.ticket_count(), 10);
        assert_eq!(first.card_count(), 11);
        assert_eq!(first.routes(), &Map::standard().routes()[..2]);
        assert!(state.player_state(PlayerId::Player2)?.routes().is_empty());

        assert_eq!(serdes.public_game_state.serialize(&state), text);
        Ok(())
    }

    #[test]
    fn three_players_and_a_last_player() -> GameResult<()> {
        let serdes = serdes();
        let text = "0:8,8,8,8,8;0;3:0:1;2;:3;4;5:5;6;:2";
        let state = serdes.public_game_state.deserialize(text)?;
        assert_eq!(state.player_count(), 3);
        assert_eq!(state.last_player(), Some(PlayerId::Player3));
        assert_eq!(serdes.public_game_state.serialize(&state), text);
        Ok(())
    }

    #[test]
    fn broken_public_game_states() {
        let serdes = serdes();
        for text in [
            "",
            "40:6,7,2,0,6;30;31:1:10;11;0,1:",
            "40:6,7,2,0,6;30;31:2:10;11;0,1:20;21;:",
            "40:6,7,2,0,6;30;31:1:10;11;0,1:20;21;:1:2:3:4",
            "40:6,7,2,0,6;30;31:1:10;11;999:20;21;:",
        ] {
            assert!(
                serdes.public_game_state.deserialize(text).is_err(),
                "{:?} should not decode",
                text
            );
        }
    }

    #[test]
    fn actual_states() -> GameResult<()> {
        let map = Map::standard();
        let serdes = Serdes::new(&map);
        let mut rng = StdRng::seed_from_u64(5);
        let state = GameState::initial(map.tickets(), 3, &mut rng)?;
        let drawn = state.top_tickets(3)?;
        let state = state.with_initially_chosen_tickets(PlayerId::Player1, &drawn)?;
        let route = map.routes()[7].clone();
        let cards = route.possible_claim_cards().remove(0);
        let own = state
            .player_state(PlayerId::Player1)?
            .clone()
            .with_claimed_route(route, &cards);

        let text = serdes.player_state.serialize(&own);
        assert_eq!(serdes.player_state.deserialize(&text)?, own);

        let public = state.to_public();
        let text = serdes.public_game_state.serialize(&public);
        assert_eq!(serdes.public_game_state.deserialize(&text)?, public);
        Ok(())
    }

    // Tests for round trips over arbitrary values.

    fn card_bag(sizes: std::ops::Range<usize>) -> impl Strategy<Value = SortedBag<Card>> {
        prop::collection::vec(0..Card::ALL.len(), sizes)
            .prop_map(|indices| {
                indices.into_iter().map(|index| Card::ALL[index]).collect::<SortedBag<_>>()
            })
    }

    fn ticket_bag() -> impl Strategy<Value = SortedBag<Ticket>> {
        let tickets = Map::standard().tickets().as_slice().to_vec();
        prop::collection::vec(0..tickets.len(), 0..6)
            .prop_map(move |indices| {
                indices.into_iter().map(|index| tickets[index].clone()).collect::<SortedBag<_>>()
            })
    }

    fn routes() -> impl Strategy<Value = Vec<Route>> {
        let routes = Map::standard().routes().to_vec();
        prop::collection::vec(0..routes.len(), 0..12)
            .prop_map(move |indices| {
                indices.into_iter().map(|index| routes[index].clone()).collect::<Vec<_>>()
            })
    }

    proptest! {
        #[test]
        fn card_bags_round_trip(bag in card_bag(0..12)) {
            prop_assert_eq!(CARD_BAG.deserialize(&CARD_BAG.serialize(&bag)).unwrap(), bag);
        }

        #[test]
        fn card_bag_lists_round_trip(bags in prop::collection::vec(card_bag(1..5), 0..6)) {
            let text = CARD_BAG_LIST.serialize_slice(&bags);
            prop_assert_eq!(CARD_BAG_LIST.deserialize(&text).unwrap(), bags);
        }

        #[test]
        fn ticket_bags_round_trip(bag in ticket_bag()) {
            let serdes = serdes();
            let text = serdes.ticket_bag.serialize(&bag);
            prop_assert_eq!(serdes.ticket_bag.deserialize(&text).unwrap(), bag);
        }

        #[test]
        fn player_states_round_trip(tickets in ticket_bag(), cards in card_bag(0..20), routes in routes()) {
            let serdes = serdes();
            let state = PlayerState::new(tickets, cards, routes);
            let text = serdes.player_state.serialize(&state);
            prop_assert_eq!(serdes.player_state.deserialize(&text).unwrap(), state);
        }
    }
}
