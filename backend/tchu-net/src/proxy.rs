//! The server side of a remote player.

use crate::codec::Serde;
use crate::message_id::MessageId;
use crate::serdes::{Serdes, CARD_BAG, CARD_BAG_LIST, INT, PLAYER_ID, STRING, STRING_LIST, TURN_KIND};

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tchu::bag::SortedBag;
use tchu::card::Card;
use tchu::game_state::PublicGameState;
use tchu::player::{DecisionSource, DrawSlot, PlayerId, PresentationSink, TurnKind};
use tchu::player_state::PlayerState;
use tchu::route::Route;
use tchu::ticket::Ticket;
use tchu::GameResult;
use tracing::debug;

/// Stands for a player on the other end of a connection.
///
/// Every call becomes one line sent to the client. Calls expecting an answer then block until
/// the client replies with one line.
pub struct RemotePlayerProxy<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    serdes: Arc<Serdes>,
}

impl<R: BufRead, W: Write> RemotePlayerProxy<R, W> {
    pub fn new(reader: R, writer: W, serdes: Arc<Serdes>) -> Self {
        Self {
            reader,
            writer,
            serdes,
        }
    }

    /// Asks the client for the name of its player.
    pub fn request_name(&mut self) -> GameResult<String> {
        self.send(MessageId::SetPlayerName, &[])?;
        STRING.deserialize(&self.receive()?)
    }

    fn send(&mut self, id: MessageId, arguments: &[String]) -> GameResult<()> {
        let mut line = id.to_string();
        for argument in arguments {
            line.push(' ');
            line.push_str(argument);
        }
        debug!(%line, "Sending");
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> GameResult<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "the client disconnected before replying",
            )
            .into());
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        debug!(%line, "Received");
        Ok(line)
    }
}

impl<R: BufRead, W: Write> PresentationSink for RemotePlayerProxy<R, W> {
    fn set_player_count(&mut self, player_count: usize) -> GameResult<()> {
        self.send(MessageId::SetPlayerNum, &[INT.serialize(&player_count)])
    }

    fn init_players(
        &mut self,
        own_id: PlayerId,
        player_names: &BTreeMap<PlayerId, String>,
    ) -> GameResult<()> {
        let names: Vec<String> = player_names.values().cloned().collect();
        self.send(
            MessageId::InitPlayers,
            &[PLAYER_ID.serialize(&own_id), STRING_LIST.serialize(&names)],
        )
    }

    fn receive_info(&mut self, info: &str) -> GameResult<()> {
        self.send(MessageId::ReceiveInfo, &[STRING.serialize(&info.to_string())])
    }

    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) -> GameResult<()> {
        let arguments = [
            self.serdes.public_game_state.serialize(state),
            self.serdes.player_state.serialize(own_state),
        ];
        self.send(MessageId::UpdateState, &arguments)
    }

    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) -> GameResult<()> {
        let tickets = self.serdes.ticket_bag.serialize(tickets);
        self.send(MessageId::SetInitialTickets, &[tickets])
    }
}

impl<R: BufRead, W: Write> DecisionSource for RemotePlayerProxy<R, W> {
    fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>> {
        self.send(MessageId::ChooseInitialTickets, &[])?;
        let reply = self.receive()?;
        self.serdes.ticket_bag.deserialize(&reply)
    }

    fn next_turn(&mut self) -> GameResult<TurnKind> {
        self.send(MessageId::NextTurn, &[])?;
        TURN_KIND.deserialize(&self.receive()?)
    }

    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>> {
        let options = self.serdes.ticket_bag.serialize(options);
        self.send(MessageId::ChooseTickets, &[options])?;
        let reply = self.receive()?;
        self.serdes.ticket_bag.deserialize(&reply)
    }

    fn draw_slot(&mut self) -> GameResult<DrawSlot> {
        self.send(MessageId::DrawSlot, &[])?;
        DrawSlot::from_index(INT.deserialize(&self.receive()?)?)
    }

    fn claimed_route(&mut self) -> GameResult<Route> {
        self.send(MessageId::Route, &[])?;
        let reply = self.receive()?;
        self.serdes.route.deserialize(&reply)
    }

    fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>> {
        self.send(MessageId::Cards, &[])?;
        CARD_BAG.deserialize(&self.receive()?)
    }

    fn choose_additional_cards(
        &mut self,
        options: &[SortedBag<Card>],
    ) -> GameResult<SortedBag<Card>> {
        self.send(
            MessageId::ChooseAdditionalCards,
            &[CARD_BAG_LIST.serialize_slice(options)],
        )?;
        CARD_BAG.deserialize(&self.receive()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tchu::map::Map;
    use tchu::GameError;

    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn proxy(replies: &str) -> RemotePlayerProxy<Cursor<Vec<u8>>, Vec<u8>> {
        RemotePlayerProxy::new(
            Cursor::new(replies.as_bytes().to_vec()),
            Vec::new(),
            Arc::new(Serdes::new(&Map::standard())),
        )
    }

    fn sent(proxy: &RemotePlayerProxy<Cursor<Vec<u8>>, Vec<u8>>) -> &str {
        std::str::from_utf8(&proxy.writer).unwrap()
    }

    #[test]
    fn pushes_are_single_lines() -> GameResult<()> {
        let mut proxy = proxy("");
        proxy.set_player_count(3)?;
        let names = [
            (PlayerId::Player1, "Ada".to_string()),
            (PlayerId::Player2, "Charles".to_string()),
        ]
        .into_iter()
        .collect();
        proxy.init_players(PlayerId::Player2, &names)?;
        proxy.receive_info("Ada will play first.")?;

        assert_eq!(
            sent(&proxy),
            "SET_PLAYER_NUM 3\n\
             INIT_PLAYERS 1 QWRh,Q2hhcmxlcw==\n\
             RECEIVE_INFO QWRhIHdpbGwgcGxheSBmaXJzdC4=\n"
        );
        Ok(())
    }

    #[test]
    fn requests_read_one_reply() -> GameResult<()> {
        let mut proxy = proxy("Q2hhcmxlcw==\n1\n-1\n2\r\n0,0,8\n");
        assert_eq!(proxy.request_name()?, "Charles");
        assert_eq!(proxy.next_turn()?, TurnKind::DrawCards);
        assert_eq!(proxy.draw_slot()?, DrawSlot::Deck);
        assert_eq!(proxy.draw_slot()?, DrawSlot::FaceUp(2));
        assert_eq!(
            proxy.initial_claim_cards()?,
            SortedBag::of_two(2, Card::Black, 1, Card::Locomotive)
        );
        assert_eq!(
            sent(&proxy),
            "SET_PLAYER_NAME\nNEXT_TURN\nDRAW_SLOT\nDRAW_SLOT\nCARDS\n"
        );
        Ok(())
    }

    #[test]
    fn replies_naming_tickets_and_routes() -> GameResult<()> {
        let map = Map::standard();
        let tickets = map.tickets().as_slice();
        let mut proxy = proxy("0,2\n1\n3\n");
        let options: SortedBag<Ticket> = tickets[..3].iter().cloned().collect();

        assert_eq!(
            proxy.choose_initial_tickets()?,
            [tickets[0].clone(), tickets[2].clone()]
                .into_iter()
                .collect::<SortedBag<Ticket>>()
        );
        assert_eq!(proxy.choose_tickets(&options)?, SortedBag::of(1, tickets[1].clone()));
        assert_eq!(proxy.claimed_route()?, map.routes()[3]);
        assert_eq!(
            sent(&proxy),
            "CHOOSE_INITIAL_TICKETS\nCHOOSE_TICKETS 0,1,2\nROUTE\n"
        );
        Ok(())
    }

    #[test]
    fn additional_cards_options() -> GameResult<()> {
        let mut proxy = proxy("\n");
        let options = vec![
            SortedBag::of(2, Card::Red),
            SortedBag::of_two(1, Card::Red, 1, Card::Locomotive),
        ];
        assert!(proxy.choose_additional_cards(&options)?.is_empty());
        assert_eq!(sent(&proxy), "CHOOSE_ADDITIONAL_CARDS 5,5;5,8\n");
        Ok(())
    }

    #[test]
    fn disconnected_client() {
        let mut proxy = proxy("");
        assert!(matches!(proxy.next_turn(), Err(GameError::Transport(_))));
    }

    #[test]
    fn malformed_reply() {
        let mut proxy = proxy("draw cards\n");
        assert!(matches!(proxy.next_turn(), Err(GameError::Malformed(_))));
    }
}
