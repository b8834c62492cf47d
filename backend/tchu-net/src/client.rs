//! The client side of a remote player.

use crate::codec::{malformed, Serde};
use crate::message_id::MessageId;
use crate::serdes::{Serdes, CARD_BAG, CARD_BAG_LIST, INT, PLAYER_ID, STRING, STRING_LIST, TURN_KIND};

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tchu::player::{Player, PlayerId};
use tchu::{GameError, GameResult};
use tracing::{debug, info, warn};

/// Answers the messages of a [`crate::proxy::RemotePlayerProxy`] on behalf of a local player.
pub struct RemotePlayerClient<P: Player, R: BufRead, W: Write> {
    player: P,
    name: String,
    reader: R,
    writer: W,
    serdes: Serdes,
}

impl<P: Player, R: BufRead, W: Write> RemotePlayerClient<P, R, W> {
    pub fn new(player: P, name: impl Into<String>, reader: R, writer: W, serdes: Serdes) -> Self {
        Self {
            player,
            name: name.into(),
            reader,
            writer,
            serdes,
        }
    }

    /// Handles messages until the server closes the connection.
    ///
    /// Returns an `Err` on the first line which cannot be handled.
    pub fn run(&mut self) -> GameResult<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                info!("The server closed the connection");
                return Ok(());
            }
            let message = line.trim_end_matches(&['\r', '\n'][..]);
            debug!(%message, "Received");
            if let Err(error) = self.handle(message) {
                warn!(%message, %error, "Could not handle message");
                return Err(error);
            }
        }
    }

    /// Handles one line, without its newline.
    pub fn handle(&mut self, message: &str) -> GameResult<()> {
        let mut tokens = message.split(' ');
        let id: MessageId = tokens
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| malformed("message id", message))?;
        let arguments: Vec<&str> = tokens.collect();
        let argument = |index: usize| {
            arguments
                .get(index)
                .copied()
                .ok_or_else(|| GameError::Malformed(format!("{} expects argument {}", id, index + 1)))
        };

        match id {
            MessageId::SetPlayerNum => {
                let player_count = INT.deserialize(argument(0)?)?;
                self.player.set_player_count(player_count)?;
            }
            MessageId::SetPlayerName => {
                let reply = STRING.serialize(&self.name);
                self.reply(reply)?;
            }
            MessageId::InitPlayers => {
                let own_id = PLAYER_ID.deserialize(argument(0)?)?;
                let names: Vec<String> = STRING_LIST.deserialize(argument(1)?)?;
                let player_names: BTreeMap<PlayerId, String> =
                    PlayerId::ALL.iter().copied().zip(names).collect();
                self.player.init_players(own_id, &player_names)?;
            }
            MessageId::ReceiveInfo => {
                let info = STRING.deserialize(argument(0)?)?;
                self.player.receive_info(&info)?;
            }
            MessageId::UpdateState => {
                let state = self.serdes.public_game_state.deserialize(argument(0)?)?;
                let own_state = self.serdes.player_state.deserialize(argument(1)?)?;
                self.player.update_state(&state, &own_state)?;
            }
            MessageId::SetInitialTickets => {
                let tickets = self.serdes.ticket_bag.deserialize(argument(0)?)?;
                self.player.set_initial_ticket_choice(&tickets)?;
            }
            MessageId::ChooseInitialTickets => {
                let tickets = self.player.choose_initial_tickets()?;
                let reply = self.serdes.ticket_bag.serialize(&tickets);
                self.reply(reply)?;
            }
            MessageId::NextTurn => {
                let turn_kind = self.player.next_turn()?;
                self.reply(TURN_KIND.serialize(&turn_kind))?;
            }
            MessageId::ChooseTickets => {
                let options = self.serdes.ticket_bag.deserialize(argument(0)?)?;
                let tickets = self.player.choose_tickets(&options)?;
                let reply = self.serdes.ticket_bag.serialize(&tickets);
                self.reply(reply)?;
            }
            MessageId::DrawSlot => {
                let slot = self.player.draw_slot()?;
                self.reply(INT.serialize(&slot.to_index()))?;
            }
            MessageId::Route => {
                let route = self.player.claimed_route()?;
                let reply = self.serdes.route.serialize(&route);
                self.reply(reply)?;
            }
            MessageId::Cards => {
                let cards = self.player.initial_claim_cards()?;
                self.reply(CARD_BAG.serialize(&cards))?;
            }
            MessageId::ChooseAdditionalCards => {
                let options = CARD_BAG_LIST.deserialize(argument(0)?)?;
                let cards = self.player.choose_additional_cards(&options)?;
                self.reply(CARD_BAG.serialize(&cards))?;
            }
        }
        Ok(())
    }

    fn reply(&mut self, line: String) -> GameResult<()> {
        debug!(%line, "Replying");
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Gives back the local player, e.g. once the game is over.
    pub fn into_player(self) -> P {
        self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tchu::bag::SortedBag;
    use tchu::card::Card;
    use tchu::game_state::PublicGameState;
    use tchu::map::Map;
    use tchu::player::{DecisionSource, DrawSlot, PresentationSink, TurnKind};
    use tchu::player_state::PlayerState;
    use tchu::route::Route;
    use tchu::ticket::Ticket;

    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Records what it is told, and always gives the same answers.
    #[derive(Default)]
    struct Recorder {
        player_count: Option<usize>,
        own_id: Option<PlayerId>,
        names: BTreeMap<PlayerId, String>,
        infos: Vec<String>,
        states: Vec<PublicGameState>,
    }

    impl PresentationSink for Recorder {
        fn set_player_count(&mut self, player_count: usize) -> GameResult<()> {
            self.player_count = Some(player_count);
            Ok(())
        }

        fn init_players(
            &mut self,
            own_id: PlayerId,
            player_names: &BTreeMap<PlayerId, String>,
        ) -> GameResult<()> {
            self.own_id = Some(own_id);
            self.names = player_names.clone();
            Ok(())
        }

        fn receive_info(&mut self, info: &str) -> GameResult<()> {
            self.infos.push(info.to_string());
            Ok(())
        }

        fn update_state(&mut self, state: &PublicGameState, _: &PlayerState) -> GameResult<()> {
            self.states.push(state.clone());
            Ok(())
        }

        fn set_initial_ticket_choice(&mut self, _: &SortedBag<Ticket>) -> GameResult<()> {
            Ok(())
        }
    }

    impl DecisionSource for Recorder {
        fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>> {
            Ok(SortedBag::new())
        }

        fn next_turn(&mut self) -> GameResult<TurnKind> {
            Ok(TurnKind::ClaimRoute)
        }

        fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>> {
            Ok(options.clone())
        }

        fn draw_slot(&mut self) -> GameResult<DrawSlot> {
            Ok(DrawSlot::FaceUp(4))
        }

        fn claimed_route(&mut self) -> GameResult<Route> {
            Ok(Map::standard().routes()[3].clone())
        }

        fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>> {
            Ok(SortedBag::of(3, Card::Green))
        }

        fn choose_additional_cards(
            &mut self,
            options: &[SortedBag<Card>],
        ) -> GameResult<SortedBag<Card>> {
            Ok(options.last().cloned().unwrap_or_default())
        }
    }

    fn run(lines: &str) -> GameResult<(Recorder, String)> {
        let mut output = Vec::new();
        let mut client = RemotePlayerClient::new(
            Recorder::default(),
            "Michel",
            Cursor::new(lines.as_bytes().to_vec()),
            &mut output,
            Serdes::new(&Map::standard()),
        );
        client.run()?;
        let recorder = client.into_player();
        Ok((recorder, String::from_utf8(output).unwrap()))
    }

    #[test]
    fn pushes_reach_the_player() -> GameResult<()> {
        let (recorder, output) = run(
            "SET_PLAYER_NUM 3\n\
             INIT_PLAYERS 2 QWRh,Q2hhcmxlcw==,TWljaGVs\n\
             RECEIVE_INFO QWRhIHdpbGwgcGxheSBmaXJzdC4=\n\
             UPDATE_STATE 40:6,7,2,0,6;30;31:1:10;11;0,1:20;21;: ;0,1;\n",
        )?;

        assert_eq!(recorder.player_count, Some(3));
        assert_eq!(recorder.own_id, Some(PlayerId::Player3));
        assert_eq!(recorder.names.get(&PlayerId::Player3).map(String::as_str), Some("Michel"));
        assert_eq!(recorder.infos, vec!["Ada will play first."]);
        assert_eq!(recorder.states.len(), 1);
        assert_eq!(output, "");
        Ok(())
    }

    #[test]
    fn requests_get_one_line_each() -> GameResult<()> {
        let (_, output) = run(
            "SET_PLAYER_NAME\n\
             NEXT_TURN\n\
             DRAW_SLOT\n\
             ROUTE\n\
             CARDS\n\
             CHOOSE_ADDITIONAL_CARDS 2,2;2,8\n",
        )?;
        assert_eq!(output, "TWljaGVs\n2\n4\n3\n2,2,2\n2,8\n");
        Ok(())
    }

    #[test]
    fn unknown_message() {
        assert!(matches!(run("HELLO 1\n"), Err(GameError::Malformed(_))));
    }

    #[test]
    fn missing_argument() {
        assert!(matches!(run("RECEIVE_INFO\n"), Err(GameError::Malformed(_))));
        assert!(matches!(
            run("UPDATE_STATE 40:6,7,2,0,6;30;31:1:10;11;0,1:20;21;:\n"),
            Err(GameError::Malformed(_))
        ));
    }
}
