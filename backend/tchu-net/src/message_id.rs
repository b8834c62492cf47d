use parse_display::{Display, FromStr};
use strum_macros::EnumIter;

/// The first token of every line exchanged between the server and a client.
///
/// Messages are written in SCREAMING_SNAKE_CASE, e.g. `CHOOSE_INITIAL_TICKETS`.
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, FromStr, PartialEq)]
#[display(style = "SNAKE_CASE")]
pub enum MessageId {
    InitPlayers,
    ReceiveInfo,
    UpdateState,
    SetInitialTickets,
    ChooseInitialTickets,
    NextTurn,
    ChooseTickets,
    DrawSlot,
    Route,
    Cards,
    ChooseAdditionalCards,
    SetPlayerNum,
    SetPlayerName,
}

impl MessageId {
    /// Whether the sender waits for a reply line.
    pub fn expects_reply(self) -> bool {
        !matches!(
            self,
            MessageId::InitPlayers
                | MessageId::ReceiveInfo
                | MessageId::UpdateState
                | MessageId::SetInitialTickets
                | MessageId::SetPlayerNum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn message_id_to_string() {
        assert_eq!(MessageId::InitPlayers.to_string(), "INIT_PLAYERS");
        assert_eq!(
            MessageId::ChooseAdditionalCards.to_string(),
            "CHOOSE_ADDITIONAL_CARDS"
        );
        assert_eq!(MessageId::Route.to_string(), "ROUTE");
    }

    #[test]
    fn string_to_message_id() {
        for id in MessageId::iter() {
            assert_eq!(id.to_string().parse::<MessageId>().ok(), Some(id));
        }
        assert!("NEXT_TURN ".parse::<MessageId>().is_err());
        assert!("next_turn".parse::<MessageId>().is_err());
    }

    #[test]
    fn replies() {
        assert_eq!(MessageId::iter().filter(|id| id.expects_reply()).count(), 8);
    }
}
