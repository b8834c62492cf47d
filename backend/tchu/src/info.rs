//! The narrative of a game, as told to every player.

use crate::bag::SortedBag;
use crate::card::Card;
use crate::route::Route;
use crate::trail::Trail;

/// Bonus granted to the players with the longest trail.
pub const LONGEST_TRAIL_BONUS_POINTS: i32 = 10;

fn plural(count: i64) -> &'static str {
    if count.abs() > 1 {
        "s"
    } else {
        ""
    }
}

/// Joins `items` with commas, and the last two with "and".
fn enumerate(items: &[String]) -> String {
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Messages describing what a given player does.
#[derive(Clone, Debug)]
pub struct Info {
    player_name: String,
}

impl Info {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
        }
    }

    /// The name of a card, in the plural if `count` is not 1.
    ///
    /// # Example
    /// ```
    /// use tchu::card::Card;
    /// use tchu::info::Info;
    ///
    /// assert_eq!(Info::card_name(Card::Blue, 1), "blue card");
    /// assert_eq!(Info::card_name(Card::Locomotive, 3), "locomotives");
    /// ```
    pub fn card_name(card: Card, count: usize) -> String {
        let plural = plural(count as i64);
        if card.is_locomotive() {
            format!("locomotive{}", plural)
        } else {
            format!("{} card{}", card, plural)
        }
    }

    /// Describes some cards, e.g. `2 black cards and 1 locomotive`.
    pub fn cards(cards: &SortedBag<Card>) -> String {
        let parts: Vec<String> = cards
            .distinct()
            .into_iter()
            .map(|card| {
                let count = cards.count_of(&card);
                format!("{} {}", count, Self::card_name(card, count))
            })
            .collect();
        enumerate(&parts)
    }

    /// The game ended in a draw between the named players.
    pub fn draw(player_names: &[String], points: i32) -> String {
        format!(
            "{} are tied with {} point{} each!",
            enumerate(player_names),
            points,
            plural(points as i64)
        )
    }

    pub fn will_play_first(&self) -> String {
        format!("{} will play first.", self.player_name)
    }

    pub fn kept_tickets(&self, count: usize) -> String {
        format!(
            "{} kept {} ticket{}.",
            self.player_name,
            count,
            plural(count as i64)
        )
    }

    pub fn can_play(&self) -> String {
        format!("It is {}'s turn to play.", self.player_name)
    }

    pub fn drew_tickets(&self, count: usize) -> String {
        format!(
            "{} drew {} ticket{}...",
            self.player_name,
            count,
            plural(count as i64)
        )
    }

    pub fn drew_blind_card(&self) -> String {
        format!("{} drew a card from the deck.", self.player_name)
    }

    pub fn drew_visible_card(&self, card: Card) -> String {
        format!(
            "{} drew a face-up {}.",
            self.player_name,
            Self::card_name(card, 1)
        )
    }

    pub fn claimed_route(&self, route: &Route, cards: &SortedBag<Card>) -> String {
        format!(
            "{} claimed the route {} with {}.",
            self.player_name,
            route,
            Self::cards(cards)
        )
    }

    pub fn attempts_tunnel_claim(&self, route: &Route, initial_cards: &SortedBag<Card>) -> String {
        format!(
            "{} attempts to claim the tunnel {} with {}!",
            self.player_name,
            route,
            Self::cards(initial_cards)
        )
    }

    /// The three cards drawn for a tunnel, and the cost they imply.
    pub fn drew_additional_cards(&self, drawn_cards: &SortedBag<Card>, additional_cost: usize) -> String {
        let cost = if additional_cost == 0 {
            "They imply no additional cost.".to_string()
        } else {
            format!(
                "They imply an additional cost of {} card{}.",
                additional_cost,
                plural(additional_cost as i64)
            )
        };
        format!("The additional cards are {}. {}", Self::cards(drawn_cards), cost)
    }

    pub fn did_not_claim_route(&self, route: &Route) -> String {
        format!(
            "{} could not, or did not want to, claim the route {}.",
            self.player_name, route
        )
    }

    pub fn last_turn_begins(&self, car_count: u32) -> String {
        format!(
            "{} has only {} car{} left, the last turn begins!",
            self.player_name,
            car_count,
            plural(car_count as i64)
        )
    }

    pub fn gets_longest_trail_bonus(&self, longest_trail: &Trail) -> String {
        format!(
            "{} gets the {}-point bonus for the longest trail ({}).",
            self.player_name, LONGEST_TRAIL_BONUS_POINTS, longest_trail
        )
    }

    pub fn won(&self, points: i32, loser_points: i32) -> String {
        format!(
            "{} wins with {} point{}, against {} point{}!",
            self.player_name,
            points,
            plural(points as i64),
            loser_points,
            plural(loser_points as i64)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Color;
    use crate::route::Level;
    use crate::station::Station;

    use pretty_assertions::assert_eq;

    fn route() -> Route {
        Route::new("BOS_NYC_1", Station::Boston, Station::NewYork, 2, Level::Overground, Some(Color::Red))
            .unwrap()
    }

    #[test]
    fn card_names() {
        assert_eq!(Info::card_name(Card::Pink, 1), "pink card");
        assert_eq!(Info::card_name(Card::Pink, 2), "pink cards");
        assert_eq!(Info::card_name(Card::Locomotive, 1), "locomotive");
    }

    #[test]
    fn cards_description() {
        let cards: SortedBag<Card> = [Card::Black, Card::Black, Card::Locomotive].into_iter().collect();
        assert_eq!(Info::cards(&cards), "2 black cards and 1 locomotive");

        let cards: SortedBag<Card> = [Card::Black, Card::Blue, Card::Blue, Card::Locomotive]
            .into_iter()
            .collect();
        assert_eq!(
            Info::cards(&cards),
            "1 black card, 2 blue cards and 1 locomotive"
        );
        assert_eq!(Info::cards(&SortedBag::of(1, Card::Red)), "1 red card");
    }

    #[test]
    fn draw_between_players() {
        let names = vec!["Ada".to_string(), "Charles".to_string()];
        assert_eq!(Info::draw(&names, 42), "Ada and Charles are tied with 42 points each!");

        let names = vec!["Ada".to_string(), "Charles".to_string(), "Michel".to_string()];
        assert_eq!(
            Info::draw(&names, 1),
            "Ada, Charles and Michel are tied with 1 point each!"
        );
    }

    #[test]
    fn player_messages() {
        let info = Info::new("Ada");
        assert_eq!(info.will_play_first(), "Ada will play first.");
        assert_eq!(info.kept_tickets(1), "Ada kept 1 ticket.");
        assert_eq!(info.drew_tickets(3), "Ada drew 3 tickets...");
        assert_eq!(info.drew_visible_card(Card::Locomotive), "Ada drew a face-up locomotive.");
        assert_eq!(
            info.claimed_route(&route(), &SortedBag::of(2, Card::Red)),
            "Ada claimed the route Boston - New York with 2 red cards."
        );
        assert_eq!(
            info.last_turn_begins(2),
            "Ada has only 2 cars left, the last turn begins!"
        );
        assert_eq!(info.won(80, -3), "Ada wins with 80 points, against -3 points!");
    }

    #[test]
    fn additional_cards_messages() {
        let info = Info::new("Charles");
        let drawn: SortedBag<Card> = [Card::Red, Card::Blue, Card::Locomotive].into_iter().collect();
        assert_eq!(
            info.drew_additional_cards(&drawn, 0),
            "The additional cards are 1 blue card, 1 red card and 1 locomotive. They imply no additional cost."
        );
        assert_eq!(
            info.drew_additional_cards(&drawn, 2),
            "The additional cards are 1 blue card, 1 red card and 1 locomotive. They imply an additional cost of 2 cards."
        );
    }

    #[test]
    fn longest_trail_bonus_message() {
        let routes = vec![route()];
        let trail = Trail::longest(&routes);
        assert_eq!(
            Info::new("Michel").gets_longest_trail_bonus(&trail),
            "Michel gets the 10-point bonus for the longest trail (Boston - New York)."
        );
    }
}
