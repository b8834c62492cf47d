//! A text front-end, to play from a terminal.

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Arc;
use tchu::bag::SortedBag;
use tchu::card::Card;
use tchu::game_state::PublicGameState;
use tchu::info::Info;
use tchu::map::Map;
use tchu::player::{DecisionSource, DrawSlot, PlayerId, PresentationSink, TurnKind};
use tchu::player_state::PlayerState;
use tchu::route::Route;
use tchu::ticket::Ticket;
use tchu::{GameError, GameResult};

/// Prints the game as it goes, and reads decisions as numbers.
pub struct ConsolePlayer<R: BufRead, W: Write> {
    map: Arc<Map>,
    input: R,
    output: W,
    own_id: Option<PlayerId>,
    player_names: BTreeMap<PlayerId, String>,
    state: Option<(PublicGameState, PlayerState)>,
    initial_tickets: SortedBag<Ticket>,
    claimed_route: Option<Route>,
    passing: bool,
}

impl ConsolePlayer<BufReader<Stdin>, Stdout> {
    pub fn stdio(map: Arc<Map>) -> Self {
        Self::new(map, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(map: Arc<Map>, input: R, output: W) -> Self {
        Self {
            map,
            input,
            output,
            own_id: None,
            player_names: BTreeMap::new(),
            state: None,
            initial_tickets: SortedBag::new(),
            claimed_route: None,
            passing: false,
        }
    }

    fn state(&self) -> GameResult<&(PublicGameState, PlayerState)> {
        self.state
            .as_ref()
            .ok_or_else(|| GameError::InvalidArgument("No state was received yet.".to_string()))
    }

    /// The unclaimed routes the player has the cars and cards for.
    fn claimable_routes(&self) -> GameResult<Vec<Route>> {
        let (public, own) = self.state()?;
        let claimed = public.claimed_routes();
        Ok(self
            .map
            .routes()
            .iter()
            .filter(|route| !claimed.iter().any(|claimed| claimed.id() == route.id()))
            .filter(|route| own.can_claim_route(route))
            .cloned()
            .collect())
    }

    /// The turn kinds allowed by the last received state.
    fn legal_turn_kinds(&self) -> GameResult<Vec<TurnKind>> {
        let (public, _) = self.state()?;
        let can_claim = !self.claimable_routes()?.is_empty();
        Ok(TurnKind::ALL
            .iter()
            .copied()
            .filter(|kind| match kind {
                TurnKind::DrawTickets => public.can_draw_tickets(),
                TurnKind::DrawCards => public.can_draw_cards(),
                TurnKind::ClaimRoute => can_claim,
            })
            .collect())
    }

    fn read_line(&mut self) -> GameResult<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GameError::Interrupted("console input".to_string()));
        }
        Ok(line.trim().to_string())
    }

    /// Shows numbered `choices`, and reads one of their numbers until a valid one comes.
    fn choose_one(&mut self, question: &str, choices: &[String]) -> GameResult<usize> {
        loop {
            writeln!(self.output, "{}", question)?;
            for (index, choice) in choices.iter().enumerate() {
                writeln!(self.output, "  {}) {}", index + 1, choice)?;
            }
            self.output.flush()?;

            match self.read_line()?.parse::<usize>() {
                Ok(number) if (1..=choices.len()).contains(&number) => return Ok(number - 1),
                _ => writeln!(self.output, "Please answer with a number between 1 and {}.", choices.len())?,
            }
        }
    }

    /// Reads numbers separated by spaces or commas, until at least `min` distinct valid ones
    /// come.
    fn choose_tickets_among(&mut self, options: &SortedBag<Ticket>, min: usize) -> GameResult<SortedBag<Ticket>> {
        loop {
            writeln!(self.output, "Choose at least {} ticket(s):", min)?;
            for (index, ticket) in options.iter().enumerate() {
                writeln!(self.output, "  {}) {}", index + 1, ticket.text())?;
            }
            self.output.flush()?;

            let line = self.read_line()?;
            let mut numbers: Vec<usize> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .filter_map(|token| token.parse().ok())
                .filter(|number| (1..=options.len()).contains(number))
                .collect();
            numbers.sort_unstable();
            numbers.dedup();

            if numbers.len() >= min {
                return Ok(numbers
                    .into_iter()
                    .filter_map(|number| options.get(number - 1).cloned())
                    .collect());
            }
            writeln!(self.output, "That is not enough tickets.")?;
        }
    }

    fn print_state(&mut self) -> GameResult<()> {
        let (public, own) = self.state()?.clone();
        let face_up: Vec<String> = public
            .card_state()
            .face_up_cards()
            .iter()
            .enumerate()
            .map(|(slot, card)| format!("{}:{}", slot, card))
            .collect();
        let cards = if own.cards().is_empty() {
            "no cards".to_string()
        } else {
            Info::cards(own.cards())
        };

        writeln!(
            self.output,
            "[{} tickets left | deck {} | discards {} | face-up {}]",
            public.ticket_count(),
            public.card_state().deck_size(),
            public.card_state().discards_size(),
            face_up.join(" ")
        )?;
        for (id, player) in public.players() {
            let name = self.player_names.get(&id).map_or("?", String::as_str);
            writeln!(
                self.output,
                "  {}: {} cars, {} cards, {} tickets, {} points",
                name,
                player.car_count(),
                player.card_count(),
                player.ticket_count(),
                player.claim_points()
            )?;
        }
        writeln!(self.output, "  You hold {}.", cards)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> PresentationSink for ConsolePlayer<R, W> {
    fn set_player_count(&mut self, player_count: usize) -> GameResult<()> {
        writeln!(self.output, "A game for {} players is starting.", player_count)?;
        Ok(())
    }

    fn init_players(
        &mut self,
        own_id: PlayerId,
        player_names: &BTreeMap<PlayerId, String>,
    ) -> GameResult<()> {
        self.own_id = Some(own_id);
        self.player_names = player_names.clone();
        let name = player_names.get(&own_id).map_or("?", String::as_str);
        writeln!(self.output, "You are {}.", name)?;
        Ok(())
    }

    fn receive_info(&mut self, info: &str) -> GameResult<()> {
        writeln!(self.output, "{}", info)?;
        Ok(())
    }

    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) -> GameResult<()> {
        self.state = Some((state.clone(), own_state.clone()));
        Ok(())
    }

    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) -> GameResult<()> {
        self.initial_tickets = tickets.clone();
        Ok(())
    }
}

impl<R: BufRead, W: Write> DecisionSource for ConsolePlayer<R, W> {
    fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>> {
        let options = self.initial_tickets.clone();
        let min = options.len().saturating_sub(2).max(1);
        self.choose_tickets_among(&options, min)
    }

    fn next_turn(&mut self) -> GameResult<TurnKind> {
        self.passing = false;
        self.print_state()?;
        let kinds = self.legal_turn_kinds()?;
        if kinds.is_empty() {
            // An empty claim is rejected by the game, which passes the turn.
            writeln!(self.output, "You cannot do anything this turn.")?;
            self.passing = true;
            return Ok(TurnKind::ClaimRoute);
        }

        let choices: Vec<String> = kinds.iter().map(|kind| kind.to_string().replace('_', " ")).collect();
        let index = self.choose_one("What do you do?", &choices)?;
        Ok(kinds[index])
    }

    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>> {
        self.choose_tickets_among(options, 1)
    }

    fn draw_slot(&mut self) -> GameResult<DrawSlot> {
        let (public, _) = self.state()?;
        let mut choices: Vec<String> = public
            .card_state()
            .face_up_cards()
            .iter()
            .map(|card| format!("face-up {}", Info::card_name(*card, 1)))
            .collect();
        choices.push("the deck".to_string());

        let index = self.choose_one("Which card do you draw?", &choices)?;
        if index == choices.len() - 1 {
            Ok(DrawSlot::Deck)
        } else {
            Ok(DrawSlot::FaceUp(index))
        }
    }

    fn claimed_route(&mut self) -> GameResult<Route> {
        if self.passing {
            return self
                .map
                .routes()
                .first()
                .cloned()
                .ok_or_else(|| GameError::InvalidArgument("The map has no routes.".to_string()));
        }
        let claimable = self.claimable_routes()?;
        if claimable.is_empty() {
            return Err(GameError::InvalidArgument("There is no route you can claim.".to_string()));
        }

        let choices: Vec<String> = claimable
            .iter()
            .map(|route| {
                let kind = if route.is_tunnel() { "tunnel" } else { "route" };
                let color = route.color().map_or("any color".to_string(), |color| color.to_string());
                format!("{} ({} {}, {} cars)", route, color, kind, route.length())
            })
            .collect();
        let index = self.choose_one("Which route do you claim?", &choices)?;
        let route = claimable[index].clone();
        self.claimed_route = Some(route.clone());
        Ok(route)
    }

    fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>> {
        if self.passing {
            self.passing = false;
            return Ok(SortedBag::new());
        }
        let route = self
            .claimed_route
            .take()
            .ok_or_else(|| GameError::InvalidArgument("No route was chosen.".to_string()))?;
        let options = self.state()?.1.possible_claim_cards(&route)?;
        let choices: Vec<String> = options.iter().map(Info::cards).collect();
        let index = self.choose_one("Which cards do you play?", &choices)?;
        Ok(options[index].clone())
    }

    fn choose_additional_cards(
        &mut self,
        options: &[SortedBag<Card>],
    ) -> GameResult<SortedBag<Card>> {
        let mut choices: Vec<String> = options.iter().map(Info::cards).collect();
        choices.push("give up this tunnel".to_string());
        let index = self.choose_one("Which additional cards do you play?", &choices)?;
        Ok(options.get(index).cloned().unwrap_or_default())
    }
}
