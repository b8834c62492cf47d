//! Runs a [`Player`] on a thread of its own, e.g. a user interface that must own its thread.

use crate::bag::SortedBag;
use crate::card::Card;
use crate::error::{GameError, GameResult};
use crate::game_state::PublicGameState;
use crate::player::{DecisionSource, DrawSlot, Player, PlayerId, PresentationSink, TurnKind};
use crate::player_state::PlayerState;
use crate::route::Route;
use crate::ticket::Ticket;

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce(&mut dyn Player) + Send>;

/// Forwards every call to a player living on its presentation thread, and waits for its answer.
///
/// Each call carries its own reply slot. When the thread is gone, calls fail with
/// [`GameError::Interrupted`]. Dropping the adapter stops the thread and waits for it.
pub struct ChannelPlayer {
    jobs: Option<Sender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl ChannelPlayer {
    /// Moves `player` to a new thread named `name`.
    ///
    /// # Example
    /// ```
    /// use tchu::bot::RandomPlayer;
    /// use tchu::channel_player::ChannelPlayer;
    /// use tchu::map::Map;
    /// use tchu::player::PresentationSink;
    ///
    /// let mut player = ChannelPlayer::spawn("bot", RandomPlayer::new(Map::standard(), 1)).unwrap();
    /// assert!(player.receive_info("Hello!").is_ok());
    /// ```
    pub fn spawn<P>(name: &str, player: P) -> GameResult<Self>
    where
        P: Player + Send + 'static,
    {
        let (jobs, receiver) = mpsc::channel::<Job>();
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut player = player;
                for job in receiver {
                    job(&mut player);
                }
                debug!("Presentation thread stopped");
            })?;

        Ok(Self {
            jobs: Some(jobs),
            thread: Some(thread),
        })
    }

    fn call<T, F>(&self, request: &str, call: F) -> GameResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Player) -> GameResult<T> + Send + 'static,
    {
        let interrupted = || GameError::Interrupted(request.to_string());
        let (reply, answer) = mpsc::sync_channel(1);
        let job: Job = Box::new(move |player: &mut dyn Player| {
            // The caller may have given up on the answer already.
            let _ = reply.send(call(player));
        });

        self.jobs
            .as_ref()
            .ok_or_else(interrupted)?
            .send(job)
            .map_err(|_| interrupted())?;
        answer.recv().map_err(|_| interrupted())?
    }
}

impl Drop for ChannelPlayer {
    fn drop(&mut self) {
        drop(self.jobs.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Presentation thread panicked");
            }
        }
    }
}

impl PresentationSink for ChannelPlayer {
    fn set_player_count(&mut self, player_count: usize) -> GameResult<()> {
        self.call("set_player_count", move |player| {
            player.set_player_count(player_count)
        })
    }

    fn init_players(
        &mut self,
        own_id: PlayerId,
        player_names: &BTreeMap<PlayerId, String>,
    ) -> GameResult<()> {
        let player_names = player_names.clone();
        self.call("init_players", move |player| {
            player.init_players(own_id, &player_names)
        })
    }

    fn receive_info(&mut self, info: &str) -> GameResult<()> {
        let info = info.to_string();
        self.call("receive_info", move |player| player.receive_info(&info))
    }

    fn update_state(&mut self, state: &PublicGameState, own_state: &PlayerState) -> GameResult<()> {
        let state = state.clone();
        let own_state = own_state.clone();
        self.call("update_state", move |player| {
            player.update_state(&state, &own_state)
        })
    }

    fn set_initial_ticket_choice(&mut self, tickets: &SortedBag<Ticket>) -> GameResult<()> {
        let tickets = tickets.clone();
        self.call("set_initial_ticket_choice", move |player| {
            player.set_initial_ticket_choice(&tickets)
        })
    }
}

impl DecisionSource for ChannelPlayer {
    fn choose_initial_tickets(&mut self) -> GameResult<SortedBag<Ticket>> {
        self.call("choose_initial_tickets", |player| {
            player.choose_initial_tickets()
        })
    }

    fn next_turn(&mut self) -> GameResult<TurnKind> {
        self.call("next_turn", |player| player.next_turn())
    }

    fn choose_tickets(&mut self, options: &SortedBag<Ticket>) -> GameResult<SortedBag<Ticket>> {
        let options = options.clone();
        self.call("choose_tickets", move |player| player.choose_tickets(&options))
    }

    fn draw_slot(&mut self) -> GameResult<DrawSlot> {
        self.call("draw_slot", |player| player.draw_slot())
    }

    fn claimed_route(&mut self) -> GameResult<Route> {
        self.call("claimed_route", |player| player.claimed_route())
    }

    fn initial_claim_cards(&mut self) -> GameResult<SortedBag<Card>> {
        self.call("initial_claim_cards", |player| player.initial_claim_cards())
    }

    fn choose_additional_cards(
        &mut self,
        options: &[SortedBag<Card>],
    ) -> GameResult<SortedBag<Card>> {
        let options = options.to_vec();
        self.call("choose_additional_cards", move |player| {
            player.choose_additional_cards(&options)
        })
    }
}
