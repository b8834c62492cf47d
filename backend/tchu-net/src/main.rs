//! Hosts a game of tCHu: one local player, and remote clients for the other seats.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::io::BufReader;
use std::net::TcpListener;
use std::sync::Arc;
use tracing::info;

use tchu::bot::RandomPlayer;
use tchu::channel_player::ChannelPlayer;
use tchu::config::GameConfig;
use tchu::game::Game;
use tchu::player::{Player, PlayerId};
use tchu_net::console::ConsolePlayer;
use tchu_net::proxy::RemotePlayerProxy;
use tchu_net::serdes::Serdes;
use tchu_net::settings::Settings;

fn main() -> anyhow::Result<()> {
    tchu_net::init_tracing();

    let settings = Settings::load()?;
    let config = GameConfig::standard(settings.player_count)?;
    let serdes = Arc::new(Serdes::new(config.map()));
    let seats = PlayerId::all(config.player_count());

    let mut players: BTreeMap<PlayerId, Box<dyn Player>> = BTreeMap::new();
    let mut names = BTreeMap::new();

    let local_name = settings.player_name(0);
    let local: Box<dyn Player> = if tchu_net::bot_requested() {
        let bot = match settings.seed {
            Some(seed) => RandomPlayer::new(Arc::clone(config.map()), seed),
            None => RandomPlayer::from_entropy(Arc::clone(config.map())),
        };
        Box::new(bot)
    } else {
        let console = ConsolePlayer::stdio(Arc::clone(config.map()));
        Box::new(ChannelPlayer::spawn("console", console)?)
    };
    players.insert(seats[0], local);
    names.insert(seats[0], local_name);

    let listener = TcpListener::bind((settings.host.as_str(), settings.port))
        .with_context(|| format!("Could not listen on {}:{}", settings.host, settings.port))?;
    info!(host = %settings.host, port = settings.port, "Waiting for {} player(s)", seats.len() - 1);

    for id in &seats[1..] {
        let (stream, address) = listener.accept()?;
        let reader = BufReader::new(stream.try_clone()?);
        let mut proxy = RemotePlayerProxy::new(reader, stream, Arc::clone(&serdes));
        let name = proxy.request_name()?;
        info!(%address, %name, seat = %id, "Player connected");

        players.insert(*id, Box::new(proxy));
        names.insert(*id, name);
    }

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcome = Game::new(config, players, names, rng)?.play()?;
    info!(verdict = ?outcome.verdict, "Game finished");
    Ok(())
}
