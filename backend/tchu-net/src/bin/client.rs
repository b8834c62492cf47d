//! Joins a game of tCHu hosted by `tchu-server`.

use anyhow::Context;
use std::io::BufReader;
use std::net::TcpStream;
use tracing::info;

use tchu::bot::RandomPlayer;
use tchu::map::Map;
use tchu::player::Player;
use tchu_net::client::RemotePlayerClient;
use tchu_net::console::ConsolePlayer;
use tchu_net::serdes::Serdes;
use tchu_net::settings::Settings;

fn main() -> anyhow::Result<()> {
    tchu_net::init_tracing();

    let settings = Settings::load()?;
    let map = Map::standard();
    let stream = TcpStream::connect((settings.host.as_str(), settings.port))
        .with_context(|| format!("Could not connect to {}:{}", settings.host, settings.port))?;
    info!(host = %settings.host, port = settings.port, "Connected");

    let player: Box<dyn Player> = if tchu_net::bot_requested() {
        match settings.seed {
            Some(seed) => Box::new(RandomPlayer::new(map.clone(), seed)),
            None => Box::new(RandomPlayer::from_entropy(map.clone())),
        }
    } else {
        Box::new(ConsolePlayer::stdio(map.clone()))
    };

    let reader = BufReader::new(stream.try_clone()?);
    let mut client = RemotePlayerClient::new(
        player,
        settings.player_name(1),
        reader,
        stream,
        Serdes::new(&map),
    );
    client.run()?;
    Ok(())
}
