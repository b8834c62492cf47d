use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::io::BufReader;
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::thread;

use tchu::bot::RandomPlayer;
use tchu::config::GameConfig;
use tchu::game::{Game, GameOutcome};
use tchu::player::{Player, PlayerId};
use tchu::GameResult;
use tchu_net::client::RemotePlayerClient;
use tchu_net::proxy::RemotePlayerProxy;
use tchu_net::serdes::Serdes;

const GAME_SEED: u64 = 2021;

fn bot(config: &GameConfig, id: PlayerId) -> RandomPlayer {
    RandomPlayer::new(Arc::clone(config.map()), 10 + id.index() as u64)
}

fn names(player_count: usize) -> BTreeMap<PlayerId, String> {
    PlayerId::all(player_count)
        .iter()
        .zip(["Ada", "Charles", "Michel"])
        .map(|(id, name)| (*id, name.to_string()))
        .collect()
}

fn local_game(player_count: usize) -> GameResult<GameOutcome> {
    let config = GameConfig::standard(player_count)?;
    let players: BTreeMap<PlayerId, Box<dyn Player>> = PlayerId::all(player_count)
        .iter()
        .map(|id| (*id, Box::new(bot(&config, *id)) as Box<dyn Player>))
        .collect();
    Game::new(config, players, names(player_count), StdRng::seed_from_u64(GAME_SEED))?.play()
}

/// Plays the same game as [`local_game`], with every seat but the first behind a connection.
fn remote_game(player_count: usize) -> GameResult<GameOutcome> {
    let config = GameConfig::standard(player_count)?;
    let serdes = Arc::new(Serdes::new(config.map()));
    let mut players: BTreeMap<PlayerId, Box<dyn Player>> = BTreeMap::new();
    let mut clients = Vec::new();
    let mut remote_names = BTreeMap::new();

    for id in PlayerId::all(player_count) {
        if *id == PlayerId::Player1 {
            players.insert(*id, Box::new(bot(&config, *id)));
            remote_names.insert(*id, "Ada".to_string());
            continue;
        }

        let (server_end, client_end) = UnixStream::pair()?;
        let name = names(player_count)[id].clone();
        let mut client = RemotePlayerClient::new(
            bot(&config, *id),
            name,
            BufReader::new(client_end.try_clone()?),
            client_end,
            Serdes::new(config.map()),
        );
        clients.push(thread::spawn(move || client.run()));

        let mut proxy = RemotePlayerProxy::new(
            BufReader::new(server_end.try_clone()?),
            server_end,
            Arc::clone(&serdes),
        );
        remote_names.insert(*id, proxy.request_name()?);
        players.insert(*id, Box::new(proxy));
    }

    assert_eq!(remote_names, names(player_count));
    let outcome = {
        let mut game = Game::new(config, players, remote_names, StdRng::seed_from_u64(GAME_SEED))?;
        game.play()?
    };

    for client in clients {
        client.join().expect("client thread panicked")?;
    }
    Ok(outcome)
}

#[test]
fn remote_two_player_game_matches_local_game() -> GameResult<()> {
    assert_eq!(remote_game(2)?, local_game(2)?);
    Ok(())
}

#[test]
fn remote_three_player_game_matches_local_game() -> GameResult<()> {
    assert_eq!(remote_game(3)?, local_game(3)?);
    Ok(())
}

#[test]
fn client_leaving_fails_the_game() -> GameResult<()> {
    let config = GameConfig::standard(2)?;
    let (server_end, client_end) = UnixStream::pair()?;
    drop(client_end);

    let proxy = RemotePlayerProxy::new(
        BufReader::new(server_end.try_clone()?),
        server_end,
        Arc::new(Serdes::new(config.map())),
    );
    let mut players: BTreeMap<PlayerId, Box<dyn Player>> = BTreeMap::new();
    players.insert(PlayerId::Player1, Box::new(bot(&config, PlayerId::Player1)));
    players.insert(PlayerId::Player2, Box::new(proxy));

    let result = Game::new(config, players, names(2), StdRng::seed_from_u64(GAME_SEED))?.play();
    assert!(result.is_err());
    Ok(())
}
