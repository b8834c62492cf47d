//! Plays tCHu over a line protocol: a server holds the game, and each remote player connects
//! as a client.

#[macro_use]
extern crate lazy_static;

pub mod client;
pub mod codec;
pub mod console;
pub mod message_id;
pub mod proxy;
pub mod serdes;
pub mod settings;

use tracing_subscriber::EnvFilter;

/// Logs to stderr, filtered by `RUST_LOG` (default `info`), so stdout stays free for the game.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Whether `TCHU_BOT=1` asks for a bot instead of a human at the console.
pub fn bot_requested() -> bool {
    std::env::var("TCHU_BOT").map_or(false, |value| value == "1")
}
