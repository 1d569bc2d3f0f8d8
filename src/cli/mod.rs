pub mod board_display;
pub mod human_player;
pub mod players;
pub mod stats;
pub mod tui;

pub use board_display::{display_board, render_board};
pub use human_player::HumanPlayer;
pub use players::{CLI_PLAYERS, CliPlayer, PlayerInstance, create_player, parse_lineup, print_player_help};
pub use stats::{GameStats, StatisticsAccumulator, StatsSummary};
pub use tui::{describe_event, turn_banner};

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides `default_filter`.
///
/// With a log file, output goes there without colours so it stays out of the terminal UI.
pub fn init_tracing(default_filter: &str, log_file: Option<&Path>) -> std::io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
