use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use blessing_journey::GameConfig;
use blessing_journey::cli::{
    GameStats, PlayerInstance, StatisticsAccumulator, display_board, init_tracing, parse_lineup,
    print_player_help,
};
use blessing_journey::game::Game;
use clap::Parser;
use itertools::Itertools;
use tracing::{error, info};

#[derive(Debug, Parser, Clone)]
#[command(name = "blessing-sim")]
#[command(about = "Simulate blessings trivia races between bot strategies")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes (e.g., R,R or S:0.9,R,R)
    /// Use ':' to set player-specific params (e.g., S:0.5 for accuracy)
    #[arg(long, default_value = "R,R")]
    players: String,

    /// TOML game config; its player count is replaced by the lineup size
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the final board of every game
    #[arg(long)]
    show_board: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

fn main() {
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let default_filter = if args.quiet || args.json { "warn" } else { "info" };
    if let Err(err) = init_tracing(default_filter, None) {
        eprintln!("Error: cannot initialise logging: {err}");
        std::process::exit(1);
    }

    let players = parse_lineup(&args.players).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    });
    if players.iter().any(PlayerInstance::is_human) {
        eprintln!("Error: the simulator only runs bots");
        std::process::exit(1);
    }

    let mut config = match &args.config {
        Some(path) => GameConfig::from_toml_file(path).unwrap_or_else(|err| {
            eprintln!("Error: {}: {err}", path.display());
            std::process::exit(1);
        }),
        None => GameConfig::default(),
    };
    config.num_players = players.len();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    // Fail once up front rather than in every worker.
    let probe = Game::new(config.clone()).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });
    let names: Vec<String> = probe.state.players.iter().map(|p| p.name.clone()).collect();

    info!(
        games = args.num,
        lineup = %players.iter().map(PlayerInstance::label).join(","),
        seed = config.seed,
        "starting simulation"
    );

    let mut stats = StatisticsAccumulator::new();
    if args.workers > 1 {
        run_parallel_simulations(&args, &config, &players, &mut stats);
    } else {
        run_sequential_simulations(&args, &config, &players, &mut stats);
    }

    if args.json {
        match serde_json::to_string_pretty(&stats.stats.summary(&names)) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    } else if !args.quiet {
        print_summary(&stats.stats, &players, &names);
    }
}

fn play_one(config: &GameConfig, game_idx: u32, players: &[PlayerInstance]) -> Option<Game> {
    let config = GameConfig {
        seed: config.seed.wrapping_add(u64::from(game_idx)),
        ..config.clone()
    };
    match Game::new(config) {
        Ok(mut game) => {
            game.play(players);
            Some(game)
        }
        Err(err) => {
            error!(game = game_idx, %err, "failed to set up game");
            None
        }
    }
}

fn run_sequential_simulations(
    args: &Args,
    config: &GameConfig,
    players: &[PlayerInstance],
    stats: &mut StatisticsAccumulator,
) {
    let verbose = !args.quiet && !args.json;
    for game_idx in 0..args.num {
        let start = Instant::now();
        let Some(game) = play_one(config, game_idx, players) else {
            continue;
        };
        let duration = start.elapsed();
        stats.after(&game, duration);

        if args.show_board && !args.json {
            display_board(&game);
        }
        if verbose {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                let winner_str = game
                    .winner()
                    .map(|idx| game.state.players[idx].name.clone())
                    .unwrap_or_else(|| "None".to_string());
                let positions = game
                    .state
                    .players
                    .iter()
                    .map(|p| format!("{}@{}", p.seat, p.position))
                    .join(",");
                println!(
                    "Game {:>4}: Positions=[{}], Winner={:>10}, Turns={:>4}, Duration={:?}",
                    game_idx + 1,
                    positions,
                    winner_str,
                    game.state.turn,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn run_parallel_simulations(
    args: &Args,
    config: &GameConfig,
    players: &[PlayerInstance],
    stats: &mut StatisticsAccumulator,
) {
    let players = Arc::new(players.to_vec());
    let config = Arc::new(config.clone());

    let workers = args.workers;
    let games_per_worker = args.num as usize / workers;
    let remainder = args.num as usize % workers;

    let mut handles = Vec::new();
    for worker_id in 0..workers {
        let players = Arc::clone(&players);
        let config = Arc::clone(&config);
        let num_games = if worker_id < remainder {
            games_per_worker + 1
        } else {
            games_per_worker
        };

        let handle = thread::spawn(move || {
            let mut local_stats = GameStats::new();
            let start_idx = worker_id * games_per_worker + worker_id.min(remainder);
            for local_idx in 0..num_games {
                let game_idx = (start_idx + local_idx) as u32;
                let start = Instant::now();
                if let Some(game) = play_one(&config, game_idx, &players) {
                    local_stats.record_game(&game, start.elapsed());
                }
            }
            local_stats
        });
        handles.push(handle);
    }

    for (worker_id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(worker_stats) => stats.stats.merge(worker_stats),
            Err(_) => error!(worker = worker_id, "simulation worker panicked"),
        }
    }
}

fn print_summary(stats: &GameStats, players: &[PlayerInstance], names: &[String]) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!(
        "{:<28} {:<10} {:<12} {:<12}",
        "Player", "Wins", "Win Rate", "Avg Correct"
    );
    println!("{}", "-".repeat(64));

    for (idx, player) in players.iter().enumerate() {
        let wins = stats.wins_for(idx);
        let win_rate = if stats.games > 0 {
            (f64::from(wins) / f64::from(stats.games)) * 100.0
        } else {
            0.0
        };
        println!(
            "{:<28} {:<10} {:<11.1}% {:<12.2}",
            format!("{} ({})", names[idx], player.label()),
            wins,
            win_rate,
            stats.avg_correct(idx)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Abandoned: {}", stats.abandoned);
    println!("  Hit Turn Limit: {}", stats.unfinished);
    println!("  Avg Turns: {:.2}", stats.get_avg_turns());
    println!("  Avg Ticks: {:.2}", stats.get_avg_ticks());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
