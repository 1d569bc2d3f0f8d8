use std::path::PathBuf;

use blessing_journey::cli::{
    HumanPlayer, PlayerInstance, create_player, describe_event, display_board, init_tracing,
    print_player_help, turn_banner,
};
use blessing_journey::game::game::TURNS_LIMIT;
use blessing_journey::game::{Game, GamePhase};
use blessing_journey::GameConfig;
use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "blessing-play")]
#[command(about = "Play the blessings trivia race against bots")]
struct Args {
    /// TOML game config (players, names, seed, board, question bank)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bot player code (R=Random, S=Scholar)
    #[arg(short = 'b', long, default_value = "S")]
    bot: String,

    /// Bot-specific parameters (comma-separated, e.g., for Scholar: "0.9")
    #[arg(long, default_value = "")]
    bot_params: String,

    /// Number of seats, you included (2-4)
    #[arg(short, long)]
    players: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file instead of discarding them
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,
}

fn main() {
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    // The terminal UI owns the screen, so logs only go to a file.
    if let Some(path) = &args.log_file {
        if let Err(err) = init_tracing("info", Some(path)) {
            eprintln!("Error: cannot open log file {}: {err}", path.display());
            std::process::exit(1);
        }
    }

    let mut config = match &args.config {
        Some(path) => GameConfig::from_toml_file(path).unwrap_or_else(|err| {
            eprintln!("Error: {}: {err}", path.display());
            std::process::exit(1);
        }),
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(players) = args.players {
        config.num_players = players;
    }

    let mut game = Game::new(config).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    let bot_params: Vec<&str> = if args.bot_params.is_empty() {
        Vec::new()
    } else {
        args.bot_params.split(',').collect()
    };

    // You always take seat 1.
    let mut players = vec![PlayerInstance::Human(HumanPlayer::new(0))];
    for seat in 1..game.state.players.len() {
        match create_player(&args.bot, seat, bot_params.clone()) {
            Some(player) if !player.is_human() => players.push(player),
            _ => {
                eprintln!("Error: Unknown bot code '{}'", args.bot);
                eprintln!("Use --help-players to see available codes");
                std::process::exit(1);
            }
        }
    }

    let names: Vec<String> = game.state.players.iter().map(|p| p.name.clone()).collect();
    println!("Starting game: {}", names.join(" vs "));
    println!("{}", "=".repeat(80));

    while !game.state.is_finished() {
        if game.state.turn >= TURNS_LIMIT {
            println!("\nGame reached turn limit. No winner declared.");
            break;
        }

        if let Some(banner) = turn_banner(&game, 0) {
            println!("\n{banner}");
        }

        match game.play_tick(&players) {
            Some(outcome) => {
                for event in &outcome.events {
                    if let Some(line) = describe_event(&game, event) {
                        println!("  {line}");
                    }
                }
            }
            None => break,
        }
    }

    println!("\n{}", "=".repeat(80));
    display_board(&game);
    println!("{}", "=".repeat(80));
    match game.state.phase {
        GamePhase::Completed { winner: 0 } => println!("You reached the end. You win!"),
        GamePhase::Completed { winner } => println!("{} wins. Better luck next time!", names[winner]),
        GamePhase::Abandoned => println!("Game abandoned."),
        _ => {}
    }

    println!("\nFINAL STATS:");
    for player in &game.state.players {
        println!(
            "  {:<12} tile {:>2}  correct answers {}",
            player.name, player.position, player.correct_answers
        );
    }
}
