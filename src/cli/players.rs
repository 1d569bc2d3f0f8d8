use crate::cli::human_player::HumanPlayer;
use crate::game::action::TurnAction;
use crate::game::game::Game;
use crate::players::{BasePlayer, RandomPlayer, ScholarPlayer};

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Rolls, then picks categories and answers at random.",
    },
    CliPlayer {
        code: "S",
        name: "ScholarPlayer",
        description: "Knows the answer key. First param is ACCURACY in [0, 1] (default 0.75).",
    },
    CliPlayer {
        code: "H",
        name: "HumanPlayer",
        description: "Interactive seat driven from the terminal UI.",
    },
];

#[derive(Clone)]
pub enum PlayerInstance {
    Random(RandomPlayer),
    Scholar(ScholarPlayer),
    Human(HumanPlayer),
}

impl BasePlayer for PlayerInstance {
    fn decide(&self, game: &Game, actions: &[TurnAction]) -> Option<TurnAction> {
        match self {
            PlayerInstance::Random(p) => p.decide(game, actions),
            PlayerInstance::Scholar(p) => p.decide(game, actions),
            PlayerInstance::Human(p) => p.decide(game, actions),
        }
    }
}

impl PlayerInstance {
    pub fn is_human(&self) -> bool {
        matches!(self, PlayerInstance::Human(_))
    }

    pub fn label(&self) -> String {
        match self {
            PlayerInstance::Random(_) => "Random".to_string(),
            PlayerInstance::Scholar(p) => format!("Scholar({:.2})", p.accuracy),
            PlayerInstance::Human(_) => "Human".to_string(),
        }
    }
}

/// Builds a decider from a code like `S` plus its `:`-separated params.
pub fn create_player(code: &str, seat: usize, params: Vec<&str>) -> Option<PlayerInstance> {
    match code.to_ascii_uppercase().as_str() {
        "R" => Some(PlayerInstance::Random(RandomPlayer)),
        "S" => {
            let accuracy = params.first().and_then(|s| s.parse::<f64>().ok());
            Some(PlayerInstance::Scholar(ScholarPlayer::new(accuracy)))
        }
        "H" => Some(PlayerInstance::Human(HumanPlayer::new(seat))),
        _ => None,
    }
}

/// Parses a comma-separated lineup such as `R,S:0.9,H`.
pub fn parse_lineup(lineup: &str) -> Result<Vec<PlayerInstance>, String> {
    lineup
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(seat, entry)| {
            let mut parts = entry.split(':');
            let code = parts.next().unwrap_or_default();
            let params: Vec<&str> = parts.collect();
            create_player(code, seat, params)
                .ok_or_else(|| format!("unknown player code '{code}'"))
        })
        .collect()
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_params() {
        let lineup = parse_lineup("R, s:0.9,H").unwrap();
        assert_eq!(lineup.len(), 3);
        assert!(matches!(lineup[0], PlayerInstance::Random(_)));
        match &lineup[1] {
            PlayerInstance::Scholar(p) => assert_eq!(p.accuracy, 0.9),
            _ => panic!("expected a scholar"),
        }
        assert!(lineup[2].is_human());
    }

    #[test]
    fn unknown_code_is_an_error() {
        let err = parse_lineup("R,Z").err().unwrap();
        assert!(err.contains("'Z'"));
    }

    #[test]
    fn bad_accuracy_falls_back_to_default() {
        match create_player("S", 0, vec!["lots"]) {
            Some(PlayerInstance::Scholar(p)) => assert_eq!(p.accuracy, 0.75),
            _ => panic!("expected a scholar"),
        }
    }
}
