use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::game::game::Game;
use crate::game::state::GamePhase;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    /// Wins keyed by seat index.
    pub wins: BTreeMap<usize, u32>,
    pub correct_by_player: BTreeMap<usize, Vec<u32>>,
    pub games: u32,
    pub abandoned: u32,
    /// Games that hit the turn limit without a winner.
    pub unfinished: u32,
    pub total_ticks: u64,
    pub total_turns: u64,
    pub total_duration: Duration,
}

/// Flat view of [`GameStats`] for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub games: u32,
    pub abandoned: u32,
    pub unfinished: u32,
    pub avg_turns: f64,
    pub avg_ticks: f64,
    pub avg_duration_ms: f64,
    pub seats: Vec<SeatSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSummary {
    pub seat: usize,
    pub name: String,
    pub wins: u32,
    pub win_rate: f64,
    pub avg_correct_answers: f64,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += u64::from(game.state.turn);
        self.total_ticks += game.state.actions.len() as u64;

        match game.state.phase {
            GamePhase::Completed { winner } => *self.wins.entry(winner).or_insert(0) += 1,
            GamePhase::Abandoned => self.abandoned += 1,
            _ => self.unfinished += 1,
        }

        for (idx, player) in game.state.players.iter().enumerate() {
            self.correct_by_player
                .entry(idx)
                .or_default()
                .push(player.correct_answers);
        }
    }

    pub fn get_avg_ticks(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_ticks as f64 / self.games as f64
    }

    pub fn get_avg_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }

    pub fn wins_for(&self, seat: usize) -> u32 {
        self.wins.get(&seat).copied().unwrap_or(0)
    }

    pub fn avg_correct(&self, seat: usize) -> f64 {
        match self.correct_by_player.get(&seat) {
            Some(counts) if !counts.is_empty() => {
                counts.iter().map(|c| f64::from(*c)).sum::<f64>() / counts.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        self.games += other.games;
        self.abandoned += other.abandoned;
        self.unfinished += other.unfinished;
        self.total_ticks += other.total_ticks;
        self.total_turns += other.total_turns;
        self.total_duration += other.total_duration;
        for (seat, wins) in other.wins {
            *self.wins.entry(seat).or_insert(0) += wins;
        }
        for (seat, counts) in other.correct_by_player {
            self.correct_by_player.entry(seat).or_default().extend(counts);
        }
    }

    pub fn summary(&self, names: &[String]) -> StatsSummary {
        let seats = names
            .iter()
            .enumerate()
            .map(|(seat, name)| {
                let wins = self.wins_for(seat);
                SeatSummary {
                    seat: seat + 1,
                    name: name.clone(),
                    wins,
                    win_rate: if self.games == 0 {
                        0.0
                    } else {
                        f64::from(wins) / f64::from(self.games)
                    },
                    avg_correct_answers: self.avg_correct(seat),
                }
            })
            .collect();

        StatsSummary {
            games: self.games,
            abandoned: self.abandoned,
            unfinished: self.unfinished,
            avg_turns: self.get_avg_turns(),
            avg_ticks: self.get_avg_ticks(),
            avg_duration_ms: self.get_avg_duration().as_secs_f64() * 1000.0,
            seats,
        }
    }
}

#[derive(Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, game: &Game, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::action::TurnAction;

    fn won_game() -> Game {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.state.players[1].correct_answers = 4;
        game.state.players[0].position = 53;
        game.execute(TurnAction::roll_value(0, 2)).unwrap();
        game
    }

    #[test]
    fn records_winner_and_answers() {
        let mut acc = StatisticsAccumulator::new();
        acc.after(&won_game(), Duration::from_millis(10));

        let mut quit = Game::new(GameConfig::default()).unwrap();
        quit.execute(TurnAction::quit(0)).unwrap();
        acc.after(&quit, Duration::from_millis(30));

        let stats = &acc.stats;
        assert_eq!(stats.games, 2);
        assert_eq!(stats.wins_for(0), 1);
        assert_eq!(stats.wins_for(1), 0);
        assert_eq!(stats.abandoned, 1);
        assert_eq!(stats.avg_correct(1), 2.0);
        assert_eq!(stats.get_avg_duration(), Duration::from_millis(20));
    }

    #[test]
    fn merge_and_summarise() {
        let mut left = GameStats::new();
        left.record_game(&won_game(), Duration::from_millis(5));
        let mut right = GameStats::new();
        right.record_game(&won_game(), Duration::from_millis(5));
        left.merge(right);

        let summary = left.summary(&["Ada".to_string(), "Ben".to_string()]);
        assert_eq!(summary.games, 2);
        assert_eq!(summary.seats[0].wins, 2);
        assert_eq!(summary.seats[0].win_rate, 1.0);
        assert_eq!(summary.seats[1].avg_correct_answers, 4.0);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["seats"][1]["name"], "Ben");
    }
}
