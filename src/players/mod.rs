pub mod base;
pub mod random;
pub mod scholar;

pub use base::BasePlayer;
pub use random::RandomPlayer;
pub use scholar::ScholarPlayer;
