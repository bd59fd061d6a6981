pub mod records;
pub mod season;

pub use records::*;
pub use season::{known_seasons, SeasonInfo, LEAGUE_ID, ROUNDS_PER_SEASON};
