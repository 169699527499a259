// Public JSON exports of the analytics pipeline

pub const PLAYER_STATISTICS_URL: &str =
    "https://davidexpcarvalho.github.io/brasil.gg/player_statistics_rows.json";
pub const UNDERPERFORMING_POSITIONS_URL: &str =
    "https://davidexpcarvalho.github.io/brasil.gg/underperforming_positions_rows.json";

pub const USER_AGENT: &str = "league_pages/0.1.0";
