use serde::{Deserialize, Serialize};

/// Unique tournament id of the league on the upstream provider.
pub const LEAGUE_ID: i64 = 8;

/// Number of rounds in a full league season.
pub const ROUNDS_PER_SEASON: u32 = 38;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    pub id: i64,
    pub name: String,
    pub year: String,
    pub display_name: String,
}

impl SeasonInfo {
    #[must_use]
    pub fn new(id: i64, name: &str, year: &str, display_name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            year: year.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

// newest first; the first entry is the default context
const KNOWN_SEASONS: &[(i64, &str, &str, &str)] = &[
    (77559, "LaLiga 25/26", "25/26", "2025/26"),
    (61643, "LaLiga 24/25", "24/25", "2024/25"),
    (52376, "LaLiga 23/24", "23/24", "2023/24"),
    (42409, "LaLiga 22/23", "22/23", "2022/23"),
    (37223, "LaLiga 21/22", "21/22", "2021/22"),
    (32501, "LaLiga 20/21", "20/21", "2020/21"),
    (24127, "LaLiga 19/20", "19/20", "2019/20"),
];

/// The seasons the provider is known to serve, newest first.
#[must_use]
pub fn known_seasons() -> Vec<SeasonInfo> {
    KNOWN_SEASONS
        .iter()
        .map(|(id, name, year, display)| SeasonInfo::new(*id, name, year, display))
        .collect()
}
