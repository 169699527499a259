use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

// player_statistics_rows.json
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StatRecord {
    #[serde(default)]
    pub player_name: String,
    pub champion: Option<String>,
    pub games_played: Option<u32>,
    pub wins: Option<u32>,
    pub win_rate: Option<f64>,
}

// underperforming_positions_rows.json
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UnderperformanceRecord {
    #[serde(default)]
    pub player_name: String,
    pub position: Option<String>,
    pub stat: Option<String>,
    pub player_avg: Option<f64>,
    pub position_avg: Option<f64>,
}

// Optional item efficiency export
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ItemEfficiency {
    pub name: String,
    pub efficiency: f64,
}

/// Decodes a JSON array row by row. Rows that cannot be decoded are skipped
/// so one bad row never takes down the whole dataset.
pub fn decode_rows<T>(body: &str, dataset: &str) -> Result<Vec<T>, serde_json::Error>
where
    T: for<'de> Deserialize<'de>,
{
    let raw: Vec<Value> = serde_json::from_str(body)?;
    let total = raw.len();

    let rows: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(dataset, row = idx, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();

    if rows.len() < total {
        warn!(dataset, kept = rows.len(), total, "some records were skipped");
    }

    Ok(rows)
}
