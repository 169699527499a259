use crate::api::endpoints::{PLAYER_STATISTICS_URL, UNDERPERFORMING_POSITIONS_URL};
use crate::error::AppError;
use std::env;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub stats_url: String,
    pub underperformance_url: String,
    pub items_url: Option<String>,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stats_url: PLAYER_STATISTICS_URL.to_string(),
            underperformance_url: UNDERPERFORMING_POSITIONS_URL.to_string(),
            items_url: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let stats_url = lookup("PLAYER_STATS_URL").unwrap_or(defaults.stats_url);
        let underperformance_url =
            lookup("UNDERPERFORMING_POSITIONS_URL").unwrap_or(defaults.underperformance_url);
        let items_url = lookup("ITEM_EFFICIENCY_URL").filter(|url| !url.trim().is_empty());

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => defaults.page_size,
        };

        Ok(Config {
            stats_url,
            underperformance_url,
            items_url,
            page_size,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, AppError> {
        if page_size == 0 {
            return Err(AppError::ConfigError(
                "page size must be greater than zero".to_string(),
            ));
        }
        self.page_size = page_size;
        Ok(self)
    }
}

fn parse_page_size(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(AppError::ConfigError(
            "PAGE_SIZE must be greater than zero".to_string(),
        )),
        Ok(size) => Ok(size),
        Err(_) => Err(AppError::ConfigError(format!(
            "PAGE_SIZE is not a number: {}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.stats_url, PLAYER_STATISTICS_URL);
        assert_eq!(config.underperformance_url, UNDERPERFORMING_POSITIONS_URL);
        assert_eq!(config.items_url, None);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PLAYER_STATS_URL", "http://localhost/stats.json"),
            ("ITEM_EFFICIENCY_URL", "http://localhost/items.json"),
            ("PAGE_SIZE", "25"),
        ]))
        .unwrap();
        assert_eq!(config.stats_url, "http://localhost/stats.json");
        assert_eq!(config.items_url.as_deref(), Some("http://localhost/items.json"));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn rejects_bad_page_size() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("PAGE_SIZE", "0")])),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("PAGE_SIZE", "ten")])),
            Err(AppError::ConfigError(_))
        ));
        assert!(Config::default().with_page_size(0).is_err());
    }

    #[test]
    fn blank_items_url_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("ITEM_EFFICIENCY_URL", "  ")])).unwrap();
        assert_eq!(config.items_url, None);
    }
}
