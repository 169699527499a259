use crate::config::Config;
use crate::error::AppError;
use std::thread;
use tracing::{debug, info};

use super::endpoints::USER_AGENT;
use super::models::*;

/// Anything that can hand back the raw body of a JSON endpoint.
pub trait DataSource: Sync {
    fn fetch_body(&self, url: &str) -> Result<String, AppError>;
}

pub struct HttpDataSource {
    agent: ureq::Agent,
}

impl HttpDataSource {
    pub fn new() -> Self {
        HttpDataSource {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }
}

impl Default for HttpDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for HttpDataSource {
    fn fetch_body(&self, url: &str) -> Result<String, AppError> {
        debug!(url, "GET");

        // No retry: any failure aborts the build
        match self.agent.get(url).call() {
            Ok(resp) => resp.into_string().map_err(|e| AppError::NetworkFailure {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(ureq::Error::Status(code, _)) => Err(AppError::NetworkFailure {
                url: url.to_string(),
                reason: format!("HTTP status {}", code),
            }),
            Err(e) => Err(AppError::NetworkFailure {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

pub struct Datasets {
    pub stats: Vec<StatRecord>,
    pub underperformance: Vec<UnderperformanceRecord>,
}

fn fetch_rows<T>(source: &dyn DataSource, url: &str, dataset: &str) -> Result<Vec<T>, AppError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let body = source.fetch_body(url)?;
    decode_rows(&body, dataset)
        .map_err(|e| AppError::JsonError(format!("{} ({}): {}", dataset, url, e)))
}

/// Fetches both player datasets in parallel and joins them. Either failure
/// fails the whole join.
pub fn fetch_datasets(source: &dyn DataSource, config: &Config) -> Result<Datasets, AppError> {
    let (stats, underperformance) = thread::scope(|scope| {
        let stats = scope.spawn(|| fetch_rows::<StatRecord>(source, &config.stats_url, "stats"));
        let underperformance = scope.spawn(|| {
            fetch_rows::<UnderperformanceRecord>(
                source,
                &config.underperformance_url,
                "underperformance",
            )
        });

        (join_fetch(stats), join_fetch(underperformance))
    });

    let datasets = Datasets {
        stats: stats?,
        underperformance: underperformance?,
    };

    info!(
        stats = datasets.stats.len(),
        underperformance = datasets.underperformance.len(),
        "datasets loaded"
    );

    Ok(datasets)
}

fn join_fetch<T>(
    handle: thread::ScopedJoinHandle<'_, Result<Vec<T>, AppError>>,
) -> Result<Vec<T>, AppError> {
    handle.join().unwrap_or_else(|_| {
        Err(AppError::NetworkFailure {
            url: "<worker>".to_string(),
            reason: "fetch thread panicked".to_string(),
        })
    })
}

pub fn fetch_items(source: &dyn DataSource, url: &str) -> Result<Vec<ItemEfficiency>, AppError> {
    fetch_rows(source, url, "items")
}
