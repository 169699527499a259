use crate::api::client::{fetch_datasets, fetch_items, DataSource};
use crate::config::Config;
use tracing::{error, info, warn};

use super::session::Session;

/// Fetches everything and builds a fresh session. A failed player fetch
/// leaves the session empty; a failed item fetch only drops the item list.
/// Errors are logged, never returned.
pub fn load_session(source: &dyn DataSource, config: &Config) -> Session {
    let datasets = match fetch_datasets(source, config) {
        Ok(datasets) => datasets,
        Err(e) => {
            error!(error = %e, "failed to build player pages");
            return Session::empty();
        }
    };

    let session = Session::build(datasets.stats, datasets.underperformance, config.page_size);
    info!(players = session.players().len(), "player pages built");

    match &config.items_url {
        Some(url) => match fetch_items(source, url) {
            Ok(items) => session.with_items(items),
            Err(e) => {
                warn!(error = %e, "item efficiency list unavailable");
                session
            }
        },
        None => session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::fake::FakeSource;
    use crate::presenter::session::{Event, TableKind};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    const STATS: &str = r#"[
        {"player_name": "Ana", "champion": "Garen", "games_played": 10, "wins": 6, "win_rate": 0.6},
        {"player_name": "Ana", "champion": "Darius", "games_played": 2, "wins": 0, "win_rate": 0.0}
    ]"#;
    const UNDER: &str = r#"[
        {"player_name": "Ana", "position": "TOP", "stat": "gold", "player_avg": 9800.5, "position_avg": 10200.0}
    ]"#;

    fn config(items_url: Option<&str>) -> Config {
        Config {
            stats_url: "mem://stats".to_string(),
            underperformance_url: "mem://under".to_string(),
            items_url: items_url.map(str::to_string),
            page_size: 1,
        }
    }

    #[test]
    fn builds_pages_from_both_endpoints() {
        let source = FakeSource::default()
            .with("mem://stats", STATS)
            .with("mem://under", UNDER);

        let session = load_session(&source, &config(None));
        assert_eq!(session.players().len(), 1);

        let ana = &session.players()[0];
        assert_eq!(ana.page(TableKind::Stats).page_count, 2);
        assert_eq!(
            ana.page(TableKind::Underperformance).rows,
            vec![vec!["TOP", "gold", "9800.5", "10200.0"]]
        );
        assert!(session.items().is_empty());
    }

    #[test]
    fn failed_stats_fetch_yields_an_empty_session() {
        let source = FakeSource::default().with("mem://under", UNDER);

        let mut session = load_session(&source, &config(None));
        assert!(session.players().is_empty());

        session.dispatch(Event::Filter("a".to_string())).unwrap();
        assert_eq!(session.visible_players().count(), 0);
        assert!(!session.has_results());
    }

    #[test]
    fn failed_fetch_is_logged_as_an_error() {
        let source = FakeSource::default().with("mem://stats", STATS);
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let session = tracing::subscriber::with_default(subscriber, || {
            load_session(&source, &config(None))
        });

        assert!(session.players().is_empty());
        let logs = captured.text();
        assert!(logs.contains("ERROR"), "{}", logs);
        assert!(logs.contains("failed to build player pages"), "{}", logs);
        assert!(logs.contains("mem://under"), "{}", logs);
    }

    #[test]
    fn item_failure_keeps_the_players() {
        let source = FakeSource::default()
            .with("mem://stats", STATS)
            .with("mem://under", UNDER);

        let session = load_session(&source, &config(Some("mem://items")));
        assert_eq!(session.players().len(), 1);
        assert!(session.items().is_empty());
    }

    #[test]
    fn loads_items_when_configured() {
        let source = FakeSource::default()
            .with("mem://stats", STATS)
            .with("mem://under", UNDER)
            .with("mem://items", r#"[{"name": "Gume do Infinito", "efficiency": 1.12}]"#);

        let session = load_session(&source, &config(Some("mem://items")));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].name, "Gume do Infinito");
    }
}
