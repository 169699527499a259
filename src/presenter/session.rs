use crate::analysis::filter::visible_flags;
use crate::analysis::grouping::group_by;
use crate::api::models::{ItemEfficiency, StatRecord, UnderperformanceRecord};
use crate::error::AppError;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

use super::table::{PageView, Table};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    /// `player_` followed by the name with every non-alphanumeric ASCII
    /// character replaced by `_`.
    pub fn from_name(name: &str) -> Self {
        let slug: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        PlayerId(format!("player_{}", slug))
    }

    fn with_suffix(&self, n: usize) -> Self {
        PlayerId(format!("{}_{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Stats,
    Underperformance,
}

impl TableKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "stats" | "estatisticas" | "estatísticas" => Some(TableKind::Stats),
            "under" | "underperformance" | "desempenho" => Some(TableKind::Underperformance),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            TableKind::Stats => "stats",
            TableKind::Underperformance => "under",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TableKind::Stats => "Estatísticas do Jogador",
            TableKind::Underperformance => "Posições de Desempenho Inferior",
        }
    }
}

/// Everything known about one player. Built once per load.
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub stats: Table<StatRecord>,
    pub underperformance: Table<UnderperformanceRecord>,
}

impl PlayerView {
    pub fn page(&self, kind: TableKind) -> PageView {
        match kind {
            TableKind::Stats => self.stats.current_page(),
            TableKind::Underperformance => self.underperformance.current_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Search,
    PlayerDetail(PlayerId),
}

/// One discrete user reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Filter(String),
    Select(PlayerId),
    Back,
    Sort {
        player: PlayerId,
        table: TableKind,
        column: String,
    },
    GoToPage {
        player: PlayerId,
        table: TableKind,
        page: usize,
    },
    NextPage {
        player: PlayerId,
        table: TableKind,
    },
    PreviousPage {
        player: PlayerId,
        table: TableKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Sort,
    GoTo(usize),
    Next,
    Previous,
}

/// State of the whole browser: the player views, which one is showing, and
/// the search box.
#[derive(Debug, Clone, Default)]
pub struct Session {
    players: Vec<PlayerView>,
    index: HashMap<PlayerId, usize>,
    visible: Vec<bool>,
    selected: Option<usize>,
    query: String,
    view: Option<PlayerId>,
    items: Vec<ItemEfficiency>,
}

impl Session {
    pub fn empty() -> Self {
        Session::default()
    }

    /// Groups both datasets by player and eagerly builds every player view.
    /// Players are listed stats-first, in first-appearance order.
    pub fn build(
        stats: Vec<StatRecord>,
        underperformance: Vec<UnderperformanceRecord>,
        page_size: usize,
    ) -> Self {
        let stats = drop_unkeyed(stats, |r| &r.player_name, "stats");
        let underperformance =
            drop_unkeyed(underperformance, |r| &r.player_name, "underperformance");

        let stat_groups = group_by(stats, |r| r.player_name.as_str());
        let mut under_groups: HashMap<String, Vec<UnderperformanceRecord>> = HashMap::new();
        let mut names: Vec<String> = stat_groups.iter().map(|g| g.key.clone()).collect();
        let mut seen: HashSet<String> = names.iter().cloned().collect();
        for group in group_by(underperformance, |r| r.player_name.as_str()) {
            if seen.insert(group.key.clone()) {
                names.push(group.key.clone());
            }
            under_groups.insert(group.key, group.records);
        }
        let mut stat_groups: HashMap<String, Vec<StatRecord>> = stat_groups
            .into_iter()
            .map(|g| (g.key, g.records))
            .collect();

        let mut session = Session::empty();
        for name in names {
            let base = PlayerId::from_name(&name);
            let mut id = base.clone();
            let mut n = 1;
            while session.index.contains_key(&id) {
                n += 1;
                id = base.with_suffix(n);
            }
            if n > 1 {
                warn!(player = %name, id = %id, "player id already taken, suffixed");
            }

            let view = PlayerView {
                id: id.clone(),
                stats: Table::new(stat_groups.remove(&name).unwrap_or_default(), page_size),
                underperformance: Table::new(
                    under_groups.remove(&name).unwrap_or_default(),
                    page_size,
                ),
                name,
            };
            session.index.insert(id, session.players.len());
            session.players.push(view);
            session.visible.push(true);
        }

        debug!(players = session.players.len(), "session built");
        session
    }

    pub fn with_items(mut self, items: Vec<ItemEfficiency>) -> Self {
        self.items = items;
        self
    }

    pub fn players(&self) -> &[PlayerView] {
        &self.players
    }

    pub fn items(&self) -> &[ItemEfficiency] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> View {
        match &self.view {
            Some(id) => View::PlayerDetail(id.clone()),
            None => View::Search,
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.index.get(id).map(|&i| &self.players[i])
    }

    /// Resolves what a user typed: an exact id, then an exact name ignoring
    /// case, then the only visible name containing it.
    pub fn find_player(&self, input: &str) -> Option<&PlayerView> {
        let id = PlayerId(input.to_string());
        if let Some(player) = self.player(&id) {
            return Some(player);
        }

        let lowered = input.to_lowercase();
        if let Some(player) = self.players.iter().find(|p| p.name.to_lowercase() == lowered) {
            return Some(player);
        }

        let mut candidates = self
            .players
            .iter()
            .zip(&self.visible)
            .filter(|(p, shown)| **shown && p.name.to_lowercase().contains(&lowered));
        match (candidates.next(), candidates.next()) {
            (Some((player, _)), None) => Some(player),
            _ => None,
        }
    }

    pub fn is_visible(&self, id: &PlayerId) -> bool {
        self.index.get(id).is_some_and(|&i| self.visible[i])
    }

    pub fn is_selected(&self, id: &PlayerId) -> bool {
        self.index.get(id).is_some_and(|&i| self.selected == Some(i))
    }

    /// Players still shown in the dropdown, in list order.
    pub fn visible_players(&self) -> impl Iterator<Item = &PlayerView> {
        self.players
            .iter()
            .zip(&self.visible)
            .filter_map(|(p, shown)| shown.then_some(p))
    }

    /// The dropdown counts as expanded while it has at least one entry.
    pub fn has_results(&self) -> bool {
        self.visible.iter().any(|v| *v)
    }

    pub fn dispatch(&mut self, event: Event) -> Result<(), AppError> {
        debug!(?event, "dispatch");

        match event {
            Event::Filter(query) => {
                self.filter(query);
                Ok(())
            }
            Event::Select(id) => self.select(&id),
            Event::Back => {
                self.view = None;
                Ok(())
            }
            Event::Sort {
                player,
                table,
                column,
            } => self.table_action(&player, table, TableAction::Sort, &column),
            Event::GoToPage {
                player,
                table,
                page,
            } => self.table_action(&player, table, TableAction::GoTo(page), ""),
            Event::NextPage { player, table } => {
                self.table_action(&player, table, TableAction::Next, "")
            }
            Event::PreviousPage { player, table } => {
                self.table_action(&player, table, TableAction::Previous, "")
            }
        }
    }

    fn filter(&mut self, query: String) {
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        self.visible = visible_flags(&query, names.as_slice());
        self.query = query;
    }

    fn select(&mut self, id: &PlayerId) -> Result<(), AppError> {
        let idx = self.lookup(id)?;
        self.selected = Some(idx);
        self.view = Some(id.clone());
        Ok(())
    }

    fn lookup(&self, id: &PlayerId) -> Result<usize, AppError> {
        self.index.get(id).copied().ok_or_else(|| {
            warn!(id = %id, "no player page for id");
            AppError::MissingSurfaceElement(format!("player page {}", id))
        })
    }

    fn table_action(
        &mut self,
        id: &PlayerId,
        kind: TableKind,
        action: TableAction,
        column: &str,
    ) -> Result<(), AppError> {
        let idx = self.lookup(id)?;
        let player = &mut self.players[idx];

        let applied = match (kind, action) {
            (TableKind::Stats, TableAction::Sort) => player.stats.sort_by_column(column).is_some(),
            (TableKind::Underperformance, TableAction::Sort) => {
                player.underperformance.sort_by_column(column).is_some()
            }
            (TableKind::Stats, action) => {
                page_action(&mut player.stats, action);
                true
            }
            (TableKind::Underperformance, action) => {
                page_action(&mut player.underperformance, action);
                true
            }
        };

        if applied {
            Ok(())
        } else {
            warn!(id = %id, table = kind.slug(), column, "no such column");
            Err(AppError::MissingSurfaceElement(format!(
                "column {} in {} table of {}",
                column,
                kind.slug(),
                id
            )))
        }
    }
}

fn page_action<R: super::table::TableRecord>(table: &mut Table<R>, action: TableAction) {
    match action {
        TableAction::GoTo(page) => {
            table.go_to_page(page);
        }
        TableAction::Next => {
            table.next_page();
        }
        TableAction::Previous => {
            table.previous_page();
        }
        TableAction::Sort => {}
    }
}

fn drop_unkeyed<T, F>(records: Vec<T>, key_of: F, dataset: &str) -> Vec<T>
where
    F: Fn(&T) -> &String,
{
    let total = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| !key_of(r).trim().is_empty())
        .collect();
    if kept.len() < total {
        warn!(dataset, dropped = total - kept.len(), "records without a player name");
    }
    kept
}
