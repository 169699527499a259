use crate::analysis::pagination::{clamp_page, page_count, paginate};
use crate::analysis::sorting::{sort_rows, CellValue, SortDirection};
use crate::api::models::{StatRecord, UnderperformanceRecord};

pub const NO_DATA: &str = "Nenhum dado disponível.";
pub const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
}

/// A record type that can be laid out as table rows.
pub trait TableRecord {
    const COLUMNS: &'static [Column];

    fn cell(&self, column: &str) -> CellValue;
}

impl TableRecord for StatRecord {
    const COLUMNS: &'static [Column] = &[
        Column { key: "champion", header: "Campeão" },
        Column { key: "games_played", header: "Jogos Jogados" },
        Column { key: "wins", header: "Vitórias" },
        Column { key: "win_rate", header: "Taxa de Vitórias" },
    ];

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "champion" => CellValue::text(self.champion.as_ref()),
            "games_played" => CellValue::integer(self.games_played),
            "wins" => CellValue::integer(self.wins),
            "win_rate" => CellValue::percent(self.win_rate),
            _ => CellValue::Missing,
        }
    }
}

impl TableRecord for UnderperformanceRecord {
    const COLUMNS: &'static [Column] = &[
        Column { key: "position", header: "Posição" },
        Column { key: "stat", header: "Estatística" },
        Column { key: "player_avg", header: "Média do Jogador" },
        Column { key: "position_avg", header: "Média da Posição" },
    ];

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "position" => CellValue::text(self.position.as_ref()),
            "stat" => CellValue::text(self.stat.as_ref()),
            "player_avg" => CellValue::number(self.player_avg),
            "position_avg" => CellValue::number(self.position_avg),
            _ => CellValue::Missing,
        }
    }
}

/// Display text of a cell. Win rates are scaled to a percentage here and
/// nowhere else.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Integer(n) => n.to_string(),
        CellValue::Number(n) => format!("{:.1}", n),
        CellValue::Percent(n) => format!("{:.1}%", n * 100.0),
        CellValue::Text(s) => s.clone(),
        CellValue::Missing => MISSING.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortState>,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        TableState {
            page: 1,
            page_size: page_size.max(1),
            sort: None,
        }
    }

    /// Registers a header activation and returns the direction to sort in.
    pub fn activate_column(&mut self, column: &'static str) -> SortDirection {
        let direction = match self.sort {
            Some(current) if current.column == column => current.direction.flipped(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState { column, direction });
        direction
    }
}

/// One rendered page: headers, formatted cells and the pager position.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
}

impl PageView {
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }
}

#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: Vec<R>,
    state: TableState,
}

impl<R: TableRecord> Table<R> {
    pub fn new(rows: Vec<R>, page_size: usize) -> Self {
        Table {
            rows,
            state: TableState::new(page_size),
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.rows.len(), self.state.page_size)
    }

    pub fn column(key: &str) -> Option<&'static Column> {
        R::COLUMNS.iter().find(|c| c.key == key)
    }

    /// Moves to `page`, clamped into range. Returns the page actually shown.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.state.page = clamp_page(page, self.rows.len(), self.state.page_size);
        self.state.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.state.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.state.page.saturating_sub(1))
    }

    /// Header activation: toggles direction on the same column, resets to
    /// ascending on a new one, then re-sorts the current rows. Returns `None`
    /// when the column does not belong to this table.
    pub fn sort_by_column(&mut self, key: &str) -> Option<SortDirection> {
        let column = Self::column(key)?;
        let direction = self.state.activate_column(column.key);
        sort_rows(&mut self.rows, direction, |row| row.cell(column.key));
        Some(direction)
    }

    /// Typed cells of every row, in the current order.
    pub fn cells(&self) -> Vec<Vec<CellValue>> {
        self.rows
            .iter()
            .map(|row| R::COLUMNS.iter().map(|c| row.cell(c.key)).collect())
            .collect()
    }

    pub fn current_page(&self) -> PageView {
        let slice = paginate(&self.rows, self.state.page_size, self.state.page);

        PageView {
            headers: R::COLUMNS.iter().map(|c| c.header.to_string()).collect(),
            rows: slice
                .iter()
                .map(|row| {
                    R::COLUMNS
                        .iter()
                        .map(|c| format_cell(&row.cell(c.key)))
                        .collect()
                })
                .collect(),
            page: self.state.page,
            page_count: self.page_count(),
            total_rows: self.rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(champion: &str, games: u32, wins: u32, win_rate: f64) -> StatRecord {
        StatRecord {
            player_name: "Ana".to_string(),
            champion: Some(champion.to_string()),
            games_played: Some(games),
            wins: Some(wins),
            win_rate: Some(win_rate),
        }
    }

    fn champions(table: &Table<StatRecord>) -> Vec<String> {
        table
            .rows()
            .iter()
            .map(|r| r.champion.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn formats_the_garen_row() {
        let table = Table::new(vec![stat("Garen", 10, 6, 0.6)], 10);
        let page = table.current_page();
        assert_eq!(page.headers, vec!["Campeão", "Jogos Jogados", "Vitórias", "Taxa de Vitórias"]);
        assert_eq!(page.rows, vec![vec!["Garen", "10", "6", "60.0%"]]);
        assert_eq!((page.page, page.page_count), (1, 1));
    }

    #[test]
    fn missing_fields_render_placeholder() {
        let record = UnderperformanceRecord {
            player_name: "Ana".to_string(),
            position: Some("JUNGLE".to_string()),
            stat: None,
            player_avg: Some(3.24),
            position_avg: None,
        };
        let table = Table::new(vec![record], 10);
        assert_eq!(table.current_page().rows, vec![vec!["JUNGLE", "N/A", "3.2", "N/A"]]);
    }

    #[test]
    fn empty_table_has_one_page() {
        let table: Table<StatRecord> = Table::new(Vec::new(), 10);
        let page = table.current_page();
        assert!(page.is_empty());
        assert_eq!(page.page_count, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn paging_with_page_size_one() {
        let mut table = Table::new(vec![stat("Garen", 10, 6, 0.6), stat("Darius", 4, 1, 0.25)], 1);
        assert_eq!(table.current_page().rows[0][0], "Garen");
        assert_eq!(table.next_page(), 2);
        assert_eq!(table.current_page().rows[0][0], "Darius");
        // past the end clamps to the last page
        assert_eq!(table.go_to_page(3), 2);
        assert_eq!(table.previous_page(), 1);
        assert_eq!(table.previous_page(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn header_clicks_toggle_direction() {
        let mut table = Table::new(
            vec![stat("Garen", 10, 6, 0.6), stat("Ahri", 3, 2, 0.45), stat("Zed", 8, 1, 0.09)],
            10,
        );

        assert_eq!(table.sort_by_column("win_rate"), Some(SortDirection::Ascending));
        assert_eq!(champions(&table), vec!["Zed", "Ahri", "Garen"]);

        assert_eq!(table.sort_by_column("win_rate"), Some(SortDirection::Descending));
        assert_eq!(champions(&table), vec!["Garen", "Ahri", "Zed"]);

        assert_eq!(table.sort_by_column("champion"), Some(SortDirection::Ascending));
        assert_eq!(champions(&table), vec!["Ahri", "Garen", "Zed"]);

        assert_eq!(table.sort_by_column("games_played"), Some(SortDirection::Ascending));
        assert_eq!(champions(&table), vec!["Ahri", "Zed", "Garen"]);
    }

    #[test]
    fn cells_cover_every_page() {
        let rows: Vec<StatRecord> = (0..25).map(|n| stat(&format!("C{:02}", n), n, 0, 0.0)).collect();
        let table = Table::new(rows, 10);
        let cells = table.cells();
        assert_eq!(cells.len(), 25);
        assert_eq!(cells[24][0], CellValue::Text("C24".to_string()));
        assert_eq!(cells[24][1], CellValue::Integer(24));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut table = Table::new(vec![stat("Garen", 10, 6, 0.6)], 10);
        assert_eq!(table.sort_by_column("kda"), None);
        assert_eq!(table.state().sort, None);
    }

    #[test]
    fn sorting_keeps_the_page() {
        let rows: Vec<StatRecord> = (0..25).map(|n| stat(&format!("C{:02}", n), n, 0, 0.0)).collect();
        let mut table = Table::new(rows, 10);
        table.go_to_page(3);
        table.sort_by_column("games_played");
        table.sort_by_column("games_played");
        assert_eq!(table.state().page, 3);
        assert_eq!(table.current_page().rows.len(), 5);
        assert_eq!(table.current_page().rows[0][0], "C04");
    }
}
