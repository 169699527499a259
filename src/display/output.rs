use crate::api::models::{ItemEfficiency, StatRecord, UnderperformanceRecord};
use crate::presenter::session::{PlayerView, Session, TableKind};
use crate::presenter::table::{PageView, SortState, TableRecord, NO_DATA};
use colored::*;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PlayerRow {
    #[tabled(rename = "#")]
    number: String,
    player: String,
    id: String,
    stats: String,
    underperformance: String,
}

#[derive(Tabled)]
struct ItemRow {
    rank: String,
    item: String,
    efficiency: String,
}

/// Header labels with the sort arrow on the active column.
fn decorated_headers(page: &PageView, keys: &[&str], sort: Option<SortState>) -> Vec<String> {
    page.headers
        .iter()
        .zip(keys)
        .map(|(header, key)| match sort {
            Some(s) if s.column == *key => format!("{} {}", header, s.direction.arrow()),
            _ => header.clone(),
        })
        .collect()
}

pub fn build_page_table(page: &PageView, keys: &[&str], sort: Option<SortState>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(decorated_headers(page, keys, sort));
    for row in &page.rows {
        builder.push_record(row.clone());
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

pub fn display_search(session: &Session) {
    println!("\n{}", "🔎 Estatísticas dos Jogadores".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if !session.query().is_empty() {
        println!("{} {}", "Busca:".bold(), session.query());
    }

    if !session.has_results() {
        println!("{}", "Nenhum jogador encontrado.".yellow());
        return;
    }

    let rows: Vec<PlayerRow> = session
        .visible_players()
        .enumerate()
        .map(|(idx, player)| PlayerRow {
            number: format!("{}", idx + 1),
            player: if session.is_selected(&player.id) {
                player.name.green().bold().to_string()
            } else {
                player.name.clone()
            },
            id: player.id.to_string(),
            stats: player.stats.len().to_string(),
            underperformance: player.underperformance.len().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!(
        "\n{} jogador(es) visível(is) de {}",
        session.visible_players().count(),
        session.players().len()
    );
}

pub fn display_player(player: &PlayerView) {
    println!(
        "\n{}",
        format!("🎮 Análise do Jogador {}", player.name).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let stat_keys = column_keys::<StatRecord>();
    let under_keys = column_keys::<UnderperformanceRecord>();

    display_table(
        TableKind::Stats,
        &player.page(TableKind::Stats),
        &stat_keys,
        player.stats.state().sort,
    );
    display_table(
        TableKind::Underperformance,
        &player.page(TableKind::Underperformance),
        &under_keys,
        player.underperformance.state().sort,
    );
}

fn column_keys<R: TableRecord>() -> Vec<&'static str> {
    R::COLUMNS.iter().map(|c| c.key).collect()
}

fn display_table(kind: TableKind, page: &PageView, keys: &[&str], sort: Option<SortState>) {
    println!(
        "{} {}",
        kind.title().bold().yellow(),
        format!("[{}]", kind.slug()).dimmed()
    );

    if page.is_empty() {
        println!("{}\n", NO_DATA.yellow());
        return;
    }

    println!("{}", build_page_table(page, keys, sort));
    println!(
        "Página {} de {} ({} linhas)\n",
        page.page, page.page_count, page.total_rows
    );
}

pub fn display_items(items: &[ItemEfficiency]) {
    println!("\n{}", "⚔️ Eficiência dos Itens".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if items.is_empty() {
        println!("{}", "Nenhum item disponível.".yellow());
        return;
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| ItemRow {
            rank: format!("#{}", idx + 1),
            item: item.name.clone(),
            efficiency: format!("{:.2}", item.efficiency),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Erro:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
