use crate::analysis::sorting::CellValue;
use crate::api::models::ItemEfficiency;
use crate::presenter::session::{PlayerId, PlayerView, Session, TableKind, View};
use crate::presenter::table::{format_cell, PageView, Table, TableRecord, NO_DATA};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{cursor:pointer;background:#f3f3f3}\
.dropdown-item{padding:4px;cursor:pointer}\
.container{margin-bottom:2em}";

// Handles the data-action hooks: filter, select, back, prev, next, sort.
// Sorting reads data-value for numeric cells, never the rendered text.
const SCRIPT: &str = r#"(function () {
  function show(id) {
    document.querySelectorAll('.player-page').forEach(function (p) {
      p.style.display = p.id === id ? 'block' : 'none';
    });
    document.getElementById('search-container').style.display = id ? 'none' : 'block';
  }
  function tableOf(el) {
    return document.getElementById(el.dataset.player)
      .querySelector('table[data-table="' + el.dataset.table + '"]');
  }
  function paginate(table, page) {
    var size = +table.dataset.pageSize;
    var rows = table.tBodies[0].rows;
    var count = Math.max(1, Math.ceil(rows.length / size));
    page = Math.min(Math.max(page, 1), count);
    table.dataset.page = page;
    for (var i = 0; i < rows.length; i++) {
      rows[i].hidden = Math.floor(i / size) + 1 !== page;
    }
    var pager = table.parentNode.querySelector('.pagination');
    pager.querySelector('span').textContent = 'Página ' + page + ' de ' + count;
    pager.querySelector('[data-action="prev"]').disabled = page <= 1;
    pager.querySelector('[data-action="next"]').disabled = page >= count;
  }
  function compare(a, b) {
    var am = a.hasAttribute('data-missing'), bm = b.hasAttribute('data-missing');
    if (am || bm) return am === bm ? 0 : (am ? 1 : -1);
    if (a.hasAttribute('data-value') && b.hasAttribute('data-value')) {
      return parseFloat(a.dataset.value) - parseFloat(b.dataset.value);
    }
    var c = a.textContent.localeCompare(b.textContent, 'pt-BR', { sensitivity: 'base' });
    return c !== 0 ? c : (a.textContent < b.textContent ? -1 : (a.textContent > b.textContent ? 1 : 0));
  }
  function sort(th) {
    var table = tableOf(th);
    var idx = +th.dataset.index;
    var dir = th.getAttribute('aria-sort') === 'ascending' ? 'descending' : 'ascending';
    table.querySelectorAll('th').forEach(function (h) { h.setAttribute('aria-sort', 'none'); });
    th.setAttribute('aria-sort', dir);
    var body = table.tBodies[0];
    var rows = Array.prototype.slice.call(body.rows).map(function (r, i) { return [r, i]; });
    rows.sort(function (x, y) {
      var c = compare(x[0].cells[idx], y[0].cells[idx]);
      if (dir === 'descending') c = -c;
      return c !== 0 ? c : x[1] - y[1];
    });
    rows.forEach(function (r) { body.appendChild(r[0]); });
    paginate(table, +table.dataset.page);
  }
  document.getElementById('search-input').addEventListener('input', function (e) {
    var query = e.target.value.toLowerCase();
    var any = false;
    document.querySelectorAll('.dropdown-item').forEach(function (item) {
      var hit = item.textContent.toLowerCase().indexOf(query) !== -1;
      item.style.display = hit ? 'block' : 'none';
      any = any || hit;
    });
    document.getElementById('dropdown').setAttribute('aria-expanded', any);
  });
  document.addEventListener('click', function (e) {
    var el = e.target.closest('[data-action]');
    if (!el) return;
    switch (el.dataset.action) {
      case 'select':
        document.querySelectorAll('.dropdown-item').forEach(function (item) {
          item.setAttribute('aria-selected', item === el ? 'true' : 'false');
        });
        show(el.dataset.player);
        break;
      case 'back':
        show(null);
        break;
      case 'prev':
        paginate(tableOf(el), +tableOf(el).dataset.page - 1);
        break;
      case 'next':
        paginate(tableOf(el), +tableOf(el).dataset.page + 1);
        break;
      case 'sort':
        sort(el);
        break;
    }
  });
})();"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn display_attr(visible: bool) -> &'static str {
    if visible {
        "display:block"
    } else {
        "display:none"
    }
}

/// Snapshot of the whole surface as one HTML document.
pub fn render_document(session: &Session, generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();
    let view = session.view();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Estatísticas dos Jogadores</title>\n");
    let _ = writeln!(html, "<style>{}</style>\n</head>\n<body>", STYLE);

    render_search(&mut html, session, view == View::Search);

    for player in session.players() {
        let visible = view == View::PlayerDetail(player.id.clone());
        render_player_page(&mut html, player, visible);
    }

    if !session.items().is_empty() {
        render_items(&mut html, session.items());
    }

    let _ = writeln!(html, "<script>{}</script>", SCRIPT);
    let _ = writeln!(
        html,
        "<footer>Gerado em {}</footer>\n</body>\n</html>",
        generated_at.format("%d/%m/%Y %H:%M UTC")
    );
    html
}

fn render_search(html: &mut String, session: &Session, visible: bool) {
    let _ = writeln!(
        html,
        "<div id=\"search-container\" style=\"{}\">",
        display_attr(visible)
    );
    html.push_str("<h1>Estatísticas dos Jogadores</h1>\n");
    let _ = writeln!(
        html,
        "<input id=\"search-input\" type=\"text\" placeholder=\"Buscar jogador...\" value=\"{}\" data-action=\"filter\">",
        escape(session.query())
    );
    let _ = writeln!(
        html,
        "<div id=\"dropdown\" role=\"listbox\" aria-expanded=\"{}\">",
        session.has_results()
    );
    for player in session.players() {
        let _ = writeln!(
            html,
            "<div class=\"dropdown-item\" role=\"option\" aria-selected=\"{}\" style=\"{}\" data-action=\"select\" data-player=\"{}\">{}</div>",
            session.is_selected(&player.id),
            display_attr(session.is_visible(&player.id)),
            escape(player.id.as_str()),
            escape(&player.name)
        );
    }
    html.push_str("</div>\n</div>\n");
}

fn render_player_page(html: &mut String, player: &PlayerView, visible: bool) {
    let _ = writeln!(
        html,
        "<div id=\"{}\" class=\"player-page\" style=\"{}\">",
        escape(player.id.as_str()),
        display_attr(visible)
    );
    let _ = writeln!(html, "<h1>Análise do Jogador {}</h1>", escape(&player.name));
    html.push_str("<button class=\"back-button\" data-action=\"back\">Voltar</button>\n");

    render_table(html, &player.id, TableKind::Stats, &player.stats);
    render_table(html, &player.id, TableKind::Underperformance, &player.underperformance);

    html.push_str("</div>\n");
}

fn render_cell(html: &mut String, value: &CellValue) {
    let text = escape(&format_cell(value));
    let _ = match value {
        CellValue::Integer(n) => write!(html, "<td data-value=\"{}\">{}</td>", n, text),
        CellValue::Number(n) | CellValue::Percent(n) => {
            write!(html, "<td data-value=\"{}\">{}</td>", n, text)
        }
        CellValue::Missing => write!(html, "<td data-missing>{}</td>", text),
        CellValue::Text(_) => write!(html, "<td>{}</td>", text),
    };
}

/// Every row is written; rows outside the current page carry `hidden` and
/// the inline script moves between pages.
fn render_table<R: TableRecord>(html: &mut String, id: &PlayerId, kind: TableKind, table: &Table<R>) {
    let page = table.current_page();
    let state = table.state();
    let target = format!(
        "data-player=\"{}\" data-table=\"{}\"",
        escape(id.as_str()),
        kind.slug()
    );

    html.push_str("<div class=\"container\">\n");
    let _ = writeln!(html, "<h2>{}</h2>", kind.title());

    if page.is_empty() {
        let _ = writeln!(html, "<p>{}</p>\n</div>", NO_DATA);
        return;
    }

    let _ = writeln!(
        html,
        "<table data-table=\"{}\" data-page=\"{}\" data-page-size=\"{}\">",
        kind.slug(),
        state.page,
        state.page_size
    );
    html.push_str("<thead><tr>");
    for (idx, column) in R::COLUMNS.iter().enumerate() {
        let aria = match state.sort {
            Some(s) if s.column == column.key => s.direction.aria(),
            _ => "none",
        };
        let _ = write!(
            html,
            "<th aria-sort=\"{}\" data-action=\"sort\" {} data-column=\"{}\" data-index=\"{}\">{}</th>",
            aria,
            target,
            column.key,
            idx,
            escape(column.header)
        );
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (idx, row) in table.cells().iter().enumerate() {
        let on_page = idx / state.page_size + 1 == state.page;
        html.push_str(if on_page { "<tr>" } else { "<tr hidden>" });
        for cell in row {
            render_cell(html, cell);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    render_pager(html, &page, &target);
    html.push_str("</div>\n");
}

fn render_pager(html: &mut String, page: &PageView, target: &str) {
    html.push_str("<div class=\"pagination\">");
    let _ = write!(
        html,
        "<button data-action=\"prev\" {}{}>Anterior</button>",
        target,
        if page.page <= 1 { " disabled" } else { "" }
    );
    let _ = write!(html, "<span>Página {} de {}</span>", page.page, page.page_count);
    let _ = write!(
        html,
        "<button data-action=\"next\" {}{}>Próxima</button>",
        target,
        if page.page >= page.page_count { " disabled" } else { "" }
    );
    html.push_str("</div>\n");
}

fn render_items(html: &mut String, items: &[ItemEfficiency]) {
    html.push_str("<div class=\"container\" id=\"items\">\n<h2>Eficiência dos Itens</h2>\n<ul>\n");
    for item in items {
        let _ = writeln!(
            html,
            "<li>{}: {:.2}</li>",
            escape(&item.name),
            item.efficiency
        );
    }
    html.push_str("</ul>\n</div>\n");
}
