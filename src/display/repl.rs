use crate::error::AppError;
use crate::presenter::session::{Event, PlayerId, Session, TableKind, View};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::output::{
    display_error, display_info, display_items, display_player, display_search, display_success,
    display_warning,
};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Open(String),
    Back,
    Sort { table: TableKind, column: String },
    Page { table: TableKind, page: usize },
    Next(TableKind),
    Previous(TableKind),
    Items,
    Reload,
    Export(PathBuf),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, AppError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "buscar" | "search" | "/" => Command::Search(rest.to_string()),
        "abrir" | "open" => {
            require(rest, "abrir <jogador>")?;
            Command::Open(rest.to_string())
        }
        "voltar" | "back" => Command::Back,
        "ordenar" | "sort" => {
            let (table, column) = table_and_arg(rest, "ordenar <stats|under> <coluna>")?;
            Command::Sort {
                table,
                column: column.to_string(),
            }
        }
        "pagina" | "página" | "page" => {
            let (table, page) = table_and_arg(rest, "pagina <stats|under> <n>")?;
            let page = page
                .parse::<usize>()
                .map_err(|_| AppError::InvalidCommand(format!("página inválida: {}", page)))?;
            Command::Page { table, page }
        }
        "proxima" | "próxima" | "next" => Command::Next(table_or_stats(rest)?),
        "anterior" | "prev" => Command::Previous(table_or_stats(rest)?),
        "itens" | "items" => Command::Items,
        "recarregar" | "reload" => Command::Reload,
        "exportar" | "export" => {
            require(rest, "exportar <arquivo>")?;
            Command::Export(PathBuf::from(rest))
        }
        "ajuda" | "help" | "?" => Command::Help,
        "sair" | "quit" | "exit" => Command::Quit,
        other => {
            return Err(AppError::InvalidCommand(format!(
                "comando desconhecido: {} (digite 'ajuda')",
                other
            )))
        }
    };

    Ok(command)
}

fn require(rest: &str, usage: &str) -> Result<(), AppError> {
    if rest.is_empty() {
        Err(AppError::InvalidCommand(format!("uso: {}", usage)))
    } else {
        Ok(())
    }
}

fn parse_table(raw: &str) -> Result<TableKind, AppError> {
    TableKind::parse(raw).ok_or_else(|| AppError::InvalidCommand(format!("tabela desconhecida: {}", raw)))
}

fn table_or_stats(rest: &str) -> Result<TableKind, AppError> {
    if rest.is_empty() {
        Ok(TableKind::Stats)
    } else {
        parse_table(rest)
    }
}

fn table_and_arg<'a>(rest: &'a str, usage: &str) -> Result<(TableKind, &'a str), AppError> {
    match rest.split_once(char::is_whitespace) {
        Some((table, arg)) if !arg.trim().is_empty() => Ok((parse_table(table)?, arg.trim())),
        _ => Err(AppError::InvalidCommand(format!("uso: {}", usage))),
    }
}

/// Turns a command into a session event. Table commands address the player
/// currently on screen.
pub fn to_event(command: &Command, session: &Session) -> Result<Option<Event>, AppError> {
    let current = || match session.view() {
        View::PlayerDetail(id) => Ok(id),
        View::Search => Err(AppError::InvalidCommand(
            "abra um jogador primeiro".to_string(),
        )),
    };

    let event = match command {
        Command::Search(query) => Event::Filter(query.clone()),
        Command::Open(input) => {
            let id = session
                .find_player(input)
                .map(|p| p.id.clone())
                .unwrap_or_else(|| PlayerId::from_name(input));
            Event::Select(id)
        }
        Command::Back => Event::Back,
        Command::Sort { table, column } => Event::Sort {
            player: current()?,
            table: *table,
            column: column.clone(),
        },
        Command::Page { table, page } => Event::GoToPage {
            player: current()?,
            table: *table,
            page: *page,
        },
        Command::Next(table) => Event::NextPage {
            player: current()?,
            table: *table,
        },
        Command::Previous(table) => Event::PreviousPage {
            player: current()?,
            table: *table,
        },
        _ => return Ok(None),
    };

    Ok(Some(event))
}

const HELP: &str = "\
buscar <texto>                  filtra a lista de jogadores
abrir <jogador>                 mostra as tabelas do jogador
voltar                          volta para a busca
ordenar <stats|under> <coluna>  ordena (clique repetido inverte)
pagina <stats|under> <n>        vai para a página n
proxima [tabela] / anterior     navega entre páginas
itens                           eficiência dos itens
recarregar                      busca os dados de novo
exportar <arquivo>              grava a página HTML
sair                            encerra";

/// Hooks the loop needs from its host.
pub trait Host {
    fn reload(&mut self) -> Session;
    fn export(&mut self, session: &Session, path: &Path) -> Result<(), AppError>;
}

fn show(session: &Session) {
    match session.view() {
        View::Search => display_search(session),
        View::PlayerDetail(id) => match session.player(&id) {
            Some(player) => display_player(player),
            None => display_search(session),
        },
    }
}

/// Reads one command per line until EOF or `sair`.
pub fn run<R: BufRead, H: Host>(input: R, mut session: Session, host: &mut H) -> Result<(), AppError> {
    show(&session);
    prompt()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                debug!(?command, "command");
                step(command, &mut session, host);
            }
            Err(e) => display_warning(&e.to_string()),
        }
        prompt()?;
    }

    Ok(())
}

/// Applies one command to the session. Failed events leave it untouched.
fn step<H: Host>(command: Command, session: &mut Session, host: &mut H) {
    match command {
        Command::Help => println!("{}", HELP),
        Command::Items => display_items(session.items()),
        Command::Reload => {
            display_info("Recarregando dados...");
            *session = host.reload();
            show(session);
        }
        Command::Export(path) => match host.export(session, &path) {
            Ok(()) => display_success(&format!("Página gravada em {}", path.display())),
            Err(e) => display_error(&e.to_string()),
        },
        command => {
            let event = match to_event(&command, session) {
                Ok(Some(event)) => event,
                Ok(None) => return,
                Err(e) => return display_warning(&e.to_string()),
            };
            match session.dispatch(event) {
                Ok(()) => show(session),
                Err(e) => display_warning(&e.to_string()),
            }
        }
    }
}

fn prompt() -> Result<(), AppError> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::StatRecord;

    fn session() -> Session {
        let stat = |player: &str, champion: &str, games: u32| StatRecord {
            player_name: player.to_string(),
            champion: Some(champion.to_string()),
            games_played: Some(games),
            wins: Some(1),
            win_rate: Some(1.0 / f64::from(games)),
        };
        Session::build(
            vec![stat("Ana", "Garen", 10), stat("Ana", "Ahri", 4), stat("Bia", "Zed", 2)],
            Vec::new(),
            1,
        )
    }

    struct FakeHost {
        reloads: usize,
        exports: Vec<PathBuf>,
    }

    impl Host for FakeHost {
        fn reload(&mut self) -> Session {
            self.reloads += 1;
            Session::empty()
        }

        fn export(&mut self, _session: &Session, path: &Path) -> Result<(), AppError> {
            self.exports.push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("buscar an").unwrap(), Command::Search("an".to_string()));
        assert_eq!(parse_command("search").unwrap(), Command::Search(String::new()));
        assert_eq!(parse_command("  abrir Caio Lima ").unwrap(), Command::Open("Caio Lima".to_string()));
        assert_eq!(
            parse_command("ordenar stats win_rate").unwrap(),
            Command::Sort { table: TableKind::Stats, column: "win_rate".to_string() }
        );
        assert_eq!(
            parse_command("page under 2").unwrap(),
            Command::Page { table: TableKind::Underperformance, page: 2 }
        );
        assert_eq!(parse_command("proxima").unwrap(), Command::Next(TableKind::Stats));
        assert_eq!(parse_command("anterior under").unwrap(), Command::Previous(TableKind::Underperformance));
        assert_eq!(parse_command("sair").unwrap(), Command::Quit);
        assert_eq!(parse_command("exportar out.html").unwrap(), Command::Export(PathBuf::from("out.html")));
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(matches!(parse_command("dance"), Err(AppError::InvalidCommand(_))));
        assert!(matches!(parse_command("abrir"), Err(AppError::InvalidCommand(_))));
        assert!(matches!(parse_command("ordenar stats"), Err(AppError::InvalidCommand(_))));
        assert!(matches!(parse_command("pagina stats dois"), Err(AppError::InvalidCommand(_))));
        assert!(matches!(parse_command("pagina items 2"), Err(AppError::InvalidCommand(_))));
    }

    #[test]
    fn table_commands_need_an_open_player() {
        let session = session();
        let command = parse_command("ordenar stats champion").unwrap();
        assert!(to_event(&command, &session).is_err());
    }

    #[test]
    fn open_resolves_names() {
        let session = session();
        let event = to_event(&Command::Open("bia".to_string()), &session).unwrap();
        assert_eq!(event, Some(Event::Select(PlayerId::from_name("Bia"))));
    }

    #[test]
    fn scripted_session() {
        let script = "abrir Ana\nordenar stats games_played\nproxima\nvoltar\nexportar snap.html\nrecarregar\nsair\nbuscar nunca\n";
        let mut host = FakeHost { reloads: 0, exports: Vec::new() };

        run(script.as_bytes(), session(), &mut host).unwrap();

        assert_eq!(host.exports, vec![PathBuf::from("snap.html")]);
        assert_eq!(host.reloads, 1);
    }

    #[test]
    fn step_applies_events_in_order() {
        let mut host = FakeHost { reloads: 0, exports: Vec::new() };
        let mut session = session();
        for line in ["abrir Ana", "ordenar stats games_played", "proxima"] {
            let command = parse_command(line).unwrap();
            step(command, &mut session, &mut host);
        }

        let ana = session.player(&PlayerId::from_name("Ana")).unwrap();
        // ascending by games: Ahri (4), Garen (10); page 2 of 2
        assert_eq!(ana.stats.state().page, 2);
        assert_eq!(ana.page(TableKind::Stats).rows[0][0], "Garen");
    }

    #[test]
    fn failed_events_leave_the_session_alone() {
        let mut host = FakeHost { reloads: 0, exports: Vec::new() };
        let mut session = session();
        step(Command::Open("Ana".to_string()), &mut session, &mut host);
        step(Command::Open("ghost".to_string()), &mut session, &mut host);
        step(Command::Sort { table: TableKind::Stats, column: "kda".to_string() }, &mut session, &mut host);

        let ana = PlayerId::from_name("Ana");
        assert_eq!(session.view(), View::PlayerDetail(ana.clone()));
        assert_eq!(session.player(&ana).unwrap().stats.state().sort, None);
    }
}
