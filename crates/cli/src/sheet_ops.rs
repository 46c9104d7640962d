//! Line-oriented command parsing shared by the one-shot subcommands and the
//! `repl` mode: `set <CELL> <TEXT...>`, `get <CELL>`, `clear <CELL>`,
//! `print [values|texts]`.

use tabulon_engine::value::CellValue;
use tabulon_engine::{Position, Sheet, SheetError};
use tracing::warn;

pub enum Command {
    Set { pos: Position, text: String },
    Get { pos: Position },
    Clear { pos: Position },
    PrintValues,
    PrintTexts,
    Noop,
}

pub fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Command::Noop);
    }
    let mut parts = line.splitn(3, char::is_whitespace);
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    match verb.as_str() {
        "set" => {
            let cell = parts.next().ok_or("set requires a cell label")?;
            let text = parts.next().unwrap_or_default();
            let pos = Position::parse(cell).map_err(|_| format!("invalid cell label '{cell}'"))?;
            Ok(Command::Set {
                pos,
                text: text.to_string(),
            })
        }
        "get" => {
            let cell = parts.next().ok_or("get requires a cell label")?;
            let pos = Position::parse(cell).map_err(|_| format!("invalid cell label '{cell}'"))?;
            Ok(Command::Get { pos })
        }
        "clear" => {
            let cell = parts.next().ok_or("clear requires a cell label")?;
            let pos = Position::parse(cell).map_err(|_| format!("invalid cell label '{cell}'"))?;
            Ok(Command::Clear { pos })
        }
        "print" => match parts.next().unwrap_or("values") {
            "texts" => Ok(Command::PrintTexts),
            _ => Ok(Command::PrintValues),
        },
        other => Err(format!("unrecognized command '{other}'")),
    }
}

/// Execute one command against `sheet`, writing any output to `out`.
/// Returns `Err` only for engine-level failures (invalid position, formula
/// parse error, circular dependency) — unrecognized commands are reported
/// by the caller via `parse_line`'s `Result`.
pub fn run(sheet: &mut Sheet, cmd: Command, mut out: impl std::io::Write) -> Result<(), SheetError> {
    match cmd {
        Command::Set { pos, text } => sheet.set_cell(pos, &text),
        Command::Get { pos } => {
            match sheet.get_cell(pos)? {
                Some(handle) => {
                    let _ = writeln!(out, "{}", render(&handle.get_value()));
                }
                None => {
                    let _ = writeln!(out);
                }
            }
            Ok(())
        }
        Command::Clear { pos } => sheet.clear_cell(pos),
        Command::PrintValues => {
            let _ = sheet.print_values(&mut out);
            Ok(())
        }
        Command::PrintTexts => {
            let _ = sheet.print_texts(&mut out);
            Ok(())
        }
        Command::Noop => {
            warn!("no-op line");
            Ok(())
        }
    }
}

fn render(value: &CellValue) -> String {
    value.display_string()
}
