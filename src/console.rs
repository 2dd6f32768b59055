//! Interactive session: one command per line, an empty line captures.
//!
//! Input problems (bad numbers, unknown commands) are reported and change
//! nothing. Capture and shell failures are reported and the loop carries on.

use std::io::{BufRead, Write};

use crate::capture::{Grabber, Region};
use crate::session::{describe_output, Session};
use crate::shell;

pub const HELP: &str = "\
Commands:
  <enter> | capture            capture the region into the next file
  next                         show the next filename
  reset                        restart numbering at 1
  set <n>                      continue numbering at n (n >= 1)
  path <folder>                choose the output folder (rescans)
  prefix [text]                set the filename prefix
  suffix [text]                set the filename suffix
  region <l> <t> <w> <h>       set the capture region
  rescan                       re-derive the counter from the folder
  open                         open the output folder
  show                         print the current settings
  help                         this text
  quit                         save settings and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capture,
    Next,
    Reset,
    SetCounter(u64),
    Path(String),
    Prefix(String),
    Suffix(String),
    Region(Region),
    Rescan,
    Open,
    Show,
    Help,
    Quit,
}

/// Parses one input line.
///
/// Arguments to `path`, `prefix` and `suffix` are the rest of the line
/// after a single separating space, so leading spaces inside a prefix
/// survive and an omitted argument clears the prefix or suffix.
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(Command::Capture);
    }

    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "capture" | "c" => Ok(Command::Capture),
        "next" => Ok(Command::Next),
        "reset" => Ok(Command::Reset),
        "set" => parse_counter_value(rest.trim()).map(Command::SetCounter),
        "path" => {
            let path = rest.trim();
            if path.is_empty() {
                Err(InputError::MissingArgument("path"))
            } else {
                Ok(Command::Path(path.to_string()))
            }
        }
        "prefix" => Ok(Command::Prefix(rest.to_string())),
        "suffix" => Ok(Command::Suffix(rest.to_string())),
        "region" => parse_region(rest).map(Command::Region),
        "rescan" => Ok(Command::Rescan),
        "open" => Ok(Command::Open),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(InputError::UnknownCommand(word.to_string())),
    }
}

/// A counter typed by the user: a positive integer.
pub fn parse_counter_value(text: &str) -> Result<u64, InputError> {
    if text.is_empty() {
        return Err(InputError::MissingArgument("counter"));
    }
    match text.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as u64),
        Ok(_) => Err(InputError::NonPositiveCounter(text.to_string())),
        Err(_) => Err(InputError::NotAnInteger(text.to_string())),
    }
}

/// Four integers separated by whitespace or commas: left, top, width, height.
pub fn parse_region(text: &str) -> Result<Region, InputError> {
    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 4 {
        return Err(InputError::RegionArity(parts.len()));
    }

    let mut values = [0i32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| InputError::NotAnInteger(part.to_string()))?;
    }

    Ok(Region::new(values[0], values[1], values[2], values[3]))
}

/// Runs commands from `input` until `quit` or end of input.
///
/// Everything user-facing goes to `out`; write errors on `out` end the loop.
pub fn run<G, R, W>(session: &mut Session<G>, input: R, out: &mut W) -> std::io::Result<()>
where
    G: Grabber,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Next file: {}", session.next_path().display())?;
    writeln!(out, "Press Enter to capture, 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        execute(session, command, out)?;
    }

    Ok(())
}

fn execute<G: Grabber, W: Write>(
    session: &mut Session<G>,
    command: Command,
    out: &mut W,
) -> std::io::Result<()> {
    match command {
        Command::Capture => match session.capture() {
            Ok(path) => {
                writeln!(out, "Saved {}", path.display())?;
                writeln!(out, "Next file: {}", session.next_filename())?;
            }
            Err(e) => {
                if !e.is_validation() {
                    log::error!("[SESSION] Capture failed: {}", e);
                }
                writeln!(out, "error: {}", e)?;
            }
        },
        Command::Next => writeln!(out, "{}", session.next_path().display())?,
        Command::Reset => {
            session.reset_counter();
            writeln!(out, "Next file: {}", session.next_filename())?;
        }
        Command::SetCounter(n) => {
            session.set_counter(n);
            writeln!(out, "Next file: {}", session.next_filename())?;
        }
        Command::Path(path) => {
            session.set_output_path(path);
            writeln!(out, "Next file: {}", session.next_path().display())?;
        }
        Command::Prefix(prefix) => {
            session.set_prefix(prefix);
            writeln!(out, "Next file: {}", session.next_filename())?;
        }
        Command::Suffix(suffix) => {
            session.set_suffix(suffix);
            writeln!(out, "Next file: {}", session.next_filename())?;
        }
        Command::Region(region) => {
            session.set_region(region);
            write_region(out, &region)?;
        }
        Command::Rescan => {
            session.rescan();
            writeln!(out, "Next file: {}", session.next_filename())?;
        }
        Command::Open => {
            if let Err(e) = shell::open_folder(&session.config().output_path) {
                log::warn!("[SHELL] {}", e);
                writeln!(out, "error: {}", e)?;
            }
        }
        Command::Show => write_settings(out, session)?,
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(())
}

/// Prints the current settings and the next filename.
pub fn write_settings<G: Grabber, W: Write>(out: &mut W, session: &Session<G>) -> std::io::Result<()> {
    let config = session.config();
    writeln!(out, "folder: {}", describe_output(&config.output_path))?;
    writeln!(out, "prefix: {:?}", config.prefix)?;
    writeln!(out, "suffix: {:?}", config.suffix)?;
    write_region(out, &config.region)?;
    writeln!(out, "next:   {}", session.next_filename())
}

fn write_region<W: Write>(out: &mut W, region: &Region) -> std::io::Result<()> {
    writeln!(
        out,
        "region: left={} top={} width={} height={}",
        region.left, region.top, region.width, region.height
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[error("counter must be at least 1, got {0}")]
    NonPositiveCounter(String),

    #[error("region needs 4 values (left top width height), got {0}")]
    RegionArity(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_captures() {
        assert_eq!(parse_command(""), Ok(Command::Capture));
        assert_eq!(parse_command("   \r\n"), Ok(Command::Capture));
        assert_eq!(parse_command("capture"), Ok(Command::Capture));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_command("RESET"), Ok(Command::Reset));
        assert_eq!(parse_command("Quit"), Ok(Command::Quit));
    }

    #[test]
    fn set_requires_positive_integer() {
        assert_eq!(parse_command("set 12"), Ok(Command::SetCounter(12)));
        assert_eq!(
            parse_command("set 0"),
            Err(InputError::NonPositiveCounter("0".into()))
        );
        assert_eq!(
            parse_command("set -4"),
            Err(InputError::NonPositiveCounter("-4".into()))
        );
        assert_eq!(
            parse_command("set ten"),
            Err(InputError::NotAnInteger("ten".into()))
        );
        assert_eq!(
            parse_command("set"),
            Err(InputError::MissingArgument("counter"))
        );
    }

    #[test]
    fn prefix_keeps_inner_spaces_and_can_be_cleared() {
        assert_eq!(
            parse_command("prefix my shot "),
            Ok(Command::Prefix("my shot ".into()))
        );
        assert_eq!(parse_command("prefix"), Ok(Command::Prefix(String::new())));
        assert_eq!(parse_command("suffix -x"), Ok(Command::Suffix("-x".into())));
    }

    #[test]
    fn path_is_required() {
        assert_eq!(
            parse_command("path  /tmp/shots "),
            Ok(Command::Path("/tmp/shots".into()))
        );
        assert_eq!(
            parse_command("path"),
            Err(InputError::MissingArgument("path"))
        );
    }

    #[test]
    fn region_accepts_commas_and_spaces() {
        assert_eq!(
            parse_region("-1920, 0, 800 600"),
            Ok(Region::new(-1920, 0, 800, 600))
        );
    }

    #[test]
    fn region_rejects_non_integers_and_wrong_arity() {
        assert_eq!(
            parse_region("0 0 10.5 10"),
            Err(InputError::NotAnInteger("10.5".into()))
        );
        assert_eq!(parse_region("0 0 10"), Err(InputError::RegionArity(3)));
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_command("snap now"),
            Err(InputError::UnknownCommand("snap".into()))
        );
    }
}
