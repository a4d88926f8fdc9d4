//! Terminal driver.
//!
//! Loads a rendered listing page, then reads commands from stdin and prints
//! the page model after each one. The driver is the host: it owns the clock,
//! which only moves on `tick`.
//!
//! ```text
//! storyshelf <page.html> [preferences.json]
//! ```
//!
//! # Commands
//!
//! - `toggle`: toggle the theme
//! - `filter <genre>`: select a filter (`all` for everything)
//! - `key <combo>`: press a shortcut, e.g. `key alt+t`
//! - `system <light|dark>`: simulate an OS color-scheme change
//! - `tick <ms>`: advance the clock and fire due timers
//! - `notify <message>`: show an info banner
//! - `close <id>`: close a banner
//! - `quit`
//!
//! # Environment
//!
//! - `STORYSHELF_CONFIG`: TOML configuration file
//! - `STORYSHELF_COLOR_SCHEME`: initial OS scheme (`light` or `dark`)
//! - `RUST_LOG`: tracing filter

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use storyshelf::app::{KeyPress, NotificationId, NotificationKind};
use storyshelf::{handle_event, Action, AppState, ColorScheme, Config, Event, GenreFilter};

/// A parsed stdin line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Dispatch(Event),
    Advance(Duration),
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (verb, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let arg = arg.trim();

    let command = match verb {
        "" => return Ok(None),
        "toggle" => Command::Dispatch(Event::ToggleTheme),
        "filter" => Command::Dispatch(Event::SelectFilter(GenreFilter::from(arg))),
        "key" => {
            let press: KeyPress = arg.parse().map_err(|e| format!("{e}"))?;
            Command::Dispatch(Event::Key(press))
        }
        "system" => {
            let scheme: ColorScheme = arg.parse().map_err(|e| format!("{e}"))?;
            Command::Dispatch(Event::SystemSchemeChanged(scheme))
        }
        "tick" => {
            let ms: u64 = arg.parse().map_err(|_| format!("invalid milliseconds: {arg:?}"))?;
            Command::Advance(Duration::from_millis(ms))
        }
        "notify" if !arg.is_empty() => Command::Dispatch(Event::Notify {
            message: arg.to_string(),
            kind: NotificationKind::Info,
        }),
        "close" => {
            let id: u64 = arg.parse().map_err(|_| format!("invalid notification id: {arg:?}"))?;
            Command::Dispatch(Event::CloseNotification(NotificationId::from(id)))
        }
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other:?}")),
    };
    Ok(Some(command))
}

fn load_config() -> Config {
    let Some(path) = std::env::var_os("STORYSHELF_CONFIG") else {
        return Config::default();
    };
    Config::from_file(&path).unwrap_or_else(|e| {
        eprintln!("storyshelf: ignoring config {}: {e}", path.to_string_lossy());
        Config::default()
    })
}

fn system_scheme() -> ColorScheme {
    std::env::var("STORYSHELF_COLOR_SCHEME")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

fn execute_actions(actions: &[Action], out: &mut impl Write) -> io::Result<()> {
    for action in actions {
        match action {
            Action::ScheduleWake(at) => writeln!(out, "(next timer at {}ms)", at.as_millis())?,
            Action::Focus(id) => writeln!(out, "(focus #{id})")?,
        }
    }
    Ok(())
}

fn run(state: &mut AppState, input: impl BufRead, out: &mut impl Write) -> storyshelf::Result<()> {
    storyshelf::ui::render(state, out)?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        let event = match command {
            Command::Quit => break,
            Command::Advance(by) => Event::Tick(state.now + by),
            Command::Dispatch(event) => event,
        };

        let (render, actions) = handle_event(state, &event);
        execute_actions(&actions, out)?;
        if render {
            storyshelf::ui::render(state, out)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = load_config();
    storyshelf::observability::init_tracing(&config);

    let mut args = std::env::args().skip(1);
    let Some(page) = args.next() else {
        eprintln!("usage: storyshelf <page.html> [preferences.json]");
        return ExitCode::from(2);
    };

    let config = match args.next() {
        Some(path) => Config {
            preferences_path: Some(path),
            ..config
        },
        None => config,
    };

    let html = match std::fs::read_to_string(&page) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("storyshelf: cannot read {page}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _span = tracing::debug_span!("storyshelf_main", page = %page).entered();
    let prefs = storyshelf::open_preferences(&config);
    let mut state = storyshelf::initialize(&config, &html, prefs, system_scheme());

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(&mut state, stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "driver stopped");
            eprintln!("storyshelf: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command("toggle").unwrap(), Some(Command::Dispatch(Event::ToggleTheme)));
        assert_eq!(
            parse_command("filter Drama").unwrap(),
            Some(Command::Dispatch(Event::SelectFilter(GenreFilter::from("drama"))))
        );
        assert_eq!(
            parse_command("tick 250").unwrap(),
            Some(Command::Advance(Duration::from_millis(250)))
        );
        assert_eq!(
            parse_command("key alt+t").unwrap(),
            Some(Command::Dispatch(Event::Key(KeyPress::alt('t'))))
        );
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
        assert!(parse_command("tick soon").is_err());
        assert!(parse_command("dance").is_err());
    }
}
