//! Interactive shell.
//!
//! One process, one tab scope: a login without `--remember` and every local
//! candidate edit last until the shell exits.

use super::Command;
use crate::app::{App, is_session_expiry};
use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

const COMMANDS: &[&str] = &[
    "alerts",
    "assignments",
    "candidates",
    "dashboard",
    "documents",
    "email",
    "exit",
    "expenses",
    "help",
    "import",
    "jobs",
    "login",
    "logout",
    "matches",
    "quit",
    "signup",
    "whoami",
];

#[derive(Parser, Debug)]
#[command(name = "staffline", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// Completion and hints for the first word of a line.
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split_whitespace().next().unwrap_or_default();
        if COMMANDS.contains(&first) {
            Owned(line.replacen(first, &first.bright_cyan().to_string(), 1))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

/// Splits a shell line into words. Single and double quotes group words.
pub fn split_args(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        bail!("Unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn prompt(app: &App) -> String {
    match app.auth.current_user() {
        Some(user) if app.auth.is_authenticated() => {
            format!("[{}] staffline> ", user.initials())
        }
        _ => "staffline> ".to_string(),
    }
}

pub async fn run(app: &mut App) -> Result<()> {
    app.interactive = true;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHelper));

    println!("{}", "=== Staffline shell ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for commands, 'quit' to exit. Local edits are kept until you exit."
            .bright_black()
    );

    loop {
        match rl.readline(&prompt(app)) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let words = match split_args(trimmed) {
                    Ok(words) => words,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };
                let parsed = match ShellLine::try_parse_from(words) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        let _ = e.print();
                        continue;
                    }
                };

                if let Err(e) = super::run(app, parsed.command).await {
                    if !is_session_expiry(&e) {
                        eprintln!("{}", format!("Error: {e:#}").red());
                    }
                }
                app.sync_session();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    let pending = app.candidates.pending_edits().len();
    if pending > 0 {
        println!(
            "{}",
            format!("Discarding {pending} unsynced candidate edit(s).").yellow()
        );
    }
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
