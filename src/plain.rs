use anyhow::Result;
use std::fmt::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::error;

use crate::debounce::Debounced;
use crate::tui::state::{row_label, saved_label};
use crate::widget::{SearchWidget, SelectOutcome, SharedWidget, handle_input};

const HELP: &str = "Type text to search. Commands:\n:pick <n>  save autocomplete row n\n:rm <n>    remove saved entry n\n:list      show rows and saved entries\n:help      show this help\n:quit      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Pick(usize),
    Remove(usize),
    List,
    Help,
    Quit,
    Usage(&'static str),
}

/// `None` means the line is search input, not a command.
fn parse_command(line: &str) -> Option<Command> {
    let rest = line.trim().strip_prefix(':')?;
    let mut parts = rest.split_whitespace();
    let cmd = match parts.next().unwrap_or("") {
        "pick" => match parts.next().and_then(|s| s.parse::<usize>().ok()) {
            Some(n) if n > 0 => Command::Pick(n - 1),
            _ => Command::Usage("usage: :pick <n>"),
        },
        "rm" => match parts.next().and_then(|s| s.parse::<usize>().ok()) {
            Some(n) if n > 0 => Command::Remove(n - 1),
            _ => Command::Usage("usage: :rm <n>"),
        },
        "list" => Command::List,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Usage("unknown command; :help lists them"),
    };
    Some(cmd)
}

/// Text dump of the widget: notices, rows, saved entries.
pub fn format_snapshot(widget: &SearchWidget) -> String {
    let mut out = String::new();
    for notice in widget.notices().all() {
        let _ = writeln!(out, "! {}", notice.text);
    }
    if widget.autocomplete().is_empty() {
        let _ = writeln!(out, "(no results)");
    }
    for (i, row) in widget.autocomplete().rows().iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, row_label(row));
    }
    let _ = writeln!(
        out,
        "saved ({}/{}):",
        widget.saved().len(),
        widget.saved().capacity()
    );
    for (i, repo) in widget.saved().entries().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, saved_label(repo));
    }
    out
}

fn apply_command(widget: &mut SearchWidget, cmd: &Command) -> Option<String> {
    let now = Instant::now();
    widget.sweep_notices(now);
    match cmd {
        Command::Pick(row) => Some(match widget.add_selected(*row, now) {
            SelectOutcome::Inert => format!("no row {}", row + 1),
            SelectOutcome::Duplicate | SelectOutcome::Added | SelectOutcome::Evicted(_) => {
                format_snapshot(widget)
            }
        }),
        Command::Remove(index) => Some(match widget.remove_saved(*index) {
            Some(_) => format_snapshot(widget),
            None => format!("no saved entry {}", index + 1),
        }),
        Command::List => Some(format_snapshot(widget)),
        Command::Help => Some(HELP.to_string()),
        Command::Usage(msg) => Some((*msg).to_string()),
        Command::Quit => None,
    }
}

/// Drops handles of refreshes that already finished.
fn reap_finished(tasks: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while tasks.try_join_next().is_some() {
        reaped += 1;
    }
    reaped
}

/// Line-oriented driver: every stdin line is one input event.
pub async fn run_plain(widget: SharedWidget, mut trigger: Debounced<String, Result<()>>) -> Result<()> {
    println!("repo-finder (plain) - type to search, :help for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        reap_finished(&mut tasks);
        if let Some(cmd) = parse_command(&line) {
            let mut w = widget.lock().await;
            match apply_command(&mut w, &cmd) {
                Some(text) => println!("{}", text.trim_end()),
                None => {
                    trigger.cancel();
                    return Ok(());
                }
            }
            continue;
        }

        widget.lock().await.set_input(line.clone());
        let deferred = trigger.call(line);
        let widget = widget.clone();
        tasks.spawn(async move {
            match handle_input(deferred, &widget).await {
                Ok(true) => {
                    let mut w = widget.lock().await;
                    w.sweep_notices(Instant::now());
                    println!("{}", format_snapshot(&w).trim_end());
                }
                Ok(false) => {}
                Err(e) => {
                    error!("unhandled failure in search pipeline: {e:#}");
                    eprintln!("unexpected failure: {e:#}");
                }
            }
        });
    }

    // Input closed: let the last refresh land before exiting.
    while tasks.join_next().await.is_some() {}
    Ok(())
}
