//! Interactive conversation REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use docqa_application::{HistoryOutcome, SendOutcome};
use docqa_core::chat::{HistoryStatus, PENDING_ANSWER};
use docqa_core::route::Route;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use crate::app::App;
use crate::commands::documents::print_documents;
use crate::commands::print_message;

const COMMANDS: &[&str] = &["/open", "/docs", "/reload", "/quit"];

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
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

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// What the user typed.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Docs,
    Reload,
    Open(&'a str),
    Question(&'a str),
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Option<Input<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let input = match trimmed.split_once(char::is_whitespace) {
        _ if matches!(trimmed, "/quit" | "quit" | "exit") => Input::Quit,
        _ if trimmed == "/docs" => Input::Docs,
        _ if trimmed == "/reload" => Input::Reload,
        Some(("/open", id)) if !id.trim().is_empty() => Input::Open(id.trim()),
        _ if trimmed.starts_with('/') => Input::Unknown(trimmed),
        _ => Input::Question(trimmed),
    };
    Some(input)
}

/// Selects `document_id` and prints its history once loaded.
async fn open(app: &App, document_id: &str) -> Result<()> {
    app.enter(Route::Chat {
        document_id: document_id.to_string(),
    })?;

    let title = app
        .registry
        .find(document_id)
        .map(|d| d.display_name().to_string())
        .unwrap_or_else(|| document_id.to_string());
    println!("{}", format!("=== {} ===", title).bright_magenta().bold());

    let outcome = app.conversation.select(document_id).await;
    print_history(app, &outcome);
    Ok(())
}

fn print_history(app: &App, outcome: &HistoryOutcome) {
    let Some(state) = app.conversation.snapshot() else {
        return;
    };
    match &state.history {
        HistoryStatus::Failed { message } => {
            println!(
                "{}",
                format!("Could not load history: {} (type /reload to retry)", message).red()
            );
        }
        _ if state.messages.is_empty() => {
            println!("{}", "No messages yet. Ask a question to start.".bright_black());
        }
        _ => state.messages.iter().for_each(print_message),
    }
    if matches!(outcome, HistoryOutcome::Discarded) {
        tracing::debug!("[Chat] History load superseded");
    }
}

pub async fn run(app: &App, document_id: Option<String>) -> Result<()> {
    match &document_id {
        Some(id) => {
            if let Err(e) = app.registry.refresh().await {
                tracing::warn!("[Chat] Document list unavailable: {}", e);
            }
            open(app, id).await?;
        }
        None => {
            app.enter(Route::Dashboard)?;
            print_documents(&app.registry.refresh().await?);
        }
    }
    app.ensure_still_allowed()?;
    tracing::info!("[Chat] Session started against {}", app.config.base_url());

    // Answers arrive on background tasks and are printed by one handler.
    let (response_tx, mut response_rx) = mpsc::channel::<SendOutcome>(32);
    let response_handler = tokio::spawn(async move {
        while let Some(outcome) = response_rx.recv().await {
            match outcome {
                SendOutcome::Resolved(message) => print_message(&message),
                SendOutcome::Failed { message, error } => {
                    print_message(&message);
                    tracing::debug!("[Chat] {}", error);
                }
                SendOutcome::Discarded => {
                    println!("{}", "(answer for a closed conversation dropped)".bright_black());
                }
            }
        }
    });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!(
        "{}",
        "Ask a question, '/open <documentId>' to switch, '/docs' to list, '/quit' to exit."
            .bright_black()
    );

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };
        let Some(input) = parse_input(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.as_str());

        match input {
            Input::Quit => break,
            Input::Docs => match app.registry.refresh().await {
                Ok(documents) => print_documents(&documents),
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            Input::Reload => match app.conversation.reload() {
                Ok(load) => {
                    let outcome = load.await;
                    print_history(app, &outcome);
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            Input::Open(id) => {
                if let Err(e) = open(app, id).await {
                    eprintln!("{}", e.to_string().red());
                }
            }
            Input::Unknown(cmd) => println!("{}", format!("Unknown command {}", cmd).bright_black()),
            Input::Question(question) => match app.conversation.send(question) {
                Ok(pending) => {
                    println!("{}", PENDING_ANSWER.bright_black());
                    let tx = response_tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(pending.await).await;
                    });
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
        }

        if let Err(e) = app.ensure_still_allowed() {
            eprintln!("{}", e.to_string().red());
            break;
        }
    }

    app.conversation.close();
    drop(response_tx);
    let _ = response_handler.await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
