use anyhow::{Result, bail};
use colored::Colorize;
use docqa_application::HistoryOutcome;
use docqa_core::route::Route;

use crate::app::App;
use crate::commands::print_outcome;

/// One-shot question: select the document, send, wait for the answer.
pub async fn run(app: &App, document_id: &str, question: &str) -> Result<()> {
    app.enter(Route::Chat {
        document_id: document_id.to_string(),
    })?;

    if let HistoryOutcome::Failed(error) = app.conversation.select(document_id).await {
        eprintln!("{}", format!("Could not load history: {}", error).yellow());
    }
    app.ensure_still_allowed()?;

    println!("{}", format!("> {}", question.trim()).green());
    let outcome = app.conversation.send(question)?.await;
    app.ensure_still_allowed()?;

    if !print_outcome(&outcome) {
        bail!("the question could not be answered");
    }
    Ok(())
}
