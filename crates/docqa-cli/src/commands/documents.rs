use anyhow::Result;
use colored::Colorize;
use docqa_core::document::DocumentSummary;
use docqa_core::route::Route;
use std::path::Path;

use crate::app::App;

pub fn print_documents(documents: &[DocumentSummary]) {
    if documents.is_empty() {
        println!("{}", "No documents yet. Upload one with `docqa upload <file>`.".bright_black());
        return;
    }
    for doc in documents {
        let name = if doc.is_ready() {
            doc.display_name().bright_white()
        } else {
            doc.display_name().bright_black()
        };
        let flag = if doc.enabled { "" } else { " (disabled)" };
        println!(
            "{}  {}{}",
            name,
            format!("[{}] {}", doc.status, doc.document_id).bright_black(),
            flag.yellow()
        );
    }
}

pub async fn list(app: &App) -> Result<()> {
    app.enter(Route::Dashboard)?;
    let documents = app.registry.refresh().await;
    app.ensure_still_allowed()?;
    print_documents(&documents?);
    Ok(())
}

pub async fn upload(app: &App, path: &Path) -> Result<()> {
    app.enter(Route::Dashboard)?;
    let receipt = app.registry.upload(path).await;
    app.ensure_still_allowed()?;
    let receipt = receipt?;

    println!("{}", format!("Uploaded {}", receipt.filename).bright_green());
    if let Some(id) = &receipt.document_id {
        println!("{}", format!("  document id: {}", id).bright_black());
    }
    if let Some(chunks) = receipt.total_chunks {
        println!("{}", format!("  chunks: {}", chunks).bright_black());
    }
    Ok(())
}
