use anyhow::Result;
use colored::Colorize;
use docqa_core::admin::{AdminDocument, AdminQuery};
use docqa_core::route::{AdminPage, Route};

use crate::AdminAction;
use crate::app::App;

fn page_for(action: &AdminAction) -> AdminPage {
    match action {
        AdminAction::Stats => AdminPage::Overview,
        AdminAction::Users => AdminPage::Users,
        AdminAction::UserDocuments { user_id } | AdminAction::UserQueries { user_id } => {
            AdminPage::UserDetail {
                user_id: user_id.clone(),
            }
        }
        AdminAction::Documents | AdminAction::Toggle { .. } => AdminPage::Documents,
        AdminAction::Queries => AdminPage::Queries,
        AdminAction::Usage => AdminPage::Usage,
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn print_documents(documents: &[AdminDocument]) {
    for doc in documents {
        let state = if doc.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        };
        println!(
            "{}  {}  {}  {}",
            doc.id.bright_black(),
            doc.filename,
            state,
            or_dash(&doc.user_email).bright_black()
        );
    }
}

fn print_queries(queries: &[AdminQuery]) {
    for query in queries {
        println!(
            "{} {}",
            or_dash(&query.created_at).bright_black(),
            or_dash(&query.user_email).bright_black()
        );
        println!("  {}", format!("Q: {}", query.question).green());
        if let Some(answer) = &query.answer {
            println!("  {}", format!("A: {}", answer).bright_blue());
        }
    }
}

pub async fn run(app: &App, action: AdminAction) -> Result<()> {
    app.enter(Route::Admin(page_for(&action)))?;

    let result = execute(app, action).await;
    app.ensure_still_allowed()?;
    result
}

async fn execute(app: &App, action: AdminAction) -> Result<()> {
    match action {
        AdminAction::Stats => {
            let stats = app.admin.stats().await?;
            println!("{}", "=== Overview ===".bright_magenta().bold());
            println!("Users:            {}", stats.total_users);
            println!("Documents:        {}", stats.total_documents);
            println!("Active documents: {}", stats.active_documents);
            println!("Queries:          {}", stats.total_queries);
            println!("Queries today:    {}", stats.queries_today);
            println!("Tokens:           {}", stats.total_tokens);
        }
        AdminAction::Users => {
            for user in app.admin.users().await? {
                println!(
                    "{}  {} ({})  docs: {}  queries: {}  last login: {}",
                    user.id.bright_black(),
                    user.email,
                    user.role,
                    user.document_count,
                    user.query_count,
                    or_dash(&user.last_login)
                );
            }
        }
        AdminAction::UserDocuments { user_id } => {
            print_documents(&app.admin.user_documents(&user_id).await?)
        }
        AdminAction::UserQueries { user_id } => {
            print_queries(&app.admin.user_queries(&user_id).await?)
        }
        AdminAction::Documents => print_documents(&app.admin.documents().await?),
        AdminAction::Queries => print_queries(&app.admin.queries().await?),
        AdminAction::Usage => {
            for entry in app.admin.usage().await? {
                println!("{:>10}  {}", entry.tokens, or_dash(&entry.user_email));
            }
        }
        AdminAction::Toggle { document_id } => {
            let result = app.admin.toggle_document(&document_id).await?;
            let state = if result.enabled { "enabled" } else { "disabled" };
            println!(
                "{}",
                format!("Document {} is now {}", result.document_id, state).bright_green()
            );
        }
    }
    Ok(())
}
