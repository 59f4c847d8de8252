use anyhow::Result;
use clap::{Parser, Subcommand};
use docqa_core::config::ClientConfig;
use docqa_infrastructure::{ConfigService, DocqaPaths};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use app::App;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "docqa - ask questions about your documents", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.toml and DOCQA_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory used instead of ~/.config/docqa
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List your documents
    Documents,
    /// Upload a PDF or text file
    Upload { path: PathBuf },
    /// Ask a single question about a document
    Ask {
        document_id: String,
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive conversation
    Chat { document_id: Option<String> },
    /// Administrator views
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Aggregate counters
    Stats,
    /// All users
    Users,
    /// Documents of one user
    UserDocuments { user_id: String },
    /// Recent questions of one user
    UserQueries { user_id: String },
    /// All documents
    Documents,
    /// Recent questions across users
    Queries,
    /// Token usage per user
    Usage,
    /// Enable or disable a document
    Toggle { document_id: String },
}

fn load_config(paths: &DocqaPaths, api_url: Option<String>) -> Result<ClientConfig> {
    let mut config = ConfigService::new(paths)?.load()?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    Ok(config)
}

fn init_logging(paths: &DocqaPaths, level: &str) -> Option<WorkerGuard> {
    let logs_dir = paths.logs_dir().ok()?;
    std::fs::create_dir_all(&logs_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "docqa.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = DocqaPaths::new(cli.config_dir.as_deref());
    let config = load_config(&paths, cli.api_url)?;
    let _log_guard = init_logging(&paths, &config.log_level);

    let app = App::bootstrap(&paths, config)?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, password).await?,
        Commands::Signup { email, password } => {
            commands::auth::signup(&app, &email, password).await?
        }
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app),
        Commands::Documents => commands::documents::list(&app).await?,
        Commands::Upload { path } => commands::documents::upload(&app, &path).await?,
        Commands::Ask {
            document_id,
            question,
        } => commands::ask::run(&app, &document_id, &question.join(" ")).await?,
        Commands::Chat { document_id } => commands::chat::run(&app, document_id).await?,
        Commands::Admin { action } => commands::admin::run(&app, action).await?,
    }

    Ok(())
}
