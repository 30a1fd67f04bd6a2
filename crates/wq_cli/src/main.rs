use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use wq_core::{Error, QuizStatus, Result};
use wq_inference::{QuizGenerator, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_BASE_URL};
use wq_scraper::{init_logging, HttpFetcher, QuizManager};
use wq_storage::StorageKind;
use wq_web::AppState;

#[derive(Parser, Debug)]
#[command(name = "wikiquiz", author, version, about = "Turn Wikipedia articles into quizzes", long_about = None)]
pub struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, default_value = "sqlite")]
    storage: StorageKind,
    /// SQLite database file
    #[arg(long, default_value = "wikiquiz.db")]
    database: PathBuf,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,
    /// Skip the model and always serve the built-in quiz
    #[arg(long, env = "USE_MOCK_LLM", action = clap::ArgAction::SetTrue, value_parser = parse_switch)]
    mock: bool,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Generate (or fetch the stored) quiz for a Wikipedia URL
    Generate { url: String },
    /// List processed articles, newest first
    History {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Print a stored quiz
    Quiz { id: i64 },
}

/// Only a case-insensitive `true` turns a switch on; any other value leaves it off.
fn parse_switch(value: &str) -> std::result::Result<bool, std::convert::Infallible> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

impl Cli {
    fn inference_config(&self) -> wq_inference::Config {
        wq_inference::Config {
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
            temperature: self.temperature,
            use_mock: self.mock,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

async fn build_manager(cli: &Cli) -> Result<QuizManager> {
    let storage = wq_storage::create_storage(cli.storage, &cli.database)
        .await
        .with_context(|| format!("Failed to open {} storage at {}", cli.storage, cli.database.display()))?;

    let config = cli.inference_config();
    let generator = QuizGenerator::from_config(&config)?;
    if config.use_mock {
        info!("🧪 Mock mode enabled, the model will not be called");
    } else {
        info!("🧠 Inference model initialized (using {} / {})", generator.model_name(), config.model_name);
    }

    let fetcher = Arc::new(HttpFetcher::new().context("Failed to build the page fetcher")?);
    Ok(QuizManager::new(fetcher, generator, storage))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    let manager = build_manager(&cli).await?;

    match cli.command {
        Commands::Serve { ref host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .map_err(|e| Error::Config(format!("Invalid listen address {}:{}: {}", host, port, e)))?;
            wq_web::serve(AppState::new(Arc::new(manager)), addr).await?;
        }
        Commands::Generate { ref url } => {
            let (quiz, status) = manager.generate(url).await?;
            let emoji = match status {
                QuizStatus::Generated => "🆕",
                QuizStatus::Cached => "⏭️",
            };
            info!("{} Quiz {} - {}", emoji, quiz.id, quiz.title);
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }
        Commands::History { skip, limit } => {
            for article in manager.history(skip, limit).await? {
                println!(
                    "{:>5}  {}  {}  {}",
                    article.id,
                    article.created_at.format("%Y-%m-%d %H:%M:%S"),
                    article.title,
                    article.url
                );
            }
        }
        Commands::Quiz { id } => {
            let quiz = manager.quiz(id).await?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }
    }

    Ok(())
}
