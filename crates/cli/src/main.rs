mod commands;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use lessonhub_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lessonhub")]
#[command(about = "AI lesson service: topic-scoped questions, generated lessons, history", long_about = None)]
struct Cli {
    /// PostgreSQL connection string; an in-memory store is used when absent.
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API. Without DATABASE_URL the in-memory store is seeded
    /// with the default taxonomy on start.
    Serve {
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Create this admin on start unless the phone is already registered.
        #[arg(long, env = "LESSONHUB_ADMIN_PHONE")]
        admin_phone: Option<String>,
        #[arg(long, env = "LESSONHUB_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: Option<String>,
        #[arg(long, env = "LESSONHUB_ADMIN_NAME", default_value = "Admin")]
        admin_name: String,
    },
    /// Insert the default categories and subcategories.
    Seed,
    /// Print platform statistics as JSON.
    Stats,
    /// Create an admin account.
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "LESSONHUB_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

impl Commands {
    /// One-shot commands write to their own process; an in-memory store
    /// would vanish on exit.
    const fn needs_database(&self) -> bool {
        !matches!(self, Self::Serve { .. })
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Serve { .. } => "serve",
            Self::Seed => "seed",
            Self::Stats => "stats",
            Self::CreateAdmin { .. } => "create-admin",
        }
    }
}

async fn open_storage(database_url: Option<&str>) -> Result<Arc<StorageBackend>> {
    let backend = match database_url {
        Some(url) => StorageBackend::new_postgres(url).await?,
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on exit)");
            StorageBackend::new_memory()
        },
    };
    tracing::info!(backend = backend.kind(), "storage ready");
    Ok(Arc::new(backend))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let database_url = cli.database_url.as_deref().filter(|u| !u.trim().is_empty());
    if database_url.is_none() && cli.command.needs_database() {
        bail!(
            "`{}` needs DATABASE_URL; the in-memory store does not outlive this process",
            cli.command.name()
        );
    }
    let storage = open_storage(database_url).await?;

    match cli.command {
        Commands::Serve { port, host, admin_phone, admin_password, admin_name } => {
            let admin = match (admin_phone, admin_password) {
                (Some(phone), Some(password)) => Some(commands::admin::AdminAccount {
                    name: admin_name,
                    phone,
                    password,
                }),
                (None, None) => None,
                _ => bail!("--admin-phone and --admin-password must be given together"),
            };
            commands::serve::run(storage, port, host, admin).await
        },
        Commands::Seed => commands::seed::run(storage).await,
        Commands::Stats => commands::stats::run(storage).await,
        Commands::CreateAdmin { name, phone, password } => {
            let account = commands::admin::AdminAccount { name, phone, password };
            commands::admin::create_admin(storage, account).await
        },
    }
}
