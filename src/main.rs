use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_tracker::commands::{
    ConfigCommand, EventCommand, GuestCommand, TaskCommand, UserCommand,
};
use event_tracker::config::Config;
use event_tracker::db::EventDatabase;

#[derive(Parser)]
#[command(name = "event-tracker")]
#[command(version)]
#[command(about = "Track events, their tasks, and guest lists", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Act as this user (overrides config)
    #[arg(long, short, global = true)]
    user: Option<String>,

    /// Password for the acting user (otherwise EVENT_TRACKER_PASSWORD or a prompt)
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, log in, and manage accounts
    User(UserCommand),

    /// Manage events
    Event(EventCommand),

    /// Manage an event's tasks
    Task(TaskCommand),

    /// Manage an event's guest list
    Guest(GuestCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_tracker=error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?.with_username(cli.user);
    let password = cli.password.as_deref();

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    // Config inspection never opens the database
    if let Commands::Config(cmd) = &command {
        return cmd.run(&config);
    }

    let db = EventDatabase::open(config.database_path.value.clone()).await?;

    let result = match &command {
        Commands::User(cmd) => cmd.run(&db, &config, password).await,
        Commands::Event(cmd) => cmd.run(&db, &config, password).await,
        Commands::Task(cmd) => cmd.run(&db, &config, password).await,
        Commands::Guest(cmd) => cmd.run(&db, &config, password).await,
        Commands::Config(cmd) => cmd.run(&config),
    };

    db.close().await;
    result
}
