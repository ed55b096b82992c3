//! MyBookmarks administration CLI.
//!
//! Provisions accounts and maintains the database the RPC server runs against.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mybookmarks::app::App;
use mybookmarks::logging::init_tracing;
use mybookmarks::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

#[derive(Parser, Debug)]
#[command(name = "mybookmarks", version, about = "Manage MyBookmarks accounts and data")]
struct Cli {
    /// Configuration file (defaults to $MYBOOKMARKS_CONFIG or ./mybookmarks.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and its schema
    Init,
    /// Create an account seeded with a starter bookmark
    AddUser { username: String },
    /// Remove an account with all of its bookmarks and categories
    DeleteUser { username: String },
    /// Renumber a user's bookmark positions to 1..N in their current order
    Reconcile { username: String },
    /// Inspect or change the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective settings and the file they come from
    Show,
    /// Set one value by dotted key, e.g. `store.timeout_secs 5`
    Set { key: String, value: String },
    /// Overwrite the file with defaults
    Reset,
}

/// Command-line values are JSON when they parse as JSON, plain strings otherwise.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn run_config(mut engine: SettingsEngine, command: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ConfigCommand::Show => {
            let settings = engine.load()?;
            println!("# {}", engine.get_config_path());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigCommand::Set { key, value } => {
            engine.load()?;
            engine.set_value(&key, parse_value(&value))?;
            println!("Set {} in {}", key, engine.get_config_path());
        }
        ConfigCommand::Reset => {
            engine.reset()?;
            println!("Reset {}", engine.get_config_path());
        }
    }
    Ok(())
}

/// Opens the database named by the loaded settings and starts logging.
fn open_app(engine: &mut SettingsEngine) -> Result<App, Box<dyn std::error::Error>> {
    let settings = engine.load()?;
    init_tracing(&settings.logging.filter);
    Ok(App::new(settings)?)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = SettingsEngine::new(cli.config);

    match cli.command {
        Command::Init => {
            let app = open_app(&mut engine)?;
            println!("Database ready at {}", app.settings.database.path);
        }
        Command::AddUser { username } => {
            let app = open_app(&mut engine)?;
            let id = app.users.add_user(&username).await?;
            println!("Created user {} (id {})", username.trim().to_lowercase(), id);
        }
        Command::DeleteUser { username } => {
            let app = open_app(&mut engine)?;
            app.users.delete_user(&username).await?;
            println!("Deleted user {}", username.trim().to_lowercase());
        }
        Command::Reconcile { username } => {
            let app = open_app(&mut engine)?;
            let user = app
                .users
                .find_user(&username)
                .await?
                .ok_or_else(|| format!("User not found: {}", username))?;
            let moved = app.bookmarks.reconcile_sequence(user.id).await?;
            println!("Reconciled {} ({} bookmarks moved)", user.username, moved);
        }
        Command::Config(command) => run_config(engine, command)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
