//! Main Entrypoint for the EasyStory command-line client
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Wiring the config loader, storage bootstrapper and story client.
//! 4. Running the requested subcommand and printing its JSON result.

use anyhow::Context;
use clap::{Parser, Subcommand};
use easystory_cli::{
    commands::{self, App},
    config::Config,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "easystory", version, about = "Generate and store educational stories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a story from form fields.
    Generate {
        /// Subject the story should teach.
        #[arg(long)]
        subject: String,
        /// Academic grade of the reader.
        #[arg(long = "grade")]
        academic_grade: String,
        /// Additional form field as key=value. May be repeated.
        #[arg(long = "field", value_parser = commands::parse_field)]
        fields: Vec<(String, String)>,
        /// Store the generated story.
        #[arg(long)]
        save: bool,
    },
    /// List stored stories, newest first.
    List,
    /// Show the loaded runtime configuration.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    info!(origin = %config.origin, "Configuration loaded");

    // --- 3. Wire the client layer ---
    let app = App::new(&config);

    // --- 4. Run ---
    let output = match cli.command {
        Command::Generate {
            subject,
            academic_grade,
            fields,
            save,
        } => {
            let form_data = commands::build_form_data(&subject, &academic_grade, &fields);
            let outcome = commands::generate(&app, &form_data, save).await?;
            match outcome.saved {
                Some(record) => serde_json::json!({ "story": outcome.story, "saved": record }),
                None => outcome.story,
            }
        }
        Command::List => commands::list(&app).await?,
        Command::Config => commands::describe_config(&app).await,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
