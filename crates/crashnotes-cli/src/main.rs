//! crashnotes CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "crashnotes",
    version,
    about = "AI-generated crash courses and quizzes"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the recent-topics cache
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a crash course on a topic
    Learn {
        /// What you want to learn
        topic: String,

        /// Ask for free-form prose instead of a structured course
        #[arg(long)]
        narrative: bool,
    },

    /// Take a multiple-choice quiz on a topic
    Quiz {
        /// Quiz subject
        topic: String,
    },

    /// List recently generated courses
    Recent,

    /// Show a cached course without calling the API
    Recall {
        /// Topic name or its number in `crashnotes recent`
        topic: String,
    },

    /// Re-open the last course you looked at
    Resume,

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crashnotes=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::ContextArgs {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Learn { topic, narrative } => {
            commands::learn::execute(&ctx, topic, narrative).await
        }
        Commands::Quiz { topic } => commands::quiz::execute(&ctx, topic).await,
        Commands::Recent => commands::recent::list(&ctx),
        Commands::Recall { topic } => commands::recent::recall(&ctx, topic),
        Commands::Resume => commands::recent::resume(&ctx),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
