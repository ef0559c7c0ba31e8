mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fluorite")]
#[command(about = "Provision managed databases and blob stores for generated projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create databases for dev, staging and prod
    Provision {
        /// Database provider (turso, supabase)
        #[arg(short, long)]
        provider: String,

        /// Project name; database names default to <project>-<env>
        #[arg(long)]
        project: String,

        /// Skip all provider calls and report success
        #[arg(long)]
        skip: bool,

        /// Reuse databases that already exist instead of failing
        #[arg(long = "preserve-existing")]
        preserve_existing: bool,

        /// Per-call timeout for provider CLI invocations
        #[arg(long, default_value = "120")]
        timeout_secs: u64,

        /// Print the resulting report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate a credentials bundle stored as JSON
    Validate {
        /// Path to a DatabaseCredentials JSON file
        file: std::path::PathBuf,

        /// Token length below which a warning is emitted
        #[arg(long, default_value = "32")]
        min_token_len: usize,
    },
    /// Vercel Blob store operations
    Blob {
        #[command(subcommand)]
        command: BlobCommands,
    },
}

#[derive(Subcommand)]
enum BlobCommands {
    /// Create a Blob store
    Create {
        /// Store name
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Provision {
            provider,
            project,
            skip,
            preserve_existing,
            timeout_secs,
            json,
        } => {
            commands::provision::handle(
                &provider,
                &project,
                skip,
                preserve_existing,
                timeout_secs,
                json,
            )
            .await
        }
        Commands::Validate {
            file,
            min_token_len,
        } => commands::validate::handle(&file, min_token_len),
        Commands::Blob { command } => match command {
            BlobCommands::Create { name } => commands::blob::handle_create(&name).await,
        },
    }
}
