//! drivedrop — upload a file to Google Drive through a drivedrop server.
//!
//! Set DRIVEDROP_URL (default http://localhost:3000) and, to upload as yourself,
//! DRIVEDROP_ACCESS_TOKEN with a Google access token for the drive.file scope.

use anyhow::Context;
use clap::{Parser, Subcommand};
use drivedrop_cli::{guess_mime_type, init_tracing};
use drivedrop_client::{ApiClient, FormController, SelectedFile, StaticToken, SubmitStatus};

#[derive(Parser)]
#[command(name = "drivedrop", about = "Upload files to Google Drive and get notified by email")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "DRIVEDROP_URL", default_value = "http://localhost:3000", global = true)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one file and request an email confirmation
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Address to notify once the file is stored
        #[arg(long)]
        email: String,
        /// Google access token (drive.file scope)
        #[arg(long, env = "DRIVEDROP_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// MIME type to declare; guessed from the extension when omitted
        #[arg(long)]
        mime_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.url).context("Failed to create API client")?;

    match cli.command {
        Commands::Upload {
            file,
            email,
            token,
            mime_type,
        } => {
            let mime_type = mime_type.or_else(|| guess_mime_type(&file));
            let mut selected = SelectedFile::new(file);
            if let Some(mime) = mime_type {
                selected = selected.with_mime_type(mime);
            }

            let mut form = FormController::new(StaticToken::new(token), client);
            if !form.authorize().await {
                anyhow::bail!(
                    "{} Set DRIVEDROP_ACCESS_TOKEN or pass --token.",
                    form.message()
                );
            }
            form.select_file(selected);
            form.set_email(email);

            let status = form.submit().await.clone();
            match status {
                SubmitStatus::Succeeded => {
                    println!("{}", form.message());
                }
                _ => anyhow::bail!("{}", form.message()),
            }
        }
    }

    Ok(())
}
