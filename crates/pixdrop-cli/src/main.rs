//! Pixdrop CLI: upload images through the presigned two-phase pipeline.
//!
//! Reads PIXDROP_API_URL (or API_URL) and PIXDROP_API_KEY (or API_KEY); a `.env`
//! file is honored. Results are printed to stdout as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pixdrop_cli::{init_tracing, truncate_string, ValidationReport};
use pixdrop_core::{UploadFile, UploadRequest, UploaderConfig};
use pixdrop_uploader::{generate_preview, Uploader};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixdrop", about = "Direct-to-storage image uploads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more images
    Upload {
        /// Paths of the images to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Name sent to the backend instead of the file name (single file only)
        #[arg(long)]
        name: Option<String>,
    },
    /// Check an image against the upload rules without uploading it
    Validate {
        file: PathBuf,
        /// Size limit in bytes (defaults to the configured limit)
        #[arg(long)]
        max_bytes: Option<u64>,
    },
    /// Print the data URI preview of an image
    Preview {
        file: PathBuf,
        /// Truncate the output to this many characters
        #[arg(long)]
        truncate: Option<usize>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn load_file(path: &Path) -> anyhow::Result<UploadFile> {
    UploadFile::from_path(path)
        .await
        .with_context(|| format!("Open {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = UploaderConfig::from_env()?;

    match cli.command {
        Commands::Upload { files, name } => {
            if name.is_some() && files.len() > 1 {
                anyhow::bail!("--name can only be used when uploading a single file");
            }

            let uploader = Uploader::from_config(&config)?;
            let mut loaded = Vec::with_capacity(files.len());
            for path in &files {
                loaded.push(load_file(path).await?);
            }

            if loaded.len() == 1 {
                let file = loaded.remove(0);
                let state = uploader.upload(UploadRequest::with_name(file, name)).await;
                print_json(&state)?;
                if state.result().is_none() {
                    std::process::exit(1);
                }
            } else {
                let batch = uploader.upload_batch(loaded).await;
                print_json(&batch)?;
                if !batch.all_succeeded() {
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate { file, max_bytes } => {
            let file = load_file(&file).await?;
            let limit = max_bytes.unwrap_or_else(|| config.max_file_size_bytes());
            let report = ValidationReport::check(&file, limit);
            print_json(&report)?;
            if !report.valid {
                std::process::exit(1);
            }
        }
        Commands::Preview { file, truncate } => {
            let file = load_file(&file).await?;
            let uri = generate_preview(&file).await?;
            tracing::debug!(file_name = %file.name, length = uri.len(), "Generated preview");
            match truncate {
                Some(max_len) => println!("{}", truncate_string(&uri, max_len)),
                None => println!("{}", uri),
            }
        }
    }

    Ok(())
}
