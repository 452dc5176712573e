//! Suno - Automated Hinglish Caption Pipeline
//!
//! This is the main entry point for the suno application, which transcribes
//! Hinglish speech into word-level timed captions using an external whisper
//! engine, corrects transliteration errors through the Groq API, and uploads
//! rendered videos via rclone.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use suno::cli::{Args, Commands};
use suno::config::Config;
use suno::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting suno - Hinglish caption pipeline");

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Map ambient environment into explicit configuration once, here;
    // components never read the environment themselves.
    apply_env_overrides(&mut config);

    // Execute command
    match args.command {
        Commands::Transcribe { input, output, model, language } => {
            info!("Transcribing audio: {}", input.display());

            if let Some(model) = model {
                config.transcriber.model = model;
            }

            let workflow = Workflow::new(config)?;
            workflow.transcribe_audio(&input, &output, language.as_deref()).await?;
        }
        Commands::Enhance { input, output, api_key, confidence_threshold } => {
            info!("Enhancing captions: {}", input.display());

            if let Some(api_key) = api_key {
                config.enhance.api_key = Some(api_key);
            }
            if let Some(threshold) = confidence_threshold {
                config.enhance.confidence_threshold = threshold;
            }

            let workflow = Workflow::new(config)?;
            workflow.enhance_captions(&input, output.as_deref()).await?;
        }
        Commands::Upload { input, folder_id, remote } => {
            info!("Uploading video: {}", input.display());

            if let Some(remote) = remote {
                config.upload.remote = remote;
            }

            let workflow = Workflow::new(config)?;
            let receipt = workflow.upload_video(&input, &folder_id).await?;
            println!("Uploaded as {} to folder {}", receipt.file_name, receipt.folder_id);
        }
        Commands::Process { input, output_dir, model, language } => {
            info!("Processing audio file: {}", input.display());

            if let Some(model) = model {
                config.transcriber.model = model;
            }

            let workflow = Workflow::new(config)?;
            workflow.process_file(&input, output_dir.as_deref(), language.as_deref()).await?;
        }
        Commands::Batch { input_dir, output_dir, model, language } => {
            info!("Processing directory: {}", input_dir.display());

            if let Some(model) = model {
                config.transcriber.model = model;
            }

            let workflow = Workflow::new(config)?;
            workflow.process_directory(&input_dir, output_dir.as_deref(), language.as_deref()).await?;
        }
    }

    info!("suno completed successfully");
    Ok(())
}

/// Inject credentials and remote names from the environment into the
/// explicit configuration, without overriding values set in the file
fn apply_env_overrides(config: &mut Config) {
    if config.enhance.api_key.is_none() {
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                config.enhance.api_key = Some(key);
            }
        }
    }

    if let Ok(remote) = std::env::var("RCLONE_REMOTE") {
        if !remote.is_empty() {
            config.upload.remote = remote;
        }
    }

    if config.upload.config_path.is_none() {
        if let Ok(path) = std::env::var("RCLONE_CONFIG") {
            if !path.is_empty() {
                config.upload.config_path = Some(path);
            }
        }
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let suno_dir = std::env::current_dir()?.join(".suno");
    let log_dir = suno_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "suno.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber.try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
