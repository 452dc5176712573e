use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe audio into a word-level timed caption document
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output caption JSON file
        #[arg(short, long, default_value = "captions.json")]
        output: PathBuf,

        /// Engine model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Flag low-confidence words and apply API transliteration fixes
    Enhance {
        /// Input caption JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Correction API key (or set GROQ_API_KEY env)
        #[arg(long)]
        api_key: Option<String>,

        /// Low confidence threshold
        #[arg(long)]
        confidence_threshold: Option<f64>,
    },

    /// Upload a rendered video to the cloud storage folder
    Upload {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Destination folder identifier
        #[arg(short, long)]
        folder_id: String,

        /// Remote name (or set RCLONE_REMOTE env)
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Run the full caption pipeline on a single audio file
    Process {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the caption document
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Engine model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Run the caption pipeline on every audio file in a directory
    Batch {
        /// Input directory containing audio files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory for caption documents
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Engine model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,
    },
}
