use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::caption::CaptionSet;
use crate::config::Config;
use crate::enhance::{flag_low_confidence, CorrectionApplicator, CorrectionProviderFactory};
use crate::error::{Result, SunoError};
use crate::media::{MediaProberFactory, MediaProberTrait};
use crate::timing::TimingAllocator;
use crate::transcribe::{TranscriberFactory, TranscriberTrait};
use crate::upload::{UploadReceipt, UploaderFactory};

const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "mp3", "m4a", "flac", "ogg"];

/// Sequential pipeline driver: probe -> transcribe -> allocate -> flag ->
/// correct -> persist, with upload as its own stage. Each stage either
/// completes with a (possibly unmodified) document or terminates the run.
pub struct Workflow {
    config: Config,
    transcriber: Box<dyn TranscriberTrait>,
    prober: Box<dyn MediaProberTrait>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        let prober = MediaProberFactory::create_prober(config.media.clone());

        Ok(Self {
            config,
            transcriber,
            prober,
        })
    }

    /// Transcribe one audio file into a persisted caption document
    pub async fn transcribe_audio(
        &self,
        audio_path: &Path,
        output_path: &Path,
        language: Option<&str>,
    ) -> Result<CaptionSet> {
        if !audio_path.exists() {
            return Err(SunoError::FileNotFound(audio_path.display().to_string()));
        }

        self.transcriber.check_availability()?;

        // Probe failure is degraded evidence, not an error: the allocator
        // falls back to a synthesized duration.
        let audio_duration_ms = match self.prober.probe_duration_ms(audio_path).await {
            Ok(duration) => Some(duration),
            Err(e) => {
                warn!("Duration probe failed ({}), timing will be estimated", e);
                None
            }
        };

        let started = Instant::now();
        let transcript = self.transcriber.transcribe(audio_path, language).await?;
        let transcribe_time_s = started.elapsed().as_secs_f64();

        let allocation = TimingAllocator::new(self.config.timing.clone())
            .allocate(transcript.timing_evidence(), audio_duration_ms);

        let language = transcript
            .language
            .unwrap_or_else(|| self.config.transcriber.language.clone());

        let mut set = CaptionSet::new(
            language,
            self.transcriber.model(),
            allocation.captions,
            allocation.source,
        );
        set.stats.transcribe_time_s = Some((transcribe_time_s * 10.0).round() / 10.0);

        set.save(output_path).await?;

        info!(
            "Transcribed {} words covering {}ms (timing: {:?})",
            set.stats.total_words, set.stats.duration_ms, set.stats.timing
        );

        Ok(set)
    }

    /// Flag low-confidence words and apply API corrections to an existing
    /// caption document. The correction pass degrades to a no-op when no
    /// credentials are configured or the external call fails.
    pub async fn enhance_captions(
        &self,
        input_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<CaptionSet> {
        if !input_path.exists() {
            return Err(SunoError::FileNotFound(input_path.display().to_string()));
        }

        let mut set = CaptionSet::load(input_path).await?;

        flag_low_confidence(&mut set, self.config.enhance.confidence_threshold);

        match CorrectionProviderFactory::create_provider(self.config.enhance.clone()) {
            Some(provider) => {
                CorrectionApplicator::new(provider).apply(&mut set).await;
            }
            None => {
                info!("No correction API key configured, skipping correction pass");
            }
        }

        let output_path = output_path.unwrap_or(input_path);
        set.save(output_path).await?;

        Ok(set)
    }

    /// Upload a rendered video into the destination folder
    pub async fn upload_video(&self, file_path: &Path, folder_id: &str) -> Result<UploadReceipt> {
        if !file_path.exists() {
            return Err(SunoError::FileNotFound(file_path.display().to_string()));
        }

        let uploader = UploaderFactory::create_uploader(self.config.upload.clone());
        uploader.check_availability()?;
        uploader.upload(file_path, folder_id).await
    }

    /// Full caption pipeline for a single audio file; returns the path of
    /// the persisted document
    pub async fn process_file(
        &self,
        audio_path: &Path,
        output_dir: Option<&Path>,
        language: Option<&str>,
    ) -> Result<PathBuf> {
        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => audio_path
                .parent()
                .ok_or_else(|| SunoError::Config("Cannot determine output directory".to_string()))?
                .to_path_buf(),
        };
        fs::create_dir_all(&output_dir).await?;

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| SunoError::Config("Invalid audio filename".to_string()))?
            .to_string_lossy();
        let output_path = output_dir.join(format!("{}.captions.json", audio_stem));

        self.transcribe_audio(audio_path, &output_path, language).await?;
        self.enhance_captions(&output_path, None).await?;

        info!("Pipeline completed: {}", output_path.display());
        Ok(output_path)
    }

    /// Run the caption pipeline over every audio file in a directory
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        language: Option<&str>,
    ) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(SunoError::Config("Input path is not a directory".to_string()));
        }

        let mut audio_files = Vec::new();
        for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
            if let Some(extension) = entry.path().extension() {
                if let Some(ext_str) = extension.to_str() {
                    if AUDIO_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()) {
                        audio_files.push(entry.path().to_path_buf());
                    }
                }
            }
        }

        info!("Found {} audio files to process", audio_files.len());

        for audio_path in audio_files {
            match self.process_file(&audio_path, output_dir, language).await {
                Ok(output) => info!(
                    "Successfully processed {} -> {}",
                    audio_path.display(),
                    output.display()
                ),
                Err(e) => warn!("Failed to process {}: {}", audio_path.display(), e),
            }
        }

        Ok(())
    }
}
