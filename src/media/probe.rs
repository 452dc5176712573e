use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{Result, SunoError};
use super::MediaProberTrait;

/// Concrete prober implementation (ffprobe-based)
pub struct FfprobeProber {
    config: MediaConfig,
}

impl FfprobeProber {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }
}

/// Parse ffprobe's bare duration output (seconds) into milliseconds
fn parse_duration_ms(stdout: &str) -> Result<u64> {
    let seconds: f64 = stdout
        .trim()
        .parse()
        .map_err(|_| SunoError::Media(format!("Unparseable probe output: {:?}", stdout.trim())))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SunoError::Media(format!(
            "Invalid probe duration: {}",
            seconds
        )));
    }

    Ok((seconds * 1000.0).round() as u64)
}

#[async_trait]
impl MediaProberTrait for FfprobeProber {
    async fn probe_duration_ms(&self, audio_path: &Path) -> Result<u64> {
        debug!("Probing duration of {}", audio_path.display());

        let output = Command::new(&self.config.probe_binary_path)
            .arg("-v").arg("error")
            .arg("-show_entries").arg("format=duration")
            .arg("-of").arg("default=noprint_wrappers=1:nokey=1")
            .arg(audio_path)
            .output()
            .map_err(|e| SunoError::Media(format!("Failed to execute probe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SunoError::Media(format!("Duration probe failed: {}", stderr)));
        }

        let duration_ms = parse_duration_ms(&String::from_utf8_lossy(&output.stdout))?;
        debug!("Probed duration: {}ms", duration_ms);
        Ok(duration_ms)
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.probe_binary_path)
            .arg("-version")
            .output()
            .map_err(|e| SunoError::Media(format!(
                "Probe binary not found: {}. Install ffmpeg (ffprobe) first.",
                e
            )))?;

        if output.status.success() {
            info!("Duration probe is available");
            Ok(())
        } else {
            Err(SunoError::Media("Probe version check failed".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_ms() {
        assert_eq!(parse_duration_ms("12.345000\n").unwrap(), 12345);
        assert_eq!(parse_duration_ms("0.5").unwrap(), 500);
        assert_eq!(parse_duration_ms("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration_ms("N/A").is_err());
        assert!(parse_duration_ms("").is_err());
        assert!(parse_duration_ms("-3.0").is_err());
    }
}
