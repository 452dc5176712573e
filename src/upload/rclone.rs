use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::Path;
use std::process::Command;
use tokio::fs;
use tracing::{debug, info};

use crate::config::UploadConfig;
use crate::error::{Result, SunoError};
use super::{UploadReceipt, UploaderTrait};

/// Uploader backed by a pre-configured rclone remote
pub struct RcloneUploader {
    config: UploadConfig,
}

impl RcloneUploader {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }
}

/// Timestamped destination filename: captioned_<stem>_<YYYYMMDD_HHMMSS><ext>
fn destination_name(file_path: &Path, timestamp: &DateTime<Local>) -> String {
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let extension = file_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    format!(
        "captioned_{}_{}{}",
        stem,
        timestamp.format("%Y%m%d_%H%M%S"),
        extension
    )
}

#[async_trait]
impl UploaderTrait for RcloneUploader {
    async fn upload(&self, file_path: &Path, folder_id: &str) -> Result<UploadReceipt> {
        let upload_name = destination_name(file_path, &Local::now());
        let destination = format!("{}:{}", self.config.remote, upload_name);

        info!(
            "Uploading '{}' to folder {} as {}",
            file_path.display(),
            folder_id,
            upload_name
        );

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("copyto")
            .arg(file_path)
            .arg(&destination)
            .arg("--drive-root-folder-id").arg(folder_id)
            .arg("--stats-one-line")
            .arg("-v");

        if let Some(config_path) = &self.config.config_path {
            cmd.arg("--config").arg(config_path);
        }

        debug!("Executing upload command: {:?}", cmd);

        let output = cmd.output()
            .map_err(|e| SunoError::Upload(format!("Failed to execute sync tool: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SunoError::Upload(format!("Upload failed: {}", stderr)));
        }

        let stats = String::from_utf8_lossy(&output.stdout);
        if !stats.trim().is_empty() {
            debug!("Upload stats: {}", stats.trim());
        }

        let receipt = UploadReceipt {
            file_name: upload_name,
            folder_id: folder_id.to_string(),
            status: "success".to_string(),
        };

        // Small result-status file for downstream automation
        let receipt_json = serde_json::to_string_pretty(&receipt)?;
        fs::write(&self.config.result_path, receipt_json).await?;

        info!(
            "Upload successful: {} (receipt: {})",
            receipt.file_name, self.config.result_path
        );
        Ok(receipt)
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("version")
            .output()
            .map_err(|e| SunoError::Upload(format!(
                "Sync tool not found: {}. Install rclone: https://rclone.org/install/",
                e
            )))?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version_line = stdout.lines().next().unwrap_or("unknown");
            info!("Sync tool available: {}", version_line);
            Ok(())
        } else {
            Err(SunoError::Upload("Sync tool version check failed".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_destination_name_is_timestamped() {
        let timestamp = Local.with_ymd_and_hms(2026, 8, 7, 14, 30, 5).unwrap();
        let name = destination_name(Path::new("/tmp/final_render.mp4"), &timestamp);
        assert_eq!(name, "captioned_final_render_20260807_143005.mp4");
    }

    #[test]
    fn test_destination_name_without_extension() {
        let timestamp = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let name = destination_name(Path::new("render"), &timestamp);
        assert_eq!(name, "captioned_render_20260102_030405");
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = UploadReceipt {
            file_name: "captioned_x.mp4".to_string(),
            folder_id: "abc123".to_string(),
            status: "success".to_string(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"fileName\""));
        assert!(json.contains("\"folderId\""));
    }
}
