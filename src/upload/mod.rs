// Cloud upload architecture
//
// This module abstracts the final upload of a rendered video:
// - Rclone: pre-configured rclone remote, the only current implementation

pub mod rclone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use rclone::*;

use crate::config::UploadConfig;
use crate::error::Result;

/// Result-status record written for downstream automation after a
/// successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "folderId")]
    pub folder_id: String,
    pub status: String,
}

/// Main trait for upload operations
#[async_trait]
pub trait UploaderTrait: Send + Sync {
    /// Upload a file into the destination folder under a timestamped name
    async fn upload(&self, file_path: &Path, folder_id: &str) -> Result<UploadReceipt>;

    /// Check if the sync binary is available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating uploader instances
pub struct UploaderFactory;

impl UploaderFactory {
    /// Create the default uploader implementation (rclone-based)
    pub fn create_uploader(config: UploadConfig) -> Box<dyn UploaderTrait> {
        Box::new(rclone::RcloneUploader::new(config))
    }
}
