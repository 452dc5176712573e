// Modular media probing architecture
//
// This module provides a clean abstraction over the audio duration probe:
// - Probe: ffprobe-based implementation

pub mod probe;

use async_trait::async_trait;
use std::path::Path;

pub use probe::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for media probing operations
#[async_trait]
pub trait MediaProberTrait: Send + Sync {
    /// Total duration of the audio file in milliseconds
    async fn probe_duration_ms(&self, audio_path: &Path) -> Result<u64>;

    /// Check if the probe binary is available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media prober instances
pub struct MediaProberFactory;

impl MediaProberFactory {
    /// Create the default prober implementation (ffprobe-based)
    pub fn create_prober(config: MediaConfig) -> Box<dyn MediaProberTrait> {
        Box::new(probe::FfprobeProber::new(config))
    }
}
