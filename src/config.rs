use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables for the fisheye bar and marker displacement.
/// Exact pixel values are empirical; only the shape of the curves is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FisheyeConfig {
    pub rest_height: f32,
    pub max_height: f32,
    pub influence_radius: f32,
    pub snap_threshold: f32,
    /// Fraction of the remaining distance the snapped marker may travel
    pub snap_cap: f32,
    pub push_radius: f32,
    pub max_push: f32,
    /// Number of height samples along the bar outline
    pub path_samples: usize,
}

impl Default for FisheyeConfig {
    fn default() -> Self {
        Self {
            rest_height: 8.0,
            max_height: 24.0,
            influence_radius: 80.0,
            snap_threshold: 40.0,
            snap_cap: 0.8,
            push_radius: 80.0,
            max_push: 20.0,
            path_samples: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub slit_width: f32,
    pub snapped_slit_width: f32,
    pub seek_indicator_width: f32,
    /// Extra pixels on each side of a slit that still count as hovering it
    pub hover_slop: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            slit_width: 2.0,
            snapped_slit_width: 3.0,
            seek_indicator_width: 2.0,
            hover_slop: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub poll_interval_ms: u64,
    /// Forward window (seconds) within which the player still counts as "at" a marker
    pub boundary_tolerance_secs: f64,
    pub mount_id: String,
    pub autoplay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            boundary_tolerance_secs: 2.0,
            mount_id: "ghostline-player".to_string(),
            autoplay: true,
        }
    }
}

impl SessionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fisheye: FisheyeConfig,
    pub timeline: TimelineConfig,
    pub session: SessionConfig,
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
