use super::{SearchMatch, SearchQuery, VideoCatalog, VideoInfo};
use crate::error::CatalogError;
use crate::session::{parse_chapter_ranges, Marker, VideoMeta};
use crate::utils::parse_twitch_duration;
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    videos: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct VideoRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    owner_avatar_url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    duration: Option<DurationField>,
    /// Flat start/end pairs
    #[serde(default)]
    chapters: Vec<f64>,
    #[serde(default)]
    ghosts: Vec<GhostRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DurationField {
    Seconds(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
struct GhostRecord {
    id: String,
    username: String,
    #[serde(default)]
    rank: Option<String>,
    frame_time_seconds: f64,
}

impl VideoRecord {
    fn duration_seconds(&self) -> f64 {
        match &self.duration {
            Some(DurationField::Seconds(secs)) => secs.max(0.0),
            Some(DurationField::Text(text)) => parse_twitch_duration(text).unwrap_or_else(|| {
                warn!("Unreadable duration {:?} for video {}", text, self.id);
                0.0
            }),
            None => 0.0,
        }
    }

    fn meta(&self) -> VideoMeta {
        VideoMeta {
            title: self.title.clone(),
            owner_name: self.owner.clone(),
            owner_avatar_url: self.owner_avatar_url.clone(),
            published_date: self.published_at.clone(),
        }
    }

    fn ghosts_by_offset(&self) -> Vec<&GhostRecord> {
        let mut ghosts: Vec<&GhostRecord> = self.ghosts.iter().collect();
        ghosts.sort_by(|a, b| a.frame_time_seconds.total_cmp(&b.frame_time_seconds));
        ghosts
    }
}

/// Catalog backed by a JSON document held in memory
#[derive(Debug, Default)]
pub struct JsonCatalog {
    videos: Vec<VideoRecord>,
}

impl JsonCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        debug!("Catalog loaded: {} videos", file.videos.len());
        Ok(Self { videos: file.videos })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    fn video(&self, video_id: &str) -> Result<&VideoRecord, CatalogError> {
        self.videos
            .iter()
            .find(|v| v.id == video_id)
            .ok_or_else(|| CatalogError::UnknownVideo(video_id.to_string()))
    }
}

/// Newest first; undated videos last
fn by_published_desc(a: &VideoRecord, b: &VideoRecord) -> Ordering {
    match (&a.published_at, &b.published_at) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl VideoCatalog for JsonCatalog {
    async fn markers(&self, video_id: &str) -> Result<Vec<Marker>, CatalogError> {
        let video = self.video(video_id)?;
        Ok(video
            .ghosts
            .iter()
            .map(|g| Marker {
                id: g.id.clone(),
                label: g.username.clone(),
                category: g.rank.clone(),
                offset_seconds: g.frame_time_seconds,
            })
            .collect())
    }

    async fn video_info(&self, video_id: &str) -> Result<VideoInfo, CatalogError> {
        let video = self.video(video_id)?;
        Ok(VideoInfo {
            duration_seconds: video.duration_seconds(),
            chapter_ranges: parse_chapter_ranges(&video.chapters),
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, CatalogError> {
        let needle = query.username.trim().to_lowercase();
        let mut videos: Vec<&VideoRecord> = self
            .videos
            .iter()
            .filter(|v| {
                query
                    .owner
                    .as_ref()
                    .map_or(true, |owner| v.owner.eq_ignore_ascii_case(owner))
            })
            .filter(|v| query.video_id.as_ref().map_or(true, |id| &v.id == id))
            .collect();
        videos.sort_by(|a, b| by_published_desc(a, b));

        let mut matches = Vec::new();
        for video in videos {
            let meta = video.meta();
            let mut seen: HashMap<String, usize> = HashMap::new();
            for ghost in video.ghosts_by_offset() {
                let username = ghost.username.to_lowercase();
                let occurrence = seen.entry(username.clone()).or_insert(0);
                *occurrence += 1;
                if !username.contains(&needle) {
                    continue;
                }
                matches.push(SearchMatch {
                    marker_id: ghost.id.clone(),
                    video_id: video.id.clone(),
                    offset_seconds: ghost.frame_time_seconds,
                    username: ghost.username.clone(),
                    category: ghost.rank.clone(),
                    occurrence: *occurrence,
                    meta: meta.clone(),
                });
            }
        }

        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }
}
