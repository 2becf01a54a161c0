//! Marker query and video metadata services consumed by the session.

mod json;

pub use json::*;

use crate::error::CatalogError;
use crate::session::{ChapterRange, Marker, VideoMeta};
use async_trait::async_trait;

/// Duration and highlighted ranges of one video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub chapter_ranges: Vec<ChapterRange>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Case-insensitive username fragment; empty matches everyone
    pub username: String,
    pub owner: Option<String>,
    pub video_id: Option<String>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }
}

/// A ghost found by search: everything needed to call `activate`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub marker_id: String,
    pub video_id: String,
    pub offset_seconds: f64,
    pub username: String,
    pub category: Option<String>,
    /// 1-based index of this username's appearances within the video
    pub occurrence: usize,
    pub meta: VideoMeta,
}

#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn markers(&self, video_id: &str) -> Result<Vec<Marker>, CatalogError>;

    async fn video_info(&self, video_id: &str) -> Result<VideoInfo, CatalogError>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, CatalogError>;
}
