//! Ghost VOD browser: embedded-player session control and a fisheye
//! marker timeline.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod player;
pub mod session;
pub mod timeline;
pub mod ui;
pub mod utils;
