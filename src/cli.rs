use clap::Parser;
use std::path::PathBuf;

/// Ghost VOD browser with a fisheye marker timeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Catalog JSON to open (overrides `catalog_path` from the config)
    #[arg(value_name = "CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Config file (JSON); defaults apply when omitted
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Video to open at start-up
    #[arg(long = "video", value_name = "ID")]
    pub video: Option<String>,

    /// Start offset for --video, in seconds or as 1h2m3s
    #[arg(long = "at", value_name = "TIME", requires = "video")]
    pub at: Option<String>,

    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
