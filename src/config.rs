use crate::get_config_dir;
use crate::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: DownloaderBackend,
    /// Command used to invoke yt-dlp when the yt-dlp backend is selected.
    pub yt_dlp_command: String,
    pub default_display_name: String,
    pub default_worker_count: usize,
    pub default_quality: AudioQuality,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: DownloaderBackend::default(),
            yt_dlp_command: "yt-dlp".to_string(),
            default_display_name: "stereodl".to_string(),
            default_worker_count: 4,
            default_quality: AudioQuality::default(),
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloaderBackend {
    /// In-process stream extraction. The audio track is saved exactly as
    /// YouTube serves it.
    #[default]
    #[value(name = "native")]
    Native,
    /// Shell out to the yt-dlp binary, which converts the track to MP3.
    #[value(name = "yt-dlp")]
    YtDlp,
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    #[default]
    Highest,
    Lowest,
}

impl std::fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioQuality::Highest => write!(f, "highest"),
            AudioQuality::Lowest => write!(f, "lowest"),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config_dir = get_config_dir()?;
        if let Ok(config_file) = std::fs::read_to_string(config_dir.join(CONFIG_FILE_NAME)) {
            Ok(toml::from_str(&config_file)?)
        } else {
            Ok(Self::default())
        }
    }
}
