use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    pub gemini_key: Option<String>,
    pub model: Option<String>,
}

/// Playlist shaping knobs: how many songs to ask for, the Korean and
/// international split, whether to request cover art, and an optional full
/// prompt override (`{theme}` placeholder).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaylistConfig {
    pub song_count: Option<u32>,
    pub korean_count: Option<u32>,
    pub cover_art: Option<bool>,
    pub prompt_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub simple: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BeatlogConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub output: OutputConfig,
}
