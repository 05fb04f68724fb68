use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    #[serde(rename = "isKorean")]
    pub is_korean: bool,
    pub reason: String,
    #[serde(rename = "youtubeLink")]
    pub youtube_link: String,
    #[serde(rename = "coverImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub songs: Vec<Track>,
    #[serde(rename = "dailyMessage")]
    pub daily_message: String,
}
