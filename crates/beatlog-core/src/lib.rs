mod error;
mod playlist;

pub use error::{BeatlogError, BeatlogResult};
pub use playlist::{Recommendation, Track};

pub fn normalize_theme(theme: &str) -> Option<String> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
