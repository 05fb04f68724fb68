use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub song_count: u32,
    pub korean_count: u32,
    pub cover_art: bool,
    pub template: Option<String>,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            song_count: 7,
            korean_count: 5,
            cover_art: true,
            template: None,
        }
    }
}

impl PromptOptions {
    pub fn international_count(&self) -> u32 {
        self.song_count.saturating_sub(self.korean_count)
    }
}

pub fn build_prompt(theme: &str, options: &PromptOptions) -> String {
    if let Some(template) = &options.template {
        return template.replace("{theme}", theme);
    }

    let mut prompt = format!(
        "Based on the theme or genre \"{theme}\", recommend {count} songs for a daily commute \
         on public transport (subway or bus).\n\
         Guidelines:\n\
         - Exactly {korean} songs must be Korean (K-Pop, K-Indie, K-Ballad, etc.) and \
         {international} songs must be International.\n\
         - 'youtubeLink' must be a YouTube search link in the format \
         https://www.youtube.com/results?search_query=Artist+-+Song+Title, never a direct \
         video link (direct links are frequently unavailable).\n\
         - 'reason' must be a short one-sentence explanation in Korean for why the song fits \
         a commute.\n\
         - 'dailyMessage' must be a welcoming greeting for the commute in Korean.",
        count = options.song_count,
        korean = options.korean_count,
        international = options.international_count(),
    );
    if options.cover_art {
        prompt.push_str(
            "\n- 'coverImageUrl' should be the album cover image URL, or a reasonable \
             placeholder image URL when the cover is unknown.",
        );
    }
    prompt
}

/// Schema handed to the provider; field names match the wire names on `Track`
/// and `Recommendation`.
pub fn response_schema(options: &PromptOptions) -> Value {
    let mut track_properties = json!({
        "title": { "type": "STRING" },
        "artist": { "type": "STRING" },
        "isKorean": { "type": "BOOLEAN" },
        "reason": { "type": "STRING" },
        "youtubeLink": { "type": "STRING" }
    });
    if options.cover_art {
        track_properties["coverImageUrl"] = json!({ "type": "STRING" });
    }

    json!({
        "type": "OBJECT",
        "properties": {
            "songs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": track_properties,
                    "required": ["title", "artist", "isKorean", "reason", "youtubeLink"]
                }
            },
            "dailyMessage": { "type": "STRING" }
        },
        "required": ["songs", "dailyMessage"]
    })
}
