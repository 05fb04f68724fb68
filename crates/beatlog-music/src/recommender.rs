use std::time::Duration;

use beatlog_core::{BeatlogError, BeatlogResult, Recommendation};
use beatlog_youtube::ensure_search_url;
use reqwest::Client;
use url::Url;

use crate::api::gemini::{DEFAULT_MODEL, GeminiClient};
use crate::prompt::{PromptOptions, build_prompt, response_schema};

const USER_AGENT: &str = "beatlog/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Recommender {
    client: GeminiClient,
    options: PromptOptions,
}

impl Recommender {
    /// Builds the one process-wide client. A missing key is not rejected here;
    /// the provider call fails and surfaces like any other fetch error.
    pub fn new(api_key: Option<String>, model: Option<String>, options: PromptOptions) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");
        Self {
            client: GeminiClient::new(
                client,
                api_key.unwrap_or_default(),
                model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ),
            options,
        }
    }

    pub async fn recommend(&self, theme: &str) -> BeatlogResult<Recommendation> {
        let prompt = build_prompt(theme, &self.options);
        let schema = response_schema(&self.options);
        let raw = self.client.generate(&prompt, schema).await?;
        let mut recommendation = parse_recommendation(&raw)?;
        repair_links(&mut recommendation);
        Ok(recommendation)
    }
}

pub fn parse_recommendation(raw: &str) -> BeatlogResult<Recommendation> {
    let recommendation: Recommendation = serde_json::from_str(raw)
        .map_err(|err| BeatlogError::Parse(format!("recommendation parse failed: {err}")))?;
    if recommendation.songs.is_empty() {
        return Err(BeatlogError::Parse(
            "recommendation contains no songs".to_string(),
        ));
    }
    Ok(recommendation)
}

/// Rewrites every non-search `youtubeLink` into a synthesized search link and
/// drops cover URLs that do not parse. Returns the number of rewritten links.
pub fn repair_links(recommendation: &mut Recommendation) -> usize {
    let mut rewritten = 0;
    for song in &mut recommendation.songs {
        let repaired = ensure_search_url(&song.youtube_link, &song.artist, &song.title);
        if repaired != song.youtube_link {
            song.youtube_link = repaired;
            rewritten += 1;
        }
        if let Some(cover) = &song.cover_image_url
            && Url::parse(cover).is_err()
        {
            song.cover_image_url = None;
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::{parse_recommendation, repair_links};
    use beatlog_core::BeatlogError;

    const RAINY_DAY: &str = r#"{
        "songs": [
            {"title": "Rain", "artist": "Paul Kim", "isKorean": true,
             "reason": "빗소리와 어울리는 잔잔한 목소리", "youtubeLink": "https://www.youtube.com/results?search_query=Paul+Kim+Rain"},
            {"title": "비도 오고 그래서", "artist": "헤이즈", "isKorean": true,
             "reason": "비 오는 출근길의 대표곡", "youtubeLink": "https://www.youtube.com/results?search_query=%ED%97%A4%EC%9D%B4%EC%A6%88"},
            {"title": "Rainism", "artist": "비", "isKorean": true,
             "reason": "리듬감으로 아침을 깨우는 곡", "youtubeLink": "https://www.youtube.com/results?search_query=Rain+Rainism"},
            {"title": "우산", "artist": "에픽하이", "isKorean": true,
             "reason": "촉촉한 감성의 힙합 발라드", "youtubeLink": "https://www.youtube.com/results?search_query=Epik+High+Umbrella"},
            {"title": "Rainy Day", "artist": "이소라", "isKorean": true,
             "reason": "차분하게 하루를 여는 목소리", "youtubeLink": "https://www.youtube.com/results?search_query=Lee+Sora+Rainy+Day"},
            {"title": "Set Fire to the Rain", "artist": "Adele", "isKorean": false,
             "reason": "웅장한 보컬로 활력을 주는 곡", "youtubeLink": "https://www.youtube.com/results?search_query=Adele+Set+Fire+to+the+Rain"},
            {"title": "Rain On Me", "artist": "Lady Gaga", "isKorean": false,
             "reason": "비 오는 날에도 신나는 팝", "youtubeLink": "https://www.youtube.com/results?search_query=Lady+Gaga+Rain+On+Me"}
        ],
        "dailyMessage": "비 오는 출근길, 오늘도 화이팅하세요!"
    }"#;

    #[test]
    fn parses_a_well_formed_payload_in_order() {
        let recommendation = parse_recommendation(RAINY_DAY).unwrap();
        assert_eq!(recommendation.songs.len(), 7);
        assert_eq!(recommendation.songs[0].title, "Rain");
        assert_eq!(recommendation.songs[6].artist, "Lady Gaga");
        assert_eq!(
            recommendation.songs.iter().filter(|song| song.is_korean).count(),
            5
        );
        assert_eq!(
            recommendation.daily_message,
            "비 오는 출근길, 오늘도 화이팅하세요!"
        );
    }

    #[test]
    fn rejects_invalid_json() {
        let result = parse_recommendation("sorry, here are some songs: ...");
        assert!(matches!(result, Err(BeatlogError::Parse(_))));
    }

    #[test]
    fn rejects_missing_required_fields() {
        let raw = r#"{"songs": [{"title": "Blueming", "artist": "IU"}], "dailyMessage": "hi"}"#;
        assert!(matches!(
            parse_recommendation(raw),
            Err(BeatlogError::Parse(_))
        ));
    }

    #[test]
    fn rejects_wrong_field_types() {
        let raw = r#"{
            "songs": [{"title": "Blueming", "artist": "IU", "isKorean": "yes",
                       "reason": "r", "youtubeLink": "https://www.youtube.com/results?search_query=x"}],
            "dailyMessage": "hi"
        }"#;
        assert!(matches!(
            parse_recommendation(raw),
            Err(BeatlogError::Parse(_))
        ));
    }

    #[test]
    fn rejects_empty_song_list() {
        let raw = r#"{"songs": [], "dailyMessage": "hi"}"#;
        match parse_recommendation(raw) {
            Err(BeatlogError::Parse(message)) => assert!(message.contains("no songs")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn repairs_direct_video_links_only() {
        let mut recommendation = parse_recommendation(RAINY_DAY).unwrap();
        recommendation.songs[0].youtube_link = "https://youtu.be/FQ4Dm47yGv0".to_string();
        recommendation.songs[1].youtube_link =
            "https://www.youtube.com/watch?v=9rzSuZleiPE".to_string();

        let rewritten = repair_links(&mut recommendation);

        assert_eq!(rewritten, 2);
        assert_eq!(
            recommendation.songs[0].youtube_link,
            "https://www.youtube.com/results?search_query=Paul+Kim+Rain+Official+Audio"
        );
        assert!(recommendation.songs[1]
            .youtube_link
            .starts_with("https://www.youtube.com/results?search_query="));
        assert_eq!(
            recommendation.songs[2].youtube_link,
            "https://www.youtube.com/results?search_query=Rain+Rainism"
        );
    }

    #[test]
    fn repair_scrubs_unparseable_cover_urls() {
        let mut recommendation = parse_recommendation(RAINY_DAY).unwrap();
        recommendation.songs[0].cover_image_url = Some("not a url".to_string());
        recommendation.songs[1].cover_image_url =
            Some("https://covers.example.com/heize.jpg".to_string());

        repair_links(&mut recommendation);

        assert_eq!(recommendation.songs[0].cover_image_url, None);
        assert_eq!(
            recommendation.songs[1].cover_image_url.as_deref(),
            Some("https://covers.example.com/heize.jpg")
        );
    }

    #[test]
    fn repair_keeps_a_clean_payload_untouched() {
        let mut recommendation = parse_recommendation(RAINY_DAY).unwrap();
        let before: Vec<String> = recommendation
            .songs
            .iter()
            .map(|song| song.youtube_link.clone())
            .collect();

        assert_eq!(repair_links(&mut recommendation), 0);

        let after: Vec<String> = recommendation
            .songs
            .iter()
            .map(|song| song.youtube_link.clone())
            .collect();
        assert_eq!(before, after);
    }
}
