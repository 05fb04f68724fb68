use url::Url;

const SEARCH_BASE: &str = "https://www.youtube.com/results";
const SEARCH_SUFFIX: &str = "Official Audio";

/// A link counts as a search link only when it points at a YouTube results
/// page with a non-blank `search_query`. Direct video links (`watch?v=`,
/// `youtu.be/...`) routinely carry hallucinated ids, so they do not count.
pub fn is_search_url(input: &str) -> bool {
    let Ok(url) = Url::parse(input) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    if !is_youtube_host(host) || url.path() != "/results" {
        return false;
    }
    url.query_pairs()
        .any(|(key, value)| key == "search_query" && !value.trim().is_empty())
}

pub fn search_url(artist: &str, title: &str) -> String {
    let query = format!("{artist} {title} {SEARCH_SUFFIX}");
    Url::parse_with_params(SEARCH_BASE, [("search_query", query.as_str())])
        .expect("search base url is valid")
        .to_string()
}

pub fn ensure_search_url(link: &str, artist: &str, title: &str) -> String {
    if is_search_url(link) {
        link.to_string()
    } else {
        search_url(artist, title)
    }
}

fn is_youtube_host(host: &str) -> bool {
    matches!(
        host,
        "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com"
    )
}

#[cfg(test)]
mod tests {
    use super::{ensure_search_url, is_search_url, search_url};
    use url::Url;

    #[test]
    fn accepts_results_links() {
        assert!(is_search_url(
            "https://www.youtube.com/results?search_query=IU+Blueming"
        ));
        assert!(is_search_url(
            "https://m.youtube.com/results?search_query=City+Pop"
        ));
    }

    #[test]
    fn rejects_direct_video_links() {
        assert!(!is_search_url("https://www.youtube.com/watch?v=D1PvIWdZ8xo"));
        assert!(!is_search_url("https://youtu.be/D1PvIWdZ8xo"));
        assert!(!is_search_url("https://music.youtube.com/watch?v=abc123"));
    }

    #[test]
    fn rejects_blank_queries_and_junk() {
        assert!(!is_search_url("https://www.youtube.com/results?search_query="));
        assert!(!is_search_url("https://www.youtube.com/results"));
        assert!(!is_search_url("https://example.com/results?search_query=x"));
        assert!(!is_search_url("not a url"));
        assert!(!is_search_url(""));
    }

    #[test]
    fn synthesizes_encoded_search_links() {
        assert_eq!(
            search_url("IU", "Blueming"),
            "https://www.youtube.com/results?search_query=IU+Blueming+Official+Audio"
        );
        assert!(search_url("AC/DC", "Back In Black").contains("AC%2FDC"));
    }

    #[test]
    fn synthesized_query_roundtrips_korean_text() {
        let link = search_url("아이유", "밤편지");
        let url = Url::parse(&link).unwrap();
        let (_, query) = url
            .query_pairs()
            .find(|(key, _)| key == "search_query")
            .unwrap();
        assert_eq!(query, "아이유 밤편지 Official Audio");
    }

    #[test]
    fn ensure_rewrites_only_non_search_links() {
        let kept = "https://www.youtube.com/results?search_query=Day6+HAPPY";
        assert_eq!(ensure_search_url(kept, "Day6", "HAPPY"), kept);

        let rewritten = ensure_search_url("https://youtu.be/xyz", "Day6", "HAPPY");
        assert_eq!(
            rewritten,
            "https://www.youtube.com/results?search_query=Day6+HAPPY+Official+Audio"
        );
    }

    #[test]
    fn ensure_is_idempotent() {
        let first = ensure_search_url("https://www.youtube.com/watch?v=abc", "IU", "Blueming");
        let second = ensure_search_url(&first, "IU", "Blueming");
        assert_eq!(first, second);
    }
}
