use beatlog_core::{BeatlogError, Recommendation, normalize_theme};

/// Fixed user-facing message for any fetch failure, regardless of cause.
pub const FETCH_ERROR_MESSAGE: &str = "음악 정보를 가져오는 중 오류가 발생했습니다.";

#[derive(Debug)]
pub enum Screen {
    Idle,
    Loading { theme: String, seq: u64 },
    Loaded { theme: String, playlist: Recommendation, now_playing: usize },
    Error { theme: String, message: String },
}

/// Issued by `submit`; `complete` ignores tickets that no longer match the
/// latest request, so a slow stale response cannot overwrite a newer one.
#[derive(Debug)]
pub struct RequestTicket {
    seq: u64,
    theme: String,
}

impl RequestTicket {
    pub fn theme(&self) -> &str {
        &self.theme
    }
}

#[derive(Debug)]
pub struct App {
    screen: Screen,
    next_seq: u64,
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::Idle,
            next_seq: 0,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// No-op for blank themes and while a request is already in flight.
    pub fn submit(&mut self, theme: &str) -> Option<RequestTicket> {
        if matches!(self.screen, Screen::Loading { .. }) {
            return None;
        }
        let theme = normalize_theme(theme)?;
        self.next_seq += 1;
        self.screen = Screen::Loading {
            theme: theme.clone(),
            seq: self.next_seq,
        };
        Some(RequestTicket {
            seq: self.next_seq,
            theme,
        })
    }

    /// Re-submits the current theme (reshuffle from `Loaded`, retry from `Error`).
    pub fn refresh(&mut self) -> Option<RequestTicket> {
        let theme = match &self.screen {
            Screen::Loaded { theme, .. } | Screen::Error { theme, .. } => theme.clone(),
            Screen::Idle | Screen::Loading { .. } => return None,
        };
        self.submit(&theme)
    }

    pub fn complete(&mut self, ticket: RequestTicket, result: Result<Recommendation, BeatlogError>) {
        let Screen::Loading { theme, seq } = &self.screen else {
            return;
        };
        if *seq != ticket.seq {
            return;
        }
        let theme = theme.clone();
        self.screen = match result {
            Ok(playlist) => Screen::Loaded {
                theme,
                playlist,
                now_playing: 0,
            },
            Err(_) => Screen::Error {
                theme,
                message: FETCH_ERROR_MESSAGE.to_string(),
            },
        };
    }

    pub fn reset(&mut self) {
        self.screen = Screen::Idle;
    }

    /// Marks the track as now playing and yields its link.
    pub fn select_track(&mut self, index: usize) -> Option<&str> {
        let Screen::Loaded {
            playlist,
            now_playing,
            ..
        } = &mut self.screen
        else {
            return None;
        };
        let song = playlist.songs.get(index)?;
        *now_playing = index;
        Some(&song.youtube_link)
    }
}
