use serde::Serialize;

use crate::platform::telegram::Message;

/// Titles longer than this are cut and end with [`ELLIPSIS`].
pub const MAX_TITLE_CHARS: usize = 120;
const ELLIPSIS: &str = "...";
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Text,
    Image,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Text => write!(f, "text"),
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// One row of the `telegram_posts` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelegramPost {
    pub title: Option<String>,
    pub message: String,
    /// Media is not downloaded, so this is always null for now.
    pub media_url: Option<String>,
    pub media_type: MediaType,
    pub telegram_chat_id: i64,
    pub telegram_message_id: i64,
}

impl TelegramPost {
    pub fn from_message(msg: &Message) -> Self {
        let text = message_text(msg);
        Self {
            title: derive_title(text),
            message: text.to_string(),
            media_url: None,
            media_type: classify_media(msg),
            telegram_chat_id: msg.chat.id,
            telegram_message_id: msg.message_id,
        }
    }

    /// Fixed row written by `GET /test-insert`.
    pub fn connectivity_probe() -> Self {
        let message = "Test insert from telegram-ingest".to_string();
        Self {
            title: derive_title(&message),
            message,
            media_url: None,
            media_type: MediaType::Text,
            telegram_chat_id: 0,
            telegram_message_id: 0,
        }
    }
}

/// `text` when present and non-empty, else `caption`, else "".
pub fn message_text(msg: &Message) -> &str {
    msg.text
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(msg.caption.as_deref())
        .unwrap_or("")
}

/// First sentence of `text`, capped at [`MAX_TITLE_CHARS`] characters.
/// Returns `None` for empty text. Text that starts with a terminator yields `Some("")`.
pub fn derive_title(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let first = text.split(SENTENCE_TERMINATORS).next().unwrap_or_default();

    if first.chars().count() > MAX_TITLE_CHARS {
        let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
        let mut title: String = first.chars().take(keep).collect();
        title.push_str(ELLIPSIS);
        Some(title)
    } else {
        Some(first.to_string())
    }
}

/// Photo wins over video; anything else is text.
pub fn classify_media(msg: &Message) -> MediaType {
    if msg.photo.as_ref().is_some_and(|sizes| !sizes.is_empty()) {
        MediaType::Image
    } else if msg.video.is_some() {
        MediaType::Video
    } else {
        MediaType::Text
    }
}
