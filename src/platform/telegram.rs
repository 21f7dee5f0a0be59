//! The subset of the Telegram Bot API `Update` object the ingest path reads.
//!
//! Everything except `chat.id` and `message_id` is optional or defaulted, so an
//! unexpected media descriptor never turns a valid channel post into a parse
//! failure. Unknown fields are ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub channel_post: Option<Message>,
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// The message to ingest: the channel post if present, otherwise the plain
    /// `message` when `accept_direct_messages` is on.
    pub fn candidate_message(&self, accept_direct_messages: bool) -> Option<&Message> {
        match (&self.channel_post, accept_direct_messages) {
            (Some(post), _) => Some(post),
            (None, true) => self.message.as_ref(),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    /// Unix timestamp in seconds
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    pub video: Option<Video>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Chat {
    /// Negative for channels and groups
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// One size variant of a photo; Telegram sends several per photo.
#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct PhotoSize {
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct Video {
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL_PHOTO_POST: &str = r#"{
        "update_id": 918273645,
        "channel_post": {
            "message_id": 42,
            "sender_chat": {"id": -1001234567890, "title": "News", "type": "channel"},
            "chat": {"id": -1001234567890, "title": "News", "username": "newsroom", "type": "channel"},
            "date": 1735689600,
            "photo": [
                {"file_id": "AgAC-small", "file_unique_id": "AQAD1", "file_size": 1280, "width": 90, "height": 60},
                {"file_id": "AgAC-large", "file_unique_id": "AQAD2", "file_size": 88120, "width": 1280, "height": 853}
            ],
            "caption": "Launch day! Details below",
            "caption_entities": [{"offset": 0, "length": 6, "type": "bold"}]
        }
    }"#;

    #[test]
    fn test_parse_channel_post_with_photo() {
        let update: Update = serde_json::from_str(CHANNEL_PHOTO_POST).unwrap();
        let post = update.channel_post.as_ref().unwrap();

        assert_eq!(update.update_id, 918273645);
        assert_eq!(post.message_id, 42);
        assert_eq!(post.chat.id, -1001234567890);
        assert_eq!(post.chat.kind, "channel");
        assert_eq!(post.chat.username.as_deref(), Some("newsroom"));
        assert_eq!(post.caption.as_deref(), Some("Launch day! Details below"));
        assert!(post.text.is_none());
        assert_eq!(post.photo.as_ref().unwrap().len(), 2);
        assert!(update.message.is_none());
    }

    #[test]
    fn test_parse_video_with_sparse_descriptor() {
        let json = r#"{
            "update_id": 1,
            "channel_post": {
                "message_id": 7,
                "chat": {"id": -100, "type": "channel"},
                "video": {"file_id": "BAAC", "duration": 12}
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let video = update.channel_post.unwrap().video.unwrap();
        assert_eq!(video.file_id, "BAAC");
        assert_eq!(video.duration, 12);
        assert_eq!(video.width, 0);
    }

    #[test]
    fn test_parse_unrelated_update_type() {
        let json = r#"{"update_id": 5, "my_chat_member": {"chat": {"id": -100, "type": "channel"}}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.channel_post.is_none());
        assert!(update.message.is_none());
    }

    #[test]
    fn test_candidate_prefers_channel_post() {
        let json = r#"{
            "channel_post": {"message_id": 1, "chat": {"id": -100, "type": "channel"}},
            "message": {"message_id": 2, "chat": {"id": 55, "type": "private"}}
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.candidate_message(true).unwrap().message_id, 1);
        assert_eq!(update.candidate_message(false).unwrap().message_id, 1);
    }

    #[test]
    fn test_candidate_message_fallback_is_opt_in() {
        let json = r#"{"message": {"message_id": 2, "chat": {"id": 55, "type": "private"}, "text": "hi"}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.candidate_message(false).is_none());
        assert_eq!(update.candidate_message(true).unwrap().message_id, 2);
    }
}
