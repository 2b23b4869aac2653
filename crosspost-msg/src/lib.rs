use crosspost_ref::PostRelation;
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_with::{serde_as, DefaultOnError};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

#[derive(Clone, Debug, ThisError)]
pub enum MsgError {
    #[error("Media url is empty")]
    EmptyMediaUrl,
}

/// One parsed document block. Ordering in the block sequence is significant.
/// Blocks with an unrecognized `type` deserialize as `Unknown` and are
/// skipped downstream.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        content: String,
    },
    Media {
        #[serde(deserialize_with = "deserialize_media_ref")]
        media: MediaRef,
    },
    Divider,
    #[serde(other)]
    Unknown,
}

/// Opaque reference to an attachment. Deserializes from either a bare url
/// string or a full map, like inline media in source documents.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MediaRef {
    pub url: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(alias = "mimeType")]
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(rename = "type")]
    #[serde(default)]
    pub kind: Option<MediaKind>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(alias = "sizeBytes")]
    #[serde(default)]
    pub size: Option<u64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub caption: Option<String>,
}

impl MediaRef {
    /// Effective kind: the explicit field wins, then the MIME type, then the
    /// url extension, then document as the fallback.
    pub fn effective_kind(&self) -> MediaKind {
        self.kind
            .or_else(|| {
                self.mime_type
                    .as_deref()
                    .map(MediaKind::from_mime)
            })
            .or_else(|| MediaKind::from_url(self.url.as_str()))
            .unwrap_or(MediaKind::Doc)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Doc,
}

impl MediaKind {
    pub fn from_mime(mime_type: &str) -> MediaKind {
        if mime_type.starts_with("image/") {
            MediaKind::Image
        } else if mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Doc
        }
    }

    pub fn from_url(url: &str) -> Option<MediaKind> {
        let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
        let extension = path.rsplit('.').next()?.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "avif" => Some(MediaKind::Image),
            "mp4" | "mov" | "webm" | "m4v" => Some(MediaKind::Video),
            "pdf" | "doc" | "docx" => Some(MediaKind::Doc),
            _ => None,
        }
    }
}

/// A contiguous run of text and media between structural dividers. A section
/// may have empty text when it carries only media.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Section {
    pub text: String,
    pub media: Vec<MediaRef>,
}

/// One publishable message of a platform thread. Media and the relation to
/// another post only ever ride on the first message built from a section.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PlatformMessage {
    pub text: String,
    pub media: Vec<MediaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub relation: Option<PostRelation>,
}

impl PlatformMessage {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.media.is_empty() && self.relation.is_none()
    }
}

// https://serde.rs/string-or-struct.html

impl FromStr for MediaRef {
    type Err = MsgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(MsgError::EmptyMediaUrl);
        }
        Ok(MediaRef {
            url: s.to_string(),
            mime_type: None,
            kind: MediaKind::from_url(s),
            size: None,
            caption: None,
        })
    }
}

fn deserialize_media_ref<'de, D>(deserializer: D) -> Result<MediaRef, D::Error>
where
    D: Deserializer<'de>,
{
    struct DeserializeMediaRef;

    impl<'de> Visitor<'de> for DeserializeMediaRef {
        type Value = MediaRef;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or map")
        }

        fn visit_str<E>(self, value: &str) -> Result<MediaRef, E>
        where
            E: de::Error,
        {
            let media = FromStr::from_str(value).map_err(|err| E::custom(format!("{}", err)))?;
            Ok(media)
        }

        fn visit_map<M>(self, map: M) -> Result<MediaRef, M::Error>
        where
            M: MapAccess<'de>,
        {
            Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))
        }
    }

    deserializer.deserialize_any(DeserializeMediaRef)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_sequence_with_unknown_type() {
        let blocks: Vec<ContentBlock> = serde_json::from_value(json!([
            { "type": "text", "content": "Hello" },
            { "type": "divider" },
            { "type": "callout", "content": "ignored" },
            { "type": "text", "content": "World" }
        ]))
        .unwrap();

        assert_eq!(
            blocks,
            vec![
                ContentBlock::Text {
                    content: "Hello".to_string()
                },
                ContentBlock::Divider,
                ContentBlock::Unknown,
                ContentBlock::Text {
                    content: "World".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_media_block_from_bare_url() {
        let block: ContentBlock = serde_json::from_value(json!({
            "type": "media",
            "media": "https://cdn.example.com/pic.png"
        }))
        .unwrap();

        match block {
            ContentBlock::Media { media } => {
                assert_eq!(media.url, "https://cdn.example.com/pic.png");
                assert_eq!(media.kind, Some(MediaKind::Image));
                assert_eq!(media.size, None);
            }
            other => panic!("expected media block, got {:?}", other),
        }
    }

    #[test]
    fn test_media_block_from_map_with_camel_case() {
        let block: ContentBlock = serde_json::from_value(json!({
            "type": "media",
            "media": {
                "url": "https://cdn.example.com/clip",
                "mimeType": "video/mp4",
                "sizeBytes": 1048576,
                "caption": "a clip"
            }
        }))
        .unwrap();

        match block {
            ContentBlock::Media { media } => {
                assert_eq!(media.mime_type, Some("video/mp4".to_string()));
                assert_eq!(media.size, Some(1048576));
                assert_eq!(media.effective_kind(), MediaKind::Video);
            }
            other => panic!("expected media block, got {:?}", other),
        }
    }

    #[test]
    fn test_media_tolerates_bad_optional_fields() {
        let media: MediaRef = serde_json::from_value(json!({
            "url": "https://cdn.example.com/file.pdf",
            "sizeBytes": "not a number",
            "caption": ["not", "a", "string"]
        }))
        .unwrap();

        assert_eq!(media.size, None);
        assert_eq!(media.caption, None);
        assert_eq!(media.effective_kind(), MediaKind::Doc);
    }

    #[test]
    fn test_kind_from_url_ignores_query() {
        assert_eq!(
            MediaKind::from_url("https://cdn.example.com/a.jpg?width=200"),
            Some(MediaKind::Image)
        );
        assert_eq!(MediaKind::from_url("https://cdn.example.com/a"), None);
    }

    #[test]
    fn test_empty_message_needs_no_text_media_or_relation() {
        let mut message = PlatformMessage {
            text: String::new(),
            media: Vec::new(),
            relation: None,
        };
        assert!(message.is_empty());

        message.relation = Some(crosspost_ref::PostRelation::Repost("1".to_string()));
        assert!(!message.is_empty());
    }
}
