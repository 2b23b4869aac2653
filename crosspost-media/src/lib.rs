use crosspost_msg::MediaRef;
use crosspost_text::format_size;
use log::warn;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error as ThisError;

#[derive(Clone, Debug, ThisError)]
pub enum MediaError {
    #[error("Failed to fetch media metadata for {url}, cause: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Unsupported media type for {url}: {mime_type}")]
    UnsupportedType { url: String, mime_type: String },
}

/// An attachment as it appears in the source document, before its byte size
/// and MIME type have been looked up.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawMedia {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Resolves each descriptor in order with the supplied resolver. A failed
/// resolution drops that attachment and keeps going, so one dead link never
/// sinks the whole publish.
pub async fn resolve_all<F, Fut>(items: &[RawMedia], resolve: F) -> Vec<MediaRef>
where
    F: Fn(&RawMedia) -> Fut,
    Fut: Future<Output = Result<MediaRef, MediaError>>,
{
    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        match resolve(item).await {
            Ok(media) => resolved.push(media),
            Err(err) => {
                warn!("Dropping attachment {}, cause: {}", item.url, err);
            }
        }
    }
    resolved
}

/// Drops attachments over the platform's byte cap. Media without a known
/// size passes through, the resolver is the place to fill sizes in.
pub fn filter_oversize(media: Vec<MediaRef>, max_bytes: u64) -> Vec<MediaRef> {
    media
        .into_iter()
        .filter(|item| match item.size {
            Some(size) if size > max_bytes => {
                warn!(
                    "Dropping attachment {} ({}), over the {} limit",
                    item.url,
                    format_size(size),
                    format_size(max_bytes)
                );
                false
            }
            _ => true,
        })
        .collect()
}
