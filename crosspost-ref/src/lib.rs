use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error as ThisError;
use urlencoding::decode;

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
    #[error("Failed to decode url encoding: {0}")]
    DecodeError(#[from] std::string::FromUtf8Error),
}

/// Reference to a short-form status post, stored as its numeric id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusRef(String);

impl StatusRef {
    // From a status permalink url
    pub fn from_string(string: String) -> Result<Self, RefError> {
        match Self::single_regex().captures(string.as_str()) {
            Some(caps) => Ok(Self(caps.name("id").unwrap().as_str().to_string())),
            None => Err(RefError::BadFormat {
                ref_type: "Status",
                input: string,
            }),
        }
    }

    pub fn to_string(&self) -> String {
        format!("https://x.com/i/status/{}", self.0)
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"^https?://(?:www\.)?(?:x|twitter)\.com/\w{1,15}/status(?:es)?/(?P<id>\d+)/?(?:\?\S*)?$"
            )
            .unwrap();
        }
        &*RE
    }

    pub fn multi_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"https?://(?:www\.)?(?:x|twitter)\.com/\w{1,15}/status(?:es)?/(?P<id>\d+)/?(?:\?\S*)?"
            )
            .unwrap();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn id(&self) -> &str {
        self.0.as_str()
    }

    pub fn grammar() -> RefGrammar {
        RefGrammar {
            regex: Self::multi_regex(),
            parse_id: |matched| {
                StatusRef::from_string(matched.to_string()).map(|status| status.0)
            },
        }
    }
}

impl TryFrom<String> for StatusRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StatusRef::from_string(value)
    }
}

impl From<StatusRef> for String {
    fn from(value: StatusRef) -> String {
        value.to_string()
    }
}

impl From<&StatusRef> for String {
    fn from(value: &StatusRef) -> String {
        value.to_string()
    }
}

/// Reference to a professional-network feed activity, stored as its numeric
/// id. Permalinks carry the id inside an `urn:li:...` segment, sometimes
/// percent-encoded, so matching happens on the raw text and id capture on
/// the decoded form.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActivityRef(String);

impl ActivityRef {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        let decoded = decode(string.as_str())?.into_owned();
        match Self::single_regex().captures(decoded.as_str()) {
            Some(caps) => Ok(Self(caps.name("id").unwrap().as_str().to_string())),
            None => Err(RefError::BadFormat {
                ref_type: "Activity",
                input: string,
            }),
        }
    }

    pub fn to_string(&self) -> String {
        format!(
            "https://www.linkedin.com/feed/update/urn:li:activity:{}/",
            self.0
        )
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"^https?://(?:www\.)?linkedin\.com/feed/update/urn:li:(?:activity|share|ugcPost):(?P<id>\d+)/?(?:\?\S*)?$"
            )
            .unwrap();
        }
        &*RE
    }

    pub fn multi_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"https?://(?:www\.)?linkedin\.com/feed/update/urn(?::|%3[Aa])li(?::|%3[Aa])(?:activity|share|ugcPost)(?::|%3[Aa])(?P<id>\d+)/?(?:\?\S*)?"
            )
            .unwrap();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn id(&self) -> &str {
        self.0.as_str()
    }

    pub fn grammar() -> RefGrammar {
        RefGrammar {
            regex: Self::multi_regex(),
            parse_id: |matched| {
                ActivityRef::from_string(matched.to_string()).map(|activity| activity.0)
            },
        }
    }
}

impl TryFrom<String> for ActivityRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ActivityRef::from_string(value)
    }
}

impl From<ActivityRef> for String {
    fn from(value: ActivityRef) -> String {
        value.to_string()
    }
}

impl From<&ActivityRef> for String {
    fn from(value: &ActivityRef) -> String {
        value.to_string()
    }
}

/// How one platform embeds post references in text: the url shape to find
/// and how to pull the id out of a matched url.
#[derive(Clone, Copy)]
pub struct RefGrammar {
    pub regex: &'static Regex,
    pub parse_id: fn(&str) -> Result<String, RefError>,
}

/// Structured relationship to another post, carried by the first message of
/// a thread instead of the literal url.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "role", content = "ref_id", rename_all = "lowercase")]
pub enum PostRelation {
    Reply(String),
    Quote(String),
    Repost(String),
}

impl PostRelation {
    pub fn ref_id(&self) -> &str {
        match self {
            PostRelation::Reply(id) => id.as_str(),
            PostRelation::Quote(id) => id.as_str(),
            PostRelation::Repost(id) => id.as_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandMatch {
    pub text: String,
    pub relation: Option<PostRelation>,
}

impl CommandMatch {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            relation: None,
        }
    }
}

/// Finds the first reference url in `text` and classifies it by position:
/// the whole content is a repost, a leading url is a reply, a trailing url
/// is a quote. A url in the middle of a sentence is an ordinary link and is
/// left in place.
pub fn extract_command(text: &str, grammar: &RefGrammar) -> CommandMatch {
    let matched = match grammar.regex.find(text) {
        Some(matched) => matched,
        None => return CommandMatch::unchanged(text),
    };

    let ref_id = match (grammar.parse_id)(matched.as_str()) {
        Ok(ref_id) => ref_id,
        Err(_) => return CommandMatch::unchanged(text),
    };

    let before = &text[..matched.start()];
    let after = &text[matched.end()..];

    if before.trim().is_empty() && after.trim().is_empty() {
        return CommandMatch {
            text: String::new(),
            relation: Some(PostRelation::Repost(ref_id)),
        };
    }

    let trimmed = text.trim();
    if trimmed.starts_with(matched.as_str()) {
        return CommandMatch {
            text: after.trim_start().to_string(),
            relation: Some(PostRelation::Reply(ref_id)),
        };
    }
    if trimmed.ends_with(matched.as_str()) {
        return CommandMatch {
            text: before.trim().to_string(),
            relation: Some(PostRelation::Quote(ref_id)),
        };
    }

    CommandMatch::unchanged(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_status_url() {
        assert!(StatusRef::is_match("https://x.com/somebody/status/1234567890"));
        assert!(StatusRef::is_match(
            "https://twitter.com/somebody/statuses/1234567890"
        ));
        assert!(!StatusRef::is_match("https://x.com/somebody"));
    }

    #[test]
    fn test_parse_status_id() {
        let status =
            StatusRef::from_string("https://x.com/somebody/status/1234567890".to_string()).unwrap();
        assert_eq!(status.id(), "1234567890");
        assert_eq!(status.to_string(), "https://x.com/i/status/1234567890");
    }

    #[test]
    fn test_is_activity_url() {
        assert!(ActivityRef::is_match(
            "https://www.linkedin.com/feed/update/urn:li:activity:7123456789/"
        ));
        assert!(!ActivityRef::is_match("https://www.linkedin.com/feed/"));
    }

    #[test]
    fn test_parse_encoded_activity_id() {
        let activity = ActivityRef::from_string(
            "https://www.linkedin.com/feed/update/urn%3Ali%3Aactivity%3A7123456789".to_string(),
        )
        .unwrap();
        assert_eq!(activity.id(), "7123456789");
    }

    #[test]
    fn test_extract_leading_url_as_reply() {
        let result = extract_command(
            "https://x.com/somebody/status/123 great thread",
            &StatusRef::grammar(),
        );
        assert_eq!(result.text, "great thread");
        assert_eq!(result.relation, Some(PostRelation::Reply("123".to_string())));
    }

    #[test]
    fn test_extract_trailing_url_as_quote() {
        let result = extract_command(
            "check this out https://x.com/somebody/status/123",
            &StatusRef::grammar(),
        );
        assert_eq!(result.text, "check this out");
        assert_eq!(result.relation, Some(PostRelation::Quote("123".to_string())));
    }

    #[test]
    fn test_extract_bare_url_as_repost() {
        let result = extract_command(
            "  https://x.com/somebody/status/123  ",
            &StatusRef::grammar(),
        );
        assert_eq!(result.text, "");
        assert_eq!(
            result.relation,
            Some(PostRelation::Repost("123".to_string()))
        );
    }

    #[test]
    fn test_mid_sentence_url_left_in_place() {
        let text = "as seen in https://x.com/somebody/status/123 yesterday";
        let result = extract_command(text, &StatusRef::grammar());
        assert_eq!(result.text, text);
        assert_eq!(result.relation, None);
    }

    #[test]
    fn test_no_url_text_unchanged() {
        let result = extract_command("nothing to see here", &StatusRef::grammar());
        assert_eq!(result.text, "nothing to see here");
        assert_eq!(result.relation, None);
    }

    #[test]
    fn test_first_url_wins() {
        let result = extract_command(
            "https://x.com/a/status/1 and https://x.com/b/status/2",
            &StatusRef::grammar(),
        );
        assert_eq!(result.relation, Some(PostRelation::Reply("1".to_string())));
        assert_eq!(result.text, "and https://x.com/b/status/2");
    }

    #[test]
    fn test_activity_grammar_reply() {
        let result = extract_command(
            "https://www.linkedin.com/feed/update/urn:li:activity:789\nhello network",
            &ActivityRef::grammar(),
        );
        assert_eq!(result.text, "hello network");
        assert_eq!(result.relation, Some(PostRelation::Reply("789".to_string())));
    }
}
