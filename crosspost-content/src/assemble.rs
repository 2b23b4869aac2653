use crosspost_msg::{PlatformMessage, Section};
use crosspost_ref::{extract_command, CommandMatch, RefGrammar};
use log::trace;

use crate::chunk::{chunk_text, weigh_chars};

/// Per-platform assembly parameters.
///
/// `weigh` is the platform's effective-length oracle, plain character count
/// when absent. `grammar` enables inline command extraction on platforms
/// that support post relations.
pub struct ThreadOptions<'a> {
    pub max_len: usize,
    pub weigh: Option<&'a dyn Fn(&str) -> usize>,
    pub grammar: Option<RefGrammar>,
}

/// Builds the ordered message sequence for one platform.
///
/// Each section is chunked under the platform budget; the section's media
/// and any extracted post relation ride on the first chunk only, later
/// chunks are bare continuations. Messages with no text, media, or relation
/// are dropped at the end.
pub fn assemble_thread(sections: &[Section], options: &ThreadOptions) -> Vec<PlatformMessage> {
    let mut messages: Vec<PlatformMessage> = Vec::new();

    for section in sections {
        let CommandMatch { text, mut relation } = match &options.grammar {
            Some(grammar) => extract_command(section.text.as_str(), grammar),
            None => CommandMatch {
                text: section.text.clone(),
                relation: None,
            },
        };

        let chunks = match options.weigh {
            Some(weigh) => chunk_text(text.as_str(), options.max_len, |candidate| {
                weigh(candidate)
            }),
            None => chunk_text(text.as_str(), options.max_len, weigh_chars),
        };
        trace!("Section chunked into {} messages", chunks.len());

        for (index, chunk) in chunks.into_iter().enumerate() {
            let (media, relation) = if index == 0 {
                (section.media.clone(), relation.take())
            } else {
                (Vec::new(), None)
            };
            messages.push(PlatformMessage {
                text: chunk,
                media,
                relation,
            });
        }
    }

    messages.retain(|message| !message.is_empty());
    messages
}
