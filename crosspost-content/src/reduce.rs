use crosspost_msg::{ContentBlock, MediaRef, Section};
use crosspost_text::is_blank;
use log::debug;
use std::mem::take;

struct ReduceState {
    sections: Vec<Section>,
    text: String,
    media: Vec<MediaRef>,
    prev_divider: bool,
}

impl ReduceState {
    fn new() -> Self {
        Self {
            sections: Vec::new(),
            text: String::new(),
            media: Vec::new(),
            prev_divider: false,
        }
    }

    fn flush(mut self) -> Self {
        self.sections.push(Section {
            text: take(&mut self.text),
            media: take(&mut self.media),
        });
        self
    }
}

/// Folds the block sequence into divider-delimited sections.
///
/// Text blocks accumulate with newline separators, media attaches to the
/// running section without breaking it, and a divider flushes the section.
/// Consecutive dividers collapse into a paragraph break instead of emitting
/// an empty section. Sections that end up with neither text nor media are
/// dropped; media-only sections survive with empty text.
pub fn reduce_blocks(blocks: &[ContentBlock]) -> Vec<Section> {
    let state = blocks
        .iter()
        .enumerate()
        .fold(ReduceState::new(), |state, (index, block)| {
            step(state, blocks, index, block)
        });

    // whatever remains at the end of the sequence is a section
    let state = state.flush();

    state
        .sections
        .into_iter()
        .filter_map(|section| {
            let text = section.text.trim().to_string();
            if is_blank(text.as_str()) && section.media.is_empty() {
                None
            } else {
                Some(Section {
                    text,
                    media: section.media,
                })
            }
        })
        .collect()
}

fn step(
    mut state: ReduceState,
    blocks: &[ContentBlock],
    index: usize,
    block: &ContentBlock,
) -> ReduceState {
    match block {
        ContentBlock::Text { content } => {
            state.text.push_str(content.as_str());
            let followed_by_divider = matches!(blocks.get(index + 1), Some(ContentBlock::Divider));
            if index + 1 < blocks.len() && !followed_by_divider {
                state.text.push('\n');
            }
            state.prev_divider = false;
        }
        ContentBlock::Media { media } => {
            state.media.push(media.clone());
            state.prev_divider = false;
        }
        ContentBlock::Divider => {
            if state.prev_divider {
                // a second divider in a row is a paragraph break, not a
                // section boundary
                state.text.push('\n');
            } else if !state.text.is_empty() {
                state = state.flush();
            }
            state.prev_divider = true;
        }
        ContentBlock::Unknown => {
            // skipped blocks are not emitted items, so they leave the
            // divider state alone
            debug!("Skipping block with unrecognized type at index {}", index);
        }
    }
    state
}
