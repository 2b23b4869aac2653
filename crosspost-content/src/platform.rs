use crosspost_ref::{ActivityRef, StatusRef};

use crate::assemble::ThreadOptions;

/// Weighted-length budget for one short-form status post. The weighing
/// function itself is the platform's own length oracle and comes from the
/// caller; this is only the budget it is measured against.
pub const STATUS_MAX_WEIGHT: usize = 280;

/// Character budget for one professional-network feed update.
pub const ACTIVITY_MAX_CHARS: usize = 3000;

/// Character budget per message on caption-level platforms.
pub const CAPTION_MAX_CHARS: usize = 4096;

/// Thread options for the short-form platform: weighted length, status-url
/// inline commands.
pub fn status_thread(weigh: &dyn Fn(&str) -> usize) -> ThreadOptions<'_> {
    ThreadOptions {
        max_len: STATUS_MAX_WEIGHT,
        weigh: Some(weigh),
        grammar: Some(StatusRef::grammar()),
    }
}

/// Thread options for the professional-network platform: plain character
/// count, activity-url inline commands.
pub fn activity_thread() -> ThreadOptions<'static> {
    ThreadOptions {
        max_len: ACTIVITY_MAX_CHARS,
        weigh: None,
        grammar: Some(ActivityRef::grammar()),
    }
}

/// Thread options for text-only platforms: no inline commands, paragraph
/// sized messages.
pub fn caption_thread(max_len: usize) -> ThreadOptions<'static> {
    ThreadOptions {
        max_len,
        weigh: None,
        grammar: None,
    }
}
