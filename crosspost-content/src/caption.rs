use crosspost_msg::Section;
use crosspost_text::{is_blank, render_plain};

/// Joins the reduced sections into the single caption payload, blank-line
/// separated, skipping sections with no text.
pub fn flatten_caption(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| section.text.as_str())
        .filter(|text| !is_blank(text))
        .collect::<Vec<&str>>()
        .join("\n\n")
}

/// Caption for platforms that render no markup: each section's text is
/// flattened to plain text first.
pub fn flatten_caption_plain(sections: &[Section]) -> String {
    sections
        .iter()
        .filter(|section| !is_blank(section.text.as_str()))
        .map(|section| render_plain(section.text.as_str()))
        .filter(|text| !text.is_empty())
        .collect::<Vec<String>>()
        .join("\n\n")
}
