use pulldown_cmark::{Event, Options, Parser, Tag};

/// True when the text has no visible characters at all.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Flattens markdown to plain text for platforms that render none.
///
/// Links keep their label followed by the url in parentheses (unless the
/// label already is the url), images reduce to their alt text, block
/// boundaries become blank lines, and raw html is dropped.
pub fn render_plain(markdown: &str) -> String {
    let mut parser_opts = Options::empty();
    parser_opts.insert(Options::ENABLE_TABLES);
    parser_opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    // (dest, output position at link start), so the label can be compared
    // against the destination when the link ends
    let mut link_starts: Vec<(String, usize)> = Vec::new();

    for event in Parser::new_ext(markdown, parser_opts) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Link(_, dest, _) => link_starts.push((dest.to_string(), out.len())),
                Tag::Item => out.push_str("- "),
                _ => {}
            },
            Event::End(tag) => match tag {
                Tag::Link(..) => {
                    if let Some((dest, start)) = link_starts.pop() {
                        if &out[start..] != dest.as_str() {
                            out.push_str(" (");
                            out.push_str(dest.as_str());
                            out.push(')');
                        }
                    }
                }
                Tag::Item => out.push('\n'),
                Tag::TableCell => out.push(' '),
                Tag::TableHead | Tag::TableRow => out.push('\n'),
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::BlockQuote
                | Tag::CodeBlock(..)
                | Tag::List(..)
                | Tag::Table(..) => out.push_str("\n\n"),
                _ => {}
            },
            Event::Text(text) => out.push_str(text.as_ref()),
            Event::Code(code) => out.push_str(code.as_ref()),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("\n\n"),
            Event::Html(_) | Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    collapse_blank_lines(out.trim())
}

/// Formats a byte count for humans, decimal units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1000.0 && unit < UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

// caps runs of newlines at two, so flattened blocks never produce more than
// one blank line
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}
