//! Markdown section extraction.
//!
//! A section starts at a heading line whose text contains the requested name
//! (case-insensitive) and runs until the next heading line of any depth, or
//! the end of the document. Only the first matching heading is used.

use std::ops::RangeInclusive;

const FENCE: &str = "```";

/// Heading depths recognised when no explicit range is given (`#` to `###`).
pub const DEFAULT_DEPTHS: RangeInclusive<usize> = 1..=3;

/// A section lookup: heading name plus optional depth and boundary rules.
#[derive(Debug, Clone)]
pub struct SectionQuery<'a> {
    name: &'a str,
    depths: RangeInclusive<usize>,
    stop_markers: Vec<&'a str>,
}

impl<'a> SectionQuery<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            depths: DEFAULT_DEPTHS,
            stop_markers: Vec::new(),
        }
    }

    /// Only accept headings whose `#` count falls in `depths`.
    #[must_use]
    pub fn depths(mut self, depths: RangeInclusive<usize>) -> Self {
        self.depths = depths;
        self
    }

    /// Also end the section at a line starting with `marker`.
    #[must_use]
    pub fn stop_at(mut self, marker: &'a str) -> Self {
        self.stop_markers.push(marker);
        self
    }

    /// Extract the trimmed section text, or `""` when no heading matches.
    #[must_use]
    pub fn extract<'t>(&self, text: &'t str) -> &'t str {
        let needle = self.name.to_lowercase();
        let mut start = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            match start {
                None => {
                    if let Some((depth, title)) = heading(line) {
                        if self.depths.contains(&depth) && title.to_lowercase().contains(&needle) {
                            start = Some(offset);
                        }
                    }
                }
                Some(from) => {
                    if heading(line).is_some() || self.is_stop_line(line) {
                        return text[from..line_start].trim();
                    }
                }
            }
        }

        start.map_or("", |from| text[from..].trim())
    }

    fn is_stop_line(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        self.stop_markers.iter().any(|m| trimmed.starts_with(m))
    }
}

/// Extract the section under the first `#`/`##`/`###` heading containing `name`.
#[must_use]
pub fn extract_section<'t>(text: &'t str, name: &str) -> &'t str {
    SectionQuery::new(name).extract(text)
}

/// Whether any heading line (any depth) contains `name`, case-insensitive.
#[must_use]
pub fn has_heading(text: &str, name: &str) -> bool {
    let needle = name.to_lowercase();
    text.lines()
        .filter_map(heading)
        .any(|(_, title)| title.to_lowercase().contains(&needle))
}

/// Content of the first fenced code block, excluding the fence lines.
#[must_use]
pub fn first_code_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];
    // The rest of the opening line is an info string (language tag).
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find(FENCE)?;
    Some(body[..close].trim())
}

/// Text of the first block-quote line (`> ...`), without the marker.
#[must_use]
pub fn first_blockquote(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix('>'))
        .map(str::trim)
}

/// Text of the first level-1 heading (`# Title`).
#[must_use]
pub fn first_title(text: &str) -> Option<&str> {
    text.lines().find_map(|line| match heading(line) {
        Some((1, title)) if !title.is_empty() => Some(title),
        _ => None,
    })
}

/// Split a heading line into its depth and trimmed title.
fn heading(line: &str) -> Option<(usize, &str)> {
    let depth = line.bytes().take_while(|b| *b == b'#').count();
    if depth == 0 {
        return None;
    }
    Some((depth, line[depth..].trim()))
}
