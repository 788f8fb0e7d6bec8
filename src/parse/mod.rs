//! Tolerant extraction of the critique and transformation cards from the
//! model's markdown reply.
//!
//! Nothing here fails: a reply that ignores the requested format degrades to
//! an empty critique and/or an empty card list.

use regex::Regex;
use std::sync::LazyLock;

use crate::wire::{ParsedResult, TransformationCard};

const HEADING_MARKER: &str = "###";
const FENCE: &str = "```";

static LOOSE_CRITIQUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Critique:(.*?)###").expect("invalid loose critique regex")
});

#[derive(Debug, Clone)]
pub struct ResponseParser {
    critique: Regex,
}

impl ResponseParser {
    /// `label` is the literal the prompt asked the model to put in bold in
    /// front of its critique.
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        let critique = Regex::new(&format!(r"(?is)\*\*{}:\*\*(.*?)###", regex::escape(label)))?;
        Ok(Self { critique })
    }

    pub fn parse(&self, text: &str) -> ParsedResult {
        ParsedResult {
            critique: self.critique(text),
            transformations: transformations(text),
        }
    }

    /// Everything between the critique marker and the first following
    /// heading marker. Falls back to a bare `Critique:` when the bold form is
    /// missing.
    fn critique(&self, text: &str) -> String {
        self.critique
            .captures(text)
            .or_else(|| LOOSE_CRITIQUE.captures(text))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }
}

/// Byte span of one line, excluding its `\n`.
#[derive(Debug, Clone, Copy)]
struct LineSpan {
    start: usize,
    end: usize,
}

#[derive(Debug)]
struct Heading {
    /// Byte offset of the `###` marker.
    marker: usize,
    title_line: usize,
    title: String,
}

fn line_spans(text: &str) -> Vec<LineSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        let end = start + line.len();
        spans.push(LineSpan { start, end });
        start = end + 1;
    }
    spans
}

/// Phase 1: every heading marker with its title. A marker that ends its line
/// takes the next non-blank line as the title.
fn find_headings(text: &str, lines: &[LineSpan]) -> Vec<Heading> {
    let mut out = Vec::new();
    for (i, l) in lines.iter().enumerate() {
        let line = &text[l.start..l.end];
        let Some(pos) = line.find(HEADING_MARKER) else { continue };
        let rest = line[pos + HEADING_MARKER.len()..].trim();
        if !rest.is_empty() {
            out.push(Heading { marker: l.start + pos, title_line: i, title: rest.to_string() });
            continue;
        }
        let next = lines
            .iter()
            .enumerate()
            .skip(i + 1)
            .map(|(j, s)| (j, text[s.start..s.end].trim()))
            .find(|(_, t)| !t.is_empty());
        if let Some((j, title)) = next {
            out.push(Heading { marker: l.start + pos, title_line: j, title: title.to_string() });
        }
    }
    out
}

/// Phase 1: indices of lines that open or close a fenced block.
fn find_fences(text: &str, lines: &[LineSpan]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, l)| text[l.start..l.end].starts_with(FENCE))
        .map(|(i, _)| i)
        .collect()
}

/// Phase 2: pair each heading with the next fence pair after its title line.
///
/// The first fence after a heading is its opening fence and the next fence
/// line past the block's leading whitespace closes it, even when the block
/// belongs to a later heading in a malformed reply. A heading whose marker
/// lies before the end of the last closing fence is skipped. A marker on
/// the same line, after a closing fence, still counts.
fn transformations(text: &str) -> Vec<TransformationCard> {
    let lines = line_spans(text);
    let headings = find_headings(text, &lines);
    let fences = find_fences(text, &lines);

    let mut cards = Vec::new();
    let mut consumed = 0;
    for h in headings {
        if h.marker < consumed {
            continue;
        }
        let after_title = fences.partition_point(|&f| f <= h.title_line);
        let Some(&open) = fences.get(after_title) else {
            // No fence after this heading means none after any later one.
            break;
        };
        let after_open = lines[open].start + FENCE.len();
        let rest = &text[after_open..];
        let content_start = after_open + (rest.len() - rest.trim_start().len());

        let content = match fences[after_title + 1..].iter().find(|&&f| lines[f].start > content_start) {
            Some(&close) => {
                consumed = lines[close].start + FENCE.len();
                // Stop before the newline that ends the line above the fence.
                text[content_start..lines[close].start - 1].trim().to_string()
            }
            None => match fences[after_title + 1..].iter().find(|&&f| lines[f].start == content_start) {
                // Only whitespace between the two fences.
                Some(&close) => {
                    consumed = lines[close].start + FENCE.len();
                    String::new()
                }
                None => break,
            },
        };
        cards.push(TransformationCard { title: h.title, content });
    }
    cards
}

#[cfg(test)]
mod tests;
