//! Line wrapper - packs free text into at most `max_lines` lines of at most
//! `max_chars_per_line` characters.
//!
//! Lengths are counted in Unicode scalar values. Whitespace runs collapse to
//! a single space, words are packed greedily, and a word longer than a line
//! is hard-split into fixed-size chunks. Output past `max_lines` is dropped.

use std::ops::Deref;

use serde::Serialize;

/// Ordered lines, top first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineSet(Vec<String>);

impl LineSet {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Drop the last line unless only one remains. Returns whether a line was dropped.
    pub fn drop_last(&mut self) -> bool {
        if self.0.len() > 1 {
            self.0.pop();
            true
        } else {
            false
        }
    }
}

impl Deref for LineSet {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl PartialEq<[&str]> for LineSet {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.iter().map(String::as_str).eq(other.iter().copied())
    }
}

impl<const N: usize> PartialEq<[&str; N]> for LineSet {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

struct Packer {
    lines: Vec<String>,
    current: String,
    max_lines: usize,
}

impl Packer {
    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn full(&self) -> bool {
        self.lines.len() >= self.max_lines
    }
}

/// Wrap `text` into a [`LineSet`]. Empty or whitespace-only text yields a
/// single empty line; zero limits are treated as one.
pub fn wrap(text: &str, max_lines: usize, max_chars_per_line: usize) -> LineSet {
    let max_lines = max_lines.max(1);
    let width = max_chars_per_line.max(1);
    let mut packer = Packer {
        lines: Vec::new(),
        current: String::new(),
        max_lines,
    };

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > width {
            packer.flush();
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(width) {
                packer.lines.push(chunk.iter().collect());
                if packer.full() {
                    packer.lines.truncate(max_lines);
                    return LineSet(packer.lines);
                }
            }
            continue;
        }

        let current_len = packer.current.chars().count();
        if packer.current.is_empty() {
            packer.current.push_str(word);
        } else if current_len + 1 + word_len <= width {
            packer.current.push(' ');
            packer.current.push_str(word);
        } else {
            packer.flush();
            packer.current.push_str(word);
            if packer.full() {
                packer.lines.truncate(max_lines);
                return LineSet(packer.lines);
            }
        }
    }

    packer.flush();
    packer.lines.truncate(max_lines);
    if packer.lines.is_empty() {
        packer.lines.push(String::new());
    }
    LineSet(packer.lines)
}
