// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hyphenation dictionaries.
//!
//! Dictionaries are OpenOffice-format TeX hyphenation pattern files, loaded
//! via Liang's TeX hyphenation algorithm: digit weights between letters of
//! a pattern, odd weight allows a break, implemented here over a
//! plain hash map of patterns, which is the idiomatic Rust shape for the
//! same lookup. `NEXTLEVEL` (compound dictionaries) and compound-specific
//! hyphenation minimums are not supported; `NOHYPHEN`/`CASE` directives are
//! ignored.

use hashbrown::HashMap;

use crate::error::{self, LayoutError};

const DEFAULT_LEFT_MIN: usize = 2;
const DEFAULT_RIGHT_MIN: usize = 3;

/// A loaded hyphenation pattern set for one or more language tags.
#[derive(Debug, Clone)]
pub struct HyphenationDictionary {
    patterns: HashMap<Vec<char>, Vec<u8>>,
    left_min: usize,
    right_min: usize,
}

impl HyphenationDictionary {
    /// Parses an OpenOffice `.dic`-format source. `LEFTHYPHENMIN`
    /// and `RIGHTHYPHENMIN` directive lines override the defaults (2/3);
    /// pattern lines register a digit-weighted letter pattern.
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let mut patterns = HashMap::new();
        let mut left_min = DEFAULT_LEFT_MIN;
        let mut right_min = DEFAULT_RIGHT_MIN;
        let mut saw_any_line = false;

        for (line_no, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('%') || line.starts_with('#') {
                continue;
            }
            saw_any_line = true;
            if let Some(rest) = line.strip_prefix("LEFTHYPHENMIN") {
                left_min = parse_directive_int(rest, line_no)?;
                continue;
            }
            if let Some(rest) = line.strip_prefix("RIGHTHYPHENMIN") {
                right_min = parse_directive_int(rest, line_no)?;
                continue;
            }
            if line.starts_with("NEXTLEVEL")
                || line.starts_with("COMPOUNDLEFTHYPHENMIN")
                || line.starts_with("COMPOUNDRIGHTHYPHENMIN")
                || line.starts_with("NOHYPHEN")
                || line.starts_with("CASE")
            {
                continue;
            }
            // Charset declaration line some dictionaries carry first; not
            // meaningful once the source is already decoded UTF-8 text.
            if line_no == 0 && !line.chars().any(|c| c.is_ascii_digit() || c == '.') {
                continue;
            }
            let (word, weights) = parse_pattern_line(line).ok_or_else(|| {
                error::dictionary_malformed(format!("line {}: {line:?}", line_no + 1))
            })?;
            patterns.insert(word, weights);
        }

        if !saw_any_line {
            return Err(error::dictionary_malformed("empty dictionary source"));
        }

        Ok(Self {
            patterns,
            left_min,
            right_min,
        })
    }

    /// Returns the 0-based codepoint offsets within `word` after which a
    /// hyphenation break is permitted, honoring `LEFTHYPHENMIN`/
    /// `RIGHTHYPHENMIN`.
    pub fn hyphenate(&self, word: &str) -> Vec<usize> {
        let lower: Vec<char> = word.chars().flat_map(char::to_lowercase).collect();
        if lower.len() < self.left_min + self.right_min {
            return Vec::new();
        }
        let mut padded = Vec::with_capacity(lower.len() + 2);
        padded.push('.');
        padded.extend_from_slice(&lower);
        padded.push('.');

        // weights[g] is the digit immediately before padded[g] (g in
        // 0..=padded.len()); weights[0] is always 0 (nothing precedes the
        // leading dot).
        let mut weights = vec![0u8; padded.len() + 1];
        for start in 0..padded.len() {
            for end in (start + 1)..=padded.len() {
                let Some(digits) = self.patterns.get(&padded[start..end]) else {
                    continue;
                };
                for (offset, &w) in digits.iter().enumerate() {
                    let g = start + offset;
                    if w > weights[g] {
                        weights[g] = w;
                    }
                }
            }
        }

        // Gap `g` in `weights` (0-indexed over `padded`, including the
        // fictitious leading dot) corresponds to the boundary between
        // `padded[g-1]` and `padded[g]`. A break after original word
        // character `i` (0-indexed, 0..lower.len()-1) is gap `i + 2` in
        // `padded`'s coordinate space (shifted by the leading dot).
        let mut breaks = Vec::new();
        for i in 0..lower.len().saturating_sub(1) {
            let gap = i + 2;
            if gap < weights.len() && weights[gap] % 2 == 1 {
                let left = i + 1;
                let right = lower.len() - left;
                if left >= self.left_min && right >= self.right_min {
                    breaks.push(i);
                }
            }
        }
        breaks
    }

    pub fn left_min(&self) -> usize {
        self.left_min
    }

    pub fn right_min(&self) -> usize {
        self.right_min
    }
}

fn parse_directive_int(rest: &str, line_no: usize) -> Result<usize, LayoutError> {
    rest.trim()
        .parse()
        .map_err(|_| error::dictionary_malformed(format!("line {}: bad integer", line_no + 1)))
}

/// Splits a pattern line like `.ach4` or `1an2` into its letters and digit
/// weights (one weight per gap, including before the first and after the
/// last letter).
fn parse_pattern_line(line: &str) -> Option<(Vec<char>, Vec<u8>)> {
    let mut word = Vec::new();
    let mut weights = vec![0u8];
    for ch in line.chars() {
        if let Some(d) = ch.to_digit(10) {
            *weights.last_mut().unwrap() = d as u8;
        } else if ch.is_alphabetic() || ch == '.' {
            word.push(ch);
            weights.push(0);
        } else {
            return None;
        }
    }
    if word.is_empty() {
        return None;
    }
    Some((word, weights))
}

/// Registry mapping language tags to dictionaries, with prefix fallback
/// (`en-us` falls back to `en`, ).
#[derive(Debug, Clone, Default)]
pub struct HyphenationRegistry {
    dictionaries: HashMap<String, std::sync::Arc<HyphenationDictionary>>,
}

impl HyphenationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `dict` under every tag in `langs`. Later registrations
    /// under the same tag replace earlier ones.
    pub fn register(&mut self, langs: &[String], dict: HyphenationDictionary) {
        let dict = std::sync::Arc::new(dict);
        for lang in langs {
            self.dictionaries.insert(lang.to_ascii_lowercase(), dict.clone());
        }
    }

    /// Looks up a dictionary for `language_tag`, falling back from the full
    /// tag to its prefix before the first `-`.
    pub fn get(&self, language_tag: &str) -> Option<&std::sync::Arc<HyphenationDictionary>> {
        let tag = language_tag.to_ascii_lowercase();
        if let Some(dict) = self.dictionaries.get(&tag) {
            return Some(dict);
        }
        let prefix = tag.split('-').next().unwrap_or(&tag);
        self.dictionaries.get(prefix)
    }
}
