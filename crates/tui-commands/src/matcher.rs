//! Fuzzy matching of palette queries against command labels

use std::fmt::{self, Debug};

use nucleo_matcher::{Config, Matcher, Utf32Str};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::PaletteError;

/// Result of a successful fuzzy match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Match quality, higher is better
    pub score: u32,
    /// Grapheme positions in the candidate that matched the query, ascending
    pub indices: Vec<usize>,
}

impl FuzzyMatch {
    /// Render the candidate with the matched characters highlighted
    pub fn highlight(&self, candidate: &str) -> Line<'static> {
        highlight(candidate, &self.indices, highlight_style())
    }
}

/// Style applied to matched characters
pub fn highlight_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Split `candidate` into plain and highlighted spans
///
/// `indices` are grapheme positions, as reported in [`FuzzyMatch::indices`].
/// Consecutive matched graphemes share one span.
pub fn highlight(candidate: &str, indices: &[usize], style: Style) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_matched = false;

    for (i, grapheme) in candidate.graphemes(true).enumerate() {
        let matched = indices.binary_search(&i).is_ok();
        if matched != run_matched && !run.is_empty() {
            spans.push(make_span(std::mem::take(&mut run), run_matched, style));
        }
        run_matched = matched;
        run.push_str(grapheme);
    }
    if !run.is_empty() {
        spans.push(make_span(run, run_matched, style));
    }

    Line::from(spans)
}

fn make_span(text: String, matched: bool, style: Style) -> Span<'static> {
    if matched {
        Span::styled(text, style)
    } else {
        Span::raw(text)
    }
}

/// Matches a query against a candidate label
///
/// Errors are propagated to the caller; a matcher is trusted infrastructure.
pub trait FuzzyMatcher {
    fn fuzzy_match(
        &mut self,
        query: &str,
        candidate: &str,
    ) -> Result<Option<FuzzyMatch>, PaletteError>;
}

/// Fuzzy matcher backed by nucleo-matcher (same algorithm as Helix/Zed)
///
/// Matching is case-insensitive. The candidate is matched one grapheme
/// cluster at a time, so reported indices line up with [`highlight`].
pub struct NucleoMatcher {
    matcher: Matcher,
    // Reusable buffers for UTF-32 conversion
    haystack_buf: Vec<char>,
    needle_buf: Vec<char>,
    indices: Vec<u32>,
}

impl NucleoMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            haystack_buf: Vec::new(),
            needle_buf: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl Default for NucleoMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for NucleoMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NucleoMatcher").finish_non_exhaustive()
    }
}

impl FuzzyMatcher for NucleoMatcher {
    fn fuzzy_match(
        &mut self,
        query: &str,
        candidate: &str,
    ) -> Result<Option<FuzzyMatch>, PaletteError> {
        // With ignore_case the needle must already be lower case
        let query = query.to_lowercase();

        self.haystack_buf.clear();
        self.needle_buf.clear();
        self.indices.clear();

        // One unit per grapheme, keyed by its base char
        self.haystack_buf.extend(
            candidate
                .graphemes(true)
                .filter_map(|grapheme| grapheme.chars().next()),
        );
        let haystack = Utf32Str::Unicode(&self.haystack_buf);
        let needle = Utf32Str::new(&query, &mut self.needle_buf);

        let Some(score) = self
            .matcher
            .fuzzy_indices(haystack, needle, &mut self.indices)
        else {
            return Ok(None);
        };

        let mut indices: Vec<usize> = self.indices.iter().map(|&i| i as usize).collect();
        indices.sort_unstable();
        indices.dedup();

        Ok(Some(FuzzyMatch {
            score: u32::from(score),
            indices,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(line: &Line<'_>) -> Vec<(String, bool)> {
        line.spans
            .iter()
            .map(|s| (s.content.to_string(), s.style == highlight_style()))
            .collect()
    }

    #[test]
    fn test_fuzzy_match() {
        let mut matcher = NucleoMatcher::new();
        let found = matcher.fuzzy_match("qu", "Quit").unwrap();
        assert!(found.is_some());
        assert!(found.unwrap().score > 0);
    }

    #[test]
    fn test_no_match() {
        let mut matcher = NucleoMatcher::new();
        assert!(matcher.fuzzy_match("qu", "Help").unwrap().is_none());
        assert!(matcher.fuzzy_match("xyz123", "Open File").unwrap().is_none());
    }

    #[test]
    fn test_case_insensitive() {
        let mut matcher = NucleoMatcher::new();
        assert!(matcher.fuzzy_match("SAVE", "Save File").unwrap().is_some());
        assert!(matcher.fuzzy_match("save", "SAVE FILE").unwrap().is_some());
    }

    #[test]
    fn test_indices_point_at_matched_chars() {
        let mut matcher = NucleoMatcher::new();
        let found = matcher.fuzzy_match("qt", "Quit").unwrap().unwrap();
        assert_eq!(found.indices, vec![0, 3]);
    }

    #[test]
    fn test_prefix_scores_higher_than_scattered() {
        let mut matcher = NucleoMatcher::new();
        let prefix = matcher.fuzzy_match("open", "Open File").unwrap().unwrap();
        let scattered = matcher
            .fuzzy_match("open", "Close Project Entry Now")
            .unwrap()
            .unwrap();
        assert!(prefix.score > scattered.score);
    }

    #[test]
    fn test_highlight_groups_runs() {
        let line = highlight("Quit", &[0, 1], highlight_style());
        assert_eq!(
            spans(&line),
            vec![("Qu".to_string(), true), ("it".to_string(), false)]
        );
    }

    #[test]
    fn test_highlight_alternating() {
        let line = highlight("Quit", &[0, 3], highlight_style());
        assert_eq!(
            spans(&line),
            vec![
                ("Q".to_string(), true),
                ("ui".to_string(), false),
                ("t".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_combining_marks_highlight_matched_graphemes() {
        let mut matcher = NucleoMatcher::new();
        let label = "Cafe\u{301} Menu";
        let found = matcher.fuzzy_match("menu", label).unwrap().unwrap();
        assert_eq!(found.indices, vec![5, 6, 7, 8]);
        assert_eq!(
            spans(&found.highlight(label)),
            vec![("Cafe\u{301} ".to_string(), false), ("Menu".to_string(), true)]
        );

        let found = matcher.fuzzy_match("cafe", label).unwrap().unwrap();
        assert_eq!(
            spans(&found.highlight(label)),
            vec![("Cafe\u{301}".to_string(), true), (" Menu".to_string(), false)]
        );
    }

    #[test]
    fn test_highlight_non_ascii_label() {
        let line = highlight("Öffnen ✓", &[0, 7], highlight_style());
        assert_eq!(
            spans(&line),
            vec![
                ("Ö".to_string(), true),
                ("ffnen ".to_string(), false),
                ("✓".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_highlight_without_matches() {
        let line = highlight("Help", &[], highlight_style());
        assert_eq!(spans(&line), vec![("Help".to_string(), false)]);
    }
}
