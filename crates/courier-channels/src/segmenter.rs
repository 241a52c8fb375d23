//! Message segmenter — splits long text into bounded, readable segments.
//!
//! Each step looks at a window of the first `max_length` characters of the
//! remaining text and picks a cut point from [`CUT_RULES`], first match wins.
//! A rule only counts when its match lies strictly past its threshold, so a
//! cut never leaves a tiny segment behind. If nothing matches, the text is
//! hard-cut at exactly `max_length` characters.
//!
//! Lengths are counted in `char`s, so every cut lands on a code-point
//! boundary. Grapheme clusters built from several code points can still be
//! split by a hard cut.

pub use courier_core::config::DEFAULT_MAX_LENGTH;

/// Heavy horizontal box-drawing character used for visual separators.
const SEPARATOR: char = '━';
const SEPARATOR_MIN_RUN: usize = 3;

/// Line prefixes that open a new section.
const SECTION_MARKERS: &[&str] = &["\n📌", "\n⭐", "\n##", "\n**"];

/// Which rule produced a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    Separator,
    Paragraph,
    SectionHeader,
    LineBreak,
    Sentence,
    Clause,
    Word,
    Hard,
}

/// A match found inside the search window, as byte offsets.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Where the pattern starts; compared against the threshold.
    at: usize,
    /// Where the segment ends.
    cut: usize,
}

/// One entry of the priority table.
pub struct CutRule {
    pub kind: CutKind,
    /// Fraction of `max_length` the match must lie strictly beyond.
    pub min_fraction: f64,
    find: fn(&str) -> Option<Candidate>,
}

impl std::fmt::Debug for CutRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CutRule")
            .field("kind", &self.kind)
            .field("min_fraction", &self.min_fraction)
            .finish()
    }
}

/// Cut rules in priority order.
pub const CUT_RULES: &[CutRule] = &[
    CutRule { kind: CutKind::Separator, min_fraction: 0.5, find: find_separator },
    CutRule { kind: CutKind::Paragraph, min_fraction: 0.3, find: find_paragraph },
    CutRule { kind: CutKind::SectionHeader, min_fraction: 0.4, find: find_section_header },
    CutRule { kind: CutKind::LineBreak, min_fraction: 0.5, find: find_line_break },
    CutRule { kind: CutKind::Sentence, min_fraction: 0.5, find: find_sentence_end },
    CutRule { kind: CutKind::Clause, min_fraction: 0.6, find: find_clause_end },
    CutRule { kind: CutKind::Word, min_fraction: 0.7, find: find_word_gap },
];

/// A chosen cut point: `index` is a byte offset into the remaining text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cut {
    pub kind: CutKind,
    pub index: usize,
}

/// Split `text` into segments of at most `max_length` characters.
///
/// Text that already fits (including the empty string) comes back unchanged
/// as a single segment. Otherwise every segment is trimmed and non-empty.
/// A `max_length` of zero is treated as one.
pub fn segment(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    if text.is_empty() || !longer_than(text, max_length) {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut remaining = text;

    while longer_than(remaining, max_length) {
        let cut = find_cut(remaining, max_length);
        let head = remaining[..cut.index].trim();
        if !head.is_empty() {
            segments.push(head.to_string());
        }
        remaining = remaining[cut.index..].trim();
    }

    if !remaining.is_empty() {
        segments.push(remaining.to_string());
    }
    segments
}

/// Pick the cut point for the next segment of `remaining`.
///
/// `remaining` is expected to be longer than `max_length` characters; shorter
/// input yields a hard cut at its end.
pub fn find_cut(remaining: &str, max_length: usize) -> Cut {
    let max_length = max_length.max(1);
    let hard = byte_offset(remaining, max_length);
    let window = &remaining[..hard];

    for rule in CUT_RULES {
        let Some(candidate) = (rule.find)(window) else {
            continue;
        };
        let position = char_len(&window[..candidate.at]);
        if position as f64 > max_length as f64 * rule.min_fraction {
            return Cut { kind: rule.kind, index: candidate.cut };
        }
    }

    Cut { kind: CutKind::Hard, index: hard }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Whether `s` has more than `n` chars, looking at no more than `n + 1` of them.
fn longer_than(s: &str, n: usize) -> bool {
    s.char_indices().nth(n).is_some()
}

/// Byte offset of the `n`th char, or the end of `s`.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

fn find_separator(window: &str) -> Option<Candidate> {
    let mut last_run = None;
    let mut run_start = 0;
    let mut run_len = 0;

    for (i, c) in window.char_indices() {
        if c == SEPARATOR {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len == SEPARATOR_MIN_RUN {
                last_run = Some(run_start);
            }
        } else {
            run_len = 0;
        }
    }

    let at = last_run?;
    let cut = match window[at..].find('\n') {
        Some(nl) => at + nl + 1,
        None => at,
    };
    Some(Candidate { at, cut })
}

fn find_paragraph(window: &str) -> Option<Candidate> {
    window.rfind("\n\n").map(|at| Candidate { at, cut: at + 2 })
}

fn find_section_header(window: &str) -> Option<Candidate> {
    SECTION_MARKERS
        .iter()
        .filter_map(|marker| window.rfind(marker))
        .max()
        .map(|at| Candidate { at, cut: at + 1 })
}

fn find_line_break(window: &str) -> Option<Candidate> {
    window.rfind('\n').map(|at| Candidate { at, cut: at + 1 })
}

fn find_sentence_end(window: &str) -> Option<Candidate> {
    window.rfind(". ").map(|at| Candidate { at, cut: at + 2 })
}

fn find_clause_end(window: &str) -> Option<Candidate> {
    window.rfind(", ").map(|at| Candidate { at, cut: at + 2 })
}

fn find_word_gap(window: &str) -> Option<Candidate> {
    window.rfind(' ').map(|at| Candidate { at, cut: at + 1 })
}
