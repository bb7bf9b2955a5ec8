//! Transcription segments and refinement operations.
//!
//! A [`SegmentList`] is the refinement surface applied to raw model output
//! before clips are written: split on sentence punctuation, split on silence
//! gaps, merge short fragments, merge clause continuations, and cap segment
//! duration. All operations are chainable and consume `self`.
//!
//! Whisper emits segment-level timestamps only, so [`Segment::from_span`]
//! synthesizes per-word timing by apportioning the segment's span across its
//! whitespace-split words proportional to character length. Operations that
//! need word timing (the split ops) are exact whenever real word timing is
//! supplied and a best-effort approximation otherwise.

use crate::defaults;

/// One word with its (possibly approximated) time span.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A contiguous span of speech.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    words: Vec<Word>,
}

impl Segment {
    /// Build a segment from raw model output: a time span and its text.
    ///
    /// Word timing is apportioned across the span proportional to each
    /// word's character count.
    pub fn from_span(start: f64, end: f64, text: &str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let total_chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
        let span = (end - start).max(0.0);

        let mut words = Vec::with_capacity(tokens.len());
        let mut consumed = 0usize;
        for token in &tokens {
            let chars = token.chars().count();
            let (w_start, w_end) = if total_chars == 0 {
                (start, end)
            } else {
                (
                    start + span * consumed as f64 / total_chars as f64,
                    start + span * (consumed + chars) as f64 / total_chars as f64,
                )
            };
            words.push(Word {
                start: w_start,
                end: w_end,
                text: (*token).to_string(),
            });
            consumed += chars;
        }

        Self { start, end, words }
    }

    /// Build a segment directly from timed words. Returns `None` for an
    /// empty word list, which has no meaningful span.
    pub fn from_words(words: Vec<Word>) -> Option<Self> {
        let first = words.first()?.start;
        let last = words.last()?.end;
        Some(Self {
            start: first,
            end: last,
            words,
        })
    }

    /// Transcript text, words joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    fn ends_with_mark(&self, marks: &[char]) -> bool {
        self.words
            .last()
            .and_then(|w| w.text.chars().last())
            .is_some_and(|c| marks.contains(&c))
    }

    fn merge_with(&mut self, other: Segment) {
        self.words.extend(other.words);
        self.end = other.end;
    }
}

/// An ordered sequence of segments with chainable refinement operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentList {
    segments: Vec<Segment>,
}

impl SegmentList {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw `(start, end, text)` spans as produced by the model.
    pub fn from_spans<I, S>(spans: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, S)>,
        S: AsRef<str>,
    {
        Self {
            segments: spans
                .into_iter()
                .map(|(start, end, text)| Segment::from_span(start, end, text.as_ref()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn into_vec(self) -> Vec<Segment> {
        self.segments
    }

    /// Split each segment after any word ending in one of `marks`.
    pub fn split_by_punctuation(self, marks: &[char]) -> Self {
        let mut out = Vec::with_capacity(self.segments.len());
        for seg in self.segments {
            if seg.words.is_empty() {
                // Wordless segment (empty transcript): keep its span intact.
                out.push(seg);
                continue;
            }
            let mut current: Vec<Word> = Vec::new();
            for word in seg.words {
                let cut = word.text.chars().last().is_some_and(|c| marks.contains(&c));
                current.push(word);
                if cut && let Some(s) = Segment::from_words(std::mem::take(&mut current)) {
                    out.push(s);
                }
            }
            if let Some(s) = Segment::from_words(current) {
                out.push(s);
            }
        }
        Self { segments: out }
    }

    /// Split each segment between words separated by a silence gap of at
    /// least `min_gap` seconds.
    pub fn split_by_gap(self, min_gap: f64) -> Self {
        let mut out = Vec::with_capacity(self.segments.len());
        for seg in self.segments {
            if seg.words.is_empty() {
                out.push(seg);
                continue;
            }
            let mut current: Vec<Word> = Vec::new();
            for word in seg.words {
                if let Some(prev) = current.last()
                    && word.start - prev.end >= min_gap
                    && let Some(s) = Segment::from_words(std::mem::take(&mut current))
                {
                    out.push(s);
                }
                current.push(word);
            }
            if let Some(s) = Segment::from_words(current) {
                out.push(s);
            }
        }
        Self { segments: out }
    }

    /// Merge adjacent segments separated by a gap smaller than `max_gap`
    /// when the merged segment would have at most `max_words` words.
    pub fn merge_by_gap(self, max_gap: f64, max_words: usize) -> Self {
        let mut out: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for seg in self.segments {
            match out.last_mut() {
                Some(prev)
                    if seg.start - prev.end < max_gap
                        && prev.word_count() + seg.word_count() <= max_words =>
                {
                    prev.merge_with(seg);
                }
                _ => out.push(seg),
            }
        }
        Self { segments: out }
    }

    /// Merge a segment into its predecessor when the predecessor ends with
    /// one of `marks` (clause continuations, typically commas).
    pub fn merge_by_punctuation(self, marks: &[char]) -> Self {
        let mut out: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for seg in self.segments {
            match out.last_mut() {
                Some(prev) if prev.ends_with_mark(marks) => prev.merge_with(seg),
                _ => out.push(seg),
            }
        }
        Self { segments: out }
    }

    /// Cap every segment's duration at `max_secs` by clamping its end time.
    /// Word timings are clamped into the new span; text is preserved.
    pub fn clamp_max(mut self, max_secs: f64) -> Self {
        for seg in &mut self.segments {
            let limit = seg.start + max_secs;
            if seg.end > limit {
                seg.end = limit;
                for word in &mut seg.words {
                    word.start = word.start.min(limit);
                    word.end = word.end.min(limit);
                }
            }
        }
        self
    }

    /// The canonical refinement chain applied to raw model output.
    pub fn refine(self) -> Self {
        self.split_by_punctuation(defaults::SENTENCE_MARKS)
            .split_by_gap(defaults::GAP_SPLIT_SECS)
            .merge_by_gap(defaults::GAP_MERGE_SECS, defaults::GAP_MERGE_MAX_WORDS)
            .merge_by_punctuation(defaults::CLAUSE_MARKS)
            .split_by_punctuation(defaults::SENTENCE_MARKS)
            .clamp_max(defaults::MAX_CLIP_SECS)
    }
}

impl IntoIterator for SegmentList {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}
